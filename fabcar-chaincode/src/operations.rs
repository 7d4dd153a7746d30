//! One module per contract function. Each exposes a struct holding the
//! function's arguments that implements `Operation`.

mod create_car;
mod create_document;
mod delete_car_by_id;
mod get_car_by_id;
mod get_contracts_for_query;
mod get_document;
mod get_history_for_asset;
mod get_transaction_by_id;
mod read_private_transaction;
mod set_private_transaction;
mod set_transaction;
mod update_car_owner;

pub(crate) use create_car::CreateCar;
pub(crate) use create_document::CreateDocument;
pub(crate) use delete_car_by_id::DeleteCarById;
pub(crate) use get_car_by_id::GetCarById;
pub(crate) use get_contracts_for_query::GetContractsForQuery;
pub(crate) use get_document::GetDocument;
pub(crate) use get_history_for_asset::GetHistoryForAsset;
pub(crate) use get_transaction_by_id::GetTransactionById;
pub(crate) use read_private_transaction::ReadPrivateTransaction;
pub(crate) use set_private_transaction::SetPrivateTransaction;
pub(crate) use set_transaction::SetTransaction;
pub(crate) use update_car_owner::UpdateCarOwner;
