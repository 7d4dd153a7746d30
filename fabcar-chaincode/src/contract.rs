//! The asset contract: typed entry points for every contract function and the
//! name-based dispatch the host uses to invoke them.

mod context;
mod function;
mod operation;

pub(crate) use context::{decode_request, decode_stored, encode, Context};
pub use function::ContractFunction;
pub(crate) use operation::{IntoPayload, Operation};

use fabcar::{
    constants::METADATA_FUNCTION,
    infrastructure::logging,
    types::{Car, ChaincodeResponse, HistoryEntry, Transaction},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::{error::ChaincodeError, ledger::ChaincodeStub, operations, Config};

/// Car and bank transfer contract. Holds only its configuration; all state is
/// read from and written to the stub passed with each call.
#[derive(Clone, Debug, Default)]
pub struct AssetContract {
    config: Arc<Config>,
}

impl AssetContract {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn context<'a, S: ChaincodeStub + ?Sized>(&'a self, stub: &'a S) -> Context<'a, S> {
        Context {
            stub,
            config: &self.config,
        }
    }

    /// Metadata document describing this contract's functions.
    pub fn metadata(&self) -> Value {
        function::metadata(&self.config)
    }

    /// Entry point for the host: run `function` with `args` and wrap the
    /// outcome in a response envelope. Failures are logged and returned as
    /// error statuses carrying the error message.
    #[instrument(
        skip_all,
        fields(chaincode = %self.config.chaincode_name, function, tx_id)
    )]
    pub async fn invoke<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        function: &str,
        args: &[String],
    ) -> ChaincodeResponse {
        logging::record_field("function", &function);
        logging::record_field("tx_id", &stub.tx_id());

        match self.dispatch(stub, function, args).await {
            Ok(payload) => {
                info!("Invocation succeeded.");
                ChaincodeResponse::success(payload)
            }
            Err(e) => {
                error!(kind = %e.kind(), "Invocation failed: {e}");
                e.into()
            }
        }
    }

    /// Route `function` to its operation and convert the result to a payload.
    pub async fn dispatch<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        function: &str,
        args: &[String],
    ) -> Result<String, ChaincodeError> {
        if function == METADATA_FUNCTION {
            return Ok(self.metadata().to_string());
        }

        let function = ContractFunction::resolve(function, &self.config.contract_name)?;
        let args = function.bind_arguments(args)?;
        let arg = |index: usize| args.get(index).map(String::as_str).unwrap_or_default();

        match function {
            ContractFunction::CreateCar => self.create_car(stub, arg(0)).await?.into_payload(),
            ContractFunction::UpdateCarOwner => self
                .update_car_owner(stub, arg(0), arg(1))
                .await?
                .into_payload(),
            ContractFunction::GetCarById => self.get_car_by_id(stub, arg(0)).await?.into_payload(),
            ContractFunction::DeleteCarById => {
                self.delete_car_by_id(stub, arg(0)).await?.into_payload()
            }
            ContractFunction::GetHistoryForAsset => self
                .get_history_for_asset(stub, arg(0))
                .await?
                .into_payload(),
            ContractFunction::GetContractsForQuery => self
                .get_contracts_for_query(stub, arg(0))
                .await?
                .into_payload(),
            ContractFunction::SetTransaction => {
                self.set_transaction(stub, arg(0)).await?.into_payload()
            }
            ContractFunction::GetTransactionById => self
                .get_transaction_by_id(stub, arg(0))
                .await?
                .into_payload(),
            ContractFunction::SetPrivateTransaction => self
                .set_private_transaction(stub, args.clone())
                .await?
                .into_payload(),
            ContractFunction::ReadPrivateTransaction => self
                .read_private_transaction(stub, args.clone())
                .await?
                .into_payload(),
            ContractFunction::GetDocumentUsingCarContract => self
                .get_document_using_car_contract(stub, arg(0))
                .await?
                .into_payload(),
            ContractFunction::CreateDocumentUsingCarContract => self
                .create_document_using_car_contract(stub, arg(0), arg(1))
                .await?
                .into_payload(),
        }
    }

    /// Store the car described by `car_data` under its id. Returns the
    /// transaction id.
    pub async fn create_car<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        car_data: &str,
    ) -> Result<String, ChaincodeError> {
        operations::CreateCar {
            car_data: car_data.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn update_car_owner<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        car_id: &str,
        new_owner: &str,
    ) -> Result<String, ChaincodeError> {
        operations::UpdateCarOwner {
            car_id: car_id.to_string(),
            new_owner: new_owner.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn get_car_by_id<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        car_id: &str,
    ) -> Result<Car, ChaincodeError> {
        operations::GetCarById {
            car_id: car_id.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn delete_car_by_id<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        car_id: &str,
    ) -> Result<String, ChaincodeError> {
        operations::DeleteCarById {
            car_id: car_id.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn get_history_for_asset<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        car_id: &str,
    ) -> Result<Vec<HistoryEntry>, ChaincodeError> {
        operations::GetHistoryForAsset {
            car_id: car_id.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn get_contracts_for_query<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        query: &str,
    ) -> Result<Vec<Car>, ChaincodeError> {
        operations::GetContractsForQuery {
            query: query.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn set_transaction<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        transaction_data: &str,
    ) -> Result<String, ChaincodeError> {
        operations::SetTransaction {
            transaction_data: transaction_data.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn get_transaction_by_id<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        transaction_id: &str,
    ) -> Result<Transaction, ChaincodeError> {
        operations::GetTransactionById {
            transaction_id: transaction_id.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    /// `args` must be `[collection]`; the payload is read from the transient
    /// map.
    pub async fn set_private_transaction<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        args: Vec<String>,
    ) -> Result<String, ChaincodeError> {
        operations::SetPrivateTransaction { args }
            .operation(&self.context(stub))
            .await
    }

    /// `args` must be `[collection, transaction_id]`.
    pub async fn read_private_transaction<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        args: Vec<String>,
    ) -> Result<String, ChaincodeError> {
        operations::ReadPrivateTransaction { args }
            .operation(&self.context(stub))
            .await
    }

    pub async fn get_document_using_car_contract<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        document_id: &str,
    ) -> Result<String, ChaincodeError> {
        operations::GetDocument {
            document_id: document_id.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }

    pub async fn create_document_using_car_contract<S: ChaincodeStub + ?Sized>(
        &self,
        stub: &S,
        function_name: &str,
        document_data: &str,
    ) -> Result<String, ChaincodeError> {
        operations::CreateDocument {
            function_name: function_name.to_string(),
            document_data: document_data.to_string(),
        }
        .operation(&self.context(stub))
        .await
    }
}
