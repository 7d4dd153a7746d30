//! Records stored by the asset contract and the payloads it returns.

pub mod asset;
pub mod history;
pub mod response;

pub use asset::{Car, LedgerRecord, PrivateCarDetails, Transaction};
pub use history::HistoryEntry;
pub use response::ChaincodeResponse;
