use async_trait::async_trait;
use fabcar::types::{Car, HistoryEntry, Transaction};
use serde::Serialize;

use crate::{contract::Context, error::ChaincodeError, ledger::ChaincodeStub};

/// A type implementing [`Operation`] carries the arguments of one contract
/// function and runs it against the ledger through a [`Context`].
#[async_trait]
pub(crate) trait Operation<S: ChaincodeStub + ?Sized>: Sized + Send {
    type Output: IntoPayload + Send;

    /// Core logic for a given operation.
    async fn operation(self, context: &Context<'_, S>) -> Result<Self::Output, ChaincodeError>;
}

/// Conversion of an operation's result into the payload returned to the host.
/// Strings are returned verbatim, records and lists as JSON.
pub(crate) trait IntoPayload {
    fn into_payload(self) -> Result<String, ChaincodeError>;
}

impl IntoPayload for String {
    fn into_payload(self) -> Result<String, ChaincodeError> {
        Ok(self)
    }
}

fn json_payload<T: Serialize + ?Sized>(
    value: &T,
    record: &'static str,
) -> Result<String, ChaincodeError> {
    serde_json::to_string(value).map_err(|source| ChaincodeError::Encode { record, source })
}

impl IntoPayload for Car {
    fn into_payload(self) -> Result<String, ChaincodeError> {
        json_payload(&self, "car")
    }
}

impl IntoPayload for Transaction {
    fn into_payload(self) -> Result<String, ChaincodeError> {
        json_payload(&self, "transaction")
    }
}

impl IntoPayload for Vec<Car> {
    fn into_payload(self) -> Result<String, ChaincodeError> {
        json_payload(&self, "query results")
    }
}

impl IntoPayload for Vec<HistoryEntry> {
    fn into_payload(self) -> Result<String, ChaincodeError> {
        json_payload(&self, "history")
    }
}
