use async_trait::async_trait;
use fabcar::infrastructure::logging;
use tracing::{info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct ReadPrivateTransaction {
    /// `[collection, transaction_id]`
    pub args: Vec<String>,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for ReadPrivateTransaction {
    type Output = String;

    /// Return the transaction stored in a private collection exactly as it
    /// was written.
    #[instrument(skip_all, err(Debug), fields(collection, transaction_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting read private transaction operation.");
        let (collection, transaction_id) = match self.args.as_slice() {
            [collection, transaction_id] => (collection, transaction_id),
            _ => return Err(ChaincodeError::IncorrectArgumentCount { expected: 2 }),
        };
        logging::record_field("collection", collection);
        logging::record_field("transaction_id", transaction_id);

        let bytes = context
            .stub
            .get_private_data(collection, transaction_id)
            .await
            .map_err(|source| ChaincodeError::PrivateDetailsRead {
                id: transaction_id.clone(),
                source,
            })?
            .ok_or_else(|| ChaincodeError::PrivateDetailsMissing(transaction_id.clone()))?;

        info!("Successfully completed read private transaction operation.");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
