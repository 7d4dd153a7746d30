use async_trait::async_trait;
use fabcar::{infrastructure::logging, types::Transaction};
use tracing::{info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct GetTransactionById {
    pub transaction_id: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for GetTransactionById {
    type Output = Transaction;

    #[instrument(skip_all, err(Debug), fields(transaction_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<Transaction, ChaincodeError> {
        info!("Starting get transaction operation.");
        if self.transaction_id.is_empty() {
            return Err(ChaincodeError::validation("Please provide correct contract Id"));
        }
        logging::record_field("transaction_id", &self.transaction_id);

        let transaction = context
            .read_record(&self.transaction_id, "Failed to read from world state")
            .await?;
        info!("Successfully completed get transaction operation.");
        Ok(transaction)
    }
}
