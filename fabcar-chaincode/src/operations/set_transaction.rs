use async_trait::async_trait;
use fabcar::{infrastructure::logging, types::Transaction};
use tracing::{info, instrument};

use crate::{
    contract::{decode_request, Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct SetTransaction {
    pub transaction_data: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for SetTransaction {
    type Output = String;

    /// Store a bank transaction in world state. Like cars, an existing
    /// transaction with the same id is overwritten.
    #[instrument(skip_all, err(Debug), fields(transaction_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting set transaction operation.");
        if self.transaction_data.is_empty() {
            return Err(ChaincodeError::validation(
                "Please pass the correct transaction data",
            ));
        }

        let transaction: Transaction = decode_request(self.transaction_data.as_bytes())?;
        logging::record_field("transaction_id", &transaction.id);

        let tx_id = context.create_record(&transaction).await?;
        info!("Successfully completed set transaction operation.");
        Ok(tx_id)
    }
}
