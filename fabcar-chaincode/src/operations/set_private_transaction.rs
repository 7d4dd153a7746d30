use async_trait::async_trait;
use fabcar::{infrastructure::logging, types::Transaction};
use tracing::{debug, info, instrument};

use crate::{
    contract::{encode, Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct SetPrivateTransaction {
    /// `[collection]`
    pub args: Vec<String>,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for SetPrivateTransaction {
    type Output = String;

    /// Store a bank transaction in a private data collection.
    /// 1) Take the transaction from the transient map so it never reaches
    ///    the public ledger.
    /// 2) Check every field is set.
    /// 3) Refuse to overwrite an existing transaction in the collection.
    /// 4) Write it to the collection.
    #[instrument(skip_all, err(Debug), fields(collection, transaction_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting set private transaction operation.");
        let collection = match self.args.as_slice() {
            [collection] => collection,
            _ => return Err(ChaincodeError::IncorrectArgumentCount { expected: 1 }),
        };
        logging::record_field("collection", collection);

        let transient_key = &context.config.transient_transaction_key;
        let transient = context
            .stub
            .get_transient()
            .await
            .map_err(|source| ChaincodeError::Read {
                context: "Error getting transient".to_string(),
                source,
            })?;
        let payload = transient.get(transient_key).ok_or_else(|| {
            ChaincodeError::validation(format!("{transient_key} must be a key in the transient map"))
        })?;
        // The payload is private; only its size is logged.
        debug!(bytes = payload.len(), "Read transaction from transient map.");

        if payload.is_empty() {
            return Err(ChaincodeError::validation(
                "Transaction value in the transient map must be a non-empty JSON string",
            ));
        }

        let transaction: Transaction = serde_json::from_slice(payload).map_err(|e| {
            ChaincodeError::validation(format!(
                "Failed to decode JSON of: {} Error is : {e}",
                String::from_utf8_lossy(payload)
            ))
        })?;
        transaction.ensure_complete()?;
        logging::record_field("transaction_id", &transaction.id);

        let existing = context
            .stub
            .get_private_data(collection, &transaction.id)
            .await
            .map_err(|source| ChaincodeError::Read {
                context: "Failed to get transaction".to_string(),
                source,
            })?;
        if existing.is_some() {
            return Err(ChaincodeError::Conflict(transaction.id));
        }

        let bytes = encode(&transaction)?;
        context
            .stub
            .put_private_data(collection, &transaction.id, bytes)
            .await
            .map_err(|source| ChaincodeError::Write {
                context: format!(
                    "Failed to write transaction {} to collection {collection}",
                    transaction.id
                ),
                source,
            })?;

        info!("Successfully completed set private transaction operation.");
        Ok(context.tx_id())
    }
}
