use async_trait::async_trait;
use fabcar::{
    infrastructure::logging,
    types::{Car, HistoryEntry, LedgerRecord},
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct GetHistoryForAsset {
    pub car_id: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for GetHistoryForAsset {
    type Output = Vec<HistoryEntry>;

    /// Collect every recorded version of the car, oldest first.
    /// Deletes are reported with a `null` value.
    #[instrument(skip_all, err(Debug), fields(car_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<Vec<HistoryEntry>, ChaincodeError> {
        info!("Starting get history for asset operation.");
        logging::record_field("car_id", &self.car_id);

        let read_error = |source| ChaincodeError::Read {
            context: format!("Failed to get history for {}", self.car_id),
            source,
        };

        // The iterator releases its cursor when dropped, including on early
        // return below.
        let mut history = context
            .stub
            .get_history_for_key(&self.car_id)
            .await
            .map_err(read_error)?;

        let mut entries = Vec::new();
        while let Some(modification) = history.next().await.map_err(read_error)? {
            let value = if modification.is_delete {
                None
            } else {
                let value = serde_json::from_slice::<Value>(&modification.value).map_err(
                    |source| ChaincodeError::CorruptState {
                        record: Car::NAME,
                        key: self.car_id.clone(),
                        source,
                    },
                )?;
                Some(value)
            };

            entries.push(HistoryEntry::new(
                modification.tx_id,
                value,
                modification.timestamp,
                modification.is_delete,
            )?);
        }

        debug!(entries = entries.len(), "Read asset history.");
        info!("Successfully completed get history for asset operation.");
        Ok(entries)
    }
}
