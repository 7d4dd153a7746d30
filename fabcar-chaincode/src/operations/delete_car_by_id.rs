use async_trait::async_trait;
use fabcar::infrastructure::logging;
use tracing::{info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct DeleteCarById {
    pub car_id: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for DeleteCarById {
    type Output = String;

    /// Delete the car without checking that it exists.
    #[instrument(skip_all, err(Debug), fields(car_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting delete car operation.");
        if self.car_id.is_empty() {
            return Err(ChaincodeError::validation("Please provide correct contract Id"));
        }
        logging::record_field("car_id", &self.car_id);

        context
            .stub
            .del_state(&self.car_id)
            .await
            .map_err(|source| ChaincodeError::Write {
                context: format!("Failed to delete car {}", self.car_id),
                source,
            })?;

        info!("Successfully completed delete car operation.");
        Ok(context.tx_id())
    }
}
