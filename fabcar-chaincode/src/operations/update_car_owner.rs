use async_trait::async_trait;
use fabcar::{infrastructure::logging, types::Car};
use tracing::{info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct UpdateCarOwner {
    pub car_id: String,
    pub new_owner: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for UpdateCarOwner {
    type Output = String;

    /// Read-modify-write of the car's owner. The car is written back under
    /// the key it was read from, with every other field kept as stored.
    #[instrument(skip_all, err(Debug), fields(car_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting update car owner operation.");
        if self.car_id.is_empty() {
            return Err(ChaincodeError::validation("Please pass the correct car id"));
        }
        logging::record_field("car_id", &self.car_id);

        let mut car: Car = context
            .read_record(&self.car_id, "Failed to get car data")
            .await?;
        car.owner = self.new_owner;
        context.write_record(&self.car_id, &car).await?;

        info!("Successfully completed update car owner operation.");
        Ok(context.tx_id())
    }
}
