use async_trait::async_trait;
use fabcar::{infrastructure::logging, types::Car};
use tracing::{info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct GetCarById {
    pub car_id: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for GetCarById {
    type Output = Car;

    #[instrument(skip_all, err(Debug), fields(car_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<Car, ChaincodeError> {
        info!("Starting get car operation.");
        if self.car_id.is_empty() {
            return Err(ChaincodeError::validation("Please provide correct contract Id"));
        }
        logging::record_field("car_id", &self.car_id);

        let car = context
            .read_record(&self.car_id, "Failed to read from world state")
            .await?;
        info!("Successfully completed get car operation.");
        Ok(car)
    }
}
