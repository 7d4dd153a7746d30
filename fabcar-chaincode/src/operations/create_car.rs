use async_trait::async_trait;
use fabcar::{infrastructure::logging, types::Car};
use tracing::{info, instrument};

use crate::{
    contract::{decode_request, Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct CreateCar {
    pub car_data: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for CreateCar {
    type Output = String;

    /// Store a new car.
    /// 1) Decode the car from the request.
    /// 2) Announce it with the create event.
    /// 3) Write it under its id, overwriting any previous car.
    #[instrument(skip_all, err(Debug), fields(car_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting create car operation.");
        if self.car_data.is_empty() {
            return Err(ChaincodeError::validation("Please pass the correct car data"));
        }

        let car: Car = decode_request(self.car_data.as_bytes())?;
        logging::record_field("car_id", &car.id);

        let tx_id = context.create_record(&car).await?;
        info!("Successfully completed create car operation.");
        Ok(tx_id)
    }
}
