use async_trait::async_trait;
use fabcar::types::Car;
use tracing::{debug, info, instrument};

use crate::{
    contract::{decode_stored, Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct GetContractsForQuery {
    pub query: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for GetContractsForQuery {
    type Output = Vec<Car>;

    /// Run a rich query and decode every match as a car, in the order the
    /// host returns them. The first failure aborts the whole query.
    #[instrument(skip_all, err(Debug))]
    async fn operation(self, context: &Context<'_, S>) -> Result<Vec<Car>, ChaincodeError> {
        info!("Starting get contracts for query operation.");
        debug!(query = %self.query);

        let read_error = |source| ChaincodeError::Read {
            context: "Failed to read from world state".to_string(),
            source,
        };

        let mut results = context
            .stub
            .get_query_result(&self.query)
            .await
            .map_err(read_error)?;

        let mut cars = Vec::new();
        while let Some(result) = results.next().await.map_err(read_error)? {
            cars.push(decode_stored::<Car>(&result.key, &result.value)?);
        }

        info!(
            matches = cars.len(),
            "Successfully completed get contracts for query operation."
        );
        Ok(cars)
    }
}
