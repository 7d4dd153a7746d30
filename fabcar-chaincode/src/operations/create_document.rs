use async_trait::async_trait;
use fabcar::infrastructure::logging;
use tracing::{info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct CreateDocument {
    /// Function to call on the document chaincode.
    pub function_name: String,
    pub document_data: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for CreateDocument {
    type Output = String;

    #[instrument(skip_all, err(Debug), fields(function_name))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting create document operation.");
        if self.document_data.is_empty() {
            return Err(ChaincodeError::validation("Please provide correct document data"));
        }
        logging::record_field("function_name", &self.function_name);

        let response = context
            .invoke_document_chaincode([self.function_name.as_str(), self.document_data.as_str()])
            .await?;

        info!("Successfully completed create document operation.");
        Ok(response)
    }
}
