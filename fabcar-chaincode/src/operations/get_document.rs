use async_trait::async_trait;
use fabcar::infrastructure::logging;
use tracing::{info, instrument};

use crate::{
    contract::{Context, Operation},
    error::ChaincodeError,
    ledger::ChaincodeStub,
};

#[derive(Debug)]
pub(crate) struct GetDocument {
    pub document_id: String,
}

#[async_trait]
impl<S: ChaincodeStub + ?Sized> Operation<S> for GetDocument {
    type Output = String;

    /// Fetch a document from the document chaincode and pass its payload
    /// through unchanged.
    #[instrument(skip_all, err(Debug), fields(document_id))]
    async fn operation(self, context: &Context<'_, S>) -> Result<String, ChaincodeError> {
        info!("Starting get document operation.");
        if self.document_id.is_empty() {
            return Err(ChaincodeError::validation("Please provide correct contract Id"));
        }
        logging::record_field("document_id", &self.document_id);

        let get_function = &context.config.document.get_function;
        let document = context
            .invoke_document_chaincode([get_function.as_str(), self.document_id.as_str()])
            .await?;

        info!("Successfully completed get document operation.");
        Ok(document)
    }
}
