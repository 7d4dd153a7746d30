use fabcar_chaincode::ChaincodeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FabcarTestError>;

#[derive(Debug, Error)]
pub enum FabcarTestError {
    #[error("Chaincode call failed with status {status}: {message}")]
    Invocation { status: i32, message: String },

    // Wrapped errors
    #[error(transparent)]
    Chaincode(#[from] ChaincodeError),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}
