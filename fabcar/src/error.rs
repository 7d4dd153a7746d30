use thiserror::Error;

#[derive(Debug, Error)]
pub enum FabcarError {
    // Record errors
    #[error("{0} field must be a non-empty string")]
    EmptyField(&'static str),

    // Wrapped errors
    #[error("Could not render timestamp: {0}")]
    TimestampFormat(#[from] time::error::Format),
}
