use fabcar::{types::ChaincodeResponse, FabcarError};
use serde_json::json;
use strum::Display;
use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Debug, Error)]
pub enum ChaincodeError {
    // Request errors
    #[error("{0}")]
    Validation(String),
    #[error("Incorrect number of arguments. Expecting {expected}")]
    IncorrectArgumentCount { expected: usize },
    #[error("Function {0} not found in contract")]
    UnknownFunction(String),
    #[error("{0} does not exist")]
    NotFound(String),
    #[error("This transaction already exists: {0}")]
    Conflict(String),

    // Encoding errors
    #[error("Failed while unmarshaling {record}. {source}")]
    Decode {
        record: &'static str,
        source: serde_json::Error,
    },
    #[error("Failed while marshaling {record}. {source}")]
    Encode {
        record: &'static str,
        source: serde_json::Error,
    },
    #[error("Stored {record} at key {key} is corrupt. {source}")]
    CorruptState {
        record: &'static str,
        key: String,
        source: serde_json::Error,
    },

    // Ledger errors
    #[error("{context}. {source}")]
    Read { context: String, source: LedgerError },
    #[error("{context}. {source}")]
    Write { context: String, source: LedgerError },
    #[error("{}", private_read_message(.id, .source))]
    PrivateDetailsRead { id: String, source: LedgerError },
    #[error("{}", private_missing_message(.0))]
    PrivateDetailsMissing(String),

    // Remote errors
    #[error("Chaincode {chaincode} on channel {channel} returned status {status}: {message}")]
    RemoteInvocation {
        chaincode: String,
        channel: String,
        status: i32,
        message: String,
    },

    // Wrapped errors
    #[error(transparent)]
    Fabcar(#[from] FabcarError),
}

/// Coarse classification of a [`ChaincodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ErrorKind {
    #[strum(serialize = "ValidationError")]
    Validation,
    #[strum(serialize = "SerializationError")]
    Serialization,
    #[strum(serialize = "NotFoundError")]
    NotFound,
    #[strum(serialize = "ConflictError")]
    Conflict,
    #[strum(serialize = "ReadError")]
    Read,
    #[strum(serialize = "WriteError")]
    Write,
    #[strum(serialize = "CorruptStateError")]
    CorruptState,
    #[strum(serialize = "RemoteInvocationError")]
    RemoteInvocation,
}

impl ChaincodeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::IncorrectArgumentCount { .. } | Self::UnknownFunction(_) => {
                ErrorKind::Validation
            }
            Self::Fabcar(FabcarError::EmptyField(_)) => ErrorKind::Validation,
            Self::NotFound(_) | Self::PrivateDetailsMissing(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Decode { .. }
            | Self::Encode { .. }
            | Self::Fabcar(FabcarError::TimestampFormat(_)) => ErrorKind::Serialization,
            Self::CorruptState { .. } => ErrorKind::CorruptState,
            Self::Read { .. } | Self::PrivateDetailsRead { .. } => ErrorKind::Read,
            Self::Write { .. } => ErrorKind::Write,
            Self::RemoteInvocation { .. } => ErrorKind::RemoteInvocation,
        }
    }
}

/// Render `message` as `{"Error":"<message>"}`.
fn json_error(message: String) -> String {
    json!({ "Error": message }).to_string()
}

fn private_read_message(id: &str, source: &LedgerError) -> String {
    json_error(format!("Failed to get private details for {id}: {source}"))
}

fn private_missing_message(id: &str) -> String {
    json_error(format!("Transaction private details does not exist: {id}"))
}

impl From<ChaincodeError> for ChaincodeResponse {
    fn from(error: ChaincodeError) -> Self {
        match error.kind() {
            // Errors caused by the request itself
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Conflict => {
                ChaincodeResponse::with_status(ChaincodeResponse::ERROR_THRESHOLD, error.to_string())
            }

            ErrorKind::Serialization
            | ErrorKind::Read
            | ErrorKind::Write
            | ErrorKind::CorruptState
            | ErrorKind::RemoteInvocation => ChaincodeResponse::error(error.to_string()),
        }
    }
}
