//! Response envelope returned by a chaincode invocation.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Status, message and payload of a chaincode invocation. Statuses follow the
/// peer's convention: anything below [`ChaincodeResponse::ERROR_THRESHOLD`] is
/// a success.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeResponse {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl ChaincodeResponse {
    pub const OK: i32 = 200;
    pub const ERROR_THRESHOLD: i32 = 400;
    pub const ERROR: i32 = 500;

    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status(Self::ERROR, message)
    }

    pub fn with_status(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status < Self::ERROR_THRESHOLD
    }

    /// The payload as text. Invalid UTF-8 is replaced rather than rejected.
    pub fn payload_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_threshold_decides_success() {
        assert!(ChaincodeResponse::success("ok").is_success());
        assert!(!ChaincodeResponse::with_status(400, "bad").is_success());
        assert!(!ChaincodeResponse::error("boom").is_success());
    }
}
