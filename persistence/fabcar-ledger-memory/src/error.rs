use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryLedgerError {
    #[error("File IO error. Cause: {0}. On file: {1}")]
    FileIo(std::io::Error, PathBuf),
    #[error("Ledger snapshot {1} is not valid: {0}")]
    Snapshot(serde_json::Error, PathBuf),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
