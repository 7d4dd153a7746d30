use fabcar_chaincode::config::ConfigError;
use fabcar_ledger_memory::MemoryLedgerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("File IO error. Cause: {0}. On file: {1}")]
    FileIo(std::io::Error, PathBuf),
    #[error("Invalid log file path: {0}")]
    InvalidLogFilePath(PathBuf),
    #[error("Transient entry `{0}` must have the form key=value")]
    InvalidTransient(String),

    // Wrapped errors
    #[error(transparent)]
    ChaincodeConfig(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] MemoryLedgerError),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
