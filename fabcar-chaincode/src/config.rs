use fabcar::constants::{self, document, events, transient};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File IO error. Cause: {0}. On file: {1}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Contract configuration. Every field has a default, so an empty file is a
/// valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct Config {
    /// Namespace accepted in front of function names, as in
    /// `SmartContract:CreateCar`.
    pub contract_name: String,
    /// Name of the deployed chaincode; attached to every invocation span.
    pub chaincode_name: String,
    /// Event emitted when a car or transaction is created.
    pub create_event_name: String,
    /// Transient map key carrying private transaction payloads.
    pub transient_transaction_key: String,
    pub document: DocumentChaincodeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract_name: constants::CONTRACT_NAME.to_string(),
            chaincode_name: constants::CHAINCODE_NAME.to_string(),
            create_event_name: events::CREATE_ASSET.to_string(),
            transient_transaction_key: transient::TRANSACTION.to_string(),
            document: DocumentChaincodeConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        Self::from_str(&config_string)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}

/// Where the document chaincode lives and how to ask it for a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct DocumentChaincodeConfig {
    pub chaincode_name: String,
    pub channel: String,
    pub get_function: String,
}

impl Default for DocumentChaincodeConfig {
    fn default() -> Self {
        Self {
            chaincode_name: document::CHAINCODE.to_string(),
            channel: document::CHANNEL.to_string(),
            get_function: document::GET_DOCUMENT_FUNCTION.to_string(),
        }
    }
}
