use fabcar::constants::document;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::MemoryLedgerError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct Config {
    /// Channel reported to every transaction.
    pub channel_id: String,
    /// Private data collections defined for the chaincode. When unset, any
    /// collection name is accepted.
    pub collections: Option<Vec<String>>,
    /// JSON file the committed state is loaded from and saved to.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_id: document::CHANNEL.to_string(),
            collections: None,
            snapshot_path: None,
        }
    }
}

impl Config {
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self, MemoryLedgerError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| MemoryLedgerError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        Self::from_str(&config_string)
    }

    pub(crate) fn defines_collection(&self, collection: &str) -> bool {
        match &self.collections {
            Some(collections) => collections.iter().any(|defined| defined == collection),
            None => !collection.is_empty(),
        }
    }
}

impl FromStr for Config {
    type Err = MemoryLedgerError;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_str() {
        let config = Config::from_str(
            r#"
            channel_id = "fabcar"
            collections = ["collectionTransactions"]
            snapshot_path = "ledger.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.channel_id, "fabcar");
        assert!(config.defines_collection("collectionTransactions"));
        assert!(!config.defines_collection("collectionCars"));
        assert_eq!(config.snapshot_path, Some(PathBuf::from("ledger.json")));
    }

    #[test]
    fn open_collections_by_default() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.defines_collection("anything"));
        assert!(!config.defines_collection(""));
    }
}
