//! Config for the chaincode binary.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::Level;

use crate::error::CliError;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct Config {
    /// Contract config file. Defaults are used if unset.
    pub chaincode: Option<PathBuf>,
    /// Ledger config file. Defaults are used if unset.
    pub ledger: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self, CliError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| CliError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        Ok(Self::from_str(&config_string)?)
    }

    pub fn chaincode_config(&self) -> Result<fabcar_chaincode::Config, CliError> {
        Ok(match &self.chaincode {
            Some(path) => fabcar_chaincode::Config::from_file(path)?,
            None => fabcar_chaincode::Config::default(),
        })
    }

    pub fn ledger_config(&self) -> Result<fabcar_ledger_memory::Config, CliError> {
        Ok(match &self.ledger {
            Some(path) => fabcar_ledger_memory::Config::from_file(path)?,
            None => fabcar_ledger_memory::Config::default(),
        })
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        toml::from_str(config_string)
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct LoggingConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub stdout_log_level: Level,
    pub log_files: Option<LoggingFileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct LoggingFileConfig {
    pub chaincode_logs_file_name: PathBuf,
    pub all_logs_file_name: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_str() {
        let config = Config::from_str(
            r#"
            ledger = "dev/config/ledger.toml"

            [logging]
            stdout_log_level = "DEBUG"

            [logging.log_files]
            chaincode_logs_file_name = "logs/chaincode.log"
            all_logs_file_name = "logs/all.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.chaincode, None);
        assert_eq!(config.ledger, Some(PathBuf::from("dev/config/ledger.toml")));
        assert_eq!(config.logging.stdout_log_level, Level::DEBUG);
        assert_eq!(
            config.logging.log_files.unwrap().all_logs_file_name,
            PathBuf::from("logs/all.log")
        );
    }

    #[test]
    fn unset_component_configs_use_defaults() {
        let config = Config::from_str(
            r#"
            [logging]
            stdout_log_level = "INFO"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.chaincode_config().unwrap(),
            fabcar_chaincode::Config::default()
        );
        assert_eq!(
            config.ledger_config().unwrap(),
            fabcar_ledger_memory::Config::default()
        );
    }

    #[test]
    fn missing_component_config_is_reported() {
        let config = Config {
            chaincode: Some(PathBuf::from("does/not/exist.toml")),
            ledger: None,
            logging: LoggingConfig {
                stdout_log_level: Level::INFO,
                log_files: None,
            },
        };

        assert!(matches!(
            config.chaincode_config(),
            Err(CliError::ChaincodeConfig(_))
        ));
    }
}
