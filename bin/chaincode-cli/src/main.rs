mod config;
mod error;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use config::{Config, LoggingConfig};
use error::CliError;
use fabcar::types::ChaincodeResponse;
use fabcar_chaincode::{ledger::ChaincodeStub, AssetContract, ContractFunction};
use fabcar_ledger_memory::MemoryLedger;
use serde_json::json;
use tracing::{debug, info, Level};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::Targets, prelude::*};

/// Run one chaincode function as a transaction against an in-memory ledger.
#[derive(Debug, Parser)]
pub struct Cli {
    /// Path to the CLI config file
    pub config: PathBuf,
    /// Function to invoke, e.g. `CreateCar` or `SmartContract:CreateCar`
    pub function: String,
    /// Arguments passed to the function
    pub args: Vec<String>,
    /// Transient data as `key=value`. May be repeated.
    #[clap(long)]
    pub transient: Vec<String>,
    /// Never commit, even if the function writes to the ledger
    #[clap(long)]
    pub evaluate: bool,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    match run_main().await {
        Ok(response) if response.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Chaincode error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn run_main() -> Result<ChaincodeResponse, CliError> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;

    // Keep `_logging` until we exit so buffered logs are flushed.
    let _logging = init_logging(&config.logging)?;
    debug!("Logging config settings: {:?}", config.logging);

    let contract = AssetContract::new(config.chaincode_config()?);
    let ledger = MemoryLedger::open(config.ledger_config()?).await?;

    let transient = cli
        .transient
        .iter()
        .map(|entry| parse_transient(entry))
        .map(|entry| entry.map(|(key, value)| (key, value.into_bytes())))
        .collect::<Result<_, _>>()?;
    let stub = ledger.begin(transient);
    let tx_id = stub.tx_id().to_string();

    let response = contract.invoke(&stub, &cli.function, &cli.args).await;

    let submit = !cli.evaluate
        && ContractFunction::resolve(&cli.function, &contract.config().contract_name)
            .map(ContractFunction::is_submit)
            .unwrap_or(false);
    let committed = response.is_success() && submit;
    if committed {
        let transaction = stub.commit().await;
        info!(keys = ?transaction.keys, "Transaction committed.");
        ledger.save_snapshot().await?;
    }

    let output = json!({
        "tx_id": tx_id,
        "status": response.status,
        "message": response.message,
        "payload": response.payload_str(),
        "committed": committed,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(response)
}

/// Parse a `key=value` transient entry.
fn parse_transient(entry: &str) -> Result<(String, String), CliError> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| CliError::InvalidTransient(entry.to_string()))?;
    Ok((key.to_string(), value.to_string()))
}

/// Guards of the file log writers. Buffered file logs are only flushed while
/// their guard is alive, so this is held until `run_main` returns.
struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

/// Install the global subscriber. Events from the workspace crates at
/// `stdout_log_level` or above go to stderr, since stdout carries the
/// invocation result. With `log_files` set, every workspace event is also
/// written as JSON to `chaincode_logs_file_name` and events from any crate
/// to `all_logs_file_name`.
fn init_logging(config: &LoggingConfig) -> Result<LoggingGuards, CliError> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_filter(workspace_targets(config.stdout_log_level));

    let mut guards = Vec::new();
    let (chaincode_layer, all_layer) = match &config.log_files {
        Some(files) => {
            let chaincode_writer = hourly_writer(&files.chaincode_logs_file_name, &mut guards)?;
            let all_writer = hourly_writer(&files.all_logs_file_name, &mut guards)?;
            (
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(chaincode_writer)
                        .with_filter(workspace_targets(Level::TRACE)),
                ),
                Some(tracing_subscriber::fmt::layer().json().with_writer(all_writer)),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(chaincode_layer)
        .with(all_layer)
        .init();

    Ok(LoggingGuards { _guards: guards })
}

/// Non-blocking writer to `path`, rolled over every hour.
fn hourly_writer(path: &Path, guards: &mut Vec<WorkerGuard>) -> Result<NonBlocking, CliError> {
    let invalid_path = || CliError::InvalidLogFilePath(path.to_path_buf());
    let dir = path.parent().ok_or_else(invalid_path)?;
    let file_name = path.file_name().ok_or_else(invalid_path)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::hourly(dir, file_name));
    guards.push(guard);
    Ok(writer)
}

fn workspace_targets(level: Level) -> Targets {
    Targets::new()
        .with_target("chaincode_cli", level)
        .with_target("fabcar", level)
        .with_target("fabcar_chaincode", level)
        .with_target("fabcar_ledger_memory", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_entries_split_on_first_equals() {
        assert_eq!(
            parse_transient(r#"transaction={"id":"T1","amount":"a=b"}"#).unwrap(),
            (
                "transaction".to_string(),
                r#"{"id":"T1","amount":"a=b"}"#.to_string()
            )
        );
        assert!(matches!(
            parse_transient("transaction"),
            Err(CliError::InvalidTransient(entry)) if entry == "transaction"
        ));
    }

    #[test]
    fn log_file_path_needs_a_file_name() {
        let mut guards = Vec::new();
        assert!(matches!(
            hourly_writer(Path::new("/"), &mut guards),
            Err(CliError::InvalidLogFilePath(path)) if path == Path::new("/")
        ));
        assert!(guards.is_empty());
    }

    #[test]
    fn cli_parses_function_arguments_and_transient_data() {
        let cli = Cli::parse_from([
            "chaincode-cli",
            "dev/config/cli.toml",
            "SmartContract:UpdateCarOwner",
            "CAR1",
            "Jerry",
            "--transient",
            "transaction={}",
        ]);

        assert_eq!(cli.function, "SmartContract:UpdateCarOwner");
        assert_eq!(cli.args, ["CAR1", "Jerry"]);
        assert_eq!(cli.transient, ["transaction={}"]);
        assert!(!cli.evaluate);
    }
}
