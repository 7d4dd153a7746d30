use async_trait::async_trait;
use fabcar::types::ChaincodeResponse;
use fabcar_chaincode::ledger::TransientMap;
use std::{
    collections::HashMap,
    io::ErrorKind,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    state::{ChaincodeEvent, LedgerState},
    Config, MemoryLedgerError,
};

mod iterator;
mod stub;

pub use stub::{CommittedTransaction, MemoryStub};

/// Another chaincode reachable from a transaction through
/// [`invoke_chaincode`](fabcar_chaincode::ledger::ChaincodeStub::invoke_chaincode).
#[async_trait]
pub trait ChaincodeHandler: Send + Sync {
    async fn invoke(&self, args: Vec<Vec<u8>>) -> ChaincodeResponse;
}

/// Registered chaincodes, by channel and name.
type ChaincodeRegistry = HashMap<(String, String), Arc<dyn ChaincodeHandler>>;

/// Handle to an in-memory ledger. Clones share the same ledger.
#[derive(Clone)]
pub struct MemoryLedger {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    state: Mutex<LedgerState>,
    chaincodes: RwLock<ChaincodeRegistry>,
    /// Iterators handed out and not yet dropped.
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new(config: Config) -> Self {
        Self::with_state(config, LedgerState::default())
    }

    /// Create a ledger from the configured snapshot, or an empty one if no
    /// snapshot is configured or the file does not exist yet.
    #[instrument(skip_all, err(Debug))]
    pub async fn open(config: Config) -> Result<Self, MemoryLedgerError> {
        let state = match &config.snapshot_path {
            Some(path) => load_snapshot(path).await?.unwrap_or_default(),
            None => LedgerState::default(),
        };
        Ok(Self::with_state(config, state))
    }

    fn with_state(config: Config, state: LedgerState) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(state),
                chaincodes: RwLock::new(HashMap::new()),
                open_iterators: Arc::new(AtomicUsize::new(0)),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Start a transaction with a fresh id and the current time.
    pub fn begin(&self, transient: TransientMap) -> MemoryStub {
        let tx_id = Uuid::new_v4().simple().to_string();
        self.begin_at(tx_id, OffsetDateTime::now_utc(), transient)
    }

    /// Start a transaction with the given id and timestamp.
    pub fn begin_at(
        &self,
        tx_id: impl Into<String>,
        timestamp: OffsetDateTime,
        transient: TransientMap,
    ) -> MemoryStub {
        MemoryStub::new(self.clone(), tx_id.into(), timestamp, transient)
    }

    /// Make `handler` reachable as chaincode `name` on `channel`.
    pub async fn register_chaincode(
        &self,
        channel: impl Into<String>,
        name: impl Into<String>,
        handler: Arc<dyn ChaincodeHandler>,
    ) {
        let _previous = self
            .inner
            .chaincodes
            .write()
            .await
            .insert((channel.into(), name.into()), handler);
    }

    pub(crate) async fn chaincode(
        &self,
        channel: &str,
        name: &str,
    ) -> Option<Arc<dyn ChaincodeHandler>> {
        self.inner
            .chaincodes
            .read()
            .await
            .get(&(channel.to_string(), name.to_string()))
            .cloned()
    }

    /// Save committed state to the configured snapshot file. Does nothing if
    /// no snapshot is configured.
    #[instrument(skip_all, err(Debug))]
    pub async fn save_snapshot(&self) -> Result<(), MemoryLedgerError> {
        let path = match &self.inner.config.snapshot_path {
            Some(path) => path,
            None => return Ok(()),
        };

        let snapshot = serde_json::to_vec_pretty(&*self.inner.state.lock().await)?;
        tokio::fs::write(path, snapshot)
            .await
            .map_err(|e| MemoryLedgerError::FileIo(e, path.clone()))?;

        info!(path = %path.display(), "Saved ledger snapshot.");
        Ok(())
    }

    /// Committed value of a public key.
    pub async fn committed_state(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.state.lock().await.world.get(key).cloned()
    }

    /// Committed value of a key in a private collection.
    pub async fn committed_private_data(&self, collection: &str, key: &str) -> Option<Vec<u8>> {
        self.inner
            .state
            .lock()
            .await
            .private
            .get(collection)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    /// Events of every committed transaction, in commit order.
    pub async fn events(&self) -> Vec<ChaincodeEvent> {
        self.inner.state.lock().await.events.clone()
    }

    /// Number of history and query iterators currently open.
    pub fn open_iterators(&self) -> usize {
        self.inner.open_iterators.load(Ordering::SeqCst)
    }

    pub(crate) fn state(&self) -> &Mutex<LedgerState> {
        &self.inner.state
    }

    pub(crate) fn iterator_counter(&self) -> Arc<AtomicUsize> {
        self.inner.open_iterators.clone()
    }
}

async fn load_snapshot(path: &Path) -> Result<Option<LedgerState>, MemoryLedgerError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No ledger snapshot found. Starting empty.");
            return Ok(None);
        }
        Err(e) => return Err(MemoryLedgerError::FileIo(e, path.to_path_buf())),
    };

    let state = serde_json::from_slice(&bytes)
        .map_err(|e| MemoryLedgerError::Snapshot(e, path.to_path_buf()))?;
    info!(path = %path.display(), "Loaded ledger snapshot.");
    Ok(Some(state))
}
