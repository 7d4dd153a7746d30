use async_trait::async_trait;
use fabcar::types::ChaincodeResponse;
use fabcar_chaincode::ledger::{
    ChaincodeStub, HistoryQueryIterator, LedgerError, StateQueryIterator, TransientMap,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    api::{iterator::MemoryIterator, MemoryLedger},
    query::Query,
    state::{ChaincodeEvent, Write},
};

/// Writes and the event staged by a transaction that has not committed.
#[derive(Debug, Default)]
struct PendingWrites {
    world: BTreeMap<String, Write>,
    private: BTreeMap<(String, String), Write>,
    event: Option<(String, Vec<u8>)>,
}

/// Summary of a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedTransaction {
    pub tx_id: String,
    /// Public keys written or deleted.
    pub keys: Vec<String>,
    pub event: Option<ChaincodeEvent>,
}

/// A single transaction against a [`MemoryLedger`].
pub struct MemoryStub {
    ledger: MemoryLedger,
    tx_id: String,
    channel_id: String,
    timestamp: OffsetDateTime,
    transient: TransientMap,
    pending: Mutex<PendingWrites>,
}

impl MemoryStub {
    pub(crate) fn new(
        ledger: MemoryLedger,
        tx_id: String,
        timestamp: OffsetDateTime,
        transient: TransientMap,
    ) -> Self {
        let channel_id = ledger.config().channel_id.clone();
        Self {
            ledger,
            tx_id,
            channel_id,
            timestamp,
            transient,
            pending: Mutex::new(PendingWrites::default()),
        }
    }

    /// Apply every staged write atomically, record public writes in the
    /// history log and publish the event.
    #[instrument(skip_all, fields(tx_id = %self.tx_id))]
    pub async fn commit(self) -> CommittedTransaction {
        let pending = self.pending.into_inner();
        let mut state = self.ledger.state().lock().await;

        let keys: Vec<String> = pending.world.keys().cloned().collect();
        for (key, write) in pending.world {
            state.apply_world(key, write, &self.tx_id, self.timestamp);
        }
        for ((collection, key), write) in pending.private {
            state.apply_private(collection, key, write);
        }

        let event = pending.event.map(|(name, payload)| ChaincodeEvent {
            tx_id: self.tx_id.clone(),
            name,
            payload,
        });
        if let Some(event) = &event {
            state.events.push(event.clone());
        }

        info!(writes = keys.len(), "Committed transaction.");
        CommittedTransaction {
            tx_id: self.tx_id,
            keys,
            event,
        }
    }

    fn check_key(key: &str) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        Ok(())
    }

    fn check_collection(&self, collection: &str) -> Result<(), LedgerError> {
        if !self.ledger.config().defines_collection(collection) {
            return Err(LedgerError::UnknownCollection(collection.to_string()));
        }
        Ok(())
    }

    async fn stage_world(&self, key: &str, write: Write) -> Result<(), LedgerError> {
        Self::check_key(key)?;
        let _previous = self.pending.lock().await.world.insert(key.to_string(), write);
        Ok(())
    }

    async fn stage_private(
        &self,
        collection: &str,
        key: &str,
        write: Write,
    ) -> Result<(), LedgerError> {
        self.check_collection(collection)?;
        Self::check_key(key)?;
        let _previous = self
            .pending
            .lock()
            .await
            .private
            .insert((collection.to_string(), key.to_string()), write);
        Ok(())
    }
}

#[async_trait]
impl ChaincodeStub for MemoryStub {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn tx_timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.ledger.state().lock().await.world.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.stage_world(key, Some(value)).await
    }

    async fn del_state(&self, key: &str) -> Result<(), LedgerError> {
        self.stage_world(key, None).await
    }

    async fn get_private_data(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        self.check_collection(collection)?;
        Ok(self
            .ledger
            .state()
            .lock()
            .await
            .private
            .get(collection)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put_private_data(
        &self,
        collection: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        self.stage_private(collection, key, Some(value)).await
    }

    async fn del_private_data(&self, collection: &str, key: &str) -> Result<(), LedgerError> {
        self.stage_private(collection, key, None).await
    }

    async fn get_history_for_key(&self, key: &str) -> Result<HistoryQueryIterator, LedgerError> {
        let history = self.ledger.state().lock().await.history(key);
        debug!(key, entries = history.len(), "Opened history iterator.");
        Ok(Box::new(MemoryIterator::new(
            history,
            self.ledger.iterator_counter(),
        )))
    }

    async fn get_query_result(&self, query: &str) -> Result<StateQueryIterator, LedgerError> {
        let query = Query::parse(query)?;
        let results = query.apply(self.ledger.state().lock().await.world_entries());
        debug!(matches = results.len(), "Opened query iterator.");
        Ok(Box::new(MemoryIterator::new(
            results,
            self.ledger.iterator_counter(),
        )))
    }

    async fn set_event(&self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError> {
        if name.is_empty() {
            return Err(LedgerError::EmptyEventName);
        }
        self.pending.lock().await.event = Some((name.to_string(), payload));
        Ok(())
    }

    async fn get_transient(&self) -> Result<TransientMap, LedgerError> {
        Ok(self.transient.clone())
    }

    #[instrument(skip(self, args))]
    async fn invoke_chaincode(
        &self,
        chaincode_name: &str,
        args: Vec<Vec<u8>>,
        channel: &str,
    ) -> ChaincodeResponse {
        match self.ledger.chaincode(channel, chaincode_name).await {
            Some(handler) => handler.invoke(args).await,
            None => {
                warn!("Chaincode is not registered.");
                ChaincodeResponse::error(format!(
                    "chaincode {chaincode_name} is not installed on channel {channel}"
                ))
            }
        }
    }
}
