//! Interface between the asset contract and the ledger host running it.
//!
//! The host owns world state, private data collections, the per-key history
//! log, rich query indexes and cross-chaincode routing. The contract only ever
//! reaches them through a [`ChaincodeStub`] scoped to one transaction.

use async_trait::async_trait;
use fabcar::types::ChaincodeResponse;
use std::collections::HashMap;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Key must not be an empty string.")]
    EmptyKey,
    #[error("Event name must not be an empty string.")]
    EmptyEventName,
    #[error("Collection {0} is not defined for this chaincode.")]
    UnknownCollection(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Transient data is not available: {0}")]
    TransientUnavailable(String),
    #[error("An error occurred within the ledger: {0}. See ledger logs.")]
    Internal(String),
}

/// Per-invocation input that is never written to the ledger.
pub type TransientMap = HashMap<String, Vec<u8>>;

/// One entry of a key's history log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyModification {
    pub tx_id: String,
    /// Empty when `is_delete` is set.
    pub value: Vec<u8>,
    pub timestamp: OffsetDateTime,
    pub is_delete: bool,
}

/// A key and its current value, as returned by a rich query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Cursor over results held by the host.
///
/// Implementations must release the host-side cursor when the iterator is
/// dropped, so callers never need to close it explicitly.
#[async_trait]
pub trait ResultsIterator<T: Send>: Send {
    /// Fetch the next result, or `None` once the cursor is exhausted.
    async fn next(&mut self) -> Result<Option<T>, LedgerError>;
}

pub type HistoryQueryIterator = Box<dyn ResultsIterator<KeyModification>>;
pub type StateQueryIterator = Box<dyn ResultsIterator<KeyValue>>;

/// Defines the expected interface between the asset contract and its ledger
/// host for a single transaction.
///
/// Writes are staged by the host and only become visible once the
/// transaction commits. Reads observe committed state.
#[async_trait]
pub trait ChaincodeStub: Send + Sync + 'static {
    /// Id of the transaction this stub belongs to.
    fn tx_id(&self) -> &str;

    /// Channel the transaction was submitted on.
    fn channel_id(&self) -> &str;

    /// Timestamp the client attached to the transaction proposal.
    fn tx_timestamp(&self) -> OffsetDateTime;

    // Public world state
    /// Read `key` from world state. `None` if the key is absent.
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Delete `key`. Deleting an absent key is not an error.
    async fn del_state(&self, key: &str) -> Result<(), LedgerError>;

    // Private data collections
    async fn get_private_data(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError>;

    async fn put_private_data(
        &self,
        collection: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), LedgerError>;

    async fn del_private_data(&self, collection: &str, key: &str) -> Result<(), LedgerError>;

    // History and queries
    /// Every committed write and delete of `key`, oldest first.
    async fn get_history_for_key(&self, key: &str) -> Result<HistoryQueryIterator, LedgerError>;

    /// Run a rich query (a JSON selector document) against world state.
    async fn get_query_result(&self, query: &str) -> Result<StateQueryIterator, LedgerError>;

    // Transaction context
    /// Attach an event to this transaction. Only the last event set is kept.
    async fn set_event(&self, name: &str, payload: Vec<u8>) -> Result<(), LedgerError>;

    async fn get_transient(&self) -> Result<TransientMap, LedgerError>;

    /// Call another chaincode. Host failures are reported through the status
    /// of the returned response rather than as an error.
    async fn invoke_chaincode(
        &self,
        chaincode_name: &str,
        args: Vec<Vec<u8>>,
        channel: &str,
    ) -> ChaincodeResponse;
}
