//! Committed ledger state, in the form it is saved to a snapshot.

use fabcar_chaincode::ledger::{KeyModification, KeyValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// An event attached to a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    pub tx_id: String,
    pub name: String,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct HistoryRecord {
    pub tx_id: String,
    pub value: Vec<u8>,
    pub timestamp: OffsetDateTime,
    pub is_delete: bool,
}

impl From<&HistoryRecord> for KeyModification {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            tx_id: record.tx_id.clone(),
            value: record.value.clone(),
            timestamp: record.timestamp,
            is_delete: record.is_delete,
        }
    }
}

/// A staged write. `None` deletes the key.
pub(crate) type Write = Option<Vec<u8>>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct LedgerState {
    /// Public world state. Keys iterate in lexical order, which is also the
    /// order rich query results are returned in.
    pub world: BTreeMap<String, Vec<u8>>,
    /// Private data, by collection then key.
    pub private: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    /// Every committed write and delete of a public key, oldest first.
    pub history: BTreeMap<String, Vec<HistoryRecord>>,
    pub events: Vec<ChaincodeEvent>,
}

impl LedgerState {
    /// Apply a public write and record it in the key's history.
    pub fn apply_world(
        &mut self,
        key: String,
        write: Write,
        tx_id: &str,
        timestamp: OffsetDateTime,
    ) {
        let record = HistoryRecord {
            tx_id: tx_id.to_string(),
            value: write.clone().unwrap_or_default(),
            timestamp,
            is_delete: write.is_none(),
        };

        let _previous = match write {
            Some(value) => self.world.insert(key.clone(), value),
            None => self.world.remove(&key),
        };
        self.history.entry(key).or_default().push(record);
    }

    /// Apply a private write. Private data has no history.
    pub fn apply_private(&mut self, collection: String, key: String, write: Write) {
        let entries = self.private.entry(collection).or_default();
        let _previous = match write {
            Some(value) => entries.insert(key, value),
            None => entries.remove(&key),
        };
    }

    pub fn history(&self, key: &str) -> Vec<KeyModification> {
        self.history
            .get(key)
            .map(|records| records.iter().map(KeyModification::from).collect())
            .unwrap_or_default()
    }

    pub fn world_entries(&self) -> impl Iterator<Item = KeyValue> + '_ {
        self.world.iter().map(|(key, value)| KeyValue {
            key: key.clone(),
            value: value.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn writes_and_deletes_are_kept_in_history() {
        let mut state = LedgerState::default();
        let timestamp = datetime!(2024-01-01 0:00 UTC);

        state.apply_world("CAR1".to_string(), Some(b"{}".to_vec()), "tx-1", timestamp);
        state.apply_world("CAR1".to_string(), None, "tx-2", timestamp);

        assert!(state.world.get("CAR1").is_none());
        let history = state.history("CAR1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].value, b"{}");
        assert!(!history[0].is_delete);
        assert_eq!(history[1].tx_id, "tx-2");
        assert!(history[1].is_delete);
        assert!(history[1].value.is_empty());
    }

    #[test]
    fn state_survives_a_snapshot() {
        let mut state = LedgerState::default();
        state.apply_world(
            "CAR1".to_string(),
            Some(b"{\"id\":\"CAR1\"}".to_vec()),
            "tx-1",
            datetime!(2024-01-01 12:30:00.25 UTC),
        );
        state.apply_private(
            "collectionTransactions".to_string(),
            "T1".to_string(),
            Some(b"{}".to_vec()),
        );

        let snapshot = serde_json::to_string(&state).unwrap();
        let restored: LedgerState = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(restored, state);
    }
}
