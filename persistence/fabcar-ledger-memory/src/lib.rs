//! An in-memory ledger host for the fabcar chaincode.
//!
//! [`MemoryLedger`] keeps committed world state, private data collections,
//! per-key history and emitted events. Each transaction gets its own
//! [`MemoryStub`], which stages writes until [`MemoryStub::commit`] applies
//! them. Reads through a stub only ever see committed state.
//!
//! Rich queries use a subset of the CouchDB selector syntax; see the `query`
//! module. Committed state can be saved to and loaded from a JSON snapshot.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

mod api;
mod config;
mod error;
mod query;
mod state;

pub use api::{ChaincodeHandler, CommittedTransaction, MemoryLedger, MemoryStub};
pub use config::Config;
pub use error::MemoryLedgerError;
pub use state::ChaincodeEvent;
