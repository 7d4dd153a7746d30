//! Helpers shared by the integration suites under `tests/`.
//!
//! The suites run the asset contract against a [`MemoryLedger`] the same way
//! a peer would: each call is one transaction, and writes only land if the
//! call succeeds and is committed.
//!
//! [`MemoryLedger`]: fabcar_ledger_memory::MemoryLedger

pub mod error;
pub mod stubs;
pub mod utils;

pub use error::{FabcarTestError, Result};
pub use utils::{tagged, TestLedger};
