//! Record types, wire formats, and shared helpers for the fabcar asset
//! chaincode.
//!
//! This crate is a dependency of `fabcar-chaincode`, the ledger hosts that run
//! it, and the tools that drive it. It holds no ledger logic of its own.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod constants;
pub mod error;
pub mod infrastructure;
pub mod types;

pub use error::FabcarError;
