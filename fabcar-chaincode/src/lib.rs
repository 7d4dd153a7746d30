//! The fabcar asset contract: car and bank transfer records on a
//! permissioned ledger, a private-data variant of the transfer record, and
//! calls into a separate document chaincode.
//!
//! The contract keeps no state of its own. Every operation runs against a
//! [`ChaincodeStub`](ledger::ChaincodeStub) supplied by the host for the
//! current transaction.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod contract;
pub mod error;
pub mod ledger;
mod operations;

pub use config::Config;
pub use contract::{AssetContract, ContractFunction};
pub use error::{ChaincodeError, ErrorKind};
