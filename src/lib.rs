//! Append-only proof-of-work ledger with P-256 signed transfers.
//!
//! Modules, leaf first: [`canonical`] hashing, [`transaction`] records,
//! [`wallet`] keys/addresses/signatures, [`blockchain`] (blocks, ledger and
//! proof-of-work), [`node`] (mining and neighbour coordinators plus their
//! periodic loops) and the actix-web [`api`].

pub mod api;
pub mod blockchain;
pub mod canonical;
pub mod config;
pub mod error;
pub mod node;
pub mod transaction;
pub mod wallet;

pub use error::{ChainError, Result};
