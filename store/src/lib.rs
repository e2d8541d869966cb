//! Abstract storage traits for the flight surety engine.
//!
//! The ledger substrate (balances, durable metadata) is an external
//! collaborator. Every backend implements these traits and the rest of the
//! codebase depends only on them.

pub mod error;
pub mod ledger;
pub mod meta;

pub use error::StoreError;
pub use ledger::{LedgerAccount, LedgerStore};
pub use meta::MetaStore;
