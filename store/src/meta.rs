//! Metadata storage trait.

use crate::StoreError;

/// Generic key-value store for engine snapshots and bookkeeping.
///
/// Values are opaque bytes so this crate does not depend on the engine crates
/// (which would create a circular dependency). Engines serialize their own types.
pub trait MetaStore {
    /// Store a metadata value, replacing any previous one.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value, `None` if absent.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete a metadata entry.
    fn delete_meta(&self, key: &str) -> Result<(), StoreError>;
}
