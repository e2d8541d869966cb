//! Nullable store: thread-safe in-memory ledger and metadata for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use surety_store::{LedgerAccount, LedgerStore, MetaStore, StoreError};
use surety_types::Amount;

/// An in-memory ledger + metadata store for testing.
///
/// Credits to accounts marked with [`NullStore::reject_credits_to`] fail,
/// which lets tests exercise transfer failure paths. [`NullStore::fail_reads`]
/// does the same for balance reads.
#[derive(Default)]
pub struct NullStore {
    balances: Mutex<HashMap<LedgerAccount, Amount>>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
    rejecting: Mutex<HashSet<LedgerAccount>>,
    failing_reads: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with a balance, replacing whatever it held.
    pub fn set_balance(&self, account: LedgerAccount, amount: Amount) {
        if let Ok(mut balances) = self.balances.lock() {
            balances.insert(account, amount);
        }
    }

    /// Make every later credit to `account` fail with a backend error.
    pub fn reject_credits_to(&self, account: LedgerAccount) {
        if let Ok(mut rejecting) = self.rejecting.lock() {
            rejecting.insert(account);
        }
    }

    /// Undo [`NullStore::reject_credits_to`].
    pub fn accept_credits_to(&self, account: &LedgerAccount) {
        if let Ok(mut rejecting) = self.rejecting.lock() {
            rejecting.remove(account);
        }
    }

    /// While `on`, every balance read fails with a backend error.
    pub fn fail_reads(&self, on: bool) {
        self.failing_reads.store(on, Ordering::SeqCst);
    }

    /// Number of metadata entries held.
    pub fn meta_len(&self) -> usize {
        self.meta.lock().map(|m| m.len()).unwrap_or(0)
    }
}

impl LedgerStore for NullStore {
    fn balance(&self, account: &LedgerAccount) -> Result<Amount, StoreError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(format!("read of {account} failed")));
        }
        Ok(lock(&self.balances)?
            .get(account)
            .copied()
            .unwrap_or(Amount::ZERO))
    }

    fn credit(&self, account: &LedgerAccount, amount: Amount) -> Result<(), StoreError> {
        if lock(&self.rejecting)?.contains(account) {
            return Err(StoreError::Backend(format!("credit to {account} rejected")));
        }
        let mut balances = lock(&self.balances)?;
        let entry = balances.entry(account.clone()).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| StoreError::Overflow(account.to_string()))?;
        Ok(())
    }

    fn debit(&self, account: &LedgerAccount, amount: Amount) -> Result<(), StoreError> {
        let mut balances = lock(&self.balances)?;
        let available = balances.get(account).copied().unwrap_or(Amount::ZERO);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or_else(|| StoreError::InsufficientBalance {
                    account: account.to_string(),
                    needed: amount.raw(),
                    available: available.raw(),
                })?;
        balances.insert(account.clone(), remaining);
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        lock(&self.meta)?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(lock(&self.meta)?.get(key).cloned())
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.meta)?.remove(key);
        Ok(())
    }
}
