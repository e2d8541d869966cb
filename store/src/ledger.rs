//! Balance storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use surety_types::{AccountId, Amount};

/// A balance-holding account in the ledger substrate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerAccount {
    /// Spendable balance of an external caller.
    Wallet(AccountId),
    /// Pooled escrow held by the engine: oracle fees, airline funding, premiums.
    Contract,
}

impl fmt::Display for LedgerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wallet(id) => write!(f, "wallet:{id}"),
            Self::Contract => f.write_str("contract"),
        }
    }
}

/// Trait for the durable balance map.
///
/// Each method is atomic on its own. Callers that need several changes to
/// land together use [`LedgerStore::transfer`], which backends must apply
/// all-or-nothing.
pub trait LedgerStore {
    /// Current balance; unknown accounts hold zero.
    fn balance(&self, account: &LedgerAccount) -> Result<Amount, StoreError>;

    /// Add value to an account.
    fn credit(&self, account: &LedgerAccount, amount: Amount) -> Result<(), StoreError>;

    /// Remove value from an account, failing if the balance is too small.
    fn debit(&self, account: &LedgerAccount, amount: Amount) -> Result<(), StoreError>;

    /// Move value between accounts.
    ///
    /// The default runs debit then credit and undoes the debit if the credit
    /// fails. Backends with native transactions should override it.
    fn transfer(
        &self,
        from: &LedgerAccount,
        to: &LedgerAccount,
        amount: Amount,
    ) -> Result<(), StoreError> {
        self.debit(from, amount)?;
        if let Err(e) = self.credit(to, amount) {
            self.credit(from, amount)?;
            return Err(e);
        }
        Ok(())
    }
}
