//! Insurance and escrow ledger.
//!
//! Airlines register flights, passengers buy one policy per flight, and an
//! airline-caused delay credits each policy `premium × multiplier` exactly
//! once. Credits are withdrawn in full; the balance is zeroed before value
//! leaves the escrow.

pub mod error;
pub mod flight;
pub mod ledger;
pub mod policy;

pub use error::InsuranceError;
pub use flight::Flight;
pub use ledger::{InsuranceEvent, InsuranceLedger, InsuranceSnapshot};
pub use policy::InsurancePolicy;
