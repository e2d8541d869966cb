//! Airline consortium governance.
//!
//! Lifecycle of an identity: Unregistered → Pending { voters } → Registered.
//! The first `bootstrap_airlines` members are admitted directly by any funded
//! airline; afterwards a candidate needs votes from at least half (rounded up)
//! of the registered airlines. Only funded airlines can sponsor or vote.

pub mod airline;
pub mod error;
pub mod registry;

pub use airline::{Admission, Airline, AirlineState, PendingRegistration};
pub use error::GovernanceError;
pub use registry::{AirlineRegistry, GovernanceEvent, RegistrySnapshot};
