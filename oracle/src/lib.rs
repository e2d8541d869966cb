//! Oracle registry and flight status consensus.
//!
//! Each oracle holds a fixed set of indexes drawn at registration. A status
//! request opens one randomly drawn index for a flight; only oracles holding
//! that index may answer it. A status is accepted once `oracle_quorum`
//! distinct oracles report the same code, and the first accepted status for a
//! flight is final.

pub mod engine;
pub mod error;
pub mod registry;
pub mod request;

pub use engine::{ConsensusEngine, OracleAdmission, OracleEvent, OracleSnapshot, Resolution};
pub use error::OracleError;
pub use registry::{Oracle, OracleRegistry};
pub use request::{ResponseTally, StatusRequest};
