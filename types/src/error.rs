//! Error taxonomy shared across crates.
//!
//! Each component keeps its own error enum; this module only names the four
//! classes a rejected operation can fall into so callers can react uniformly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The class of a rejected operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Wrong caller: not owner, not funded, not a registered oracle.
    Authorization,
    /// Operation conflicts with current state: duplicate vote, already
    /// resolved, contract halted.
    State,
    /// Input out of bounds: fee below minimum, premium above cap, index mismatch.
    Validation,
    /// No such flight, request, pending candidate or credit.
    NotFound,
    /// Storage, configuration or snapshot failure outside the core rules.
    Infrastructure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::State => "state",
            Self::Validation => "validation",
            Self::NotFound => "not-found",
            Self::Infrastructure => "infrastructure",
        };
        f.write_str(name)
    }
}

/// Implemented by every component error so the facade can report a kind.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}
