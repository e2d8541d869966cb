//! Fundamental types for the flight surety engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! caller identities, amounts, timestamps, flight keys and status codes, genesis
//! parameters, and the error taxonomy every component maps its failures onto.

pub mod account;
pub mod amount;
pub mod error;
pub mod flight;
pub mod params;
pub mod time;

pub use account::AccountId;
pub use amount::{Amount, UNIT};
pub use error::{Classify, ErrorKind};
pub use flight::{FlightKey, FlightStatus};
pub use params::ProtocolParams;
pub use time::Timestamp;
