//! Application facade for the flight surety engine.
//!
//! Wires the airline registry, the oracle consensus engine and the insurance
//! ledger together behind one entry point that checks the operating flag,
//! moves attached value into escrow and routes final flight statuses to the
//! crediting pass.

pub mod config;
pub mod error;
pub mod event;
pub mod facade;
pub mod snapshot;

pub use config::AppConfig;
pub use error::AppError;
pub use event::{AppEvent, EventBus};
pub use facade::{CallContext, SuretyApp, SNAPSHOT_KEY};
pub use snapshot::{AppSnapshot, SnapshotSummary, SNAPSHOT_VERSION};
