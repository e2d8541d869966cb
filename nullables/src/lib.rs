//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The clock, the ledger substrate and the random source are abstracted
//! behind traits. This crate provides test-friendly implementations that
//! return deterministic values, can be controlled programmatically and never
//! touch the filesystem or network.

pub mod clock;
pub mod random;
pub mod store;

pub use clock::NullClock;
pub use random::NullRandom;
pub use store::NullStore;
