//! Pseudo-random sampling for oracle index assignment.
//!
//! Oracles are only allowed to answer status requests whose open index is
//! one of their own. Both the oracle's indexes and each request's open index
//! come from a [`VrfProvider`], so no caller can pick the slot it answers.
//!
//! The threat model is self-resolution (an oracle steering requests to
//! itself), not an external observer, so a keyed hash over the caller, the
//! time and a nonce is enough.

pub mod error;
pub mod index;
pub mod seeded;

pub use error::VrfError;
pub use index::{draw_index, draw_indexes};
pub use seeded::SeededVrf;

/// Trait for providing randomness.
pub trait VrfProvider: Send + Sync {
    /// Get randomness for a given context (caller, time and nonce bytes).
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, VrfError>;

    /// Verify that an output was produced for `context` by this provider.
    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, VrfError>;

    /// Human-readable name of this provider.
    fn name(&self) -> &str;
}

/// A random value together with whatever the provider needs to re-check it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomOutput {
    /// The random bytes (32 bytes).
    pub value: [u8; 32],
    /// Provider-specific proof; empty for hash-based providers.
    pub proof: Vec<u8>,
    /// Draw counter reported by the provider.
    pub round: u64,
}
