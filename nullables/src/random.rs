//! Nullable random: deterministic random number generation.

use std::sync::Mutex;
use surety_vrf::{RandomOutput, VrfError, VrfProvider};

/// A deterministic VRF provider for testing.
///
/// Returns pre-configured values in order, cycling when exhausted. The
/// context is ignored, so with a single value every oracle receives the same
/// index triple and every request opens that triple's first index.
pub struct NullRandom {
    outputs: Vec<[u8; 32]>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic random values.
    pub fn new(outputs: Vec<[u8; 32]>) -> Self {
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: [u8; 32]) -> Self {
        Self::new(vec![value])
    }

    /// Number of values handed out so far.
    pub fn draws(&self) -> usize {
        self.index.lock().map(|idx| *idx).unwrap_or(0)
    }
}

impl VrfProvider for NullRandom {
    fn get_randomness(&self, _context: &[u8]) -> Result<RandomOutput, VrfError> {
        if self.outputs.is_empty() {
            return Err(VrfError::Unavailable("null random has no outputs".into()));
        }
        let mut idx = self
            .index
            .lock()
            .map_err(|_| VrfError::Unavailable("null random lock poisoned".into()))?;
        let current = *idx % self.outputs.len();
        *idx += 1;
        Ok(RandomOutput {
            value: self.outputs[current],
            proof: Vec::new(),
            round: current as u64,
        })
    }

    fn verify(&self, _context: &[u8], _output: &RandomOutput) -> Result<bool, VrfError> {
        Ok(true) // Always valid in test mode
    }

    fn name(&self) -> &str {
        "null-random"
    }
}
