//! Keyed blake2b provider.

use crate::{RandomOutput, VrfError, VrfProvider};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use std::sync::atomic::{AtomicU64, Ordering};

type Blake2b256 = Blake2b<U32>;

const SEEDED_DOMAIN: &[u8] = b"surety-seeded-vrf";

/// Derives randomness as `blake2b(domain ‖ salt ‖ context)`.
///
/// The salt is a genesis secret unknown to callers. Without it a caller could
/// precompute which indexes a given `(identity, time, nonce)` maps to.
pub struct SeededVrf {
    salt: [u8; 32],
    draws: AtomicU64,
}

impl SeededVrf {
    pub fn new(salt: [u8; 32]) -> Self {
        Self {
            salt,
            draws: AtomicU64::new(0),
        }
    }

    /// Build a salt from an arbitrary passphrase (config files carry strings).
    pub fn from_passphrase(passphrase: &str) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(SEEDED_DOMAIN);
        hasher.update(passphrase.as_bytes());
        let mut salt = [0u8; 32];
        salt.copy_from_slice(&hasher.finalize());
        Self::new(salt)
    }

    fn derive(&self, context: &[u8]) -> [u8; 32] {
        let mut hasher = Blake2b256::new();
        hasher.update(SEEDED_DOMAIN);
        hasher.update(self.salt);
        hasher.update((context.len() as u64).to_be_bytes());
        hasher.update(context);
        let mut value = [0u8; 32];
        value.copy_from_slice(&hasher.finalize());
        value
    }
}

impl VrfProvider for SeededVrf {
    fn get_randomness(&self, context: &[u8]) -> Result<RandomOutput, VrfError> {
        let round = self.draws.fetch_add(1, Ordering::Relaxed);
        Ok(RandomOutput {
            value: self.derive(context),
            proof: Vec::new(),
            round,
        })
    }

    fn verify(&self, context: &[u8], output: &RandomOutput) -> Result<bool, VrfError> {
        Ok(self.derive(context) == output.value)
    }

    fn name(&self) -> &str {
        "seeded-blake2b"
    }
}
