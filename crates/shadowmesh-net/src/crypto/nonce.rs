//! 96-bit nonce generation for AEAD frame encryption.
//!
//! Each session picks a random 4-byte prefix once; every frame then gets a
//! unique nonce by appending a monotonically increasing 8-byte counter.
//! Reusing a nonce under the same key breaks ChaCha20-Poly1305 completely, so
//! the counter is refused outright once it would wrap.

use crate::error::{NetworkError, Result, SecurityError};
use rand_core::{OsRng, RngCore};
use std::sync::atomic::{AtomicU64, Ordering};

/// Generates unique 12-byte nonces for one direction of one session.
#[derive(Debug)]
pub struct NonceGenerator {
    prefix: [u8; 4],
    counter: AtomicU64,
}

impl NonceGenerator {
    /// Creates a generator with a freshly randomized prefix.
    pub fn new() -> Self {
        let mut prefix = [0u8; 4];
        OsRng.fill_bytes(&mut prefix);
        Self { prefix, counter: AtomicU64::new(0) }
    }

    /// Creates a generator with an explicit prefix, for tests and for
    /// reconstructing a generator from a persisted session.
    pub fn with_prefix(prefix: [u8; 4]) -> Self {
        Self { prefix, counter: AtomicU64::new(0) }
    }

    /// Returns the next nonce, or an error once the counter space is exhausted.
    pub fn next(&self) -> Result<[u8; 12]> {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        if counter == u64::MAX {
            return Err(NetworkError::Security(SecurityError::NonceExhausted));
        }
        let mut nonce = [0u8; 12];
        nonce[..4].copy_from_slice(&self.prefix);
        nonce[4..].copy_from_slice(&counter.to_be_bytes());
        Ok(nonce)
    }

    /// Number of nonces issued so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
