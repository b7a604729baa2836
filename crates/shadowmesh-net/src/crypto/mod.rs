//! Cryptographic primitives and protocols for shadowmesh.

pub mod keypair;
pub mod keystore;
pub mod nonce;
pub mod primitives;
pub mod session;

pub use keypair::HybridKeypair;
pub use keystore::{KeystoreRecord, load_keypair, save_keypair};
pub use nonce::NonceGenerator;
pub use primitives::{aead_open, aead_seal, hkdf_derive};
pub use session::SessionKeys;

use crate::error::Result;

/// Initializes the cryptographic subsystem and self-checks the primitives
/// this crate relies on. Call once at daemon startup, before any handshake.
pub fn init_crypto() -> Result<()> {
    validate_crypto_implementations()
}

fn validate_crypto_implementations() -> Result<()> {
    use chacha20poly1305::{ChaCha20Poly1305, KeyInit};
    let key = [0u8; 32];
    let cipher = ChaCha20Poly1305::new(&key.into());
    drop(cipher);

    let rng = ring::rand::SystemRandom::new();
    ring::signature::Ed25519KeyPair::generate_pkcs8(&rng).map_err(|_| {
        crate::error::NetworkError::Security(crate::error::SecurityError::KeyDerivation(
            "Ed25519 key generation self-check failed".to_string(),
        ))
    })?;

    Ok(())
}
