//! Low-level cryptographic building blocks: AEAD framing and key derivation.
//!
//! KEM and signature primitives live one layer down in `shadowmesh_pqc`; this
//! module only wraps the pieces every other crypto module needs directly
//! (AEAD seal/open for frame encryption, HKDF for session key derivation).

use crate::error::{NetworkError, Result, SecurityError};
use chacha20poly1305::{aead::Aead, ChaCha20Poly1305, KeyInit, Nonce};
use hkdf::Hkdf;
use sha2::Sha256;

/// Seals `plaintext` with ChaCha20-Poly1305 under `key`/`nonce`, authenticating
/// `aad`. Returns ciphertext with the 16-byte tag appended.
pub fn aead_seal(key: &[u8; 32], nonce: &[u8; 12], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.into());
    cipher
        .encrypt(Nonce::from_slice(nonce), chacha20poly1305::aead::Payload { msg: plaintext, aad })
        .map_err(|_| NetworkError::Security(SecurityError::Encryption("AEAD seal failed".into())))
}

/// Opens a ChaCha20-Poly1305 sealed frame. Tag mismatch and any other AEAD
/// failure are indistinguishable to the caller by design.
pub fn aead_open(key: &[u8; 32], nonce: &[u8; 12], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(Nonce::from_slice(nonce), chacha20poly1305::aead::Payload { msg: ciphertext, aad })
        .map_err(|_| NetworkError::Security(SecurityError::Decryption("AEAD open failed".into())))
}

/// HKDF-SHA256 derivation: `derive(secret, salt, info, length)`.
///
/// Used both to derive the handshake master secret and, from it, the
/// directional session keys (the `info` string distinguishes the two
/// transmit directions so initiator and responder derive complementary
/// tx/rx pairs from the same master secret).
pub fn hkdf_derive(secret: &[u8], salt: &[u8], info: &[u8], length: usize) -> Result<Vec<u8>> {
    let hk = Hkdf::<Sha256>::new(Some(salt), secret);
    let mut out = vec![0u8; length];
    hk.expand(info, &mut out)
        .map_err(|_| NetworkError::Security(SecurityError::KeyDerivation("HKDF output too long".into())))?;
    Ok(out)
}

/// Derives a fixed 32-byte key, the common case for session tx/rx keys.
pub fn hkdf_derive_key(secret: &[u8], salt: &[u8], info: &[u8]) -> Result<[u8; 32]> {
    let bytes = hkdf_derive(secret, salt, info, 32)?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_then_open_roundtrips() {
        let key = [7u8; 32];
        let nonce = [1u8; 12];
        let pt = b"shadowmesh frame payload";
        let ct = aead_seal(&key, &nonce, b"aad", pt).unwrap();
        assert_eq!(ct.len(), pt.len() + 16);
        let recovered = aead_open(&key, &nonce, b"aad", &ct).unwrap();
        assert_eq!(recovered, pt);
    }

    #[test]
    fn tampered_tag_is_rejected() {
        let key = [7u8; 32];
        let nonce = [1u8; 12];
        let mut ct = aead_seal(&key, &nonce, b"aad", b"hello").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xFF;
        assert!(aead_open(&key, &nonce, b"aad", &ct).is_err());
    }

    #[test]
    fn wrong_aad_is_rejected() {
        let key = [7u8; 32];
        let nonce = [1u8; 12];
        let ct = aead_seal(&key, &nonce, b"aad-a", b"hello").unwrap();
        assert!(aead_open(&key, &nonce, b"aad-b", &ct).is_err());
    }

    #[test]
    fn hkdf_is_deterministic_and_direction_dependent() {
        let secret = [9u8; 32];
        let salt = b"session-id-bytes";
        let tx = hkdf_derive_key(&secret, salt, b"shadowmesh/hs/v1:initiator->responder").unwrap();
        let rx = hkdf_derive_key(&secret, salt, b"shadowmesh/hs/v1:responder->initiator").unwrap();
        assert_ne!(tx, rx);
        let tx_again = hkdf_derive_key(&secret, salt, b"shadowmesh/hs/v1:initiator->responder").unwrap();
        assert_eq!(tx, tx_again);
    }
}
