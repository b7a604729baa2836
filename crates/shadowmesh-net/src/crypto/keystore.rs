//! Passphrase-encrypted storage for a [`HybridKeypair`] at rest.

use super::keypair::HybridKeypair;
use crate::error::{NetworkError, Result, SecurityError};
use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::STANDARD as base64_standard, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// Default PBKDF2 iteration count for passphrase-based key derivation.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Minimum accepted passphrase length.
pub const MIN_PASSPHRASE_LEN: usize = 12;

/// The only keystore format version this crate writes or accepts.
pub const KEYSTORE_VERSION: &str = "1.0";

/// On-disk representation of an encrypted [`HybridKeypair`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreRecord {
    pub version: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    pub cipher: String,
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub iv: Vec<u8>,
}

/// PBKDF2 parameters recorded alongside the ciphertext so a differently
/// configured future load still knows how the key was derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    pub iterations: u32,
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
}

/// Encrypts `keypair` under `passphrase` into a [`KeystoreRecord`].
pub fn save_keypair(keypair: &HybridKeypair, passphrase: &str) -> Result<KeystoreRecord> {
    validate_passphrase(passphrase)?;

    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(passphrase, &salt, DEFAULT_PBKDF2_ITERATIONS);

    let mut iv = [0u8; 12];
    OsRng.fill_bytes(&mut iv);

    let plaintext = serde_json::to_vec(keypair)
        .map_err(|e| NetworkError::Security(SecurityError::Serialization(e.to_string())))?;

    let cipher = Aes256Gcm::new((&key).into());
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_ref())
        .map_err(|_| NetworkError::Security(SecurityError::Encryption("keystore encrypt failed".into())))?;

    Ok(KeystoreRecord {
        version: KEYSTORE_VERSION.to_string(),
        kdf: "pbkdf2-hmac-sha256".to_string(),
        kdf_params: KdfParams { iterations: DEFAULT_PBKDF2_ITERATIONS, salt: salt.to_vec() },
        cipher: "aes-256-gcm".to_string(),
        ciphertext,
        iv: iv.to_vec(),
    })
}

/// Decrypts a [`KeystoreRecord`] back into a [`HybridKeypair`] using `passphrase`.
///
/// A wrong passphrase and a corrupted record are indistinguishable to the
/// caller: both surface as [`SecurityError::WrongPassphrase`].
pub fn load_keypair(record: &KeystoreRecord, passphrase: &str) -> Result<HybridKeypair> {
    if record.version != KEYSTORE_VERSION {
        return Err(NetworkError::Security(SecurityError::InvalidKeyMaterial(format!(
            "unsupported keystore version: {} (expected {KEYSTORE_VERSION})",
            record.version
        ))));
    }
    if record.kdf != "pbkdf2-hmac-sha256" || record.cipher != "aes-256-gcm" {
        return Err(NetworkError::Security(SecurityError::InvalidKeyMaterial(format!(
            "unsupported keystore kdf/cipher: {}/{}",
            record.kdf, record.cipher
        ))));
    }

    let key = derive_key(passphrase, &record.kdf_params.salt, record.kdf_params.iterations);
    let cipher = Aes256Gcm::new((&key).into());
    let nonce = Nonce::from_slice(&record.iv);

    let plaintext = cipher
        .decrypt(nonce, record.ciphertext.as_ref())
        .map_err(|_| NetworkError::Security(SecurityError::WrongPassphrase))?;

    serde_json::from_slice(&plaintext)
        .map_err(|e| NetworkError::Security(SecurityError::Serialization(e.to_string())))
}

fn derive_key(passphrase: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut key);
    key
}

fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.len() < MIN_PASSPHRASE_LEN {
        return Err(NetworkError::Security(SecurityError::InvalidKeyMaterial(format!(
            "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
        ))));
    }
    Ok(())
}

mod base64_bytes {
    use super::{base64_standard, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64_standard.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64_standard.decode(s).map_err(serde::de::Error::custom)
    }
}
