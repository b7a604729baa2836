//! Kyber1024 implementation (NIST Level 5)
//!
//! This provides a concrete implementation of ML-KEM-1024.

use crate::{
    error::{Error, Result},
    params::kyber::kyber1024::*,
    traits::{Kem},
    kyber::{PublicKey, SecretKey, Ciphertext, SharedSecret},
};

/// Kyber1024 implementation struct
#[derive(Debug, Clone)]
pub struct Kyber1024;

impl Kyber1024 {
    /// Create a new Kyber1024 instance
    pub fn new() -> Self {
        Self
    }
}

impl Default for Kyber1024 {
    fn default() -> Self {
        Self::new()
    }
}

impl Kem for Kyber1024 {
    type PublicKey = PublicKey<K>;
    type SecretKey = SecretKey<K>;
    type Ciphertext = Ciphertext<K>;
    type SharedSecret = SharedSecret;
    
    const PUBLIC_KEY_SIZE: usize = PUBLIC_KEY_SIZE;
    const SECRET_KEY_SIZE: usize = SECRET_KEY_SIZE;
    const CIPHERTEXT_SIZE: usize = CIPHERTEXT_SIZE;
    const SHARED_SECRET_SIZE: usize = SHARED_SECRET_SIZE;
    
    fn generate_keypair<R: crate::traits::SecureRandom>(_rng: &mut R) -> Result<(Self::PublicKey, Self::SecretKey)> {
        // TODO: Implement Kyber1024 keypair generation
        Err(Error::CryptoError)
    }
    
    fn encapsulate<R: crate::traits::SecureRandom>(_public_key: &Self::PublicKey, _rng: &mut R) -> Result<(Self::Ciphertext, Self::SharedSecret)> {
        // TODO: Implement Kyber1024 encapsulation
        Err(Error::CryptoError)
    }
    
    fn decapsulate(_secret_key: &Self::SecretKey, _ciphertext: &Self::Ciphertext) -> Result<Self::SharedSecret> {
        // TODO: Implement Kyber1024 decapsulation
        Err(Error::CryptoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_kyber1024_stub() {
        // Placeholder test - will be implemented later
        let kyber1024 = Kyber1024::new();
        assert_eq!(format!("{kyber1024:?}"), "Kyber1024");
    }
}