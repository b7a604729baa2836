//! Kyber768 implementation (NIST Level 3)
//!
//! This provides a concrete implementation of ML-KEM-768.

use crate::{
    error::{Error, Result},
    params::kyber::kyber768::*,
    traits::{Kem},
    kyber::{PublicKey, SecretKey, Ciphertext, SharedSecret},
};

/// Kyber768 implementation struct
#[derive(Debug, Clone)]
pub struct Kyber768;

impl Kyber768 {
    /// Create a new Kyber768 instance
    pub fn new() -> Self {
        Self
    }
}

impl Default for Kyber768 {
    fn default() -> Self {
        Self::new()
    }
}

impl Kem for Kyber768 {
    type PublicKey = PublicKey<K>;
    type SecretKey = SecretKey<K>;
    type Ciphertext = Ciphertext<K>;
    type SharedSecret = SharedSecret;
    
    const PUBLIC_KEY_SIZE: usize = PUBLIC_KEY_SIZE;
    const SECRET_KEY_SIZE: usize = SECRET_KEY_SIZE;
    const CIPHERTEXT_SIZE: usize = CIPHERTEXT_SIZE;
    const SHARED_SECRET_SIZE: usize = SHARED_SECRET_SIZE;
    
    fn generate_keypair<R: crate::traits::SecureRandom>(_rng: &mut R) -> Result<(Self::PublicKey, Self::SecretKey)> {
        // TODO: Implement Kyber768 keypair generation
        Err(Error::CryptoError)
    }
    
    fn encapsulate<R: crate::traits::SecureRandom>(_public_key: &Self::PublicKey, _rng: &mut R) -> Result<(Self::Ciphertext, Self::SharedSecret)> {
        // TODO: Implement Kyber768 encapsulation
        Err(Error::CryptoError)
    }
    
    fn decapsulate(_secret_key: &Self::SecretKey, _ciphertext: &Self::Ciphertext) -> Result<Self::SharedSecret> {
        // TODO: Implement Kyber768 decapsulation
        Err(Error::CryptoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_kyber768_stub() {
        // Placeholder test - will be implemented later
        let kyber768 = Kyber768::new();
        assert_eq!(format!("{kyber768:?}"), "Kyber768");
    }
}