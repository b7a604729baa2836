//! Long-term hybrid identity keypairs.
//!
//! Every shadowmesh peer identity is the union of a post-quantum keypair and
//! a classical keypair for both KEM and signatures, so a break of either
//! family alone does not compromise the session.

use crate::error::{NetworkError, Result, SecurityError};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey, Signature as Ed25519Signature};
use rand_core::OsRng as DalekOsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shadowmesh_pqc::api::{
    generate_keypair, generate_signing_keypair, KemAlgorithm, SignatureAlgorithm,
};
use shadowmesh_pqc::random::DefaultRng;
use std::time::{Duration, SystemTime};
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default validity window for a freshly generated identity keypair.
pub const DEFAULT_KEYPAIR_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A peer's full long-term identity: one post-quantum and one classical
/// keypair for key exchange, and the same pairing for signatures.
///
/// Every private component must be present for the keypair to be usable —
/// a partially-loaded keypair (e.g. public halves only, as received from a
/// peer) is represented instead by [`PeerIdentity`].
#[derive(Clone, Serialize, Deserialize, ZeroizeOnDrop)]
pub struct HybridKeypair {
    pub kem_public: Vec<u8>,
    pub kem_secret: Vec<u8>,
    #[zeroize(skip)]
    pub x25519_public: [u8; 32],
    pub x25519_secret: [u8; 32],
    pub signing_public: Vec<u8>,
    pub signing_secret: Vec<u8>,
    #[zeroize(skip)]
    pub ed25519_public: [u8; 32],
    pub ed25519_secret: [u8; 32],
    #[zeroize(skip)]
    #[serde(with = "system_time_secs")]
    pub created_at: SystemTime,
    #[zeroize(skip)]
    #[serde(with = "system_time_secs")]
    pub expires_at: SystemTime,
}

impl std::fmt::Debug for HybridKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridKeypair")
            .field("peer_id", &self.peer_id())
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl HybridKeypair {
    /// Generates a fresh hybrid identity with the default validity window.
    pub fn generate() -> Result<Self> {
        Self::generate_with_lifetime(DEFAULT_KEYPAIR_LIFETIME)
    }

    /// Generates a fresh hybrid identity valid for `lifetime` from now.
    pub fn generate_with_lifetime(lifetime: Duration) -> Result<Self> {
        let mut rng = DefaultRng::default();

        let (kem_public, kem_secret) = generate_keypair(KemAlgorithm::Kyber1024, &mut rng)
            .map_err(|e| NetworkError::Security(SecurityError::KeyDerivation(format!("ML-KEM keygen: {e:?}"))))?;
        let (signing_public, signing_secret) =
            generate_signing_keypair(SignatureAlgorithm::Dilithium5, &mut rng).map_err(|e| {
                NetworkError::Security(SecurityError::KeyDerivation(format!("ML-DSA keygen: {e:?}")))
            })?;

        let x25519_secret = StaticSecret::random_from_rng(DalekOsRng);
        let x25519_public = X25519PublicKey::from(&x25519_secret);

        let ed25519_secret = SigningKey::generate(&mut DalekOsRng);
        let ed25519_public = ed25519_secret.verifying_key();

        let created_at = SystemTime::now();
        let expires_at = created_at + lifetime;

        Ok(Self {
            kem_public,
            kem_secret,
            x25519_public: x25519_public.to_bytes(),
            x25519_secret: x25519_secret.to_bytes(),
            signing_public,
            signing_secret,
            ed25519_public: ed25519_public.to_bytes(),
            ed25519_secret: ed25519_secret.to_bytes(),
            created_at,
            expires_at,
        })
    }

    /// Returns whether `expires_at` has already passed.
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }

    /// Derives this keypair's public peer ID: the SHA-256 hash of all four
    /// public key components, truncated to 20 bytes.
    pub fn peer_id(&self) -> [u8; 20] {
        peer_id_from_public_parts(&self.kem_public, &self.x25519_public, &self.signing_public, &self.ed25519_public)
    }

    /// Returns the public half of this identity, suitable for sending to a peer.
    pub fn public_identity(&self) -> PeerIdentity {
        PeerIdentity {
            kem_public: self.kem_public.clone(),
            x25519_public: self.x25519_public,
            signing_public: self.signing_public.clone(),
            ed25519_public: self.ed25519_public,
        }
    }

    /// Recreates this keypair's ephemeral X25519 secret as a dalek type for
    /// Diffie-Hellman with a peer's ephemeral or static public key.
    pub fn x25519_static_secret(&self) -> StaticSecret {
        StaticSecret::from(self.x25519_secret)
    }

    /// Signs `message` with the classical Ed25519 key.
    pub fn sign_classical(&self, message: &[u8]) -> Result<[u8; 64]> {
        let signing_key = SigningKey::from_bytes(&self.ed25519_secret);
        Ok(signing_key.sign(message).to_bytes())
    }

    /// Signs `message` with the post-quantum ML-DSA-87 key.
    pub fn sign_post_quantum(&self, message: &[u8]) -> Result<Vec<u8>> {
        let mut rng = DefaultRng::default();
        shadowmesh_pqc::api::sign(SignatureAlgorithm::Dilithium5, &self.signing_secret, message, &mut rng)
            .map_err(|e| NetworkError::Security(SecurityError::SignatureRejected(format!("ML-DSA sign: {e:?}"))))
    }
}

/// The public half of a [`HybridKeypair`], as exchanged over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeerIdentity {
    pub kem_public: Vec<u8>,
    pub x25519_public: [u8; 32],
    pub signing_public: Vec<u8>,
    pub ed25519_public: [u8; 32],
}

impl PeerIdentity {
    /// Derives this identity's peer ID: see [`HybridKeypair::peer_id`].
    pub fn peer_id(&self) -> [u8; 20] {
        peer_id_from_public_parts(&self.kem_public, &self.x25519_public, &self.signing_public, &self.ed25519_public)
    }

    /// Generates an ephemeral X25519 secret for a one-shot Diffie-Hellman
    /// exchange against this identity's static public key.
    pub fn x25519_public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(self.x25519_public)
    }

    /// Verifies a dual (classical + post-quantum) signature over `message`.
    /// Both signatures must verify; either failing rejects the whole pair.
    pub fn verify_dual(&self, message: &[u8], classical_sig: &[u8; 64], pq_sig: &[u8]) -> Result<()> {
        let verifying_key = VerifyingKey::from_bytes(&self.ed25519_public)
            .map_err(|_| NetworkError::Security(SecurityError::InvalidKeyMaterial("Ed25519 public key".into())))?;
        let sig = Ed25519Signature::from_bytes(classical_sig);
        verifying_key
            .verify(message, &sig)
            .map_err(|_| NetworkError::Security(SecurityError::SignatureRejected("Ed25519 signature".into())))?;

        let valid = shadowmesh_pqc::api::verify(SignatureAlgorithm::Dilithium5, &self.signing_public, message, pq_sig)
            .map_err(|e| NetworkError::Security(SecurityError::SignatureRejected(format!("ML-DSA verify: {e:?}"))))?;
        if !valid {
            return Err(NetworkError::Security(SecurityError::SignatureRejected("ML-DSA signature".into())));
        }
        Ok(())
    }
}

/// Generates an ephemeral X25519 secret, used once per handshake and discarded.
pub fn ephemeral_x25519() -> EphemeralSecret {
    EphemeralSecret::random_from_rng(DalekOsRng)
}

fn peer_id_from_public_parts(kem_public: &[u8], x25519_public: &[u8; 32], signing_public: &[u8], ed25519_public: &[u8; 32]) -> [u8; 20] {
    let mut hasher = Sha256::new();
    hasher.update(kem_public);
    hasher.update(x25519_public);
    hasher.update(signing_public);
    hasher.update(ed25519_public);
    let digest = hasher.finalize();
    let mut id = [0u8; 20];
    id.copy_from_slice(&digest[..20]);
    id
}

mod system_time_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
        let secs = time.duration_since(UNIX_EPOCH).map_err(serde::ser::Error::custom)?.as_secs();
        serializer.serialize_u64(secs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}
