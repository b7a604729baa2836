//! The four-message handshake state machine.
//!
//! A [`HandshakeState`] lives only for the duration of one handshake attempt
//! and is discarded on completion or failure — there is no partial-progress
//! resumption. Roles diverge at each step; [`Initiator`] and [`Responder`]
//! each expose the two steps their side performs.

use super::messages::{
    decode_message, encode_message, ChallengePayload, EstablishedPayload, HelloPayload, MessageType,
    ResponsePayload, FLAG_KEY_ROTATION,
};
use crate::crypto::keypair::{HybridKeypair, PeerIdentity};
use crate::crypto::primitives::{hkdf_derive, hkdf_derive_key};
use crate::crypto::session::SessionKeys;
use crate::error::{NetworkError, Result, SecurityError};
use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use shadowmesh_pqc::api::{decapsulate, encapsulate, generate_keypair, KemAlgorithm};
use shadowmesh_pqc::random::DefaultRng;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

/// Maximum allowed clock skew between HELLO's timestamp and the responder's clock.
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(5 * 60);

/// Default budget for a handshake to complete end-to-end.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

const MASTER_SECRET_INFO: &[u8] = b"shadowmesh/hs/v1";
const TX_INFO_INITIATOR: &[u8] = b"initiator->responder";
const TX_INFO_RESPONDER: &[u8] = b"responder->initiator";

/// Which side of the handshake this state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

/// In-progress handshake state for one side of one attempt.
///
/// Invariant upheld by construction: `master_secret` is `Some` only after
/// both the PQ and classical shared secrets have been combined, and
/// `tx`/`rx` are `Some` only after `master_secret` is and the KDF has run.
pub struct HandshakeState {
    pub role: Role,
    self_identity: Arc<HybridKeypair>,
    kem_ephemeral_public: Vec<u8>,
    kem_ephemeral_secret: Vec<u8>,
    x25519_ephemeral_secret: [u8; 32],
    x25519_ephemeral_public: [u8; 32],
    hello_bytes: Option<Vec<u8>>,
    peer_identity: Option<PeerIdentity>,
    pub session_id: Option<[u8; 16]>,
    responder_nonce: Option<[u8; 24]>,
    master_secret: Option<[u8; 32]>,
    tx: Option<[u8; 32]>,
    rx: Option<[u8; 32]>,
    timestamp: u64,
    key_rotation: bool,
}

impl HandshakeState {
    fn fresh(role: Role, self_identity: Arc<HybridKeypair>, key_rotation: bool) -> Result<Self> {
        let mut rng = DefaultRng::default();
        let (kem_ephemeral_public, kem_ephemeral_secret) =
            generate_keypair(KemAlgorithm::Kyber1024, &mut rng).map_err(|e| {
                NetworkError::Security(SecurityError::KeyDerivation(format!("ephemeral ML-KEM keygen: {e:?}")))
            })?;
        let x25519_ephemeral_secret = StaticSecret::random_from_rng(rand_core::OsRng);
        let x25519_ephemeral_public = X25519PublicKey::from(&x25519_ephemeral_secret);

        Ok(Self {
            role,
            self_identity,
            kem_ephemeral_public,
            kem_ephemeral_secret,
            x25519_ephemeral_secret: x25519_ephemeral_secret.to_bytes(),
            x25519_ephemeral_public: x25519_ephemeral_public.to_bytes(),
            hello_bytes: None,
            peer_identity: None,
            session_id: None,
            responder_nonce: None,
            master_secret: None,
            tx: None,
            rx: None,
            timestamp: 0,
            key_rotation,
        })
    }

    fn x25519_secret(&self) -> StaticSecret {
        StaticSecret::from(self.x25519_ephemeral_secret)
    }
}

/// Initiator-side handshake steps.
pub struct Initiator;

impl Initiator {
    /// Begins a handshake, returning the in-progress state and the encoded
    /// HELLO message to send to the responder.
    pub fn start(self_identity: Arc<HybridKeypair>) -> Result<(HandshakeState, Vec<u8>)> {
        Self::start_with_rotation(self_identity, false)
    }

    /// Begins a key-rotation handshake (sets the wire flag so the responder
    /// knows to expect keys that must differ from the previous session's).
    pub fn start_with_rotation(self_identity: Arc<HybridKeypair>, key_rotation: bool) -> Result<(HandshakeState, Vec<u8>)> {
        let mut state = HandshakeState::fresh(Role::Initiator, self_identity, key_rotation)?;
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        state.timestamp = timestamp;

        let hello = HelloPayload {
            initiator_peer_id: state.self_identity.peer_id(),
            kem_ephemeral_public: state.kem_ephemeral_public.clone(),
            x25519_ephemeral_public: state.x25519_ephemeral_public,
            signing_public: state.self_identity.signing_public.clone(),
            ed25519_public: state.self_identity.ed25519_public,
            timestamp,
        };

        let flags = if key_rotation { FLAG_KEY_ROTATION } else { 0 };
        let encoded = encode_message(MessageType::Hello, flags, &hello)?;
        state.hello_bytes = Some(encoded.clone());
        Ok((state, encoded))
    }

    /// Processes the responder's CHALLENGE, returning the updated state and
    /// the encoded RESPONSE to send back.
    pub fn on_challenge(mut state: HandshakeState, message: &[u8]) -> Result<(HandshakeState, Vec<u8>)> {
        if state.role != Role::Initiator {
            return Err(NetworkError::Security(SecurityError::UnexpectedMessage("not an initiator state".into())));
        }
        let (challenge, _flags): (ChallengePayload, u16) = decode_message(message, MessageType::Challenge)?;

        let peer_identity = PeerIdentity {
            kem_public: challenge.responder_kem_public.clone(),
            x25519_public: challenge.responder_x25519_public,
            signing_public: challenge.responder_signing_public.clone(),
            ed25519_public: challenge.responder_ed25519_public,
        };

        let hello_bytes = state
            .hello_bytes
            .clone()
            .ok_or_else(|| NetworkError::Security(SecurityError::UnexpectedMessage("CHALLENGE before HELLO sent".into())))?;
        let transcript = signed_transcript(&hello_bytes, &challenge.session_id, &challenge.responder_nonce);
        peer_identity.verify_dual(&transcript, &challenge.classical_signature, &challenge.pq_signature)?;

        let pq_shared = decapsulate(KemAlgorithm::Kyber1024, &state.kem_ephemeral_secret, &challenge.kem_ciphertext)
            .map_err(|e| NetworkError::Security(SecurityError::DecapsulationFailed(format!("{e:?}"))))?;
        let peer_x25519_ephemeral = X25519PublicKey::from(challenge.responder_x25519_ephemeral_public);
        let cl_shared = state.x25519_secret().diffie_hellman(&peer_x25519_ephemeral);

        let master_secret =
            derive_master_secret(&pq_shared, cl_shared.as_bytes(), &challenge.session_id)?;
        let tx = hkdf_derive_key(&master_secret, &challenge.session_id, TX_INFO_INITIATOR)?;
        let rx = hkdf_derive_key(&master_secret, &challenge.session_id, TX_INFO_RESPONDER)?;

        let mut mac = Hmac::<Sha256>::new_from_slice(&master_secret)
            .map_err(|_| NetworkError::Security(SecurityError::KeyDerivation("HMAC key".into())))?;
        mac.update(&challenge.responder_nonce);
        let proof_bytes = mac.finalize().into_bytes();
        let mut proof = [0u8; 32];
        proof.copy_from_slice(&proof_bytes);

        state.peer_identity = Some(peer_identity);
        state.session_id = Some(challenge.session_id);
        state.responder_nonce = Some(challenge.responder_nonce);
        state.master_secret = Some(master_secret);
        state.tx = Some(tx);
        state.rx = Some(rx);

        let response = ResponsePayload { session_id: challenge.session_id, proof, capability_bitmask: None };
        let flags = if state.key_rotation { FLAG_KEY_ROTATION } else { 0 };
        let encoded = encode_message(MessageType::Response, flags, &response)?;
        Ok((state, encoded))
    }

    /// Processes the responder's ESTABLISHED, producing this side's final [`SessionKeys`].
    pub fn on_established(state: HandshakeState, message: &[u8]) -> Result<SessionKeys> {
        let (established, _flags): (EstablishedPayload, u16) = decode_message(message, MessageType::Established)?;
        let session_id = state
            .session_id
            .ok_or_else(|| NetworkError::Security(SecurityError::UnexpectedMessage("ESTABLISHED before session established".into())))?;
        if established.session_id != session_id {
            return Err(NetworkError::Security(SecurityError::UnexpectedMessage("session id mismatch in ESTABLISHED".into())));
        }
        finish(state, established.heartbeat_interval_secs, established.mtu, established.key_rotation_interval_secs, established.capability_bitmask)
    }
}

/// Responder-side handshake steps.
pub struct Responder;

impl Responder {
    /// Processes an inbound HELLO, returning the in-progress state and the
    /// encoded CHALLENGE to send back.
    pub fn on_hello(self_identity: Arc<HybridKeypair>, message: &[u8]) -> Result<(HandshakeState, Vec<u8>)> {
        let (hello, flags): (HelloPayload, u16) = decode_message(message, MessageType::Hello)?;

        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let skew = now.abs_diff(hello.timestamp);
        if skew > MAX_CLOCK_SKEW.as_secs() {
            return Err(NetworkError::Security(SecurityError::StaleHandshake(format!(
                "HELLO timestamp skew {skew}s exceeds {}s",
                MAX_CLOCK_SKEW.as_secs()
            ))));
        }

        let key_rotation = flags & FLAG_KEY_ROTATION != 0;
        let mut state = HandshakeState::fresh(Role::Responder, self_identity, key_rotation)?;
        state.hello_bytes = Some(message.to_vec());

        let mut session_id = [0u8; 16];
        OsRng.fill_bytes(&mut session_id);
        let mut responder_nonce = [0u8; 24];
        OsRng.fill_bytes(&mut responder_nonce);

        let (kem_ciphertext, pq_shared) = {
            let mut rng = DefaultRng::default();
            encapsulate(KemAlgorithm::Kyber1024, &hello.kem_ephemeral_public, &mut rng)
                .map_err(|e| NetworkError::Security(SecurityError::InvalidKeyMaterial(format!("encapsulate: {e:?}"))))?
        };

        let peer_x25519_ephemeral = X25519PublicKey::from(hello.x25519_ephemeral_public);
        let cl_shared = state.x25519_secret().diffie_hellman(&peer_x25519_ephemeral);

        let master_secret = derive_master_secret(&pq_shared, cl_shared.as_bytes(), &session_id)?;
        let tx = hkdf_derive_key(&master_secret, &session_id, TX_INFO_RESPONDER)?;
        let rx = hkdf_derive_key(&master_secret, &session_id, TX_INFO_INITIATOR)?;

        let transcript = signed_transcript(&state.hello_bytes.clone().unwrap(), &session_id, &responder_nonce);
        let classical_signature = state.self_identity.sign_classical(&transcript)?;
        let pq_signature = state.self_identity.sign_post_quantum(&transcript)?;

        state.peer_identity = Some(PeerIdentity {
            kem_public: hello.kem_ephemeral_public,
            x25519_public: hello.x25519_ephemeral_public,
            signing_public: hello.signing_public,
            ed25519_public: hello.ed25519_public,
        });
        state.session_id = Some(session_id);
        state.responder_nonce = Some(responder_nonce);
        state.master_secret = Some(master_secret);
        state.tx = Some(tx);
        state.rx = Some(rx);

        let challenge = ChallengePayload {
            session_id,
            responder_nonce,
            responder_kem_public: state.self_identity.kem_public.clone(),
            responder_x25519_public: state.self_identity.x25519_public,
            responder_signing_public: state.self_identity.signing_public.clone(),
            responder_ed25519_public: state.self_identity.ed25519_public,
            kem_ciphertext,
            responder_x25519_ephemeral_public: state.x25519_ephemeral_public,
            classical_signature,
            pq_signature,
        };
        let out_flags = if key_rotation { FLAG_KEY_ROTATION } else { 0 };
        let encoded = encode_message(MessageType::Challenge, out_flags, &challenge)?;
        Ok((state, encoded))
    }

    /// Processes the initiator's RESPONSE, producing this side's final
    /// [`SessionKeys`] plus the encoded ESTABLISHED message to send back.
    pub fn on_response(
        state: HandshakeState,
        message: &[u8],
        heartbeat_interval: Duration,
        mtu: usize,
        key_rotation_interval: Duration,
        capability_bitmask: u32,
    ) -> Result<(SessionKeys, Vec<u8>)> {
        let (response, _flags): (ResponsePayload, u16) = decode_message(message, MessageType::Response)?;
        let session_id = state
            .session_id
            .ok_or_else(|| NetworkError::Security(SecurityError::UnexpectedMessage("RESPONSE before CHALLENGE sent".into())))?;
        if response.session_id != session_id {
            return Err(NetworkError::Security(SecurityError::UnexpectedMessage("session id mismatch in RESPONSE".into())));
        }

        let master_secret = state
            .master_secret
            .ok_or_else(|| NetworkError::Security(SecurityError::KeyDerivation("master secret missing".into())))?;
        let responder_nonce = state.responder_nonce.expect("responder_nonce set alongside master_secret");

        let mut mac = Hmac::<Sha256>::new_from_slice(&master_secret)
            .map_err(|_| NetworkError::Security(SecurityError::KeyDerivation("HMAC key".into())))?;
        mac.update(&responder_nonce);
        mac.verify_slice(&response.proof).map_err(|_| NetworkError::Security(SecurityError::ProofRejected(
            "RESPONSE proof did not match expected HMAC".into(),
        )))?;

        let keys = finish(
            state,
            heartbeat_interval.as_secs(),
            mtu,
            key_rotation_interval.as_secs(),
            capability_bitmask,
        )?;

        let established = EstablishedPayload {
            session_id,
            heartbeat_interval_secs: heartbeat_interval.as_secs(),
            mtu,
            key_rotation_interval_secs: key_rotation_interval.as_secs(),
            capability_bitmask,
        };
        let encoded = encode_message(MessageType::Established, 0, &established)?;
        Ok((keys, encoded))
    }
}

fn derive_master_secret(pq_shared: &[u8], cl_shared: &[u8], session_id: &[u8; 16]) -> Result<[u8; 32]> {
    let mut combined = Vec::with_capacity(pq_shared.len() + cl_shared.len());
    combined.extend_from_slice(pq_shared);
    combined.extend_from_slice(cl_shared);
    let bytes = hkdf_derive(&combined, session_id, MASTER_SECRET_INFO, 32)?;
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&bytes);
    Ok(secret)
}

fn signed_transcript(hello_bytes: &[u8], session_id: &[u8; 16], nonce: &[u8; 24]) -> Vec<u8> {
    let mut transcript = Vec::with_capacity(hello_bytes.len() + 16 + 24);
    transcript.extend_from_slice(hello_bytes);
    transcript.extend_from_slice(session_id);
    transcript.extend_from_slice(nonce);
    transcript
}

fn finish(
    state: HandshakeState,
    heartbeat_interval_secs: u64,
    mtu: usize,
    key_rotation_interval_secs: u64,
    capability_bitmask: u32,
) -> Result<SessionKeys> {
    let session_id = state.session_id.expect("session id set by handshake completion");
    let tx = state.tx.expect("tx derived by handshake completion");
    let rx = state.rx.expect("rx derived by handshake completion");
    Ok(SessionKeys {
        session_id,
        tx,
        rx,
        heartbeat_interval: Duration::from_secs(heartbeat_interval_secs),
        negotiated_mtu: mtu,
        key_rotation_interval: Duration::from_secs(key_rotation_interval_secs),
        capability_bitmask,
        peer_attributes: None,
    })
}
