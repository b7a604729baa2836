//! The post-quantum handshake: four messages that mutually authenticate two
//! hybrid identities and derive directional session keys.

pub mod messages;
pub mod state;

pub use messages::{
    ChallengePayload, EstablishedPayload, HelloPayload, MessageType, ResponsePayload, FLAG_KEY_ROTATION,
};
pub use state::{HandshakeState, Initiator, Responder, Role, DEFAULT_HANDSHAKE_TIMEOUT, MAX_CLOCK_SKEW};
