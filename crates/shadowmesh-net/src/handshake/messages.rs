//! Wire encoding for handshake messages: a fixed 12-byte header followed by
//! a JSON payload, matching the framing every other shadowmesh message uses.

use crate::error::{NetworkError, Result, SecurityError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Handshake message magic bytes.
pub const MAGIC: [u8; 4] = *b"SMv1";

/// Current handshake protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of the fixed message header in bytes.
pub const HEADER_LEN: usize = 12;

/// Flag bit marking a key-rotation handshake rather than an initial one.
pub const FLAG_KEY_ROTATION: u16 = 0x0001;

/// Handshake message type tags, carried in the header's 1-byte type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Hello = 0x01,
    Challenge = 0x02,
    Response = 0x03,
    Established = 0x04,
    Heartbeat = 0x05,
    KeyRotate = 0x06,
    Error = 0xFF,
}

impl MessageType {
    fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x01 => Ok(Self::Hello),
            0x02 => Ok(Self::Challenge),
            0x03 => Ok(Self::Response),
            0x04 => Ok(Self::Established),
            0x05 => Ok(Self::Heartbeat),
            0x06 => Ok(Self::KeyRotate),
            0xFF => Ok(Self::Error),
            other => Err(NetworkError::Security(SecurityError::UnexpectedMessage(format!(
                "unknown handshake message type 0x{other:02x}"
            )))),
        }
    }
}

/// `HELLO`: the initiator's opening message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelloPayload {
    pub initiator_peer_id: [u8; 20],
    pub kem_ephemeral_public: Vec<u8>,
    pub x25519_ephemeral_public: [u8; 32],
    pub signing_public: Vec<u8>,
    pub ed25519_public: [u8; 32],
    pub timestamp: u64,
}

/// `CHALLENGE`: the responder's reply, carrying its identity and a signed transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengePayload {
    pub session_id: [u8; 16],
    pub responder_nonce: [u8; 24],
    pub responder_kem_public: Vec<u8>,
    pub responder_x25519_public: [u8; 32],
    pub responder_signing_public: Vec<u8>,
    pub responder_ed25519_public: [u8; 32],
    pub kem_ciphertext: Vec<u8>,
    pub responder_x25519_ephemeral_public: [u8; 32],
    pub classical_signature: [u8; 64],
    pub pq_signature: Vec<u8>,
}

/// `RESPONSE`: the initiator's key-confirmation proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub session_id: [u8; 16],
    pub proof: [u8; 32],
    pub capability_bitmask: Option<u32>,
}

/// `ESTABLISHED`: the responder's final message, carrying session parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstablishedPayload {
    pub session_id: [u8; 16],
    pub heartbeat_interval_secs: u64,
    pub mtu: usize,
    pub key_rotation_interval_secs: u64,
    pub capability_bitmask: u32,
}

/// Encodes `payload` as a complete wire message: header followed by JSON body.
pub fn encode_message<T: Serialize>(msg_type: MessageType, flags: u16, payload: &T) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(payload)?;
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&MAGIC);
    out.push(PROTOCOL_VERSION);
    out.push(msg_type as u8);
    out.extend_from_slice(&flags.to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Parsed message header plus a slice into the payload bytes.
pub struct DecodedHeader {
    pub msg_type: MessageType,
    pub flags: u16,
    pub payload_len: u32,
}

/// Parses and validates the fixed header of `bytes`.
pub fn decode_header(bytes: &[u8]) -> Result<DecodedHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(NetworkError::Security(SecurityError::UnexpectedMessage(
            "handshake message shorter than header".into(),
        )));
    }
    if bytes[0..4] != MAGIC {
        return Err(NetworkError::Security(SecurityError::UnexpectedMessage("bad handshake magic".into())));
    }
    if bytes[4] != PROTOCOL_VERSION {
        return Err(NetworkError::Security(SecurityError::UnexpectedMessage(format!(
            "unsupported handshake version {}",
            bytes[4]
        ))));
    }
    let msg_type = MessageType::from_byte(bytes[5])?;
    let flags = u16::from_be_bytes([bytes[6], bytes[7]]);
    let payload_len = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    Ok(DecodedHeader { msg_type, flags, payload_len })
}

/// Decodes a full message, checking that its type matches `expected` and
/// that the declared payload length matches what's actually present.
pub fn decode_message<T: DeserializeOwned>(bytes: &[u8], expected: MessageType) -> Result<(T, u16)> {
    let header = decode_header(bytes)?;
    if header.msg_type as u8 != expected as u8 {
        return Err(NetworkError::Security(SecurityError::UnexpectedMessage(format!(
            "expected handshake message type 0x{:02x}, got 0x{:02x}",
            expected as u8, header.msg_type as u8
        ))));
    }
    let payload_bytes = &bytes[HEADER_LEN..];
    if payload_bytes.len() as u32 != header.payload_len {
        return Err(NetworkError::Security(SecurityError::UnexpectedMessage(
            "handshake payload length mismatch".into(),
        )));
    }
    let payload = serde_json::from_slice(payload_bytes)?;
    Ok((payload, header.flags))
}
