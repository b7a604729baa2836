//! The keyed state produced by a completed handshake.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// A peer's network-reachability attributes, carried optionally in the
/// handshake once a peer knows (or has been told) how it is reachable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeerNetworkAttributes {
    /// The peer's believed public address, if known.
    pub public_address: Option<SocketAddr>,
    /// Whether the peer will accept unsolicited direct connections.
    pub accepts_direct: bool,
    /// Certificate used for direct-transport authentication, if any.
    pub certificate: Option<Vec<u8>>,
    /// Signature over `certificate` by the peer's long-term signing key.
    pub certificate_signature: Option<Vec<u8>>,
}

/// The output of a completed handshake: directional keys, negotiated
/// session parameters, and whatever the peer told us about its reachability.
///
/// Invariant: for a pair of peers that completed a handshake together,
/// `initiator.tx == responder.rx` and `initiator.rx == responder.tx`, byte
/// for byte. Consumed by the encryption pipeline and replaced atomically on
/// key rotation; never mutated in place.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionKeys {
    /// 16-byte identifier shared by both ends of the session.
    pub session_id: [u8; 16],
    /// Key used to encrypt frames sent by this end.
    pub tx: [u8; 32],
    /// Key used to decrypt frames received from the peer.
    pub rx: [u8; 32],
    /// Interval between HEARTBEAT messages.
    #[serde(with = "duration_secs")]
    pub heartbeat_interval: Duration,
    /// MTU negotiated for this session, bounded by both peers' device MTUs.
    pub negotiated_mtu: usize,
    /// Interval at which the pipeline rotates `tx`/`rx` on its own.
    #[serde(with = "duration_secs")]
    pub key_rotation_interval: Duration,
    /// Bitmask of capabilities the peer advertised.
    pub capability_bitmask: u32,
    /// Peer's network attributes, when it provided them.
    pub peer_attributes: Option<PeerNetworkAttributes>,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("session_id", &hex::encode(self.session_id))
            .field("negotiated_mtu", &self.negotiated_mtu)
            .field("heartbeat_interval", &self.heartbeat_interval)
            .field("key_rotation_interval", &self.key_rotation_interval)
            .field("capability_bitmask", &self.capability_bitmask)
            .field("peer_attributes", &self.peer_attributes)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Returns whether `self` and `peer` are the two directionally-matched
    /// halves of the same handshake: `self.tx == peer.rx` and vice versa.
    pub fn is_complementary_to(&self, peer: &SessionKeys) -> bool {
        self.session_id == peer.session_id && self.tx == peer.rx && self.rx == peer.tx
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
