//! Common types shared across the shadowmesh networking layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a peer in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(Uuid);

impl PeerId {
    /// Creates a new random peer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a peer ID from raw bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the peer ID as raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Information about a peer we can connect to or have connected to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Unique identifier for the peer
    pub id: PeerId,
    /// Address to dial for an outbound connection
    pub address: SocketAddr,
    /// Peer's long-term hybrid signing public key, once known
    pub signing_public_key: Option<Vec<u8>>,
}

impl PeerInfo {
    /// Creates a new peer info with the given ID and address.
    pub fn new(id: PeerId, address: SocketAddr) -> Self {
        Self { id, address, signing_public_key: None }
    }
}

/// Unique identifier for a transport-level connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Creates a new connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport types shadowmesh can run a session over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportType {
    /// Plain TCP, length-prefixed framing
    Tcp,
    /// In-memory duplex pipe, used by tests
    Memory,
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportType::Tcp => write!(f, "TCP"),
            TransportType::Memory => write!(f, "memory"),
        }
    }
}

/// Per-connection byte/message counters.
#[derive(Debug, Clone, Default)]
pub struct ConnectionMetrics {
    /// Bytes sent
    pub bytes_sent: u64,
    /// Bytes received
    pub bytes_received: u64,
    /// Frames sent
    pub frames_sent: u64,
    /// Frames received
    pub frames_received: u64,
}

/// Aggregate metrics for a transport adapter.
#[derive(Debug, Clone)]
pub struct TransportMetrics {
    /// Total connections attempted
    pub connection_attempts: u64,
    /// Successful connections
    pub successful_connections: u64,
    /// Failed connections
    pub failed_connections: u64,
    /// Average connection time
    pub avg_connection_time: Duration,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Total bytes received
    pub bytes_received: u64,
    /// Last activity timestamp
    pub last_used: Instant,
}

impl Default for TransportMetrics {
    fn default() -> Self {
        Self {
            connection_attempts: 0,
            successful_connections: 0,
            failed_connections: 0,
            avg_connection_time: Duration::from_secs(0),
            bytes_sent: 0,
            bytes_received: 0,
            last_used: Instant::now(),
        }
    }
}
