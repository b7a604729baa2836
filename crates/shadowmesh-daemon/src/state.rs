//! Connection state machine shared between the daemon manager and the
//! control API's `/status` endpoint.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// The daemon's current connection state.
///
/// Transitions: `Disconnected -> Connecting -> (Connected | Error)`, and
/// `Connected -> Disconnected` on a clean `disconnect()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Everything `GET /status` reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub state: ConnectionState,
    pub tap_device: String,
    pub local_ip: String,
    pub peer_address: Option<SocketAddr>,
    pub last_error: Option<String>,
}

impl DaemonStatus {
    pub fn new(tap_device: String, local_ip: String) -> Self {
        Self { state: ConnectionState::Disconnected, tap_device, local_ip, peer_address: None, last_error: None }
    }
}
