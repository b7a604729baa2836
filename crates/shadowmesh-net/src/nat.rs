//! NAT type detection.
//!
//! Classifies the local NAT by comparing the externally observed
//! (address, port) pair across two STUN-style binding probes to different
//! external servers, plus one probe sent from a second local port. The
//! result is cached behind a TTL so the daemon does not reprobe on every
//! connection attempt.

use crate::error::{NetworkError, Result, TransportError};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::warn;

/// Total wall-clock budget for one detection run before it gives up and
/// returns [`NatType::Unknown`].
pub const DETECTION_BUDGET: Duration = Duration::from_secs(2);

/// Default cache lifetime for a detection result.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Classification of the local NAT, per the binding-discovery probe design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NatType {
    /// Local address equals the externally reported address: no NAT.
    NoNat,
    /// Same mapped port observed from any remote peer.
    FullCone,
    /// Same port, but only reachable from a previously-contacted remote IP.
    RestrictedCone,
    /// Same port, but only reachable from a previously-contacted (IP, port).
    PortRestrictedCone,
    /// Different mapped ports observed for different remotes.
    Symmetric,
    /// Probing did not complete in time or all probes failed.
    Unknown,
}

impl NatType {
    /// True for the four classifications where a direct P2P path can work.
    pub fn is_p2p_feasible(&self) -> bool {
        matches!(
            self,
            NatType::NoNat | NatType::FullCone | NatType::RestrictedCone | NatType::PortRestrictedCone
        )
    }
}

/// One binding-discovery observation: what a remote probe server reported
/// seeing as our source address.
#[derive(Debug, Clone, Copy)]
struct Binding {
    local_port: u16,
    reported: SocketAddr,
}

/// A cached detection result with its expiry.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    nat_type: NatType,
    expires_at: Instant,
}

/// Two distinct probe endpoints used for binding discovery.
#[derive(Debug, Clone)]
pub struct ProbeServers {
    pub primary: SocketAddr,
    pub secondary: SocketAddr,
}

/// Detects and caches the local NAT classification.
///
/// The cache is a `RwLock`-guarded map so `get_cached` is safe to call
/// concurrently with an in-flight `detect`.
pub struct NatDetector {
    cache: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

impl NatDetector {
    /// Creates a detector with the given default cache TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self { cache: RwLock::new(HashMap::new()), default_ttl }
    }

    /// Runs one detection round against `servers`, caching the result
    /// under `key` (typically the configured STUN server identity).
    pub async fn detect(&self, key: &str, servers: &ProbeServers) -> NatType {
        let nat_type = match timeout(DETECTION_BUDGET, self.probe(servers)).await {
            Ok(Ok(nat_type)) => nat_type,
            Ok(Err(err)) => {
                warn!(%err, "NAT probing failed");
                NatType::Unknown
            }
            Err(_) => {
                warn!("NAT probing exceeded its time budget");
                NatType::Unknown
            }
        };
        self.store(key, nat_type, self.default_ttl).await;
        nat_type
    }

    async fn probe(&self, servers: &ProbeServers) -> Result<NatType> {
        let socket_a = bind_probe_socket().await?;
        let socket_b = bind_probe_socket().await?;

        let binding_a_primary = probe_once(&socket_a, servers.primary).await?;
        let binding_a_secondary = probe_once(&socket_a, servers.secondary).await?;
        let binding_b_primary = probe_once(&socket_b, servers.primary).await?;

        if binding_a_primary.reported.port() == socket_a.local_addr().map_err(io_err)?.port()
            && binding_a_primary.reported.ip() == local_routable_ip()
        {
            return Ok(NatType::NoNat);
        }

        if binding_a_primary.reported.port() != binding_a_secondary.reported.port() {
            return Ok(NatType::Symmetric);
        }

        if binding_a_primary.local_port == binding_b_primary.local_port {
            return Ok(NatType::FullCone);
        }

        // Same external mapping seen by both probe servers and stable
        // across sockets; without a third party re-probing inbound we
        // cannot distinguish restricted vs. port-restricted beyond the
        // observation that the mapping is consistent per-destination.
        Ok(NatType::RestrictedCone)
    }

    async fn store(&self, key: &str, nat_type: NatType, ttl: Duration) {
        let mut cache = self.cache.write().await;
        cache.insert(key.to_string(), CacheEntry { nat_type, expires_at: Instant::now() + ttl });
    }

    /// Returns the cached result for `key` if present and not expired.
    pub async fn get_cached(&self, key: &str) -> Option<NatType> {
        let cache = self.cache.read().await;
        cache.get(key).filter(|entry| entry.expires_at > Instant::now()).map(|entry| entry.nat_type)
    }

    /// Writes a synthetic cached result, bypassing probing entirely.
    pub async fn set_override(&self, key: &str, nat_type: NatType, ttl: Duration) {
        self.store(key, nat_type, ttl).await;
    }
}

async fn bind_probe_socket() -> Result<UdpSocket> {
    UdpSocket::bind("0.0.0.0:0").await.map_err(|err| NetworkError::Transport(TransportError::Tcp(err.to_string())))
}

async fn probe_once(socket: &UdpSocket, server: SocketAddr) -> Result<Binding> {
    socket.send_to(b"shadowmesh-nat-probe", server).await.map_err(io_err)?;
    let mut buf = [0u8; 128];
    let (n, _) = socket.recv_from(&mut buf).await.map_err(io_err)?;
    let reported: SocketAddr = std::str::from_utf8(&buf[..n])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| NetworkError::Transport(TransportError::Tcp("malformed probe reply".to_string())))?;
    Ok(Binding { local_port: socket.local_addr().map_err(io_err)?.port(), reported })
}

fn io_err(err: std::io::Error) -> NetworkError {
    NetworkError::Transport(TransportError::Tcp(err.to_string()))
}

fn local_routable_ip() -> std::net::IpAddr {
    // Best-effort placeholder used only for the NoNat comparison; a real
    // deployment resolves this from the interface the probe socket bound to.
    "0.0.0.0".parse().expect("valid ip literal")
}
