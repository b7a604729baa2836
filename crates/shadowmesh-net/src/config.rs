//! Configuration for a shadowmesh daemon instance.
//!
//! Mirrors the recognized configuration keys from the shadowmesh wire spec:
//! `daemon.*`, `network.*`, `encryption.*`, `peer.*`, `nat.*`, `relay.*`.
//! Loading goes through `shadowmesh_core::config` (TOML/JSON file sources
//! layered with environment overrides); this module owns the typed shape
//! those sources are deserialized into.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Top-level configuration for one shadowmesh daemon process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowMeshConfig {
    /// `daemon.*` keys
    pub daemon: DaemonConfig,
    /// `network.*` keys
    pub network: NetworkDeviceConfig,
    /// `encryption.*` keys
    pub encryption: EncryptionConfig,
    /// `peer.*` keys
    pub peer: PeerConfig,
    /// `nat.*` keys
    pub nat: NatConfig,
    /// `relay.*` keys
    pub relay: RelayConfig,
}

impl Default for ShadowMeshConfig {
    fn default() -> Self {
        Self {
            daemon: DaemonConfig::default(),
            network: NetworkDeviceConfig::default(),
            encryption: EncryptionConfig::default(),
            peer: PeerConfig::default(),
            nat: NatConfig::default(),
            relay: RelayConfig::default(),
        }
    }
}

impl ShadowMeshConfig {
    /// Validates cross-field invariants not expressible in the type alone.
    ///
    /// In particular `encryption.key` (a test-mode pre-shared key) must be
    /// absent whenever the daemon is not explicitly running in test mode,
    /// since production keys come only from the handshake.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(key) = &self.encryption.key {
            if !self.encryption.test_mode {
                return Err("encryption.key is only valid with encryption.test_mode = true".into());
            }
            if key.len() != 64 || !key.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err("encryption.key must be 64 hex characters".into());
            }
        }
        if self.nat.enabled && self.nat.stun_server.is_none() {
            return Err("nat.enabled requires nat.stun_server".into());
        }
        if self.relay.enabled && self.relay.server.is_none() {
            return Err("relay.enabled requires relay.server".into());
        }
        Ok(())
    }
}

/// `daemon.*` configuration keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Control API bind address.
    pub listen_address: SocketAddr,
    /// Minimum level emitted by the tracing subscriber.
    pub log_level: LogLevel,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1:9090".parse().expect("valid default address"),
            log_level: LogLevel::Info,
        }
    }
}

/// Recognized `daemon.log_level` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostic output
    Debug,
    /// Normal operational messages
    Info,
    /// Recoverable but unexpected conditions
    Warn,
    /// Unrecoverable or attention-worthy conditions
    Error,
}

impl LogLevel {
    /// Returns the `tracing`/`EnvFilter` directive string for this level.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// `network.*` configuration keys: the virtual device this daemon drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDeviceConfig {
    /// Interface name for the virtual network device.
    pub tap_device: String,
    /// CIDR-notation address assigned to the device, e.g. `10.8.0.2/24`.
    pub local_ip: String,
    /// Maximum transmission unit in bytes.
    pub mtu: usize,
}

impl Default for NetworkDeviceConfig {
    fn default() -> Self {
        Self {
            tap_device: "shadowmesh0".to_string(),
            local_ip: "10.8.0.1/24".to_string(),
            mtu: 1500,
        }
    }
}

/// `encryption.*` configuration keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// 64 hex-character pre-shared key, test mode only.
    pub key: Option<String>,
    /// Must be set to use `key`; guards against accidental production use.
    #[serde(default)]
    pub test_mode: bool,
}

/// `peer.*` configuration keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerConfig {
    /// Optional direct peer address; normally set later via the control API.
    pub address: Option<SocketAddr>,
}

/// `nat.*` configuration keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatConfig {
    /// Whether to run NAT type detection at startup.
    pub enabled: bool,
    /// STUN-style probe endpoint used for binding discovery.
    pub stun_server: Option<String>,
    /// A second, distinct probe endpoint. Symmetric-NAT detection compares
    /// the mapped port reported by this server against `stun_server`'s; if
    /// unset, detection falls back to probing `stun_server` twice and can
    /// no longer distinguish symmetric NAT from a cone NAT.
    pub stun_server_secondary: Option<String>,
    /// How long a cached detection result remains valid.
    #[serde(with = "humantime_serde_duration")]
    pub cache_ttl: Duration,
}

impl Default for NatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stun_server: None,
            stun_server_secondary: None,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// `relay.*` configuration keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Whether to use relay rendezvous mode instead of direct P2P.
    pub enabled: bool,
    /// Relay server URL.
    pub server: Option<String>,
}

/// Minimal duration (de)serialization as whole seconds, avoiding a dependency
/// on a dedicated humantime-serde crate for a single field.
mod humantime_serde_duration {
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
