//! # shadowmesh-net
//!
//! Transport, cryptographic handshake, and the framed encryption pipeline
//! that together move Ethernet frames securely between two shadowmesh
//! peers. This crate owns everything below the daemon's lifecycle
//! management: dialing/listening, the four-message handshake, AEAD framing
//! with key rotation, and the virtual network device adapter.
//!
//! ## Module Structure
//!
//! - [`config`]: typed, validated daemon configuration
//! - [`crypto`]: hybrid keypairs, keystore, AEAD/KDF primitives, nonces, session keys
//! - [`error`]: the crate's error taxonomy
//! - [`handshake`]: the four-message HELLO/CHALLENGE/RESPONSE/ESTABLISHED state machine
//! - [`pipeline`]: the bounded-queue encrypt/decrypt worker pipeline
//! - [`device`]: the virtual network device adapter
//! - [`nat`]: NAT type detection
//! - [`transport`]: byte-stream transports (TCP today)
//! - [`types`]: identifiers and metrics shared across the crate

pub mod config;
pub mod crypto;
pub mod device;
pub mod error;
pub mod handshake;
pub mod nat;
pub mod pipeline;
pub mod transport;
pub mod types;

pub use config::ShadowMeshConfig;
pub use error::{NetworkError, Result};

/// Crate version, re-exported for diagnostics and the control API's `/health` response.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
