//! Lifecycle manager and local control API for a shadowmesh peer daemon.
//!
//! `shadowmesh-net` owns the protocol (handshake, pipeline, transport,
//! device, NAT). This crate owns turning those pieces into a running
//! process: the connection state machine, the frame routers, and the
//! HTTP surface an operator or CLI drives it through.

pub mod control_api;
pub mod manager;
pub mod state;

pub use control_api::ApiState;
pub use manager::DaemonManager;
pub use state::{ConnectionState, DaemonStatus};
