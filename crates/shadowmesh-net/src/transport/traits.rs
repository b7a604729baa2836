//! Transport abstraction: the capability set every byte-stream transport
//! must provide — connect, listen, accept, send a length-prefixed record,
//! receive one, and close.

use crate::error::Result;
use async_trait::async_trait;
use std::net::SocketAddr;

/// Largest record the wire format allows: a 4-byte big-endian length prefix
/// followed by at most this many bytes of payload.
pub const MAX_RECORD_LEN: usize = 65535;

/// A transport capable of dialing out to and listening for peers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens an outbound connection to `addr`.
    async fn connect(&self, addr: SocketAddr) -> Result<Box<dyn Connection>>;

    /// Binds a listener on `addr`.
    async fn listen(&self, addr: SocketAddr) -> Result<Box<dyn Listener>>;
}

/// Accepts inbound connections on a bound address.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Waits for and accepts the next inbound connection.
    async fn accept(&mut self) -> Result<(Box<dyn Connection>, SocketAddr)>;

    /// Returns the address this listener is bound to.
    fn local_addr(&self) -> Result<SocketAddr>;

    /// Stops accepting new connections.
    async fn close(&mut self) -> Result<()>;
}

/// One established byte-stream connection, framed as length-prefixed records.
///
/// A record's length prefix of `0` or greater than [`MAX_RECORD_LEN`] is a
/// protocol violation; implementations must reject it and terminate the
/// connection rather than attempt to recover.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Sends one length-prefixed record.
    async fn send_record(&mut self, payload: &[u8]) -> Result<()>;

    /// Receives the next length-prefixed record.
    async fn recv_record(&mut self) -> Result<Vec<u8>>;

    /// The peer's address, if known.
    fn peer_addr(&self) -> Option<SocketAddr>;

    /// Closes the connection.
    async fn close(&mut self) -> Result<()>;
}
