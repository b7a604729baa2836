//! TCP transport: one reliable byte stream per peer, framed as
//! `[length: u32 BE][payload]` records.

use crate::error::{NetworkError, Result, TransportError};
use crate::transport::traits::{Connection, Listener, Transport, MAX_RECORD_LEN};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

/// TCP transport implementation.
#[derive(Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    /// Creates a new TCP transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&self, addr: SocketAddr) -> Result<Box<dyn Connection>> {
        info!(%addr, "dialing peer over TCP");
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| NetworkError::Transport(TransportError::ConnectionFailed(e.to_string())))?;
        configure_stream(&stream)?;
        Ok(Box::new(TcpConnection::new(stream, addr)))
    }

    async fn listen(&self, addr: SocketAddr) -> Result<Box<dyn Listener>> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))?;
        info!(%addr, "listening for peers over TCP");
        Ok(Box::new(TcpListenerHandle(listener)))
    }
}

fn configure_stream(stream: &TcpStream) -> Result<()> {
    stream
        .set_nodelay(true)
        .map_err(|e| NetworkError::Transport(TransportError::Tcp(format!("set_nodelay: {e}"))))?;
    let sock_ref = socket2::SockRef::from(stream);
    let keepalive = socket2::TcpKeepalive::new()
        .with_time(Duration::from_secs(30))
        .with_interval(Duration::from_secs(10));
    sock_ref
        .set_tcp_keepalive(&keepalive)
        .map_err(|e| NetworkError::Transport(TransportError::Tcp(format!("set_tcp_keepalive: {e}"))))?;
    Ok(())
}

/// One accepted or dialed TCP connection.
pub struct TcpConnection {
    stream: TcpStream,
    peer_addr: SocketAddr,
}

impl TcpConnection {
    fn new(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        Self { stream, peer_addr }
    }
}

#[async_trait]
impl Connection for TcpConnection {
    async fn send_record(&mut self, payload: &[u8]) -> Result<()> {
        if payload.is_empty() || payload.len() > MAX_RECORD_LEN {
            return Err(NetworkError::Transport(TransportError::InvalidFrameLength(payload.len())));
        }
        let len = payload.len() as u32;
        self.stream
            .write_all(&len.to_be_bytes())
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))?;
        self.stream
            .write_all(payload)
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))?;
        self.stream
            .flush()
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))
    }

    async fn recv_record(&mut self) -> Result<Vec<u8>> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))?;
        let len = u32::from_be_bytes(len_buf) as usize;
        if len == 0 || len > MAX_RECORD_LEN {
            warn!(len, "peer sent an out-of-range record length; closing connection");
            return Err(NetworkError::Transport(TransportError::InvalidFrameLength(len)));
        }
        let mut payload = vec![0u8; len];
        self.stream
            .read_exact(&mut payload)
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))?;
        Ok(payload)
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        Some(self.peer_addr)
    }

    async fn close(&mut self) -> Result<()> {
        self.stream
            .shutdown()
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))
    }
}

/// Accepts inbound TCP connections.
pub struct TcpListenerHandle(TcpListener);

#[async_trait]
impl Listener for TcpListenerHandle {
    async fn accept(&mut self) -> Result<(Box<dyn Connection>, SocketAddr)> {
        let (stream, addr) = self
            .0
            .accept()
            .await
            .map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))?;
        configure_stream(&stream)?;
        Ok((Box::new(TcpConnection::new(stream, addr)), addr))
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        self.0.local_addr().map_err(|e| NetworkError::Transport(TransportError::Tcp(e.to_string())))
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_send_and_receive_roundtrip() {
        let transport = TcpTransport::new();
        let listener = transport.listen("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut listener = listener;
            let (mut conn, _) = listener.accept().await.unwrap();
            let record = conn.recv_record().await.unwrap();
            conn.send_record(&record).await.unwrap();
        });

        let mut client = transport.connect(addr).await.unwrap();
        client.send_record(b"hello shadowmesh").await.unwrap();
        let echoed = client.recv_record().await.unwrap();
        assert_eq!(echoed, b"hello shadowmesh");

        server.await.unwrap();
    }

    #[tokio::test]
    async fn zero_length_record_is_rejected_on_send() {
        let transport = TcpTransport::new();
        let listener = transport.listen("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut listener = listener;
            let _ = listener.accept().await.unwrap();
        });

        let mut client = transport.connect(addr).await.unwrap();
        assert!(client.send_record(&[]).await.is_err());
        assert!(client.send_record(&vec![0u8; MAX_RECORD_LEN + 1]).await.is_err());

        server.await.unwrap();
    }
}
