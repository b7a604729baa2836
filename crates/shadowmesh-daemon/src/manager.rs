//! The daemon manager: brings C7 (device) through C8 (NAT) together, owns
//! the connection state machine, and runs the frame routers that glue the
//! device to the pipeline to the transport.

use crate::state::{ConnectionState, DaemonStatus};
use shadowmesh_net::config::ShadowMeshConfig;
use shadowmesh_net::crypto::keypair::HybridKeypair;
use shadowmesh_net::crypto::session::SessionKeys;
use shadowmesh_net::device::{Device, DeviceParams, RawDevice};
use shadowmesh_net::error::{NetworkError, Result};
use shadowmesh_net::handshake::{Initiator, Responder, DEFAULT_HANDSHAKE_TIMEOUT};
use shadowmesh_net::nat::{DEFAULT_CACHE_TTL, NatDetector, NatType, ProbeServers};
use shadowmesh_net::pipeline::{EncryptedFrame, Pipeline};
use shadowmesh_net::transport::{Connection, TcpTransport, Transport};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

const ROUTER_WAIT: Duration = Duration::from_millis(100);

/// Cooperative stop signal the router tasks check at every bounded wait.
/// Mirrors the workspace's existing cancellation-token idiom rather than
/// relying on a notification that a not-yet-waiting task could miss.
#[derive(Clone, Default)]
struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owns one peer daemon's lifecycle: device, pipeline, transport, and the
/// connection state machine the control API reports.
pub struct DaemonManager {
    config: ShadowMeshConfig,
    identity: Arc<HybridKeypair>,
    transport: TcpTransport,
    device: RwLock<Option<Arc<Device>>>,
    pipeline: RwLock<Option<Arc<Pipeline>>>,
    connection: RwLock<Option<Box<dyn Connection>>>,
    status: RwLock<DaemonStatus>,
    nat: NatDetector,
    stop: RwLock<StopSignal>,
    router_handles: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl DaemonManager {
    /// Builds a manager from config and identity. Call [`DaemonManager::start`]
    /// with a concrete device handle to bring the daemon up.
    pub fn new(config: ShadowMeshConfig, identity: Arc<HybridKeypair>) -> Self {
        let status = DaemonStatus::new(config.network.tap_device.clone(), config.network.local_ip.clone());
        Self {
            config,
            identity,
            transport: TcpTransport,
            device: RwLock::new(None),
            pipeline: RwLock::new(None),
            connection: RwLock::new(None),
            status: RwLock::new(status),
            nat: NatDetector::new(DEFAULT_CACHE_TTL),
            stop: RwLock::new(StopSignal::default()),
            router_handles: Mutex::new(Vec::new()),
        }
    }

    /// Phase 1-3 of startup: device up, pre-shared test-mode pipeline if
    /// configured, and an advisory NAT probe. Phases 4-5 (control API,
    /// transport listener) are driven by the binary, which owns the
    /// `Arc<DaemonManager>` the control API's handlers share.
    pub async fn start(&self, raw_device: Box<dyn RawDevice>) -> Result<()> {
        let params = DeviceParams {
            name: self.config.network.tap_device.clone(),
            cidr: self.config.network.local_ip.clone(),
            mtu: self.config.network.mtu,
        };
        let device = Arc::new(Device::up(params, raw_device));
        *self.device.write().await = Some(device);

        if self.config.encryption.test_mode {
            if let Some(hex_key) = &self.config.encryption.key {
                let key = parse_hex_key(hex_key)?;
                let keys = SessionKeys {
                    session_id: [0u8; 16],
                    tx: key,
                    rx: key,
                    heartbeat_interval: Duration::from_secs(15),
                    negotiated_mtu: self.config.network.mtu,
                    key_rotation_interval: Duration::from_secs(3600),
                    capability_bitmask: 0,
                    peer_attributes: None,
                };
                *self.pipeline.write().await = Some(Pipeline::start(keys));
                info!("pipeline instantiated from test-mode pre-shared key");
            }
        }

        if self.config.nat.enabled {
            if let Some(stun) = &self.config.nat.stun_server {
                let secondary = self.config.nat.stun_server_secondary.as_ref().unwrap_or(stun);
                let servers = ProbeServers {
                    primary: stun
                        .parse()
                        .map_err(|_| NetworkError::Configuration(format!("invalid nat.stun_server: {stun}")))?,
                    secondary: secondary.parse().map_err(|_| {
                        NetworkError::Configuration(format!("invalid nat.stun_server_secondary: {secondary}"))
                    })?,
                };
                if self.config.nat.stun_server_secondary.is_none() {
                    warn!("nat.stun_server_secondary not set; symmetric NAT detection is degraded");
                }
                let nat_type = self.nat.detect(stun, &servers).await;
                info!(?nat_type, "NAT detection complete (advisory)");
            }
        }

        Ok(())
    }

    /// `connect(peer_addr)`: Disconnected -> Connecting -> (Connected | Error).
    pub async fn connect(self: &Arc<Self>, peer_addr: SocketAddr) -> Result<()> {
        self.transition(ConnectionState::Connecting, Some(peer_addr), None).await;

        let result = self.dial_and_handshake(peer_addr).await;
        match result {
            Ok(keys) => {
                *self.pipeline.write().await = Some(Pipeline::start(keys));
                self.spawn_routers().await;
                self.transition(ConnectionState::Connected, Some(peer_addr), None).await;
                Ok(())
            }
            Err(err) => {
                self.transition(ConnectionState::Error, Some(peer_addr), Some(err.to_string())).await;
                Err(err)
            }
        }
    }

    async fn dial_and_handshake(&self, peer_addr: SocketAddr) -> Result<SessionKeys> {
        let mut connection = self.transport.connect(peer_addr).await?;
        let (state, hello) = Initiator::start(Arc::clone(&self.identity))?;

        let keys = tokio::time::timeout(DEFAULT_HANDSHAKE_TIMEOUT, async {
            connection.send_record(&hello).await?;
            let challenge = connection.recv_record().await?;
            let (state, response) = Initiator::on_challenge(state, &challenge)?;
            connection.send_record(&response).await?;
            let established = connection.recv_record().await?;
            Initiator::on_established(state, &established)
        })
        .await
        .map_err(|_| NetworkError::Security(shadowmesh_net::error::SecurityError::StaleHandshake("handshake timed out".into())))??;

        *self.connection.write().await = Some(connection);
        Ok(keys)
    }

    /// Handles one inbound connection in the responder role, installing the
    /// resulting session and starting the routers. Mirrors `connect` minus
    /// the dialing step.
    pub async fn accept(self: &Arc<Self>, mut connection: Box<dyn Connection>) -> Result<()> {
        let peer_addr = connection.peer_addr();
        self.transition(ConnectionState::Connecting, peer_addr, None).await;

        let result: Result<SessionKeys> = async {
            let hello = connection.recv_record().await?;
            let (state, challenge) = Responder::on_hello(Arc::clone(&self.identity), &hello)?;
            connection.send_record(&challenge).await?;
            let response = connection.recv_record().await?;
            let (keys, established) = Responder::on_response(
                state,
                &response,
                Duration::from_secs(15),
                self.config.network.mtu,
                Duration::from_secs(3600),
                0,
            )?;
            connection.send_record(&established).await?;
            Ok(keys)
        }
        .await;

        match result {
            Ok(keys) => {
                *self.pipeline.write().await = Some(Pipeline::start(keys));
                *self.connection.write().await = Some(connection);
                self.spawn_routers().await;
                self.transition(ConnectionState::Connected, peer_addr, None).await;
                Ok(())
            }
            Err(err) => {
                self.transition(ConnectionState::Error, peer_addr, Some(err.to_string())).await;
                Err(err)
            }
        }
    }

    /// `disconnect()`: requires Connected. Stops the routers, closes the
    /// transport, and transitions back to Disconnected.
    pub async fn disconnect(&self) -> Result<()> {
        {
            let status = self.status.read().await;
            if status.state != ConnectionState::Connected {
                return Err(NetworkError::Connection("disconnect requires an active connection".into()));
            }
        }

        self.stop.read().await.raise();
        let mut handles = self.router_handles.lock().await;
        for handle in handles.drain(..) {
            handle.abort();
        }
        drop(handles);

        if let Some(mut connection) = self.connection.write().await.take() {
            connection.close().await?;
        }
        *self.pipeline.write().await = None;

        self.transition(ConnectionState::Disconnected, None, None).await;
        Ok(())
    }

    /// Outbound and inbound frame router tasks per the daemon's concurrency
    /// contract: non-blocking producer sends, bounded-wait consumer recvs.
    async fn spawn_routers(self: &Arc<Self>) {
        let stop = StopSignal::default();
        *self.stop.write().await = stop.clone();

        let outbound = {
            let this = Arc::clone(self);
            let stop = stop.clone();
            tokio::spawn(async move { this.run_outbound_router(stop).await })
        };
        let inbound = {
            let this = Arc::clone(self);
            tokio::spawn(async move { this.run_inbound_router(stop).await })
        };
        self.router_handles.lock().await.extend([outbound, inbound]);
    }

    async fn run_outbound_router(self: Arc<Self>, stop: StopSignal) {
        while !stop.is_raised() {
            let device = { self.device.read().await.clone() };
            let pipeline = { self.pipeline.read().await.clone() };
            let (Some(device), Some(pipeline)) = (device, pipeline) else { return };

            let Some(frame) = device.recv(ROUTER_WAIT).await else { continue };
            pipeline.send_plain(frame);

            if let Some(sealed) = pipeline.recv_cipher().await {
                let mut payload = Vec::with_capacity(12 + sealed.ciphertext.len());
                payload.extend_from_slice(&sealed.nonce);
                payload.extend_from_slice(&sealed.ciphertext);
                let mut connection = self.connection.write().await;
                if let Some(connection) = connection.as_mut() {
                    if let Err(err) = connection.send_record(&payload).await {
                        error!(%err, "transport send failed; stopping outbound router");
                        return;
                    }
                }
            }
        }
    }

    async fn run_inbound_router(self: Arc<Self>, stop: StopSignal) {
        while !stop.is_raised() {
            let record = {
                let mut connection = self.connection.write().await;
                match connection.as_mut() {
                    Some(connection) => {
                        tokio::time::timeout(ROUTER_WAIT, connection.recv_record()).await
                    }
                    None => return,
                }
            };

            let payload = match record {
                Ok(Ok(payload)) => payload,
                Ok(Err(err)) => {
                    warn!(%err, "transport recv failed; stopping inbound router");
                    return;
                }
                Err(_) => continue,
            };

            if payload.len() < 12 {
                warn!(len = payload.len(), "dropping undersized record");
                continue;
            }
            let mut nonce = [0u8; 12];
            nonce.copy_from_slice(&payload[..12]);
            let ciphertext = payload[12..].to_vec();

            let pipeline = { self.pipeline.read().await.clone() };
            let Some(pipeline) = pipeline else { continue };
            pipeline.send_cipher(EncryptedFrame { nonce, ciphertext });

            if let Some(plaintext) = pipeline.recv_plain().await {
                let device = { self.device.read().await.clone() };
                if let Some(device) = device {
                    let _ = device.send(plaintext);
                }
            }
        }
    }

    async fn transition(&self, state: ConnectionState, peer: Option<SocketAddr>, error: Option<String>) {
        let mut status = self.status.write().await;
        status.state = state;
        if peer.is_some() {
            status.peer_address = peer;
        }
        status.last_error = error;
    }

    /// Current status, as reported by the control API's `/status`.
    pub async fn status(&self) -> DaemonStatus {
        self.status.read().await.clone()
    }

    /// NAT feasibility for the configured STUN server, if a cached result exists.
    pub async fn nat_type(&self) -> Option<NatType> {
        match &self.config.nat.stun_server {
            Some(key) => self.nat.get_cached(key).await,
            None => None,
        }
    }
}

fn parse_hex_key(hex_key: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_key)
        .map_err(|e| NetworkError::Configuration(format!("encryption.key is not valid hex: {e}")))?;
    bytes
        .try_into()
        .map(|arr: [u8; 32]| arr)
        .map_err(|_| NetworkError::Configuration("encryption.key must decode to 32 bytes".into()))
}
