//! shadowmeshd: the process entry point. Loads configuration, loads or
//! generates the local identity, brings the virtual device up, and serves
//! the control API alongside the transport accept loop.

use clap::Parser;
use shadowmesh_daemon::control_api::{self, ApiState};
use shadowmesh_daemon::manager::DaemonManager;
use shadowmesh_net::config::ShadowMeshConfig;
use shadowmesh_net::crypto::keypair::HybridKeypair;
use shadowmesh_net::crypto::keystore::{self, KeystoreRecord};
use shadowmesh_net::device::RawDevice;
use shadowmesh_net::transport::{Listener, TcpTransport, Transport};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// shadowmesh peer daemon.
#[derive(Parser, Debug)]
#[command(name = "shadowmeshd", version, about)]
struct Args {
    /// Path to a TOML configuration file. Falls back to defaults if unset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the encrypted identity keystore.
    #[arg(long, default_value = "shadowmesh-identity.json")]
    identity: PathBuf,

    /// Passphrase used to decrypt (or, on first run, encrypt) the identity
    /// keystore. Read from SHADOWMESH_PASSPHRASE if unset.
    #[arg(long)]
    passphrase: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    shadowmesh_net::crypto::init_crypto().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ShadowMeshConfig>(&contents)?
        }
        None => ShadowMeshConfig::default(),
    };
    config.validate().map_err(anyhow::Error::msg)?;

    let passphrase = args
        .passphrase
        .clone()
        .or_else(|| std::env::var("SHADOWMESH_PASSPHRASE").ok())
        .ok_or_else(|| anyhow::anyhow!("no identity passphrase: pass --passphrase or set SHADOWMESH_PASSPHRASE"))?;
    let identity = Arc::new(load_or_create_identity(&args.identity, &passphrase)?);
    tracing::info!(peer_id = %hex::encode(identity.peer_id()), "identity loaded");

    let manager = Arc::new(DaemonManager::new(config.clone(), Arc::clone(&identity)));

    let raw_device = build_raw_device(&config)?;
    manager.start(raw_device).await.map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let api_state = ApiState { manager: Arc::clone(&manager) };
    let listen_address = config.daemon.listen_address;
    let control_api = tokio::spawn(async move {
        if let Err(err) = control_api::serve(listen_address, api_state).await {
            tracing::error!(%err, "control API stopped");
        }
    });

    let transport = TcpTransport;
    let mut listener = transport
        .listen(config.daemon.listen_address)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let accept_loop = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((connection, peer_addr)) => {
                        tracing::info!(%peer_addr, "inbound connection");
                        let manager = Arc::clone(&manager);
                        tokio::spawn(async move {
                            if let Err(err) = manager.accept(connection).await {
                                tracing::warn!(%err, "inbound handshake failed");
                            }
                        });
                    }
                    Err(err) => {
                        tracing::error!(%err, "accept loop stopped");
                        return;
                    }
                }
            }
        })
    };

    shutdown_signal().await;
    tracing::info!("shutdown requested");
    control_api.abort();
    accept_loop.abort();
    Ok(())
}

#[cfg(unix)]
fn build_raw_device(config: &ShadowMeshConfig) -> anyhow::Result<Box<dyn RawDevice>> {
    use shadowmesh_net::device::{DeviceParams, HostRawDevice};
    let params = DeviceParams {
        name: config.network.tap_device.clone(),
        cidr: config.network.local_ip.clone(),
        mtu: config.network.mtu,
    };
    Ok(Box::new(HostRawDevice::create(&params).map_err(|e| anyhow::anyhow!(e.to_string()))?))
}

#[cfg(not(unix))]
fn build_raw_device(_config: &ShadowMeshConfig) -> anyhow::Result<Box<dyn RawDevice>> {
    anyhow::bail!("no virtual network device backend is available on this platform")
}

fn load_or_create_identity(path: &PathBuf, passphrase: &str) -> anyhow::Result<HybridKeypair> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let record: KeystoreRecord = serde_json::from_str(&contents)?;
        Ok(keystore::load_keypair(&record, passphrase).map_err(|e| anyhow::anyhow!(e.to_string()))?)
    } else {
        let keypair = HybridKeypair::generate().map_err(|e| anyhow::anyhow!(e.to_string()))?;
        let record = keystore::save_keypair(&keypair, passphrase).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
        tracing::info!(path = %path.display(), "generated new identity keystore");
        Ok(keypair)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
