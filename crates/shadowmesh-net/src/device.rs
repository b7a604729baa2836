//! Virtual network device adapter.
//!
//! Exposes a pair of bounded queues to the rest of the daemon: frames read
//! from the OS interface (device→daemon) and frames queued for injection
//! back into it (daemon→device). A single frame is one Ethernet frame,
//! bounded by the configured MTU (default 1500). Read/write failures on one
//! frame are logged and counted, never torn down — only a fatal condition
//! (the interface itself is gone) propagates and stops the daemon.

use crate::error::{DeviceError, NetworkError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::warn;

/// Default Ethernet MTU used when a daemon config does not override it.
pub const DEFAULT_MTU: usize = 1500;

/// Bounded capacity for the device's read/write queues, matching the
/// pipeline's default queue capacity.
pub const DEVICE_QUEUE_CAPACITY: usize = 100;

/// Host-facing configuration needed to bring a device up.
#[derive(Debug, Clone)]
pub struct DeviceParams {
    /// Interface name, e.g. `shadowmesh0`.
    pub name: String,
    /// CIDR-notation address assigned to the interface, e.g. `10.8.0.1/24`.
    pub cidr: String,
    /// Maximum frame size this device will read or accept for writing.
    pub mtu: usize,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self { name: "shadowmesh0".to_string(), cidr: "10.8.0.1/24".to_string(), mtu: DEFAULT_MTU }
    }
}

/// Counters for frames moved through a device adapter.
#[derive(Debug, Default)]
pub struct DeviceMetrics {
    frames_read: AtomicU64,
    frames_written: AtomicU64,
    read_errors: AtomicU64,
    write_errors: AtomicU64,
}

/// Point-in-time snapshot of [`DeviceMetrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceMetricsSnapshot {
    pub frames_read: u64,
    pub frames_written: u64,
    pub read_errors: u64,
    pub write_errors: u64,
}

impl DeviceMetrics {
    fn snapshot(&self) -> DeviceMetricsSnapshot {
        DeviceMetricsSnapshot {
            frames_read: self.frames_read.load(Ordering::Relaxed),
            frames_written: self.frames_written.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// A host-backed virtual network interface, abstracted so the daemon never
/// depends on a concrete OS binding directly.
///
/// A real implementation wraps an OS TUN/TAP handle; [`HostDevice`] is the
/// one this crate ships, backed by the `tun` crate. Tests use
/// [`memory_pair`] instead, which never touches the kernel.
#[async_trait::async_trait]
pub trait RawDevice: Send + Sync {
    /// Reads exactly one frame from the interface, blocking until one arrives.
    async fn read_frame(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
    /// Writes exactly one frame to the interface.
    async fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()>;
}

/// Host-backed `RawDevice` for real deployments, wrapping a configured
/// TUN interface.
#[cfg(unix)]
pub struct HostRawDevice {
    inner: tun::AsyncDevice,
}

#[cfg(unix)]
impl HostRawDevice {
    /// Creates and configures a TUN interface with the given name, CIDR
    /// address, and MTU, bringing it up immediately.
    pub fn create(params: &DeviceParams) -> Result<Self> {
        let (address, prefix) = params
            .cidr
            .split_once('/')
            .ok_or_else(|| NetworkError::Device(DeviceError::Fatal(format!("invalid CIDR: {}", params.cidr))))?;
        let netmask = prefix_to_netmask(prefix).ok_or_else(|| {
            NetworkError::Device(DeviceError::Fatal(format!("invalid CIDR prefix: {prefix}")))
        })?;

        let mut config = tun::Configuration::default();
        config
            .tun_name(&params.name)
            .address(address)
            .netmask(netmask)
            .mtu(params.mtu as i32)
            .up();

        let device = tun::create_as_async(&config)
            .map_err(|err| NetworkError::Device(DeviceError::Fatal(err.to_string())))?;
        Ok(Self { inner: device })
    }
}

#[cfg(unix)]
#[async_trait::async_trait]
impl RawDevice for HostRawDevice {
    async fn read_frame(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        use tokio::io::AsyncReadExt;
        self.inner.read(buf).await
    }

    async fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.inner.write_all(frame).await
    }
}

#[cfg(unix)]
fn prefix_to_netmask(prefix: &str) -> Option<std::net::Ipv4Addr> {
    let bits: u32 = prefix.parse().ok()?;
    if bits > 32 {
        return None;
    }
    let mask = if bits == 0 { 0 } else { u32::MAX << (32 - bits) };
    Some(std::net::Ipv4Addr::from(mask))
}

/// Runs the device's read and write loops and exposes bounded queues to the
/// rest of the daemon.
pub struct Device {
    params: DeviceParams,
    metrics: std::sync::Arc<DeviceMetrics>,
    to_daemon_rx: tokio::sync::Mutex<mpsc::Receiver<Vec<u8>>>,
    from_daemon_tx: mpsc::Sender<Vec<u8>>,
    io_task: tokio::task::JoinHandle<()>,
}

impl Device {
    /// Brings the device up: configures IP/netmask on the host interface
    /// (the `raw` handle is assumed already bound to it) and starts the
    /// read/write loop.
    pub fn up(params: DeviceParams, raw: Box<dyn RawDevice>) -> Self {
        Self::up_with_capacity(params, raw, DEVICE_QUEUE_CAPACITY)
    }

    /// Same as [`Device::up`] with an explicit queue capacity, for tests.
    pub fn up_with_capacity(params: DeviceParams, mut raw: Box<dyn RawDevice>, capacity: usize) -> Self {
        let metrics = std::sync::Arc::new(DeviceMetrics::default());
        let mtu = params.mtu;

        let (to_daemon_tx, to_daemon_rx) = mpsc::channel::<Vec<u8>>(capacity);
        let (from_daemon_tx, mut from_daemon_rx) = mpsc::channel::<Vec<u8>>(capacity);

        let io_metrics = metrics.clone();
        let io_task = tokio::spawn(async move {
            let mut buf = vec![0u8; mtu];
            loop {
                tokio::select! {
                    read_result = raw.read_frame(&mut buf) => {
                        match read_result {
                            Ok(n) => {
                                io_metrics.frames_read.fetch_add(1, Ordering::Relaxed);
                                if to_daemon_tx.try_send(buf[..n].to_vec()).is_err() {
                                    warn!("device read queue full; dropping frame");
                                }
                            }
                            Err(err) => {
                                io_metrics.read_errors.fetch_add(1, Ordering::Relaxed);
                                warn!(%err, "device read failed; continuing");
                            }
                        }
                    }
                    Some(frame) = from_daemon_rx.recv() => {
                        if frame.len() > mtu {
                            io_metrics.write_errors.fetch_add(1, Ordering::Relaxed);
                            warn!(len = frame.len(), mtu, "dropping frame exceeding device MTU");
                            continue;
                        }
                        match raw.write_frame(&frame).await {
                            Ok(()) => {
                                io_metrics.frames_written.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(err) => {
                                io_metrics.write_errors.fetch_add(1, Ordering::Relaxed);
                                warn!(%err, "device write failed; continuing");
                            }
                        }
                    }
                }
            }
        });

        Self { params, metrics, to_daemon_rx: tokio::sync::Mutex::new(to_daemon_rx), from_daemon_tx, io_task }
    }

    /// Interface name this device was brought up with.
    pub fn name(&self) -> &str {
        &self.params.name
    }

    /// CIDR address assigned to this device.
    pub fn local_ip(&self) -> &str {
        &self.params.cidr
    }

    /// Non-blocking submit of a frame to be written to the interface.
    pub fn send(&self, frame: Vec<u8>) -> Result<()> {
        if frame.len() > self.params.mtu {
            return Err(NetworkError::Device(DeviceError::FrameTooLarge { size: frame.len(), mtu: self.params.mtu }));
        }
        if self.from_daemon_tx.try_send(frame).is_err() {
            warn!("device write queue full; dropping frame");
        }
        Ok(())
    }

    /// Bounded-wait receive of the next frame read from the interface.
    pub async fn recv(&self, deadline: std::time::Duration) -> Option<Vec<u8>> {
        let mut rx = self.to_daemon_rx.lock().await;
        tokio::time::timeout(deadline, rx.recv()).await.ok().flatten()
    }

    /// Returns a snapshot of this device's read/write counters.
    pub fn metrics(&self) -> DeviceMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Tears the device down: stops the read/write loops. The caller is
    /// responsible for releasing the underlying OS handle (dropping the
    /// `RawDevice` it was constructed from).
    pub fn down(&self) {
        self.io_task.abort();
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.down();
    }
}

/// An in-memory device pair used in tests: writes to one end arrive as
/// reads on the other, with no kernel interaction.
pub mod memory {
    use super::RawDevice;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    /// One end of an in-memory loopback device pair.
    pub struct MemoryRawDevice {
        inbound: mpsc::Receiver<Vec<u8>>,
        outbound: mpsc::Sender<Vec<u8>>,
    }

    #[async_trait]
    impl RawDevice for MemoryRawDevice {
        async fn read_frame(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.inbound.recv().await {
                Some(frame) => {
                    let n = frame.len().min(buf.len());
                    buf[..n].copy_from_slice(&frame[..n]);
                    Ok(n)
                }
                None => Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer dropped")),
            }
        }

        async fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()> {
            self.outbound.send(frame.to_vec()).await.map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer dropped")
            })
        }
    }

    /// Creates a connected pair of raw devices, where a frame sent into one
    /// side's `write_frame` is delivered to the other side's `read_frame`.
    pub fn pair() -> (MemoryRawDevice, MemoryRawDevice) {
        let (tx_a, rx_a) = mpsc::channel(100);
        let (tx_b, rx_b) = mpsc::channel(100);
        (MemoryRawDevice { inbound: rx_a, outbound: tx_b }, MemoryRawDevice { inbound: rx_b, outbound: tx_a })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn frames_read_from_raw_device_are_observable() {
        let (mut host_side, test_side) = memory::pair();
        let device = Device::up(DeviceParams::default(), Box::new(test_side));

        host_side.write_frame(b"ethernet frame").await.unwrap();
        let received = device.recv(Duration::from_secs(1)).await;
        assert_eq!(received, Some(b"ethernet frame".to_vec()));
        assert_eq!(device.metrics().frames_read, 1);
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected_at_send() {
        let (_host_side, test_side) = memory::pair();
        let device = Device::up(DeviceParams { mtu: 100, ..Default::default() }, Box::new(test_side));
        let oversized = vec![0u8; 200];
        let result = device.send(oversized);
        assert!(matches!(result, Err(NetworkError::Device(DeviceError::FrameTooLarge { .. }))));
    }

    #[tokio::test]
    async fn recv_times_out_when_no_frame_arrives() {
        let (_host_side, test_side) = memory::pair();
        let device = Device::up(DeviceParams::default(), Box::new(test_side));
        let received = device.recv(Duration::from_millis(50)).await;
        assert!(received.is_none());
    }
}
