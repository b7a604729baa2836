//! The bounded-queue encrypt/decrypt pipeline that sits between the virtual
//! network device and the transport.
//!
//! Four bounded queues connect two worker tasks (encrypt, decrypt) to their
//! producers and consumers. Producers never block: a full queue counts as a
//! drop rather than stalling the caller. Consumers wait up to a fixed
//! deadline. Authentication failure in the decrypt stage is absorbed and
//! counted — it never tears the pipeline down.

pub mod metrics;

use crate::crypto::nonce::NonceGenerator;
use crate::crypto::primitives::{aead_open, aead_seal};
use crate::crypto::session::SessionKeys;
pub use metrics::{PipelineMetrics, PipelineMetricsSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default bounded capacity for each of the pipeline's four queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Deadline a consumer waits for the next queue item before looping back to
/// check for cancellation.
pub const CONSUMER_WAIT: Duration = Duration::from_millis(100);

/// One sealed frame as carried between the encrypt stage and the transport
/// (and, inbound, between the transport and the decrypt stage).
#[derive(Debug, Clone)]
pub struct EncryptedFrame {
    pub nonce: [u8; 12],
    pub ciphertext: Vec<u8>,
}

struct KeyState {
    tx: [u8; 32],
    rx: [u8; 32],
    tx_nonces: NonceGenerator,
}

impl KeyState {
    fn from_session(keys: &SessionKeys) -> Self {
        Self { tx: keys.tx, rx: keys.rx, tx_nonces: NonceGenerator::new() }
    }
}

/// The running encrypt/decrypt pipeline for one active session.
pub struct Pipeline {
    keys: Arc<RwLock<KeyState>>,
    metrics: Arc<PipelineMetrics>,
    inbound_plain_tx: mpsc::Sender<Vec<u8>>,
    outbound_cipher_rx: tokio::sync::Mutex<mpsc::Receiver<EncryptedFrame>>,
    inbound_cipher_tx: mpsc::Sender<EncryptedFrame>,
    outbound_plain_rx: tokio::sync::Mutex<mpsc::Receiver<Vec<u8>>>,
    workers: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl Pipeline {
    /// Starts a new pipeline for `keys`, spawning its encrypt and decrypt workers.
    pub fn start(keys: SessionKeys) -> Arc<Self> {
        Self::start_with_capacity(keys, DEFAULT_QUEUE_CAPACITY)
    }

    /// Starts a new pipeline with an explicit queue capacity, for tests that
    /// need to exercise backpressure directly.
    pub fn start_with_capacity(keys: SessionKeys, capacity: usize) -> Arc<Self> {
        let key_state = Arc::new(RwLock::new(KeyState::from_session(&keys)));
        let metrics = Arc::new(PipelineMetrics::new(capacity));

        let (inbound_plain_tx, inbound_plain_rx) = mpsc::channel::<Vec<u8>>(capacity);
        let (outbound_cipher_tx, outbound_cipher_rx) = mpsc::channel::<EncryptedFrame>(capacity);
        let (inbound_cipher_tx, inbound_cipher_rx) = mpsc::channel::<EncryptedFrame>(capacity);
        let (outbound_plain_tx, outbound_plain_rx) = mpsc::channel::<Vec<u8>>(capacity);

        let pipeline = Arc::new(Self {
            keys: key_state,
            metrics,
            inbound_plain_tx,
            outbound_cipher_rx: tokio::sync::Mutex::new(outbound_cipher_rx),
            inbound_cipher_tx,
            outbound_plain_rx: tokio::sync::Mutex::new(outbound_plain_rx),
            workers: std::sync::Mutex::new(Vec::new()),
        });

        let encrypt_handle = tokio::spawn(run_encrypt_stage(
            Arc::clone(&pipeline.keys),
            Arc::clone(&pipeline.metrics),
            inbound_plain_rx,
            outbound_cipher_tx,
        ));
        let decrypt_handle = tokio::spawn(run_decrypt_stage(
            Arc::clone(&pipeline.keys),
            Arc::clone(&pipeline.metrics),
            inbound_cipher_rx,
            outbound_plain_tx,
        ));
        pipeline.workers.lock().unwrap().extend([encrypt_handle, decrypt_handle]);

        pipeline
    }

    /// Non-blocking submit of a plaintext frame for encryption. Drops (and
    /// counts) the frame if `inbound_plain` is full.
    pub fn send_plain(&self, frame: Vec<u8>) {
        if self.inbound_plain_tx.try_send(frame).is_err() {
            self.metrics.record_dropped_backpressure();
        }
    }

    /// Non-blocking submit of a received ciphertext for decryption. Drops
    /// (and counts) the frame if `inbound_cipher` is full.
    pub fn send_cipher(&self, frame: EncryptedFrame) {
        if self.inbound_cipher_tx.try_send(frame).is_err() {
            self.metrics.record_dropped_backpressure();
        }
    }

    /// Bounded-wait receive of the next sealed frame ready for transport.
    /// Returns `None` on timeout; callers loop back to check cancellation.
    pub async fn recv_cipher(&self) -> Option<EncryptedFrame> {
        let mut rx = self.outbound_cipher_rx.lock().await;
        tokio::time::timeout(CONSUMER_WAIT, rx.recv()).await.ok().flatten()
    }

    /// Bounded-wait receive of the next decrypted frame ready for the device.
    /// Returns `None` on timeout.
    pub async fn recv_plain(&self) -> Option<Vec<u8>> {
        let mut rx = self.outbound_plain_rx.lock().await;
        tokio::time::timeout(CONSUMER_WAIT, rx.recv()).await.ok().flatten()
    }

    /// Atomically replaces the (tx, rx, nonce generator) triple. At most one
    /// frame already mid-flight under the old triple may be lost.
    pub async fn rotate_keys(&self, keys: &SessionKeys) {
        let mut guard = self.keys.write().await;
        *guard = KeyState::from_session(keys);
    }

    /// Returns a snapshot of the pipeline's counters.
    pub fn metrics(&self) -> PipelineMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Stops the worker tasks. Callers must not call `send_plain`/`send_cipher`
    /// after this returns.
    pub fn stop(&self) {
        for handle in self.workers.lock().unwrap().drain(..) {
            handle.abort();
        }
    }
}

async fn run_encrypt_stage(
    keys: Arc<RwLock<KeyState>>,
    metrics: Arc<PipelineMetrics>,
    mut inbound_plain: mpsc::Receiver<Vec<u8>>,
    outbound_cipher: mpsc::Sender<EncryptedFrame>,
) {
    while let Some(frame) = inbound_plain.recv().await {
        let sealed = {
            let guard = keys.read().await;
            let nonce = match guard.tx_nonces.next() {
                Ok(n) => n,
                Err(err) => {
                    warn!(?err, "nonce space exhausted; dropping frame");
                    metrics.record_dropped_bad_tag();
                    continue;
                }
            };
            match aead_seal(&guard.tx, &nonce, &[], &frame) {
                Ok(ciphertext) => EncryptedFrame { nonce, ciphertext },
                Err(err) => {
                    warn!(?err, "encryption failed; dropping frame");
                    metrics.record_dropped_bad_tag();
                    continue;
                }
            }
        };
        metrics.record_encrypted();
        if outbound_cipher.try_send(sealed).is_err() {
            metrics.record_dropped_backpressure();
        }
    }
}

async fn run_decrypt_stage(
    keys: Arc<RwLock<KeyState>>,
    metrics: Arc<PipelineMetrics>,
    mut inbound_cipher: mpsc::Receiver<EncryptedFrame>,
    outbound_plain: mpsc::Sender<Vec<u8>>,
) {
    while let Some(frame) = inbound_cipher.recv().await {
        let opened = {
            let guard = keys.read().await;
            aead_open(&guard.rx, &frame.nonce, &[], &frame.ciphertext)
        };
        match opened {
            Ok(plaintext) => {
                metrics.record_decrypted();
                if outbound_plain.try_send(plaintext).is_err() {
                    metrics.record_dropped_backpressure();
                }
            }
            Err(_) => {
                debug!("dropping frame with invalid authentication tag");
                metrics.record_dropped_bad_tag();
            }
        }
    }
}
