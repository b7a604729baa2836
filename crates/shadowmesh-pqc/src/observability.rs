//! Observability helpers for cryptographic operations.
//!
//! Tracks lightweight counters and durations for key generation, encryption,
//! signing, and verification, and forwards events to `tracing` when the
//! `observability` feature is enabled.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Crypto operation events
#[derive(Debug, Clone)]
pub enum CryptoEvent {
    /// Key generation started
    KeyGenStarted { algorithm: String },
    /// Key generation completed
    KeyGenCompleted { algorithm: String, duration: Duration },
    /// Encryption operation
    EncryptionPerformed { algorithm: String, data_size: usize, duration: Duration },
    /// Decryption operation
    DecryptionPerformed { algorithm: String, data_size: usize, duration: Duration },
    /// Signing operation
    SigningPerformed { algorithm: String, data_size: usize, duration: Duration },
    /// Verification operation
    VerificationPerformed { algorithm: String, success: bool, duration: Duration },
    /// Error occurred
    ErrorOccurred { operation: String, error: String },
}

/// Crypto performance metrics
#[derive(Debug, Clone, Default)]
pub struct CryptoMetrics {
    /// Total operations performed
    pub total_operations: u64,
    /// Failed operations
    pub failed_operations: u64,
    /// Average operation duration
    pub avg_duration_ms: f64,
    /// Key generations performed
    pub key_generations: u64,
    /// Encryptions performed
    pub encryptions: u64,
    /// Decryptions performed
    pub decryptions: u64,
    /// Signatures created
    pub signatures: u64,
    /// Verifications performed
    pub verifications: u64,
}

/// Observability context for crypto operations
pub struct CryptoObservability {
    component: String,
    metrics: Arc<RwLock<CryptoMetrics>>,
}

impl CryptoObservability {
    /// Create a new observability context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            metrics: Arc::new(RwLock::new(CryptoMetrics::default())),
        }
    }

    /// Record a crypto operation
    pub fn record_operation(&self, event: CryptoEvent) {
        let mut metrics = self.metrics.write().expect("metrics lock poisoned");
        metrics.total_operations += 1;

        match &event {
            CryptoEvent::KeyGenCompleted { duration, .. } => {
                metrics.key_generations += 1;
                Self::update_avg_duration(&mut metrics, duration);
            }
            CryptoEvent::EncryptionPerformed { duration, .. } => {
                metrics.encryptions += 1;
                Self::update_avg_duration(&mut metrics, duration);
            }
            CryptoEvent::DecryptionPerformed { duration, .. } => {
                metrics.decryptions += 1;
                Self::update_avg_duration(&mut metrics, duration);
            }
            CryptoEvent::SigningPerformed { duration, .. } => {
                metrics.signatures += 1;
                Self::update_avg_duration(&mut metrics, duration);
            }
            CryptoEvent::VerificationPerformed { duration, success, .. } => {
                metrics.verifications += 1;
                if !success {
                    metrics.failed_operations += 1;
                }
                Self::update_avg_duration(&mut metrics, duration);
            }
            CryptoEvent::ErrorOccurred { .. } => {
                metrics.failed_operations += 1;
            }
        }
        drop(metrics);

        #[cfg(feature = "observability")]
        match &event {
            CryptoEvent::KeyGenStarted { algorithm } => {
                tracing::debug!(component = %self.component, %algorithm, "key generation started");
            }
            CryptoEvent::ErrorOccurred { operation, error } => {
                tracing::error!(component = %self.component, %operation, %error, "crypto operation failed");
            }
            other => {
                tracing::trace!(component = %self.component, event = ?other, "crypto event");
            }
        }
        #[cfg(not(feature = "observability"))]
        let _ = &event;
    }

    /// Start timing an operation
    pub fn start_operation(&self, operation: &str) -> OperationTimer<'_> {
        OperationTimer {
            operation: operation.to_string(),
            start: Instant::now(),
            observability: self,
        }
    }

    /// Get current metrics
    pub fn get_metrics(&self) -> CryptoMetrics {
        self.metrics.read().expect("metrics lock poisoned").clone()
    }

    fn update_avg_duration(metrics: &mut CryptoMetrics, duration: &Duration) {
        let new_duration_ms = duration.as_secs_f64() * 1000.0;
        if metrics.total_operations == 1 {
            metrics.avg_duration_ms = new_duration_ms;
        } else {
            let total = metrics.avg_duration_ms * (metrics.total_operations - 1) as f64;
            metrics.avg_duration_ms = (total + new_duration_ms) / metrics.total_operations as f64;
        }
    }
}

/// Timer for measuring operation duration
pub struct OperationTimer<'a> {
    operation: String,
    start: Instant,
    observability: &'a CryptoObservability,
}

impl<'a> OperationTimer<'a> {
    /// Complete the operation successfully
    pub fn complete(self, event_type: impl FnOnce(Duration) -> CryptoEvent) {
        let duration = self.start.elapsed();
        self.observability.record_operation(event_type(duration));
    }

    /// Mark the operation as failed
    pub fn failed(self, error: String) {
        self.observability.record_operation(CryptoEvent::ErrorOccurred {
            operation: self.operation,
            error,
        });
    }
}
