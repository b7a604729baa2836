//! Pipeline counters: monotonic, reset only when the pipeline is recreated.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Snapshot of a [`super::Pipeline`]'s counters at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct PipelineMetricsSnapshot {
    pub frames_encrypted: u64,
    pub frames_decrypted: u64,
    pub dropped_backpressure: u64,
    pub dropped_bad_tag: u64,
    pub uptime_secs: u64,
    pub queue_capacity: usize,
}

/// Atomic counters backing a running pipeline, cheap to update from any worker task.
#[derive(Debug)]
pub struct PipelineMetrics {
    frames_encrypted: AtomicU64,
    frames_decrypted: AtomicU64,
    dropped_backpressure: AtomicU64,
    dropped_bad_tag: AtomicU64,
    started_at: Instant,
    queue_capacity: usize,
}

impl PipelineMetrics {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            frames_encrypted: AtomicU64::new(0),
            frames_decrypted: AtomicU64::new(0),
            dropped_backpressure: AtomicU64::new(0),
            dropped_bad_tag: AtomicU64::new(0),
            started_at: Instant::now(),
            queue_capacity,
        }
    }

    pub fn record_encrypted(&self) {
        self.frames_encrypted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decrypted(&self) {
        self.frames_decrypted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped_backpressure(&self) {
        self.dropped_backpressure.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped_bad_tag(&self) {
        self.dropped_bad_tag.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PipelineMetricsSnapshot {
        PipelineMetricsSnapshot {
            frames_encrypted: self.frames_encrypted.load(Ordering::Relaxed),
            frames_decrypted: self.frames_decrypted.load(Ordering::Relaxed),
            dropped_backpressure: self.dropped_backpressure.load(Ordering::Relaxed),
            dropped_bad_tag: self.dropped_bad_tag.load(Ordering::Relaxed),
            uptime_secs: self.started_at.elapsed().as_secs(),
            queue_capacity: self.queue_capacity,
        }
    }
}
