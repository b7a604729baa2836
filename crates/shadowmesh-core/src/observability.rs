//! Lightweight observability helpers shared across the shadowmesh workspace.
//!
//! Unlike the broader Synapsed lineage this crate grew out of, shadowmesh
//! does not carry a custom substrates/serventis circuit-tracing layer;
//! structured logging goes straight through `tracing`. This module only
//! adds the one piece every binary and integration test needs on top: a
//! one-time subscriber installer. The status/health vocabulary itself
//! lives on [`crate::traits::Observable`].

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Installs a global `tracing` subscriber reading `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; only the first call takes effect, which
/// matters because both the daemon binary and integration tests call it.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
