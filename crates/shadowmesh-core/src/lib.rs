//! # shadowmesh-core
//!
//! Foundational traits, configuration plumbing, and error types shared by
//! every crate in the shadowmesh workspace.
//!
//! ## Features
//!
//! - **Error Handling**: Standardized error types and result aliases
//! - **Configuration**: Layered configuration loading (file + environment)
//! - **Observability**: `tracing` setup plus health/status vocabulary
//!
//! ## Quick Start
//!
//! ```rust
//! use shadowmesh_core::{ShadowMeshResult, ShadowMeshError};
//!
//! fn example_function() -> ShadowMeshResult<String> {
//!     Ok("hello shadowmesh".to_string())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod observability;
pub mod traits;

// Re-export commonly used items
pub use error::{ShadowMeshError, ShadowMeshResult};
pub use traits::{Configurable, Identifiable, Observable, Validatable};

/// Version information for the shadowmesh-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the shadowmesh-core library
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "shadowmesh-core");
    }

    #[test]
    fn test_error_result_types() {
        let success: ShadowMeshResult<i32> = Ok(42);
        assert!(success.is_ok());
        assert_eq!(success.unwrap(), 42);

        let error: ShadowMeshResult<i32> = Err(ShadowMeshError::InvalidInput("test error".to_string()));
        assert!(error.is_err());
    }
}