//! Error handling types shared across the shadowmesh workspace.
//!
//! This module provides the top-level error enum used by `shadowmesh-core`
//! itself (configuration loading, trait default impls). Crates further up
//! the stack (`shadowmesh-net`, `shadowmesh-daemon`) define their own nested
//! error enums and convert into or wrap this one where useful.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// The top-level error type for shadowmesh.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowMeshError {
    /// Configuration related errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network related errors
    #[error("network error: {0}")]
    Network(String),

    /// Cryptographic operation errors
    #[error("cryptographic error: {0}")]
    Cryptographic(String),

    /// Storage/persistence errors
    #[error("storage error: {0}")]
    Storage(String),

    /// Authentication/authorization errors
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Invalid input parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Operation not permitted
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Timeout errors
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Internal system errors
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Generic application errors with context
    #[error("application error: {message} (context: {context})")]
    Application {
        /// Error message
        message: String,
        /// Error context
        context: String,
    },
}

impl ShadowMeshError {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Create a new network error
    pub fn network<T: fmt::Display>(msg: T) -> Self {
        Self::Network(msg.to_string())
    }

    /// Create a new cryptographic error
    pub fn crypto<T: fmt::Display>(msg: T) -> Self {
        Self::Cryptographic(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Self::Storage(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Self::Authentication(msg.to_string())
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Self::InvalidInput(msg.to_string())
    }

    /// Create a new not found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Self::NotFound(msg.to_string())
    }

    /// Create a new permission denied error
    pub fn permission_denied<T: fmt::Display>(msg: T) -> Self {
        Self::PermissionDenied(msg.to_string())
    }

    /// Create a new timeout error
    pub fn timeout<T: fmt::Display>(msg: T) -> Self {
        Self::Timeout(msg.to_string())
    }

    /// Create a new internal error
    pub fn internal<T: fmt::Display>(msg: T) -> Self {
        Self::Internal(msg.to_string())
    }

    /// Create a new serialization error
    pub fn serialization<T: fmt::Display>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Create a new application error with context
    pub fn application<T: fmt::Display, U: fmt::Display>(message: T, context: U) -> Self {
        Self::Application {
            message: message.to_string(),
            context: context.to_string(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::Internal(_))
    }

    /// Check if this error is a client error (4xx-style)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::NotFound(_) | Self::PermissionDenied(_) | Self::Authentication(_)
        )
    }

    /// Check if this error is a server error (5xx-style)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::Storage(_) | Self::Configuration(_))
    }
}

/// Result type alias for shadowmesh operations
pub type ShadowMeshResult<T> = Result<T, ShadowMeshError>;

// Standard error conversions
impl From<std::io::Error> for ShadowMeshError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ShadowMeshError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ShadowMeshError {
    fn from(err: toml::de::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
