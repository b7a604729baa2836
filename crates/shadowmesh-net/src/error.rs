//! Error types for the shadowmesh networking layer.

use std::fmt;
use thiserror::Error;

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Main error type for shadowmesh networking operations.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Transport-related errors
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Cryptography and handshake errors
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// Virtual network device errors
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection errors
    #[error("connection error: {0}")]
    Connection(String),

    /// Protocol framing errors
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// Mock-related errors (for testing)
    #[error("mock error: {0}")]
    Mock(String),
}

/// Transport-specific errors.
#[derive(Error, Debug)]
pub enum TransportError {
    /// TCP stream failure
    #[error("TCP error: {0}")]
    Tcp(String),

    /// Connection attempt failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection timed out
    #[error("connection timeout")]
    Timeout,

    /// Connection was not yet established
    #[error("not connected: {0}")]
    NotConnected(String),

    /// Peer/local address could not be parsed
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A frame's declared length violated the wire contract
    #[error("invalid frame length: {0}")]
    InvalidFrameLength(usize),
}

/// Security-specific errors (crypto, handshake, keystore).
#[derive(Error, Debug)]
pub enum SecurityError {
    /// AEAD encryption failed
    #[error("encryption error: {0}")]
    Encryption(String),

    /// AEAD decryption or tag verification failed
    #[error("decryption error: {0}")]
    Decryption(String),

    /// KEM decapsulation failed (malformed or tampered ciphertext)
    #[error("decapsulation failed: {0}")]
    DecapsulationFailed(String),

    /// Key or keypair bytes were malformed
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Handshake message arrived with a timestamp outside the allowed skew
    #[error("stale handshake: {0}")]
    StaleHandshake(String),

    /// A dual signature (classical + post-quantum) failed verification
    #[error("signature rejected: {0}")]
    SignatureRejected(String),

    /// A handshake proof (HMAC-based key-confirmation) failed verification
    #[error("proof rejected: {0}")]
    ProofRejected(String),

    /// Handshake reached an unexpected message for its current state
    #[error("unexpected handshake message: {0}")]
    UnexpectedMessage(String),

    /// Nonce counter space exhausted; session must be rekeyed
    #[error("nonce space exhausted")]
    NonceExhausted,

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Keystore passphrase did not decrypt the stored keypair
    #[error("wrong passphrase")]
    WrongPassphrase,

    /// Serialization error while encoding/decoding crypto material
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Virtual network device errors.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Underlying OS device I/O failed but the device may still be usable
    #[error("transient device I/O error: {0}")]
    Transient(String),

    /// The device is unusable and must be recreated
    #[error("fatal device error: {0}")]
    Fatal(String),

    /// Frame exceeded the configured MTU
    #[error("frame exceeds MTU ({size} > {mtu})")]
    FrameTooLarge {
        /// Offending frame size in bytes
        size: usize,
        /// Configured MTU in bytes
        mtu: usize,
    },
}

impl NetworkError {
    /// Returns the severity of this error for observability purposes.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            NetworkError::Security(_) => ErrorSeverity::Critical,
            NetworkError::Device(DeviceError::Fatal(_)) => ErrorSeverity::Critical,
            NetworkError::Device(_) => ErrorSeverity::Major,
            NetworkError::Transport(TransportError::Timeout) => ErrorSeverity::Minor,
            NetworkError::Transport(_) => ErrorSeverity::Major,
            NetworkError::Configuration(_) => ErrorSeverity::Critical,
            NetworkError::Connection(_) => ErrorSeverity::Major,
            NetworkError::Protocol(_) => ErrorSeverity::Major,
            NetworkError::Io(_) => ErrorSeverity::Major,
            NetworkError::Other(_) => ErrorSeverity::Major,
            NetworkError::Mock(_) => ErrorSeverity::Minor,
        }
    }

    /// Returns an observable error type that doesn't leak sensitive information.
    pub fn observable_type(&self) -> &'static str {
        match self {
            NetworkError::Transport(_) => "transport",
            NetworkError::Security(_) => "security",
            NetworkError::Device(_) => "device",
            NetworkError::Configuration(_) => "configuration",
            NetworkError::Connection(_) => "connection",
            NetworkError::Protocol(_) => "protocol",
            NetworkError::Io(_) => "io",
            NetworkError::Other(_) => "other",
            NetworkError::Mock(_) => "mock",
        }
    }

    /// Classifies the error for metrics without revealing details.
    pub fn classify(&self) -> ErrorClass {
        match self {
            NetworkError::Transport(TransportError::Timeout) => ErrorClass::Timeout,
            NetworkError::Transport(TransportError::ConnectionFailed(_)) => ErrorClass::ConnectionFailure,
            NetworkError::Security(SecurityError::SignatureRejected(_) | SecurityError::ProofRejected(_)) => {
                ErrorClass::AuthFailure
            }
            NetworkError::Configuration(_) => ErrorClass::ConfigError,
            _ => ErrorClass::Other,
        }
    }
}

/// Error severity levels for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical errors that require immediate attention
    Critical,
    /// Major errors that impact functionality
    Major,
    /// Minor errors that can be recovered from
    Minor,
}

/// Error classification for metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorClass {
    /// Connection timeout
    Timeout,
    /// Connection failure
    ConnectionFailure,
    /// Authentication failure
    AuthFailure,
    /// Configuration error
    ConfigError,
    /// Other error
    Other,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::Timeout => write!(f, "timeout"),
            ErrorClass::ConnectionFailure => write!(f, "connection_failure"),
            ErrorClass::AuthFailure => write!(f, "auth_failure"),
            ErrorClass::ConfigError => write!(f, "config_error"),
            ErrorClass::Other => write!(f, "other"),
        }
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::Security(SecurityError::Serialization(err.to_string()))
    }
}

impl From<std::time::SystemTimeError> for NetworkError {
    fn from(err: std::time::SystemTimeError) -> Self {
        NetworkError::Other(anyhow::anyhow!("system time error: {err}"))
    }
}
