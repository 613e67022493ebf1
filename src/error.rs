//! # Error Types
//!
//! Custom error types for CRSF RX using `thiserror`.

use thiserror::Error;

/// Main error type for CRSF RX
#[derive(Debug, Error)]
pub enum CrsfRxError {
    /// CRSF protocol errors
    #[error("CRSF protocol error: {0}")]
    CrsfProtocol(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// No receiver found on any candidate path
    #[error("No CRSF receiver found (tried: {0})")]
    SerialPortNotFound(String),

    /// Telemetry record serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for CRSF RX
pub type Result<T> = std::result::Result<T, CrsfRxError>;
