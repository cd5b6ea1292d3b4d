//! # Error Types
//!
//! Custom error types for the ground-station core using `thiserror`.
//!
//! Parse failures are deliberately absent from this enum: a malformed token
//! or non-telemetry line is skipped at the parser level and never surfaces
//! as an error (see `frame::parser`).

use thiserror::Error;

/// Main error type for the ground-station core
#[derive(Debug, Error)]
pub enum GroundError {
    /// Serial device open/read/close failures
    #[error("transport error: {0}")]
    Transport(String),

    /// Requested baud rate is not in the supported set
    #[error("unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Launch record serialization errors
    #[error("record serialization error: {0}")]
    Record(#[from] serde_json::Error),
}

/// Result type alias for the ground-station core
pub type Result<T> = std::result::Result<T, GroundError>;
