//! Error types for the Drape simulator.
//!
//! All crates return `DrapeResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Drape simulator.
#[derive(Debug, Error)]
pub enum DrapeError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid or unrecognized.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, DrapeError>`.
pub type DrapeResult<T> = Result<T, DrapeError>;
