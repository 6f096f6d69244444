//! Error types for Segline.

use thiserror::Error;

/// Main error type for Segline operations.
///
/// Most engine operations recover locally (filtering, clamping, degrading to an
/// empty document), so only I/O-facing surfaces and media buffers produce these.
#[derive(Error, Debug)]
pub enum SeglineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for Segline operations.
pub type Result<T> = std::result::Result<T, SeglineError>;
