//! Error types for vision-bridge.
//!
//! Every failure that can reach the host crosses the boundary as the
//! `Display` text of a [`BridgeError`] variant, so these messages are the
//! diagnostics the host application surfaces, logs, or retries on.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for vision-bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur at the inference boundary.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Model file missing or unreadable.
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// Tokenizer file missing or unreadable.
    #[error("tokenizer file not found: {}", .0.display())]
    TokenizerNotFound(PathBuf),

    /// Preset name not recognized by the engine.
    #[error("unknown preset \"{name}\" (expected one of: {known})")]
    UnknownPreset { name: String, known: String },

    /// Engine failed to initialize the model or tokenizer.
    #[error("model initialization failed: {0}")]
    ModelInit(String),

    /// Engine failed while executing inference.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Input buffer length does not match the declared geometry.
    #[error("input size mismatch: expected {expected}, got {actual}")]
    InputSizeMismatch { expected: i64, actual: i64 },

    /// Frame geometry is not a valid image shape.
    #[error("invalid frame geometry: {0}")]
    InvalidGeometry(String),

    /// An operation requiring an active handle received a null one.
    #[error("null model handle")]
    NullHandle,

    /// Two calls raced on the same handle.
    #[error("model handle is busy: a single handle serves one call at a time")]
    HandleBusy,

    /// A string argument was null or not valid UTF-8.
    #[error("invalid string argument: {0}")]
    InvalidArgument(String),

    /// A panic was caught at the boundary.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error while probing model resources.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Create a model initialization error.
    pub fn model_init(msg: impl Into<String>) -> Self {
        Self::ModelInit(msg.into())
    }

    /// Create an inference execution error.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an internal (caught panic) error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
