//! Error types shared across FocusFlow crates.

use std::path::PathBuf;

/// Top-level error type for FocusFlow operations.
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    /// The landmark engine could not be brought up. Fatal for the session.
    #[error("Landmark engine failed to initialize: {message}")]
    EngineInit { message: String },

    /// A single submission to the landmark source failed.
    #[error("Landmark source error: {message}")]
    Source { message: String },

    #[error("Replay error: {message}")]
    Replay { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FocusError.
pub type FocusResult<T> = Result<T, FocusError>;

impl FocusError {
    pub fn engine_init(msg: impl Into<String>) -> Self {
        Self::EngineInit {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn replay(msg: impl Into<String>) -> Self {
        Self::Replay {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error should stop the session rather than skip a tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EngineInit { .. })
    }
}
