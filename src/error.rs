//! Engine error types.
//!
//! Almost nothing in the engine can fail: the simulation runs on state it
//! generated itself. The errors here cover the host boundary (no surface to
//! draw on) and bad tuning documents.

use std::fmt;

/// Top-level error enum for the engine.
#[derive(Debug)]
pub enum EngineError {
    /// The host could not provide a drawing surface at activation.
    SurfaceUnavailable {
        /// What was missing (canvas element, 2D context, container, ...).
        reason: &'static str,
    },

    /// A tuning parameter is outside the range the simulation supports.
    InvalidTuning {
        /// Field name, as it appears in the JSON document.
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Human-readable description of the legal range.
        expected: &'static str,
    },

    /// A tuning document could not be parsed.
    Config(serde_json::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SurfaceUnavailable { reason } => {
                write!(f, "drawing surface unavailable: {}", reason)
            }
            EngineError::InvalidTuning {
                name,
                value,
                expected,
            } => write!(
                f,
                "tuning parameter '{}' = {} is outside {}",
                name, value, expected
            ),
            EngineError::Config(err) => write!(f, "invalid tuning document: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err)
    }
}

/// Convenience alias: a `Result` using `EngineError` as the error type.
pub type EngineResult<T> = Result<T, EngineError>;
