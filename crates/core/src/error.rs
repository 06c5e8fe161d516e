//! Error types shared by every voicefx crate.

use thiserror::Error;

/// Errors produced by effect, surface, and page-state operations.
#[derive(Debug, Error)]
pub enum FxError {
    /// Width or height was zero when sizing an effect or a drawing surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// An effect name did not match any registered effect.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// A parameter existed but carried a value the effect cannot use.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// The key-value store backing the theme could not be read or written.
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// Writing a snapshot or other file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A network request failed before any HTTP status was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// A host API (frame scheduling, DOM access) refused the call.
    #[error("host error: {0}")]
    Host(String),
}
