//! CLI errors with distinct exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (before our code runs)
//! - 10: effect error (unknown effect, bad dimensions, bad params)
//! - 11: I/O error (snapshot write)
//! - 12: input error (bad JSON params, bad theme)
//! - 13: serialization error

use std::fmt;

use voicefx_core::FxError;

pub enum CliError {
    Effect(FxError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Effect(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// Short machine-readable category for `--json` error output.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Effect(FxError::UnknownEffect(_)) => "unknown_effect",
            CliError::Effect(FxError::InvalidDimensions) => "invalid_dimensions",
            CliError::Effect(FxError::ParamTypeMismatch { .. }) => "bad_param",
            CliError::Effect(_) => "effect",
            CliError::Io(_) => "io",
            CliError::Input(_) => "input",
            CliError::Serialization(_) => "serialization",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Effect(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<FxError> for CliError {
    fn from(e: FxError) -> Self {
        match e {
            FxError::Io(msg) => CliError::Io(msg),
            other => CliError::Effect(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
