//! CLI error types.

use docket_config::ConfigError;
use docket_site::{GateFailure, LoadError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Gate(Box<GateFailure>),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GateFailure> for CliError {
    fn from(failure: GateFailure) -> Self {
        Self::Gate(Box::new(failure))
    }
}
