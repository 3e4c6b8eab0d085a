//! Error types for the simulation harness.

use netcoop_core::{ParamsError, RoundError};
use netcoop_env::EnvError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
