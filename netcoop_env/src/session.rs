//! Session configuration supplied by the hosting platform.
//!
//! The platform passes a loosely typed config per session. Every field is
//! optional; missing values fall back to the experiment defaults.

use crate::EnvError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Platform-level session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Treatment name, expected `"ring"` or `"hub"`; anything else means ring
    pub network_type: Option<String>,

    /// Players per group
    pub players_per_group: Option<usize>,

    /// Rounds per run
    pub num_rounds: Option<u32>,

    /// Endowment per round (points)
    pub endowment: Option<f64>,

    /// Amount moved to the group account when contributing (points)
    pub contribution_amount: Option<f64>,

    /// MPCR when the hidden state is HIGH
    pub mpcr_high: Option<f64>,

    /// MPCR when the hidden state is LOW
    pub mpcr_low: Option<f64>,

    /// P(signal = true state)
    pub signal_accuracy: Option<f64>,

    /// Prior probability of the HIGH state
    pub prior_high: Option<f64>,
}

impl SessionConfig {
    /// Creates a config that only selects the treatment.
    pub fn with_network_type(network_type: impl Into<String>) -> Self {
        Self {
            network_type: Some(network_type.into()),
            ..Default::default()
        }
    }

    /// Parses a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}
