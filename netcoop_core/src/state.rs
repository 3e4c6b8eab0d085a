//! Hidden state and treatment.
//!
//! The hidden state is drawn once per group in round 1 and then carried
//! forward unchanged; the MPCR follows from it.

use crate::params::ExperimentParams;
use netcoop_env::ExperimentContext;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The latent binary state of a group's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HiddenState {
    High,
    Low,
}

/// A private signal is a noisy report of the hidden state.
pub type Signal = HiddenState;

impl HiddenState {
    /// Returns the opposite state.
    pub fn flipped(self) -> Self {
        match self {
            HiddenState::High => HiddenState::Low,
            HiddenState::Low => HiddenState::High,
        }
    }

    /// Returns the label shown to participants.
    pub fn as_str(&self) -> &'static str {
        match self {
            HiddenState::High => "HIGH",
            HiddenState::Low => "LOW",
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, HiddenState::High)
    }
}

impl std::fmt::Display for HiddenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HiddenState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(HiddenState::High),
            "LOW" => Ok(HiddenState::Low),
            other => Err(format!("Unknown state: {}", other)),
        }
    }
}

/// Static network treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Each player sees self plus the two adjacent players
    #[default]
    Ring,
    /// Player 1 sees everyone; spokes see the hub and a broadcast of spokes
    Hub,
}

impl Topology {
    /// Resolves the platform's `network_type` setting.
    ///
    /// The value is trimmed and lower-cased; missing, empty, or unknown
    /// values fall back to `Ring`.
    pub fn from_config(network_type: Option<&str>) -> Self {
        network_type
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Topology::Ring => "ring",
            Topology::Hub => "hub",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ring" => Ok(Topology::Ring),
            "hub" => Ok(Topology::Hub),
            other => Err(format!("Unknown network type: {}", other)),
        }
    }
}

/// Group-level state fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupState {
    /// Network treatment
    pub topology: Topology,

    /// True state, unknown to participants
    pub state: HiddenState,

    /// Marginal per-capita return implied by `state`
    pub mpcr: f64,
}

impl GroupState {
    /// Draws the hidden state for a new run (round 1).
    ///
    /// The state is HIGH or LOW with equal probability.
    pub fn initialize<C: ExperimentContext + ?Sized>(
        ctx: &C,
        topology: Topology,
        params: &ExperimentParams,
    ) -> Self {
        let state = if ctx.coin_flip() {
            HiddenState::High
        } else {
            HiddenState::Low
        };
        Self::with_state(topology, state, params)
    }

    /// Builds the group state for a known hidden state.
    pub fn with_state(topology: Topology, state: HiddenState, params: &ExperimentParams) -> Self {
        Self {
            topology,
            state,
            mpcr: mpcr_for(state, params),
        }
    }

    /// Returns the state for the next round of the same run.
    pub fn carry_forward(&self) -> Self {
        *self
    }
}

/// MPCR implied by a hidden state.
pub fn mpcr_for(state: HiddenState, params: &ExperimentParams) -> f64 {
    match state {
        HiddenState::High => params.mpcr_high,
        HiddenState::Low => params.mpcr_low,
    }
}
