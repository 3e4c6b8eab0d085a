//! Treatment scenarios for simulated sessions.

use crate::agent::Strategy;
use crate::world::SimConfig;
use netcoop_core::{ExperimentParams, Topology};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// SIM-001: Ring network, signal-majority players
    RingBaseline,

    /// SIM-002: Hub network, signal-majority players
    HubBaseline,

    /// SIM-003: Nobody contributes
    FreeRiders,

    /// SIM-004: Bayesian players on a ring
    BayesianRing,

    /// SIM-005: Bayesian players on a hub
    BayesianHub,

    /// SIM-006: Barely informative signals
    NoisySignals,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::RingBaseline,
            ScenarioId::HubBaseline,
            ScenarioId::FreeRiders,
            ScenarioId::BayesianRing,
            ScenarioId::BayesianHub,
            ScenarioId::NoisySignals,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::RingBaseline => "ring_baseline",
            ScenarioId::HubBaseline => "hub_baseline",
            ScenarioId::FreeRiders => "free_riders",
            ScenarioId::BayesianRing => "bayesian_ring",
            ScenarioId::BayesianHub => "bayesian_hub",
            ScenarioId::NoisySignals => "noisy_signals",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::RingBaseline => "Ring network, players follow the majority of observed signals",
            ScenarioId::HubBaseline => "Hub network, players follow the majority of observed signals",
            ScenarioId::FreeRiders => "Nobody contributes; every payoff equals the endowment",
            ScenarioId::BayesianRing => "Ring network, noiseless Bayesian beliefs and threshold contributions",
            ScenarioId::BayesianHub => "Hub network, noiseless Bayesian beliefs and threshold contributions",
            ScenarioId::NoisySignals => "Signal accuracy 0.55, realised accuracy must track it",
        }
    }

    /// Builds the session configuration for this scenario.
    pub fn config(&self, seed: u64, num_groups: usize) -> SimConfig {
        let base = SimConfig {
            seed,
            num_groups,
            ..Default::default()
        };
        let bayesian = vec![Strategy::Bayesian { threshold: 0.5 }];

        match self {
            ScenarioId::RingBaseline => SimConfig {
                topology: Topology::Ring,
                ..base
            },
            ScenarioId::HubBaseline => SimConfig {
                topology: Topology::Hub,
                ..base
            },
            ScenarioId::FreeRiders => SimConfig {
                strategies: vec![Strategy::FreeRide],
                ..base
            },
            ScenarioId::BayesianRing => SimConfig {
                topology: Topology::Ring,
                strategies: bayesian,
                belief_noise_std: 0.0,
                ..base
            },
            ScenarioId::BayesianHub => SimConfig {
                topology: Topology::Hub,
                strategies: bayesian,
                belief_noise_std: 0.0,
                ..base
            },
            ScenarioId::NoisySignals => SimConfig {
                params: ExperimentParams {
                    signal_accuracy: 0.55,
                    ..Default::default()
                },
                strategies: vec![
                    Strategy::SignalMajority,
                    Strategy::AlwaysContribute,
                    Strategy::FreeRide,
                ],
                ..base
            },
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ring_baseline" | "ring" | "sim-001" => Ok(ScenarioId::RingBaseline),
            "hub_baseline" | "hub" | "sim-002" => Ok(ScenarioId::HubBaseline),
            "free_riders" | "freeriders" | "sim-003" => Ok(ScenarioId::FreeRiders),
            "bayesian_ring" | "sim-004" => Ok(ScenarioId::BayesianRing),
            "bayesian_hub" | "sim-005" => Ok(ScenarioId::BayesianHub),
            "noisy_signals" | "noisy" | "sim-006" => Ok(ScenarioId::NoisySignals),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
