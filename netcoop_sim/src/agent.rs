//! SimulatedParticipant - scripted players for deterministic sessions.
//!
//! Each participant reads the same observation view a human would see,
//! forms a Bayesian belief from the observed signals, reports it with
//! optional noise, and contributes according to its strategy.

use crate::error::SimError;
use netcoop_core::{
    posterior_high, Belief, Decision, DecisionMaker, DecisionPrompt, ExperimentParams,
    ObservationView,
};
use netcoop_core::signal::tally;
use netcoop_env::PlayerId;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Contribution rule of a simulated participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Contributes every round
    AlwaysContribute,

    /// Never contributes
    FreeRide,

    /// Contributes iff strictly more HIGH than LOW signals were observed
    SignalMajority,

    /// Contributes iff the expected MPCR under its posterior reaches `threshold`
    Bayesian { threshold: f64 },
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AlwaysContribute => "always_contribute",
            Strategy::FreeRide => "free_ride",
            Strategy::SignalMajority => "signal_majority",
            Strategy::Bayesian { .. } => "bayesian",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Bayesian { threshold } => write!(f, "bayesian:{}", threshold),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    /// Parses `always_contribute`, `free_ride`, `signal_majority`,
    /// `bayesian` (threshold 0.5) or `bayesian:<threshold>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "always_contribute" | "always" => Ok(Strategy::AlwaysContribute),
            "free_ride" | "free_rider" | "never" => Ok(Strategy::FreeRide),
            "signal_majority" | "majority" => Ok(Strategy::SignalMajority),
            "bayesian" => Ok(Strategy::Bayesian { threshold: 0.5 }),
            other => match other.strip_prefix("bayesian:") {
                Some(raw) => raw
                    .parse::<f64>()
                    .map(|threshold| Strategy::Bayesian { threshold })
                    .map_err(|e| format!("Invalid bayesian threshold '{}': {}", raw, e)),
                None => Err(format!("Unknown strategy: {}", other)),
            },
        }
    }
}

/// A scripted participant occupying one seat of a group.
pub struct SimulatedParticipant {
    /// Contribution rule
    strategy: Strategy,

    /// Prior and accuracy used for the posterior, MPCRs for `Bayesian`
    params: ExperimentParams,

    /// Noise added to reported beliefs (percentage points)
    belief_noise: Option<Normal<f64>>,

    /// Private RNG for belief noise
    rng: ChaCha8Rng,
}

impl SimulatedParticipant {
    /// Creates a participant.
    ///
    /// `noise_std` is the standard deviation of reported-belief noise in
    /// percentage points; 0 reports the rounded posterior exactly.
    pub fn new(
        strategy: Strategy,
        params: ExperimentParams,
        noise_std: f64,
        seed: u64,
    ) -> Result<Self, SimError> {
        let belief_noise = if noise_std == 0.0 {
            None
        } else {
            Some(Normal::new(0.0, noise_std).map_err(|e| {
                SimError::invalid(format!("belief noise {}: {}", noise_std, e))
            })?)
        };

        Ok(Self {
            strategy,
            params,
            belief_noise,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Posterior probability of HIGH given an observation.
    pub fn posterior(&self, view: &ObservationView) -> f64 {
        posterior_high(
            self.params.prior_high,
            self.params.signal_accuracy,
            view.observed_signals.iter().map(|o| &o.signal),
        )
    }

    fn report_belief(&mut self, posterior: f64) -> Belief {
        let noise = match &self.belief_noise {
            Some(dist) => dist.sample(&mut self.rng) / 100.0,
            None => 0.0,
        };
        Belief::from_probability(posterior + noise)
    }

    fn wants_to_contribute(&self, view: &ObservationView, posterior: f64) -> bool {
        match self.strategy {
            Strategy::AlwaysContribute => true,
            Strategy::FreeRide => false,
            Strategy::SignalMajority => {
                let (high, low) = tally(view.observed_signals.iter().map(|o| &o.signal));
                high > low
            }
            Strategy::Bayesian { threshold } => {
                let expected_mpcr =
                    posterior * self.params.mpcr_high + (1.0 - posterior) * self.params.mpcr_low;
                expected_mpcr >= threshold
            }
        }
    }
}

impl DecisionMaker for SimulatedParticipant {
    fn decide(&mut self, _player: PlayerId, view: &ObservationView, _prompt: &DecisionPrompt) -> Decision {
        let posterior = self.posterior(view);
        let contribute = self.wants_to_contribute(view, posterior);
        let belief = self.report_belief(posterior);
        Decision::new(contribute, belief)
    }
}
