//! Beliefs about the hidden state.
//!
//! Reported beliefs are integers in 0..=100 (probability, in percent,
//! that the state is HIGH). They are never shown to other players and do
//! not affect payoffs. The Bayesian posterior is a benchmark for analysis.

use crate::error::RoundError;
use crate::signal::tally;
use crate::state::{HiddenState, Signal};
use serde::{Deserialize, Serialize};

/// A reported belief that the state is HIGH, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Belief(u8);

impl Belief {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 100;

    /// Validates a raw form value.
    pub fn new(percent: i64) -> Result<Self, RoundError> {
        if !(Self::MIN..=Self::MAX).contains(&percent) {
            return Err(RoundError::BeliefOutOfRange(percent));
        }
        Ok(Self(percent as u8))
    }

    /// Rounds and clamps a probability into a belief.
    pub fn from_probability(p: f64) -> Self {
        let percent = if p.is_nan() { 50.0 } else { (p * 100.0).round() };
        Self(percent.clamp(0.0, 100.0) as u8)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Belief as a probability in [0, 1].
    pub fn probability(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Squared error against the realised state (Brier score).
    pub fn brier(&self, truth: HiddenState) -> f64 {
        let outcome = if truth.is_high() { 1.0 } else { 0.0 };
        (self.probability() - outcome).powi(2)
    }
}

impl TryFrom<i64> for Belief {
    type Error = RoundError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Belief::new(value)
    }
}

impl From<Belief> for i64 {
    fn from(belief: Belief) -> i64 {
        belief.0 as i64
    }
}

/// Posterior probability of HIGH after observing `signals`.
///
/// Signals are treated as independent draws with P(signal = state) =
/// `accuracy`, so only the net count `high - low` matters. Computed in
/// log-odds form to stay exact for large groups. Degenerate accuracies
/// (0 or 1) with conflicting evidence fall back to the prior.
pub fn posterior_high<'a, I>(prior_high: f64, accuracy: f64, signals: I) -> f64
where
    I: IntoIterator<Item = &'a Signal>,
{
    let (high, low) = tally(signals);
    let k = high as f64 - low as f64;

    // Symmetric evidence cancels exactly
    if k == 0.0 || accuracy == 0.5 || prior_high <= 0.0 || prior_high >= 1.0 {
        return prior_high;
    }

    if accuracy <= 0.0 || accuracy >= 1.0 {
        if high > 0 && low > 0 {
            return prior_high;
        }
        // Signals are exact at accuracy 1 and always inverted at accuracy 0
        let says_high = (high > 0) == (accuracy >= 1.0);
        return if says_high { 1.0 } else { 0.0 };
    }

    let log_odds = (prior_high / (1.0 - prior_high)).ln() + k * (accuracy / (1.0 - accuracy)).ln();
    1.0 / (1.0 + (-log_odds).exp())
}
