//! Linear public goods payoffs.
//!
//! ```text
//! payoff_i = endowment - contribution_i + mpcr * sum_j contribution_j
//! ```
//!
//! Contributions are binary: a player either moves the fixed contribution
//! amount to the group account or keeps everything.

use crate::belief::Belief;
use crate::currency::Currency;
use crate::params::ExperimentParams;
use serde::{Deserialize, Serialize};

/// A player's submission for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the player contributes
    pub contribute: bool,

    /// Belief that the state is HIGH (non-incentivised, private)
    pub belief: Belief,
}

impl Decision {
    pub fn new(contribute: bool, belief: Belief) -> Self {
        Self { contribute, belief }
    }
}

/// Result of the payoff computation for a group round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Sum of all contribution amounts
    pub total_contribution: Currency,

    /// Payoff per player, indexed by slot
    pub payoffs: Vec<Currency>,
}

/// Amount a player moves to the group account.
pub fn contribution_amount(contribute: bool, params: &ExperimentParams) -> Currency {
    if contribute {
        params.contribution_amount
    } else {
        Currency::ZERO
    }
}

/// Computes every player's payoff from the contribution decisions.
pub fn compute_payoffs(params: &ExperimentParams, mpcr: f64, contributions: &[bool]) -> RoundOutcome {
    let total_contribution: Currency = contributions
        .iter()
        .map(|c| contribution_amount(*c, params))
        .sum();
    let group_return = total_contribution.scaled(mpcr);

    let payoffs = contributions
        .iter()
        .map(|c| params.endowment - contribution_amount(*c, params) + group_return)
        .collect();

    RoundOutcome {
        total_contribution,
        payoffs,
    }
}
