//! Data handed to the hosting platform for each page.
//!
//! The platform owns rendering; these structs are everything a page is
//! allowed to show. Beliefs, the hidden state and the MPCR never appear in
//! any participant-facing view.

use crate::currency::Currency;
use crate::error::{ExposureError, RoundError};
use crate::exposure::ObservedSignal;
use crate::group::Group;
use crate::state::Topology;
use netcoop_env::{PlayerId, RoundNumber};
use serde::{Deserialize, Serialize};

/// Pages of a round, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Instructions,
    ObserveSignals,
    Decide,
    ResultsWait,
    Results,
}

impl Page {
    /// Page sequence of every round.
    pub const SEQUENCE: [Page; 5] = [
        Page::Instructions,
        Page::ObserveSignals,
        Page::Decide,
        Page::ResultsWait,
        Page::Results,
    ];

    /// Instructions are shown in round 1 only.
    pub fn is_displayed(&self, round: RoundNumber) -> bool {
        match self {
            Page::Instructions => round.is_first(),
            _ => true,
        }
    }

    /// Pages shown in `round`, in order.
    pub fn sequence_for(round: RoundNumber) -> Vec<Page> {
        Self::SEQUENCE
            .iter()
            .copied()
            .filter(|p| p.is_displayed(round))
            .collect()
    }
}

/// Data for the Instructions page (round 1 only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionsView {
    /// Network treatment of the group
    pub network_type: Topology,
    pub players_per_group: usize,
    pub num_rounds: u32,
    pub endowment: Currency,
    /// Amount moved to the group account when contributing
    pub contribution_amount: Currency,
    /// Probability that a private signal matches the hidden state
    pub signal_accuracy: f64,
    /// The hub seat is always player 1
    pub hub_is_player1: bool,
}

/// Data for the ObserveSignals page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationView {
    /// Network treatment of the group
    pub network_type: Topology,
    /// Own signal first, then what the topology exposes
    pub observed_signals: Vec<ObservedSignal>,
}

/// Data for the Decide page form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPrompt {
    pub endowment: Currency,
    /// The only non-zero contribution a player can make
    pub contribution_amount: Currency,
}

/// Data for the Results page.
///
/// Minimal feedback: no MPCR, no state, no histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsView {
    /// Whether this player contributed
    pub contributed: bool,
    /// What this player moved to the group account
    pub contribution_amount: Currency,
    /// Group total this round
    pub total_contribution: Currency,
    /// This player's payoff this round
    pub payoff: Currency,
}

impl Group {
    pub fn instructions_view(&self) -> InstructionsView {
        let params = self.params();
        InstructionsView {
            network_type: self.topology(),
            players_per_group: params.players_per_group,
            num_rounds: params.num_rounds,
            endowment: params.endowment,
            contribution_amount: params.contribution_amount,
            signal_accuracy: params.signal_accuracy,
            hub_is_player1: true,
        }
    }

    pub fn observation_view(&self, player: PlayerId) -> Result<ObservationView, RoundError> {
        Ok(ObservationView {
            network_type: self.topology(),
            observed_signals: self.observed_signals(player)?,
        })
    }

    pub fn decision_prompt(&self) -> DecisionPrompt {
        DecisionPrompt {
            endowment: self.params().endowment,
            contribution_amount: self.params().contribution_amount,
        }
    }

    /// Results page for `player`; requires computed payoffs.
    pub fn results_view(&self, player: PlayerId) -> Result<ResultsView, RoundError> {
        let record = self.current_round().ok_or(RoundError::NoActiveRound)?;
        let payoff = match record.payoff(player) {
            Some(payoff) => payoff,
            None if record.is_complete() => {
                return Err(ExposureError::UnknownPlayer {
                    player,
                    group_size: record.group_size(),
                }
                .into());
            }
            None => return Err(RoundError::RoundIncomplete(record.round)),
        };
        let contributed = record.decision(player).map_or(false, |d| d.contribute);
        Ok(ResultsView {
            contributed,
            contribution_amount: self.contribution_amount(player).unwrap_or(Currency::ZERO),
            total_contribution: record.total_contribution(),
            payoff,
        })
    }
}
