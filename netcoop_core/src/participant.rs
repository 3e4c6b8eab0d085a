//! Participant runtime - drives a group with pluggable decision makers.
//!
//! On the platform, decisions come from participants' forms. In simulation
//! they come from scripted strategies. Both sit behind `DecisionMaker`, so
//! one round loop serves both.
//!
//! ```text
//!  begin_round ──► observation_view(p) ──► DecisionMaker::decide ──► submit
//!                                                                      │
//!                          compute_payoffs ◄── all submitted ◄─────────┘
//! ```

use crate::error::RoundError;
use crate::group::Group;
use crate::payoff::{Decision, RoundOutcome};
use crate::views::{DecisionPrompt, ObservationView};
use netcoop_env::{ExperimentContext, PlayerId, RoundNumber};

/// Anything that can fill in the decision form.
pub trait DecisionMaker {
    /// Returns the decision of `player` given what they observed.
    fn decide(&mut self, player: PlayerId, view: &ObservationView, prompt: &DecisionPrompt) -> Decision;
}

impl<F> DecisionMaker for F
where
    F: FnMut(PlayerId, &ObservationView, &DecisionPrompt) -> Decision,
{
    fn decide(&mut self, player: PlayerId, view: &ObservationView, prompt: &DecisionPrompt) -> Decision {
        self(player, view, prompt)
    }
}

/// Plays one complete round: signals, exposure, decisions, payoffs.
///
/// `makers[i]` decides for player `i + 1`.
pub fn play_round<C, D>(
    group: &mut Group,
    ctx: &C,
    makers: &mut [D],
) -> Result<(RoundNumber, RoundOutcome), RoundError>
where
    C: ExperimentContext + ?Sized,
    D: DecisionMaker,
{
    if makers.len() != group.size() {
        return Err(RoundError::MakerCountMismatch {
            expected: group.size(),
            actual: makers.len(),
        });
    }

    let round = group.begin_round(ctx)?;
    let prompt = group.decision_prompt();

    for (player, maker) in PlayerId::all(group.size()).zip(makers.iter_mut()) {
        let view = group.observation_view(player)?;
        let decision = maker.decide(player, &view, &prompt);
        group.submit(player, decision)?;
    }

    let outcome = group.compute_payoffs()?.clone();
    Ok((round, outcome))
}
