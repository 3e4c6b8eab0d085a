//! Group round lifecycle.
//!
//! A `Group` drives one run of the experiment for a fixed set of players:
//!
//! 1. `begin_round` - round 1 draws the hidden state, later rounds carry it
//!    forward; every player gets a fresh private signal
//! 2. `observed_signals` - mechanical exposure, per player
//! 3. `submit` - each player's contribution decision and belief
//! 4. `compute_payoffs` - once every player has submitted
//!
//! Completed rounds stay in the history and can be read back with
//! `in_round`.

use crate::belief::Belief;
use crate::currency::Currency;
use crate::error::{ExposureError, ParamsError, RoundError};
use crate::exposure::{check_signal_count, signals_observed, ObservedSignal};
use crate::params::ExperimentParams;
use crate::payoff::{compute_payoffs, contribution_amount, Decision, RoundOutcome};
use crate::signal::draw_round_signals;
use crate::state::{GroupState, Signal, Topology};
use netcoop_env::{ExperimentContext, GroupId, PlayerId, RoundNumber};
use serde::{Deserialize, Serialize};

/// Everything recorded about one round of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: RoundNumber,

    /// Treatment, hidden state and MPCR (identical in every round)
    pub group_state: GroupState,

    /// Private signal per player slot
    pub signals: Vec<Signal>,

    /// Submissions per player slot, `None` until submitted
    pub decisions: Vec<Option<Decision>>,

    /// Set once payoffs are computed
    pub outcome: Option<RoundOutcome>,
}

impl RoundRecord {
    fn new(round: RoundNumber, group_state: GroupState, signals: Vec<Signal>) -> Self {
        let n = signals.len();
        Self {
            round,
            group_state,
            signals,
            decisions: vec![None; n],
            outcome: None,
        }
    }

    pub fn group_size(&self) -> usize {
        self.signals.len()
    }

    /// Whether payoffs have been computed.
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn signal(&self, player: PlayerId) -> Option<Signal> {
        self.signals.get(player.index()).copied()
    }

    pub fn decision(&self, player: PlayerId) -> Option<Decision> {
        self.decisions.get(player.index()).copied().flatten()
    }

    /// Payoff of `player`, once computed.
    pub fn payoff(&self, player: PlayerId) -> Option<Currency> {
        self.outcome
            .as_ref()
            .and_then(|o| o.payoffs.get(player.index()).copied())
    }

    /// Group total; zero until payoffs are computed.
    pub fn total_contribution(&self) -> Currency {
        self.outcome
            .as_ref()
            .map(|o| o.total_contribution)
            .unwrap_or(Currency::ZERO)
    }

    /// Players that have not submitted yet.
    pub fn pending_players(&self) -> Vec<PlayerId> {
        self.decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_none())
            .map(|(i, _)| PlayerId::from_index(i))
            .collect()
    }
}

/// A group of players across all rounds of a run.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    topology: Topology,
    params: ExperimentParams,
    rounds: Vec<RoundRecord>,
}

impl Group {
    /// Creates a group. No round is active until `begin_round`.
    pub fn new(id: GroupId, topology: Topology, params: ExperimentParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            id,
            topology,
            params,
            rounds: Vec::new(),
        })
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn params(&self) -> &ExperimentParams {
        &self.params
    }

    pub fn size(&self) -> usize {
        self.params.players_per_group
    }

    /// Hidden state of the run, once round 1 has started.
    pub fn state(&self) -> Option<GroupState> {
        self.rounds.first().map(|r| r.group_state)
    }

    /// Rounds started so far, oldest first.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn current_round(&self) -> Option<&RoundRecord> {
        self.rounds.last()
    }

    /// Whether every round of the run has been played and paid.
    pub fn is_finished(&self) -> bool {
        self.rounds.len() as u32 == self.params.num_rounds
            && self.rounds.last().map_or(false, RoundRecord::is_complete)
    }

    /// Starts the next round and draws its signals.
    pub fn begin_round<C: ExperimentContext + ?Sized>(&mut self, ctx: &C) -> Result<RoundNumber, RoundError> {
        let (round, group_state) = match self.rounds.last() {
            None => (
                RoundNumber::FIRST,
                GroupState::initialize(ctx, self.topology, &self.params),
            ),
            Some(last) if !last.is_complete() => {
                return Err(RoundError::RoundIncomplete(last.round));
            }
            Some(last) if last.round.get() >= self.params.num_rounds => {
                return Err(RoundError::RunFinished(self.params.num_rounds));
            }
            Some(last) => (last.round.next(), last.group_state.carry_forward()),
        };

        let signals = draw_round_signals(
            ctx,
            group_state.state,
            self.params.signal_accuracy,
            self.size(),
        );
        self.rounds.push(RoundRecord::new(round, group_state, signals));
        Ok(round)
    }

    /// Signals `player` sees in the current round.
    pub fn observed_signals(&self, player: PlayerId) -> Result<Vec<ObservedSignal>, RoundError> {
        let record = self.active()?;
        check_signal_count(&record.signals, self.size())?;
        Ok(signals_observed(self.topology, player, &record.signals)?)
    }

    /// Records a player's decision for the current round.
    pub fn submit(&mut self, player: PlayerId, decision: Decision) -> Result<(), RoundError> {
        let n = self.size();
        let record = self.active_mut()?;
        if record.is_complete() {
            return Err(RoundError::RoundComplete(record.round));
        }
        let slot = record
            .decisions
            .get_mut(player.index())
            .ok_or(ExposureError::UnknownPlayer { player, group_size: n })?;
        if slot.is_some() {
            return Err(RoundError::DuplicateDecision {
                player,
                round: record.round,
            });
        }
        *slot = Some(decision);
        Ok(())
    }

    /// Records a decision from raw form values.
    pub fn submit_form(&mut self, player: PlayerId, contribute: bool, belief: i64) -> Result<(), RoundError> {
        let belief = Belief::new(belief)?;
        self.submit(player, Decision::new(contribute, belief))
    }

    /// Players still to submit in the current round.
    pub fn pending_players(&self) -> Result<Vec<PlayerId>, RoundError> {
        Ok(self.active()?.pending_players())
    }

    /// Computes payoffs once all players have submitted.
    pub fn compute_payoffs(&mut self) -> Result<&RoundOutcome, RoundError> {
        let params = self.params.clone();
        let record = self.active_mut()?;
        if record.is_complete() {
            return Err(RoundError::RoundComplete(record.round));
        }

        let missing = record.decisions.iter().filter(|d| d.is_none()).count();
        if missing > 0 {
            return Err(RoundError::MissingDecisions {
                missing,
                group_size: record.group_size(),
            });
        }

        let contributions: Vec<bool> = record
            .decisions
            .iter()
            .flatten()
            .map(|d| d.contribute)
            .collect();
        let outcome = compute_payoffs(&params, record.group_state.mpcr, &contributions);
        Ok(record.outcome.insert(outcome))
    }

    /// Record of round `round` (1-based).
    pub fn in_round(&self, round: u32) -> Result<&RoundRecord, RoundError> {
        round
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i as usize))
            .ok_or(RoundError::UnknownRound(round))
    }

    /// Contribution amount of `player` in the current round, if decided.
    pub fn contribution_amount(&self, player: PlayerId) -> Option<Currency> {
        self.current_round()
            .and_then(|r| r.decision(player))
            .map(|d| contribution_amount(d.contribute, &self.params))
    }

    /// Sum of `player`'s payoffs over all completed rounds.
    pub fn cumulative_payoff(&self, player: PlayerId) -> Currency {
        self.rounds.iter().filter_map(|r| r.payoff(player)).sum()
    }

    fn active(&self) -> Result<&RoundRecord, RoundError> {
        self.rounds.last().ok_or(RoundError::NoActiveRound)
    }

    fn active_mut(&mut self) -> Result<&mut RoundRecord, RoundError> {
        self.rounds.last_mut().ok_or(RoundError::NoActiveRound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::SignalSource;
    use crate::state::HiddenState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed cycle of uniforms.
    struct Script {
        values: Vec<f64>,
        next: AtomicUsize,
    }

    impl Script {
        fn new(values: Vec<f64>) -> Self {
            Self { values, next: AtomicUsize::new(0) }
        }
    }

    impl ExperimentContext for Script {
        fn uniform(&self) -> f64 {
            let i = self.next.fetch_add(1, Ordering::SeqCst);
            self.values[i % self.values.len()]
        }

        fn seed(&self) -> u64 {
            0
        }
    }

    fn pid(id: u32) -> PlayerId {
        PlayerId::new(id).unwrap()
    }

    fn small_params() -> ExperimentParams {
        ExperimentParams {
            players_per_group: 4,
            num_rounds: 3,
            ..Default::default()
        }
    }

    fn submit_all(group: &mut Group, contribute: &[bool]) {
        for (i, c) in contribute.iter().enumerate() {
            group.submit_form(PlayerId::from_index(i), *c, 50).unwrap();
        }
    }

    #[test]
    fn test_round_one_draws_state_and_signals() {
        // 0.1 -> HIGH state; subsequent draws all below accuracy
        let ctx = Script::new(vec![0.1]);
        let mut group = Group::new(GroupId(1), Topology::Ring, small_params()).unwrap();

        assert!(group.state().is_none());
        let round = group.begin_round(&ctx).unwrap();
        assert!(round.is_first());

        let state = group.state().unwrap();
        assert_eq!(state.state, HiddenState::High);
        assert_eq!(state.mpcr, 0.70);
        let record = group.current_round().unwrap();
        assert_eq!(record.signals, vec![HiddenState::High; 4]);
        assert_eq!(record.total_contribution(), Currency::ZERO);
    }

    #[test]
    fn test_state_constant_across_rounds() {
        // State draw 0.1 (HIGH), later uniforms vary but never re-draw state
        let ctx = Script::new(vec![0.1, 0.9, 0.8, 0.2, 0.6]);
        let mut group = Group::new(GroupId(1), Topology::Hub, small_params()).unwrap();

        for _ in 0..3 {
            group.begin_round(&ctx).unwrap();
            submit_all(&mut group, &[true, false, true, false]);
            group.compute_payoffs().unwrap();
        }

        let first = group.in_round(1).unwrap().group_state;
        for record in group.rounds() {
            assert_eq!(record.group_state, first);
        }
        assert!(group.is_finished());
        assert_eq!(group.begin_round(&ctx), Err(RoundError::RunFinished(3)));
    }

    #[test]
    fn test_cannot_start_round_before_payoffs() {
        let ctx = Script::new(vec![0.3]);
        let mut group = Group::new(GroupId(1), Topology::Ring, small_params()).unwrap();
        group.begin_round(&ctx).unwrap();
        assert_eq!(
            group.begin_round(&ctx),
            Err(RoundError::RoundIncomplete(RoundNumber::FIRST))
        );
    }

    #[test]
    fn test_observed_signals_use_current_round() {
        let ctx = Script::new(vec![0.1, 0.1, 0.9, 0.1, 0.1]);
        let mut group = Group::new(GroupId(1), Topology::Ring, small_params()).unwrap();
        group.begin_round(&ctx).unwrap();

        // signals: H L H H
        let observed = group.observed_signals(pid(1)).unwrap();
        assert_eq!(observed.len(), 3);
        assert_eq!(observed[1].source, SignalSource::Neighbor(pid(4)));
        assert_eq!(observed[2].source, SignalSource::Neighbor(pid(2)));
        assert_eq!(observed[2].signal, HiddenState::Low);
    }

    #[test]
    fn test_submit_errors() {
        let ctx = Script::new(vec![0.4]);
        let mut group = Group::new(GroupId(1), Topology::Ring, small_params()).unwrap();

        assert_eq!(group.submit_form(pid(1), true, 10), Err(RoundError::NoActiveRound));
        group.begin_round(&ctx).unwrap();

        assert_eq!(group.submit_form(pid(1), true, 150), Err(RoundError::BeliefOutOfRange(150)));
        assert!(matches!(
            group.submit_form(pid(5), true, 10),
            Err(RoundError::Exposure(ExposureError::UnknownPlayer { .. }))
        ));

        group.submit_form(pid(1), true, 10).unwrap();
        assert!(matches!(
            group.submit_form(pid(1), false, 20),
            Err(RoundError::DuplicateDecision { .. })
        ));
        assert_eq!(group.pending_players().unwrap(), vec![pid(2), pid(3), pid(4)]);
    }

    #[test]
    fn test_payoffs_wait_for_everyone() {
        let ctx = Script::new(vec![0.9]);
        let mut group = Group::new(GroupId(1), Topology::Ring, small_params()).unwrap();
        group.begin_round(&ctx).unwrap();
        group.submit_form(pid(1), true, 10).unwrap();

        assert_eq!(
            group.compute_payoffs().unwrap_err(),
            RoundError::MissingDecisions { missing: 3, group_size: 4 }
        );
    }

    #[test]
    fn test_compute_payoffs_low_state() {
        // 0.9 -> LOW state, mpcr 0.3
        let ctx = Script::new(vec![0.9]);
        let mut group = Group::new(GroupId(1), Topology::Ring, small_params()).unwrap();
        group.begin_round(&ctx).unwrap();
        submit_all(&mut group, &[true, true, false, false]);

        let outcome = group.compute_payoffs().unwrap().clone();
        assert_eq!(outcome.total_contribution, Currency::from_points(20));
        assert_eq!(outcome.payoffs[0], Currency::from_points(16));
        assert_eq!(outcome.payoffs[2], Currency::from_points(26));

        assert_eq!(group.contribution_amount(pid(1)), Some(Currency::from_points(10)));
        assert_eq!(group.contribution_amount(pid(3)), Some(Currency::ZERO));
        assert!(matches!(group.compute_payoffs(), Err(RoundError::RoundComplete(_))));
        assert!(matches!(group.submit_form(pid(1), true, 1), Err(RoundError::RoundComplete(_))));
    }

    #[test]
    fn test_cumulative_payoff_and_history() {
        let ctx = Script::new(vec![0.1]);
        let mut group = Group::new(GroupId(1), Topology::Ring, small_params()).unwrap();

        group.begin_round(&ctx).unwrap();
        submit_all(&mut group, &[false; 4]);
        group.compute_payoffs().unwrap();

        group.begin_round(&ctx).unwrap();
        submit_all(&mut group, &[true; 4]);
        group.compute_payoffs().unwrap();

        // 20 + (20 - 10 + 0.7 * 40) = 58
        assert_eq!(group.cumulative_payoff(pid(2)), Currency::from_points(58));
        assert_eq!(group.in_round(1).unwrap().total_contribution(), Currency::ZERO);
        assert_eq!(group.in_round(2).unwrap().total_contribution(), Currency::from_points(40));
        assert_eq!(group.in_round(0), Err(RoundError::UnknownRound(0)));
        assert_eq!(group.in_round(3), Err(RoundError::UnknownRound(3)));
    }

    #[test]
    fn test_new_validates_params() {
        let params = ExperimentParams {
            players_per_group: 1,
            ..Default::default()
        };
        assert!(Group::new(GroupId(1), Topology::Ring, params).is_err());
    }
}
