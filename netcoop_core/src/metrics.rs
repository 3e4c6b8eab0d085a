//! NetCoop Metrics Module
//! ======================
//!
//! Per-round and per-run statistics for analysing a group:
//! - **Contribution rate**: share of players contributing
//! - **Belief accuracy**: Brier score of reported beliefs vs the true state
//! - **Signal quality**: realised share of signals matching the state
//! - **Bayesian gap**: distance between reported beliefs and the posterior
//!   implied by each player's observed signals
//!
//! Metrics read completed rounds only; they never feed back into play.

use crate::belief::posterior_high;
use crate::exposure::signals_observed;
use crate::group::{Group, RoundRecord};
use crate::params::ExperimentParams;
use crate::state::Topology;
use netcoop_env::PlayerId;
use serde::{Deserialize, Serialize};

/// Statistics of one completed round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundMetrics {
    pub round: u32,
    /// Share of players who contributed [0, 1]
    pub contribution_rate: f64,
    /// Mean reported belief, percent
    pub mean_belief: f64,
    /// Mean Brier score of beliefs against the true state
    pub brier_score: f64,
    /// Share of private signals equal to the true state
    pub signal_match_rate: f64,
    /// Mean |belief - posterior| in percentage points
    pub bayesian_gap: f64,
    /// Mean payoff in points
    pub mean_payoff: f64,
}

/// Aggregate over all completed rounds of a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub rounds_played: usize,
    pub mean_contribution_rate: f64,
    pub mean_brier_score: f64,
    pub mean_signal_match_rate: f64,
    pub mean_bayesian_gap: f64,
    /// Cumulative payoff per player, in points
    pub total_payoffs: Vec<f64>,
}

// =============================================================================
// ROUND METRICS
// =============================================================================

/// Computes metrics for a completed round. Returns `None` while the round
/// is still collecting decisions.
pub fn round_metrics(
    record: &RoundRecord,
    topology: Topology,
    params: &ExperimentParams,
) -> Option<RoundMetrics> {
    let outcome = record.outcome.as_ref()?;
    let n = record.group_size();
    if n == 0 {
        return None;
    }
    let decisions: Vec<_> = record.decisions.iter().flatten().collect();
    if decisions.len() != n {
        return None;
    }

    let truth = record.group_state.state;
    let contributors = decisions.iter().filter(|d| d.contribute).count();
    let matches = record.signals.iter().filter(|s| **s == truth).count();

    let mut belief_sum = 0.0;
    let mut brier_sum = 0.0;
    let mut gap_sum = 0.0;
    for (i, decision) in decisions.iter().enumerate() {
        let player = PlayerId::from_index(i);
        belief_sum += decision.belief.percent() as f64;
        brier_sum += decision.belief.brier(truth);

        let posterior = signals_observed(topology, player, &record.signals)
            .map(|observed| {
                posterior_high(
                    params.prior_high,
                    params.signal_accuracy,
                    observed.iter().map(|o| &o.signal),
                )
            })
            .unwrap_or(params.prior_high);
        gap_sum += (decision.belief.probability() - posterior).abs() * 100.0;
    }

    let payoff_sum: f64 = outcome.payoffs.iter().map(|p| p.as_f64()).sum();
    let n_f = n as f64;

    Some(RoundMetrics {
        round: record.round.get(),
        contribution_rate: contributors as f64 / n_f,
        mean_belief: belief_sum / n_f,
        brier_score: brier_sum / n_f,
        signal_match_rate: matches as f64 / n_f,
        bayesian_gap: gap_sum / n_f,
        mean_payoff: payoff_sum / n_f,
    })
}

// =============================================================================
// GROUP SUMMARY
// =============================================================================

/// Metrics of every completed round of `group`.
pub fn group_round_metrics(group: &Group) -> Vec<RoundMetrics> {
    group
        .rounds()
        .iter()
        .filter_map(|r| round_metrics(r, group.topology(), group.params()))
        .collect()
}

/// Summarises all completed rounds of `group`.
pub fn summarize_group(group: &Group) -> GroupSummary {
    let rounds = group_round_metrics(group);
    let total_payoffs = PlayerId::all(group.size())
        .map(|p| group.cumulative_payoff(p).as_f64())
        .collect();

    if rounds.is_empty() {
        return GroupSummary {
            total_payoffs,
            ..Default::default()
        };
    }

    let k = rounds.len() as f64;
    let mean = |f: fn(&RoundMetrics) -> f64| rounds.iter().map(f).sum::<f64>() / k;

    GroupSummary {
        rounds_played: rounds.len(),
        mean_contribution_rate: mean(|m| m.contribution_rate),
        mean_brier_score: mean(|m| m.brier_score),
        mean_signal_match_rate: mean(|m| m.signal_match_rate),
        mean_bayesian_gap: mean(|m| m.bayesian_gap),
        total_payoffs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use netcoop_env::{ExperimentContext, GroupId};

    struct Fixed(f64);

    impl ExperimentContext for Fixed {
        fn uniform(&self) -> f64 {
            self.0
        }

        fn seed(&self) -> u64 {
            0
        }
    }

    fn params() -> ExperimentParams {
        ExperimentParams {
            players_per_group: 4,
            num_rounds: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_incomplete_round_has_no_metrics() {
        let mut group = Group::new(GroupId(1), Topology::Ring, params()).unwrap();
        group.begin_round(&Fixed(0.1)).unwrap();
        let record = group.current_round().unwrap();
        assert!(round_metrics(record, Topology::Ring, group.params()).is_none());
        assert!(group_round_metrics(&group).is_empty());
    }

    #[test]
    fn test_round_metrics_values() {
        // HIGH state, all signals HIGH
        let mut group = Group::new(GroupId(1), Topology::Ring, params()).unwrap();
        group.begin_round(&Fixed(0.1)).unwrap();
        group.submit_form(PlayerId::from_index(0), true, 100).unwrap();
        group.submit_form(PlayerId::from_index(1), true, 100).unwrap();
        group.submit_form(PlayerId::from_index(2), false, 0).unwrap();
        group.submit_form(PlayerId::from_index(3), false, 0).unwrap();
        group.compute_payoffs().unwrap();

        let metrics = group_round_metrics(&group);
        assert_eq!(metrics.len(), 1);
        let m = &metrics[0];
        assert_eq!(m.round, 1);
        assert_relative_eq!(m.contribution_rate, 0.5);
        assert_relative_eq!(m.mean_belief, 50.0);
        assert_relative_eq!(m.brier_score, 0.5);
        assert_relative_eq!(m.signal_match_rate, 1.0);
        // 3 HIGH signals each: posterior = 0.7^3 / (0.7^3 + 0.3^3)
        let posterior = 0.343 / (0.343 + 0.027);
        let expected_gap = ((1.0 - posterior) * 2.0 + posterior * 2.0) * 100.0 / 4.0;
        assert_relative_eq!(m.bayesian_gap, expected_gap, epsilon = 1e-9);
        // contributors 20 - 10 + 14 = 24, others 34
        assert_relative_eq!(m.mean_payoff, 29.0);
    }

    #[test]
    fn test_summary_totals() {
        let mut group = Group::new(GroupId(1), Topology::Hub, params()).unwrap();
        for _ in 0..2 {
            group.begin_round(&Fixed(0.9)).unwrap();
            for p in PlayerId::all(4) {
                group.submit_form(p, false, 30).unwrap();
            }
            group.compute_payoffs().unwrap();
        }

        let summary = summarize_group(&group);
        assert_eq!(summary.rounds_played, 2);
        assert_relative_eq!(summary.mean_contribution_rate, 0.0);
        // LOW state, signals all flipped by 0.9 >= accuracy
        assert_relative_eq!(summary.mean_signal_match_rate, 0.0);
        assert_relative_eq!(summary.mean_brier_score, 0.09, epsilon = 1e-12);
        assert_eq!(summary.total_payoffs, vec![40.0; 4]);
    }

    #[test]
    fn test_empty_summary() {
        let group = Group::new(GroupId(1), Topology::Ring, params()).unwrap();
        let summary = summarize_group(&group);
        assert_eq!(summary.rounds_played, 0);
        assert_eq!(summary.total_payoffs, vec![0.0; 4]);
    }
}
