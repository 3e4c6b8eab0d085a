//! Ground truth oracle for simulation.
//!
//! The Oracle re-derives what every completed round must look like from
//! first principles and reports any disagreement with the rule set:
//! - Hidden state and topology fixed after round 1
//! - MPCR consistent with the hidden state
//! - Payoffs matching the linear public goods formula
//! - Exposure lists of the right size and origin

use netcoop_core::{
    is_hub, signals_observed, ExperimentParams, Group, HiddenState, RoundRecord, Topology,
};
use netcoop_env::PlayerId;
use serde::{Deserialize, Serialize};

/// A broken invariant found by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub group: u32,
    pub round: u32,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group {} round {}: {}", self.group, self.round, self.message)
    }
}

/// The Oracle - independent checker of played groups.
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    violations: Vec<Violation>,
    rounds_checked: u64,
}

impl Oracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Audits every round of `group`.
    pub fn audit_group(&mut self, group: &Group) {
        let Some(first) = group.rounds().first() else {
            return;
        };
        let expected = first.group_state;
        let params = group.params();

        for record in group.rounds() {
            let mut report = |message: String| {
                self.violations.push(Violation {
                    group: group.id().0,
                    round: record.round.get(),
                    message,
                });
            };

            if record.group_state != expected {
                report(format!(
                    "group state changed from {:?} to {:?}",
                    expected, record.group_state
                ));
            }
            if record.group_state.topology != group.topology() {
                report("topology differs from group treatment".to_string());
            }
            let mpcr = match record.group_state.state {
                HiddenState::High => params.mpcr_high,
                HiddenState::Low => params.mpcr_low,
            };
            if record.group_state.mpcr != mpcr {
                report(format!("mpcr {} does not match state", record.group_state.mpcr));
            }
            if record.signals.len() != params.players_per_group {
                report(format!("{} signals for {} players", record.signals.len(), params.players_per_group));
            }

            for message in check_exposure(record, group.topology()) {
                report(message);
            }
            for message in check_payoffs(record, params) {
                report(message);
            }
            self.rounds_checked += 1;
        }
    }

    /// Violations found so far.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn rounds_checked(&self) -> u64 {
        self.rounds_checked
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Expected length of a player's exposure list.
///
/// `None` when `n` is below the minimum group size of 3 or `player` is
/// not seated in the group.
pub fn expected_exposure_len(topology: Topology, player: PlayerId, n: usize) -> Option<usize> {
    if n < 3 || player.index() >= n {
        return None;
    }
    let len = match topology {
        Topology::Ring => 3,
        Topology::Hub if is_hub(topology, player) => n,
        // self + hub + the n-2 other spokes
        Topology::Hub => 1 + 1 + (n - 2),
    };
    Some(len)
}

fn check_exposure(record: &RoundRecord, topology: Topology) -> Vec<String> {
    let n = record.group_size();
    let mut problems = Vec::new();

    for player in PlayerId::all(n) {
        let observed = match signals_observed(topology, player, &record.signals) {
            Ok(observed) => observed,
            Err(e) => {
                problems.push(format!("exposure failed for player {}: {}", player, e));
                continue;
            }
        };

        let Some(expected) = expected_exposure_len(topology, player, n) else {
            problems.push(format!("player {} has no valid exposure in a group of {}", player, n));
            continue;
        };
        if observed.len() != expected {
            problems.push(format!(
                "player {} sees {} signals, expected {}",
                player,
                observed.len(),
                expected
            ));
        }
        for o in &observed {
            let origin = o.source.origin(player);
            if record.signal(origin) != Some(o.signal) {
                problems.push(format!("player {} shown a wrong signal for {}", player, o.label()));
            }
        }
    }
    problems
}

fn check_payoffs(record: &RoundRecord, params: &ExperimentParams) -> Vec<String> {
    let Some(outcome) = &record.outcome else {
        return Vec::new();
    };
    let mut problems = Vec::new();

    let contributors = record
        .decisions
        .iter()
        .filter(|d| d.map_or(false, |d| d.contribute))
        .count();
    let total = contributors as f64 * params.contribution_amount.as_f64();
    if (outcome.total_contribution.as_f64() - total).abs() > 1e-9 {
        problems.push(format!(
            "total contribution {} != {}",
            outcome.total_contribution, total
        ));
    }

    for (i, decision) in record.decisions.iter().enumerate() {
        let own = match decision {
            Some(d) if d.contribute => params.contribution_amount.as_f64(),
            _ => 0.0,
        };
        let expected = params.endowment.as_f64() - own + record.group_state.mpcr * total;
        let actual = outcome.payoffs.get(i).map(|p| p.as_f64());
        // Payoffs are rounded to hundredths
        if actual.map_or(true, |a| (a - expected).abs() > 0.005 + 1e-9) {
            problems.push(format!(
                "player {} payoff {:?} != {:.4}",
                PlayerId::from_index(i),
                actual,
                expected
            ));
        }
    }
    problems
}
