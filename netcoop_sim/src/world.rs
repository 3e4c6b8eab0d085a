//! SimWorld - The simulated session container.

use crate::agent::{SimulatedParticipant, Strategy};
use crate::context::{derive_seed, SimContext};
use crate::error::SimError;

use netcoop_core::metrics::group_round_metrics;
use netcoop_core::{
    play_round, summarize_group, ExperimentParams, Group, GroupSummary, HiddenState, RoundMetrics,
    Topology,
};
use netcoop_env::{ExperimentContext, GroupId, SessionConfig, SessionId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for a simulated session.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Number of independent groups
    pub num_groups: usize,

    /// Network treatment applied to every group
    pub topology: Topology,

    /// Experiment parameters
    pub params: ExperimentParams,

    /// Strategies assigned to seats round-robin (seat i gets `strategies[i % len]`)
    pub strategies: Vec<Strategy>,

    /// Reported-belief noise standard deviation, percentage points
    pub belief_noise_std: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_groups: 4,
            topology: Topology::Ring,
            params: ExperimentParams::default(),
            strategies: vec![Strategy::SignalMajority],
            belief_noise_std: 5.0,
        }
    }
}

impl SimConfig {
    /// Applies a platform session config: treatment and parameter overrides.
    pub fn with_session(mut self, session: &SessionConfig) -> Result<Self, SimError> {
        self.topology = Topology::from_config(session.network_type.as_deref());
        self.params = ExperimentParams::from_session(session)?;
        Ok(self)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), SimError> {
        self.params.validate()?;
        if self.num_groups == 0 {
            return Err(SimError::invalid("at least one group is required"));
        }
        if self.strategies.is_empty() {
            return Err(SimError::invalid("at least one strategy is required"));
        }
        if self.belief_noise_std.is_nan() || self.belief_noise_std < 0.0 {
            return Err(SimError::invalid(format!(
                "belief noise must be non-negative, got {}",
                self.belief_noise_std
            )));
        }
        Ok(())
    }
}

/// Outcome of one group over the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    pub group_id: GroupId,
    pub state: Option<HiddenState>,
    pub mpcr: Option<f64>,
    pub rounds: Vec<RoundMetrics>,
    pub summary: GroupSummary,
}

/// Outcome of a simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub seed: u64,
    pub topology: Topology,
    pub groups: Vec<GroupReport>,
}

impl SessionReport {
    /// Mean contribution rate over every group and round.
    pub fn mean_contribution_rate(&self) -> f64 {
        mean(self.groups.iter().flat_map(|g| g.rounds.iter().map(|r| r.contribution_rate)))
    }

    /// Mean Brier score over every group and round.
    pub fn mean_brier_score(&self) -> f64 {
        mean(self.groups.iter().flat_map(|g| g.rounds.iter().map(|r| r.brier_score)))
    }

    /// Realised share of signals matching the state.
    pub fn signal_match_rate(&self) -> f64 {
        mean(self.groups.iter().flat_map(|g| g.rounds.iter().map(|r| r.signal_match_rate)))
    }

    /// Mean distance between beliefs and posteriors, percentage points.
    pub fn mean_bayesian_gap(&self) -> f64 {
        mean(self.groups.iter().flat_map(|g| g.rounds.iter().map(|r| r.bayesian_gap)))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// The SimWorld - groups, their participants and the shared entropy.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Shared simulation context (state and signal draws)
    pub context: SimContext,

    /// Groups of the session
    groups: Vec<Group>,

    /// Participants per group, seat order
    participants: Vec<Vec<SimulatedParticipant>>,

    /// Rounds completed by every group
    rounds_played: u32,
}

impl SimWorld {
    /// Creates a new SimWorld with the given configuration.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let context = SimContext::new(config.seed);
        let n = config.params.players_per_group;

        let mut groups = Vec::with_capacity(config.num_groups);
        let mut participants = Vec::with_capacity(config.num_groups);
        for g in 0..config.num_groups {
            groups.push(Group::new(GroupId(g as u32 + 1), config.topology, config.params.clone())?);

            let seats = (0..n)
                .map(|seat| {
                    let strategy = config.strategies[seat % config.strategies.len()];
                    let stream = (g * n + seat) as u64 + 1;
                    SimulatedParticipant::new(
                        strategy,
                        config.params.clone(),
                        config.belief_noise_std,
                        derive_seed(config.seed, stream),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            participants.push(seats);
        }

        Ok(Self {
            config,
            context,
            groups,
            participants,
            rounds_played: 0,
        })
    }

    /// Plays one round in every group.
    pub fn step(&mut self) -> Result<(), SimError> {
        for (group, seats) in self.groups.iter_mut().zip(self.participants.iter_mut()) {
            let (round, outcome) = play_round(group, &self.context, seats)?;
            debug!(
                "  {} round {} | total={} | state={:?}",
                group.id(),
                round,
                outcome.total_contribution,
                group.state().map(|s| s.state)
            );
        }
        self.rounds_played += 1;
        Ok(())
    }

    /// Plays every remaining round and returns the session report.
    pub fn run(&mut self) -> Result<SessionReport, SimError> {
        info!(
            "Session {} (seed={}): {} groups x {} players, {} rounds, {} network",
            SessionId::from_seed(self.config.seed),
            self.context.seed(),
            self.groups.len(),
            self.config.params.players_per_group,
            self.config.params.num_rounds,
            self.config.topology
        );

        while self.rounds_played < self.config.params.num_rounds {
            self.step()?;
        }

        Ok(self.report())
    }

    /// Builds the report of everything played so far.
    pub fn report(&self) -> SessionReport {
        let groups = self
            .groups
            .iter()
            .map(|group| GroupReport {
                group_id: group.id(),
                state: group.state().map(|s| s.state),
                mpcr: group.state().map(|s| s.mpcr),
                rounds: group_round_metrics(group),
                summary: summarize_group(group),
            })
            .collect();

        SessionReport {
            session_id: SessionId::from_seed(self.config.seed),
            seed: self.config.seed,
            topology: self.config.topology,
            groups,
        }
    }

    /// Groups of the session.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns the number of rounds played.
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            seed: 42,
            num_groups: 2,
            params: ExperimentParams {
                num_rounds: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_sim_world_creation() {
        let world = SimWorld::new(small_config()).unwrap();
        assert_eq!(world.groups().len(), 2);
        assert_eq!(world.rounds_played(), 0);
    }

    #[test]
    fn test_sim_world_step() {
        let mut world = SimWorld::new(small_config()).unwrap();
        world.step().unwrap();
        assert_eq!(world.rounds_played(), 1);
        for group in world.groups() {
            assert_eq!(group.rounds().len(), 1);
            assert!(group.current_round().unwrap().is_complete());
        }
    }

    #[test]
    fn test_sim_world_run_to_completion() {
        let mut world = SimWorld::new(small_config()).unwrap();
        let report = world.run().unwrap();

        assert_eq!(report.groups.len(), 2);
        for group in &report.groups {
            assert_eq!(group.rounds.len(), 3);
            assert_eq!(group.summary.rounds_played, 3);
            assert!(group.state.is_some());
        }
        assert!(world.groups().iter().all(|g| g.is_finished()));
    }

    #[test]
    fn test_sim_world_determinism() {
        let a = SimWorld::new(small_config()).unwrap().run().unwrap();
        let b = SimWorld::new(small_config()).unwrap().run().unwrap();

        assert_eq!(a.session_id, b.session_id);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_with_session() {
        let session = SessionConfig {
            network_type: Some("HUB".into()),
            num_rounds: Some(2),
            ..Default::default()
        };
        let config = SimConfig::default().with_session(&session).unwrap();
        assert_eq!(config.topology, Topology::Hub);
        assert_eq!(config.params.num_rounds, 2);
    }

    #[test]
    fn test_invalid_configs() {
        let no_groups = SimConfig {
            num_groups: 0,
            ..Default::default()
        };
        assert!(SimWorld::new(no_groups).is_err());

        let no_strategies = SimConfig {
            strategies: vec![],
            ..Default::default()
        };
        assert!(SimWorld::new(no_strategies).is_err());

        let bad_noise = SimConfig {
            belief_noise_std: -2.0,
            ..Default::default()
        };
        assert!(matches!(SimWorld::new(bad_noise), Err(SimError::InvalidConfig(_))));
    }
}
