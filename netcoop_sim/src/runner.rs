//! Scenario runner - executes simulated sessions and checks their outcome.

use crate::error::SimError;
use crate::oracle::Oracle;
use crate::scenarios::ScenarioId;
use crate::world::{SessionReport, SimConfig, SimWorld};

use netcoop_core::{ExperimentParams, Topology};
use netcoop_env::SessionConfig;
use tracing::{info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Rounds played per group
    pub rounds_played: u32,

    /// Groups simulated
    pub groups: usize,

    /// Mean share of contributors
    pub mean_contribution_rate: f64,

    /// Mean Brier score of reported beliefs
    pub mean_brier_score: f64,

    /// Realised signal accuracy
    pub signal_match_rate: f64,

    /// Mean |belief - posterior| in percentage points
    pub mean_bayesian_gap: f64,

    /// Invariant violations reported by the oracle
    pub violations: usize,
}

impl ScenarioMetrics {
    fn from_report(report: &SessionReport, rounds_played: u32, violations: usize) -> Self {
        Self {
            rounds_played,
            groups: report.groups.len(),
            mean_contribution_rate: report.mean_contribution_rate(),
            mean_brier_score: report.mean_brier_score(),
            signal_match_rate: report.signal_match_rate(),
            mean_bayesian_gap: report.mean_bayesian_gap(),
            violations,
        }
    }
}

/// Runs scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Number of groups per session
    num_groups: usize,

    /// Platform session overrides
    session: Option<SessionConfig>,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64, num_groups: usize) -> Self {
        Self {
            seed,
            num_groups,
            session: None,
        }
    }

    /// Applies a session config on top of every scenario.
    ///
    /// Parameters are overridden; the scenario's treatment only changes if
    /// the session names a `network_type`.
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = Some(session);
        self
    }

    /// Builds the configuration a scenario runs with.
    pub fn config_for(&self, scenario: ScenarioId) -> Result<SimConfig, SimError> {
        let mut config = scenario.config(self.seed, self.num_groups);
        if let Some(session) = &self.session {
            let scenario_params = config.params.clone();
            config.params = ExperimentParams::from_session(session)?;
            // Scenario-specific accuracy survives unless the session sets one
            if session.signal_accuracy.is_none() {
                config.params.signal_accuracy = scenario_params.signal_accuracy;
            }
            if session.network_type.is_some() {
                config.topology = Topology::from_config(session.network_type.as_deref());
            }
        }
        Ok(config)
    }

    /// Runs a scenario and returns the finished world with its report.
    pub fn run_world(&self, scenario: ScenarioId) -> Result<(SimWorld, SessionReport), SimError> {
        let mut world = SimWorld::new(self.config_for(scenario)?)?;
        let report = world.run()?;
        Ok((world, report))
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        match self.run_world(scenario) {
            Ok((world, report)) => self.evaluate(scenario, &world, &report),
            Err(e) => {
                warn!("Scenario {} aborted: {}", scenario.name(), e);
                ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed: false,
                    failure_reason: Some(e.to_string()),
                    metrics: ScenarioMetrics::default(),
                }
            }
        }
    }

    /// Checks a finished session against the oracle and scenario expectations.
    pub fn evaluate(&self, scenario: ScenarioId, world: &SimWorld, report: &SessionReport) -> ScenarioResult {
        let mut oracle = Oracle::new();
        for group in world.groups() {
            oracle.audit_group(group);
        }

        let metrics = ScenarioMetrics::from_report(report, world.rounds_played(), oracle.violations().len());
        let failure_reason = if let Some(v) = oracle.violations().first() {
            Some(format!("{} invariant violations, first: {}", oracle.violations().len(), v))
        } else {
            scenario_failure(scenario, world, &metrics)
        };

        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure_reason.is_none(),
            failure_reason,
            metrics,
        }
    }
}

/// Scenario-specific expectations on top of the oracle's invariants.
fn scenario_failure(scenario: ScenarioId, world: &SimWorld, metrics: &ScenarioMetrics) -> Option<String> {
    let params = &world.config.params;

    // Realised accuracy within five standard errors of the configured one
    let draws = (metrics.groups * params.players_per_group) as f64 * metrics.rounds_played as f64;
    if draws > 0.0 {
        let a = params.signal_accuracy;
        let tolerance = 5.0 * (a * (1.0 - a) / draws).sqrt() + 1e-9;
        if (metrics.signal_match_rate - a).abs() > tolerance {
            return Some(format!(
                "realised signal accuracy {:.3} too far from {:.3}",
                metrics.signal_match_rate, a
            ));
        }
    }

    match scenario {
        ScenarioId::FreeRiders => {
            if metrics.mean_contribution_rate != 0.0 {
                return Some(format!("contribution rate {:.3}, expected 0", metrics.mean_contribution_rate));
            }
            let expected = params.endowment.as_f64() * params.num_rounds as f64;
            for group in world.groups() {
                for player in netcoop_env::PlayerId::all(group.size()) {
                    let total = group.cumulative_payoff(player).as_f64();
                    if (total - expected).abs() > 1e-9 {
                        return Some(format!(
                            "{} player {} earned {:.2}, expected {:.2}",
                            group.id(),
                            player,
                            total,
                            expected
                        ));
                    }
                }
            }
            None
        }
        ScenarioId::BayesianRing | ScenarioId::BayesianHub => {
            // Integer reporting is the only source of error
            if metrics.mean_bayesian_gap > 0.5 + 1e-9 {
                return Some(format!(
                    "beliefs drift {:.3}pp from posteriors",
                    metrics.mean_bayesian_gap
                ));
            }
            None
        }
        ScenarioId::RingBaseline | ScenarioId::HubBaseline | ScenarioId::NoisySignals => None,
    }
}
