//! Error types for the experiment rule set.

use netcoop_env::{PlayerId, RoundNumber};
use thiserror::Error;

/// Invalid experiment parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("Group size must be at least 3, got {0}")]
    GroupTooSmall(usize),

    #[error("Number of rounds must be positive")]
    NoRounds,

    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("Contribution amount {contribution} exceeds endowment {endowment}")]
    ContributionExceedsEndowment { contribution: f64, endowment: f64 },

    #[error("{name} must be finite and at most 1e12 points, got {value}")]
    AmountOutOfRange { name: &'static str, value: f64 },
}

/// Failures of the network exposure resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExposureError {
    #[error("Player {player} is not in a group of {group_size}")]
    UnknownPlayer { player: PlayerId, group_size: usize },

    #[error("Expected {expected} signals, got {actual}")]
    SignalCountMismatch { expected: usize, actual: usize },

    #[error("A ring needs at least 3 players, got {0}")]
    RingTooSmall(usize),
}

/// Round lifecycle violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundError {
    #[error("No round has been started")]
    NoActiveRound,

    #[error("Round {0} is already complete")]
    RoundComplete(RoundNumber),

    #[error("Round {0} has not computed payoffs yet")]
    RoundIncomplete(RoundNumber),

    #[error("All {0} rounds have been played")]
    RunFinished(u32),

    #[error("Player {player} already decided in round {round}")]
    DuplicateDecision { player: PlayerId, round: RoundNumber },

    #[error("Waiting for {missing} of {group_size} decisions")]
    MissingDecisions { missing: usize, group_size: usize },

    #[error("Group of {expected} needs {expected} decision makers, got {actual}")]
    MakerCountMismatch { expected: usize, actual: usize },

    #[error("Belief must be between 0 and 100, got {0}")]
    BeliefOutOfRange(i64),

    #[error("Round {0} does not exist")]
    UnknownRound(u32),

    #[error(transparent)]
    Exposure(#[from] ExposureError),
}
