//! Common identifier types for the experiment environment.

use crate::EnvError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of a player within their group (`id_in_group`), 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a PlayerId, rejecting 0.
    pub fn new(id: u32) -> Result<Self, EnvError> {
        if id == 0 {
            return Err(EnvError::invalid_id("player ids start at 1"));
        }
        Ok(Self(id))
    }

    /// Creates a PlayerId from a 0-based slot index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns the 1-based id.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns the 0-based slot index.
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    /// Iterates over all player ids of a group of `n`.
    pub fn all(n: usize) -> impl Iterator<Item = PlayerId> {
        (0..n).map(PlayerId::from_index)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a group within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// Round number within a run, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundNumber(u32);

impl RoundNumber {
    /// The first round, where the hidden state is drawn.
    pub const FIRST: RoundNumber = RoundNumber(1);

    /// Creates a RoundNumber, rejecting 0.
    pub fn new(round: u32) -> Result<Self, EnvError> {
        if round == 0 {
            return Err(EnvError::invalid_id("round numbers start at 1"));
        }
        Ok(Self(round))
    }

    /// Returns the 1-based round number.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns the following round.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Whether this is round 1.
    pub fn is_first(&self) -> bool {
        self.0 == 1
    }
}

impl std::fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an experiment session.
///
/// Uses UUID v4 for global uniqueness without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic SessionId from a seed (for simulation).
    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&seed.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}
