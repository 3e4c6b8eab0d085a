//! JSON exporter for simulated sessions.
//!
//! Exports one frame per round with every group's signals, decisions and
//! payoffs, for offline analysis.

use crate::world::SimWorld;
use netcoop_core::{Group, HiddenState, Topology};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single round across all groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Round number
    pub round: u32,

    /// Per-group data for this round
    pub groups: Vec<GroupFrame>,
}

/// One group's round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFrame {
    pub group_id: u32,
    pub signals: Vec<HiddenState>,
    pub contributions: Vec<bool>,
    pub beliefs: Vec<u8>,
    pub total_contribution: f64,
    pub payoffs: Vec<f64>,
}

/// Hidden state of a group, revealed in the export only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTruth {
    pub group_id: u32,
    pub state: HiddenState,
    pub mpcr: f64,
}

/// Complete session export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Network treatment
    pub topology: Topology,

    /// True state of every group
    pub truth: Vec<GroupTruth>,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    /// Failure message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, topology: Topology) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            topology,
            truth: Vec::new(),
            frames: Vec::new(),
            passed: false,
            failure_reason: None,
        }
    }

    /// Builds an export from a finished world.
    pub fn from_world(scenario: &str, world: &SimWorld) -> Self {
        let mut export = Self::new(scenario, world.config.seed, world.config.topology);

        export.truth = world
            .groups()
            .iter()
            .filter_map(|g| {
                g.state().map(|s| GroupTruth {
                    group_id: g.id().0,
                    state: s.state,
                    mpcr: s.mpcr,
                })
            })
            .collect();

        for round in 1..=world.rounds_played() {
            let groups = world
                .groups()
                .iter()
                .filter_map(|g| group_frame(g, round))
                .collect();
            export.add_frame(SimFrame { round, groups });
        }
        export
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, failure_reason: Option<String>) {
        self.passed = passed;
        self.failure_reason = failure_reason;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

fn group_frame(group: &Group, round: u32) -> Option<GroupFrame> {
    let record = group.in_round(round).ok()?;
    let outcome = record.outcome.as_ref()?;
    let decisions: Vec<_> = record.decisions.iter().flatten().collect();

    Some(GroupFrame {
        group_id: group.id().0,
        signals: record.signals.clone(),
        contributions: decisions.iter().map(|d| d.contribute).collect(),
        beliefs: decisions.iter().map(|d| d.belief.percent()).collect(),
        total_contribution: outcome.total_contribution.as_f64(),
        payoffs: outcome.payoffs.iter().map(|p| p.as_f64()).collect(),
    })
}
