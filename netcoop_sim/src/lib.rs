//! NetCoop Deterministic Simulation Harness
//!
//! Runs whole experiment sessions with scripted participants so the rule
//! set can be exercised end to end without the hosting platform.
//!
//! # Core Principle: One Seed, One Session
//!
//! All randomness is derived from a single 64-bit seed:
//! - **Hidden states and signals**: one shared `SimContext` stream
//! - **Participant noise**: one derived stream per seat
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SimWorld                            │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ SimContext (seeded ChaCha8: states + signals)        │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │                        │                            │
//! │  ┌────▼────┐              ┌────▼────┐                       │
//! │  │ Group 1 │              │ Group 2 │     ...               │
//! │  │ 8 seats │              │ 8 seats │                       │
//! │  └─────────┘              └─────────┘                       │
//! │       ▲                        ▲                            │
//! │  ┌────┴────────────────────────┴────┐                       │
//! │  │            Oracle                 │                       │
//! │  │  (Independent invariant checks)   │                       │
//! │  └───────────────────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use netcoop_sim::{SimWorld, SimConfig};
//!
//! let config = SimConfig {
//!     seed: 42,
//!     num_groups: 6,
//!     ..Default::default()
//! };
//!
//! let mut world = SimWorld::new(config)?;
//! let report = world.run()?;
//! ```

mod agent;
mod context;
mod error;
mod exporter;
mod oracle;
mod runner;
mod world;
pub mod scenarios;

pub use agent::{SimulatedParticipant, Strategy};
pub use context::{derive_seed, SimContext};
pub use error::SimError;
pub use exporter::{GroupFrame, GroupTruth, SimExport, SimFrame};
pub use oracle::{expected_exposure_len, Oracle, Violation};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use world::{GroupReport, SessionReport, SimConfig, SimWorld};
