//! Network Cooperation Environment Abstraction Layer
//!
//! This crate is the seam between the experiment rule set and whatever
//! hosts it: the experiment platform in **Production**, or the seeded
//! harness in **Simulation**.
//!
//! # Core Concept: Controlled Entropy
//!
//! The rule set has exactly two sources of randomness:
//! - the one-time hidden state draw per group
//! - the per-round noisy private signals
//!
//! Both go through [`ExperimentContext`]. By deriving all entropy from a
//! single 64-bit seed, any simulated session becomes reproducible via its
//! seed number.
//!
//! # Example
//!
//! ```ignore
//! use netcoop_env::{ExperimentContext, OsContext};
//!
//! let ctx = OsContext::new();
//! let high = ctx.coin_flip();
//! ```

mod context;
mod types;
mod error;
mod os_impl;
mod session;

pub use context::ExperimentContext;
pub use types::{GroupId, PlayerId, RoundNumber, SessionId};
pub use error::EnvError;
pub use os_impl::OsContext;
pub use session::SessionConfig;
