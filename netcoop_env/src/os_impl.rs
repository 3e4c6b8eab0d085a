//! Production implementation of ExperimentContext using OS-seeded entropy.

use crate::ExperimentContext;
use rand::Rng;
use std::sync::Arc;

/// Production context backed by the thread-local RNG.
///
/// This is the "real" implementation used when the experiment platform
/// calls into the rule set. Every call draws fresh entropy.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsContext;

impl OsContext {
    /// Creates a new OsContext.
    pub fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped context for sharing across groups.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl ExperimentContext for OsContext {
    fn uniform(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn coin_flip(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}
