//! Simulation context implementing ExperimentContext for deterministic runs.

use netcoop_env::ExperimentContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

/// Simulation context backed by a seeded RNG.
///
/// All hidden-state and signal draws of a simulated session go through
/// one ChaCha8 stream, so a seed fully determines the session.
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,

    /// Deterministic RNG for state and signal draws
    rng: Arc<Mutex<ChaCha8Rng>>,

    /// Number of uniforms drawn so far
    draws: Arc<Mutex<u64>>,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            draws: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Returns how many uniforms have been drawn.
    pub fn draw_count(&self) -> u64 {
        *self.draws.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            rng: Arc::clone(&self.rng),
            draws: Arc::clone(&self.draws),
        }
    }
}

impl ExperimentContext for SimContext {
    fn uniform(&self) -> f64 {
        // A poisoned lock still holds a usable RNG state
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        *self.draws.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        rng.gen::<f64>()
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

/// Derives an independent sub-seed for a subsystem.
///
/// Keeping participant noise on its own stream means changing a strategy
/// does not shift the signals every group receives.
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    seed.wrapping_mul(0x9e3779b97f4a7c15) ^ stream.wrapping_mul(0x517cc1b727220a95)
}
