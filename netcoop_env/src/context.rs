//! Core environment context trait for the experiment rule set.

/// The central interface for randomness.
///
/// This trait abstracts the host so that the rule set can run both inside
/// the experiment platform and inside the deterministic simulator.
///
/// # Implementations
///
/// - **Production**: `OsContext` - wraps `rand::thread_rng`
/// - **Simulation**: `SimContext` - wraps a seeded `ChaCha8Rng`
///
/// Methods take `&self`; implementations that hold RNG state use interior
/// mutability so a context can be shared across groups.
pub trait ExperimentContext: Send + Sync {
    /// Returns a uniform sample in `[0, 1)`.
    fn uniform(&self) -> f64;

    /// Returns `true` with probability one half.
    ///
    /// Used for the hidden state draw (50/50 prior).
    fn coin_flip(&self) -> bool {
        self.uniform() < 0.5
    }

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}

impl<C: ExperimentContext + ?Sized> ExperimentContext for &C {
    fn uniform(&self) -> f64 {
        (**self).uniform()
    }

    fn coin_flip(&self) -> bool {
        (**self).coin_flip()
    }

    fn seed(&self) -> u64 {
        (**self).seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl ExperimentContext for Fixed {
        fn uniform(&self) -> f64 {
            self.0
        }

        fn seed(&self) -> u64 {
            7
        }
    }

    #[test]
    fn test_default_coin_flip_threshold() {
        assert!(Fixed(0.49).coin_flip());
        assert!(!Fixed(0.5).coin_flip());
    }

    #[test]
    fn test_reference_forwards() {
        let ctx = Fixed(0.25);
        let by_ref = &ctx;
        assert_eq!(by_ref.uniform(), 0.25);
        assert_eq!(by_ref.seed(), 7);
    }
}
