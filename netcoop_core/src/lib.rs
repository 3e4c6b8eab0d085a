//! NetCoop Core - Network Information & Cooperation Rule Set
//!
//! Groups of players face a hidden binary state fixed for the whole run.
//! Each round they receive noisy private signals, see some of their
//! peers' signals through a static network, then decide whether to
//! contribute to a linear public good whose return depends on the state.
//!
//! The crate owns the four rules of the experiment:
//! 1. **State Initializer**: one fair draw of HIGH/LOW per run, fixing the MPCR
//! 2. **Signal Generator**: per-round signals, correct with fixed accuracy
//! 3. **Exposure Resolver**: which signals each player sees (ring or hub)
//! 4. **Payoff Calculator**: `endowment - contribution + mpcr * group total`
//!
//! Rendering, forms and session management belong to the host platform,
//! which reads the [`views`] and feeds decisions back through [`Group`].

pub mod belief;
pub mod currency;
pub mod error;
pub mod exposure;
pub mod group;
pub mod metrics;
pub mod params;
pub mod participant;
pub mod payoff;
pub mod signal;
pub mod state;
pub mod views;

// Re-export key types for convenience
pub use belief::{posterior_high, Belief};
pub use currency::Currency;
pub use error::{ExposureError, ParamsError, RoundError};
pub use exposure::{hub_player, is_hub, ring_neighbors, signals_observed, ObservedSignal, SignalSource};
pub use group::{Group, RoundRecord};
pub use metrics::{summarize_group, GroupSummary, RoundMetrics};
pub use params::ExperimentParams;
pub use participant::{play_round, DecisionMaker};
pub use payoff::{compute_payoffs, contribution_amount, Decision, RoundOutcome};
pub use signal::{draw_noisy_signal, draw_round_signals};
pub use state::{GroupState, HiddenState, Signal, Topology};
pub use views::{DecisionPrompt, InstructionsView, ObservationView, Page, ResultsView};
