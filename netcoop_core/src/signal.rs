//! Noisy private signals.
//!
//! Each round every player receives one signal that equals the hidden
//! state with probability `accuracy` and is flipped otherwise. Draws are
//! independent across players and rounds.

use crate::state::{HiddenState, Signal};
use netcoop_env::ExperimentContext;

/// Draws one signal about `true_state`.
pub fn draw_noisy_signal<C: ExperimentContext + ?Sized>(
    ctx: &C,
    true_state: HiddenState,
    accuracy: f64,
) -> Signal {
    if ctx.uniform() < accuracy {
        true_state
    } else {
        true_state.flipped()
    }
}

/// Draws one signal per player, in player-id order.
pub fn draw_round_signals<C: ExperimentContext + ?Sized>(
    ctx: &C,
    true_state: HiddenState,
    accuracy: f64,
    group_size: usize,
) -> Vec<Signal> {
    (0..group_size)
        .map(|_| draw_noisy_signal(ctx, true_state, accuracy))
        .collect()
}

/// Counts (HIGH, LOW) signals.
pub fn tally<'a, I>(signals: I) -> (usize, usize)
where
    I: IntoIterator<Item = &'a Signal>,
{
    signals.into_iter().fold((0, 0), |(high, low), s| match s {
        HiddenState::High => (high + 1, low),
        HiddenState::Low => (high, low + 1),
    })
}
