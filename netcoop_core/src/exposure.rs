//! Mechanical information exposure.
//!
//! Given the treatment and the round's signals, decides which signals each
//! player is shown. Sharing is mechanical: players never choose what to
//! pass on, and only raw signals travel (never beliefs or decisions).
//!
//! # Rules
//!
//! ```text
//! RING (n = 8)                     HUB (hub = player 1)
//!
//!        1 ── 2                    hub:    You + Player 2..8
//!      8        3                  spoke:  You + Hub + every other spoke
//!      7        4
//!        6 ── 5
//!
//! player k sees You, Neighbor k-1, Neighbor k+1 (wrapping)
//! ```

use crate::error::ExposureError;
use crate::state::{Signal, Topology};
use netcoop_env::PlayerId;
use serde::{Deserialize, Serialize};

/// Where an observed signal came from, as presented to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalSource {
    /// The viewer's own signal
    You,
    /// Ring neighbour
    Neighbor(PlayerId),
    /// Any player, as seen by the hub
    Player(PlayerId),
    /// The hub's own signal, as seen by a spoke
    Hub,
    /// Another spoke, relayed by the hub broadcast
    Spoke(PlayerId),
}

impl SignalSource {
    /// Id of the player whose signal this is, given the viewer.
    pub fn origin(&self, viewer: PlayerId) -> PlayerId {
        match self {
            SignalSource::You => viewer,
            SignalSource::Hub => hub_player(),
            SignalSource::Neighbor(p) | SignalSource::Player(p) | SignalSource::Spoke(p) => *p,
        }
    }
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalSource::You => write!(f, "You"),
            SignalSource::Neighbor(p) => write!(f, "Neighbor {}", p),
            SignalSource::Player(p) => write!(f, "Player {}", p),
            SignalSource::Hub => write!(f, "Hub"),
            SignalSource::Spoke(p) => write!(f, "Spoke {}", p),
        }
    }
}

/// One entry of a player's observation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedSignal {
    pub source: SignalSource,
    pub signal: Signal,
}

impl ObservedSignal {
    pub fn new(source: SignalSource, signal: Signal) -> Self {
        Self { source, signal }
    }

    /// Label shown next to the signal (`"You"`, `"Neighbor 8"`, ...).
    pub fn label(&self) -> String {
        self.source.to_string()
    }
}

/// The hub is always player 1.
pub fn hub_player() -> PlayerId {
    PlayerId::from_index(0)
}

/// Whether `player` is the hub under `topology`.
///
/// Under the ring treatment nobody is a hub.
pub fn is_hub(topology: Topology, player: PlayerId) -> bool {
    topology == Topology::Hub && player == hub_player()
}

/// Left and right neighbours on a ring of `n` players.
///
/// Left of player 1 is player n; right of player n is player 1. A ring
/// needs at least 3 players for the two neighbours to be distinct.
pub fn ring_neighbors(player: PlayerId, n: usize) -> Result<[PlayerId; 2], ExposureError> {
    if n < 3 {
        return Err(ExposureError::RingTooSmall(n));
    }
    let idx = player.index();
    if idx >= n {
        return Err(ExposureError::UnknownPlayer { player, group_size: n });
    }
    let left = (idx + n - 1) % n;
    let right = (idx + 1) % n;
    Ok([PlayerId::from_index(left), PlayerId::from_index(right)])
}

/// Signals `player` observes this round.
///
/// `signals[i]` is the signal of player `i + 1`. The viewer's own signal is
/// always listed first.
pub fn signals_observed(
    topology: Topology,
    player: PlayerId,
    signals: &[Signal],
) -> Result<Vec<ObservedSignal>, ExposureError> {
    let n = signals.len();
    if n == 0 {
        return Err(ExposureError::UnknownPlayer { player, group_size: 0 });
    }
    if player.index() >= n {
        return Err(ExposureError::UnknownPlayer { player, group_size: n });
    }

    let signal_of = |p: PlayerId| signals[p.index()];
    let mut observed = vec![ObservedSignal::new(SignalSource::You, signal_of(player))];

    match topology {
        Topology::Ring => {
            for neighbor in ring_neighbors(player, n)? {
                observed.push(ObservedSignal::new(
                    SignalSource::Neighbor(neighbor),
                    signal_of(neighbor),
                ));
            }
        }
        Topology::Hub if is_hub(topology, player) => {
            observed.extend(
                PlayerId::all(n)
                    .filter(|p| *p != player)
                    .map(|p| ObservedSignal::new(SignalSource::Player(p), signal_of(p))),
            );
        }
        Topology::Hub => {
            let hub = hub_player();
            observed.push(ObservedSignal::new(SignalSource::Hub, signal_of(hub)));
            observed.extend(
                PlayerId::all(n)
                    .filter(|p| *p != hub && *p != player)
                    .map(|p| ObservedSignal::new(SignalSource::Spoke(p), signal_of(p))),
            );
        }
    }

    Ok(observed)
}

/// Resolves observations for every player of a group, in id order.
pub fn resolve_group(
    topology: Topology,
    signals: &[Signal],
) -> Result<Vec<Vec<ObservedSignal>>, ExposureError> {
    PlayerId::all(signals.len())
        .map(|p| signals_observed(topology, p, signals))
        .collect()
}

/// Checks that a signal slice covers a group of `expected` players.
pub fn check_signal_count(signals: &[Signal], expected: usize) -> Result<(), ExposureError> {
    if signals.len() != expected {
        return Err(ExposureError::SignalCountMismatch {
            expected,
            actual: signals.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HiddenState::{High, Low};

    fn pid(id: u32) -> PlayerId {
        PlayerId::new(id).unwrap()
    }

    fn labels(observed: &[ObservedSignal]) -> Vec<String> {
        observed.iter().map(|o| o.label()).collect()
    }

    // H L H H L L H L
    const SIGNALS: [Signal; 8] = [High, Low, High, High, Low, Low, High, Low];

    #[test]
    fn test_ring_neighbors_wrap() {
        assert_eq!(ring_neighbors(pid(1), 8), Ok([pid(8), pid(2)]));
        assert_eq!(ring_neighbors(pid(8), 8), Ok([pid(7), pid(1)]));
        assert_eq!(ring_neighbors(pid(4), 8), Ok([pid(3), pid(5)]));
        assert_eq!(ring_neighbors(pid(2), 3), Ok([pid(1), pid(3)]));
    }

    #[test]
    fn test_ring_neighbors_rejects_tiny_or_foreign() {
        assert_eq!(ring_neighbors(pid(1), 0), Err(ExposureError::RingTooSmall(0)));
        assert_eq!(ring_neighbors(pid(1), 2), Err(ExposureError::RingTooSmall(2)));
        assert_eq!(
            ring_neighbors(pid(9), 8),
            Err(ExposureError::UnknownPlayer { player: pid(9), group_size: 8 })
        );

        let err = signals_observed(Topology::Ring, pid(1), &SIGNALS[..2]).unwrap_err();
        assert_eq!(err, ExposureError::RingTooSmall(2));
    }

    #[test]
    fn test_ring_exposure() {
        let observed = signals_observed(Topology::Ring, pid(1), &SIGNALS).unwrap();
        assert_eq!(labels(&observed), vec!["You", "Neighbor 8", "Neighbor 2"]);
        assert_eq!(
            observed.iter().map(|o| o.signal).collect::<Vec<_>>(),
            vec![High, Low, Low]
        );

        let observed = signals_observed(Topology::Ring, pid(5), &SIGNALS).unwrap();
        assert_eq!(labels(&observed), vec!["You", "Neighbor 4", "Neighbor 6"]);
        assert_eq!(
            observed.iter().map(|o| o.signal).collect::<Vec<_>>(),
            vec![Low, High, Low]
        );
    }

    #[test]
    fn test_hub_sees_everyone() {
        let observed = signals_observed(Topology::Hub, pid(1), &SIGNALS).unwrap();
        assert_eq!(observed.len(), 8);
        assert_eq!(observed[0].source, SignalSource::You);
        for (i, o) in observed.iter().enumerate().skip(1) {
            let expected = pid(i as u32 + 1);
            assert_eq!(o.source, SignalSource::Player(expected));
            assert_eq!(o.signal, SIGNALS[expected.index()]);
        }
    }

    #[test]
    fn test_spoke_sees_hub_and_broadcast() {
        let observed = signals_observed(Topology::Hub, pid(3), &SIGNALS).unwrap();
        assert_eq!(
            labels(&observed),
            vec!["You", "Hub", "Spoke 2", "Spoke 4", "Spoke 5", "Spoke 6", "Spoke 7", "Spoke 8"]
        );
        assert_eq!(observed[0].signal, High);
        assert_eq!(observed[1].signal, SIGNALS[0]);
        assert_eq!(observed[2].signal, SIGNALS[1]);
    }

    #[test]
    fn test_every_player_sees_own_signal_first() {
        for topology in [Topology::Ring, Topology::Hub] {
            let all = resolve_group(topology, &SIGNALS).unwrap();
            for (i, observed) in all.iter().enumerate() {
                assert_eq!(observed[0].source, SignalSource::You);
                assert_eq!(observed[0].signal, SIGNALS[i]);
            }
        }
    }

    #[test]
    fn test_no_duplicate_origins() {
        for topology in [Topology::Ring, Topology::Hub] {
            for viewer in PlayerId::all(8) {
                let observed = signals_observed(topology, viewer, &SIGNALS).unwrap();
                let mut origins: Vec<_> = observed.iter().map(|o| o.source.origin(viewer)).collect();
                origins.sort();
                origins.dedup();
                assert_eq!(origins.len(), observed.len());
            }
        }
    }

    #[test]
    fn test_is_hub() {
        assert!(is_hub(Topology::Hub, pid(1)));
        assert!(!is_hub(Topology::Hub, pid(2)));
        assert!(!is_hub(Topology::Ring, pid(1)));
    }

    #[test]
    fn test_unknown_player() {
        let err = signals_observed(Topology::Ring, pid(9), &SIGNALS).unwrap_err();
        assert_eq!(err, ExposureError::UnknownPlayer { player: pid(9), group_size: 8 });
    }

    #[test]
    fn test_signal_count_check() {
        assert!(check_signal_count(&SIGNALS, 8).is_ok());
        assert_eq!(
            check_signal_count(&SIGNALS[..5], 8),
            Err(ExposureError::SignalCountMismatch { expected: 8, actual: 5 })
        );
    }
}
