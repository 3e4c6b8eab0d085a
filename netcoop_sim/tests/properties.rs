//! Property tests for the rule set, driven through the simulation harness.

use netcoop_core::{
    compute_payoffs, signals_observed, Currency, ExperimentParams, HiddenState, SignalSource,
    Topology,
};
use netcoop_env::PlayerId;
use netcoop_sim::{expected_exposure_len, Oracle, SimConfig, SimWorld, Strategy as Play};
use proptest::prelude::*;

fn topology() -> impl Strategy<Value = Topology> {
    prop_oneof![Just(Topology::Ring), Just(Topology::Hub)]
}

fn signal() -> impl Strategy<Value = HiddenState> {
    prop_oneof![Just(HiddenState::High), Just(HiddenState::Low)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exposure_shape_holds_for_any_group(
        topology in topology(),
        signals in prop::collection::vec(signal(), 3..16),
    ) {
        let n = signals.len();
        for player in PlayerId::all(n) {
            let observed = signals_observed(topology, player, &signals).unwrap();

            prop_assert_eq!(Some(observed.len()), expected_exposure_len(topology, player, n));
            prop_assert_eq!(observed[0].source, SignalSource::You);
            prop_assert_eq!(observed[0].signal, signals[player.index()]);

            for o in &observed {
                prop_assert_eq!(o.signal, signals[o.source.origin(player).index()]);
            }
            let mut origins: Vec<PlayerId> = observed.iter().map(|o| o.source.origin(player)).collect();
            origins.sort();
            origins.dedup();
            prop_assert_eq!(origins.len(), observed.len());
        }
    }

    #[test]
    fn payoffs_follow_linear_formula(
        decisions in prop::collection::vec(any::<bool>(), 3..16),
        high in any::<bool>(),
    ) {
        let params = ExperimentParams::default();
        let mpcr = if high { params.mpcr_high } else { params.mpcr_low };
        let outcome = compute_payoffs(&params, mpcr, &decisions);

        let contributors = decisions.iter().filter(|c| **c).count() as i64;
        prop_assert_eq!(outcome.total_contribution, Currency::from_points(10 * contributors));

        let group_return = outcome.total_contribution.scaled(mpcr);
        for (payoff, contributed) in outcome.payoffs.iter().zip(&decisions) {
            let own = if *contributed { Currency::from_points(10) } else { Currency::ZERO };
            prop_assert_eq!(*payoff, Currency::from_points(20) - own + group_return);
        }
    }

    #[test]
    fn simulated_sessions_satisfy_invariants(
        seed in any::<u64>(),
        topology in topology(),
        accuracy in 0.0f64..=1.0,
    ) {
        let config = SimConfig {
            seed,
            num_groups: 2,
            topology,
            params: ExperimentParams {
                num_rounds: 5,
                signal_accuracy: accuracy,
                ..Default::default()
            },
            strategies: vec![
                Play::SignalMajority,
                Play::Bayesian { threshold: 0.5 },
                Play::FreeRide,
            ],
            belief_noise_std: 3.0,
        };
        let mut world = SimWorld::new(config).unwrap();
        world.run().unwrap();

        let mut oracle = Oracle::new();
        for group in world.groups() {
            oracle.audit_group(group);
            prop_assert!(group.is_finished());
        }
        prop_assert!(oracle.is_clean(), "{:?}", oracle.violations());
    }

    #[test]
    fn same_seed_same_session(seed in any::<u64>()) {
        let config = SimConfig {
            seed,
            num_groups: 1,
            params: ExperimentParams { num_rounds: 3, ..Default::default() },
            ..Default::default()
        };
        let a = SimWorld::new(config.clone()).unwrap().run().unwrap();
        let b = SimWorld::new(config).unwrap().run().unwrap();
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
