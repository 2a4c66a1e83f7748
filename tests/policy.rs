//! Policy, exploration schedule and configuration tests.

#![allow(clippy::float_cmp)]

use bjrl::policy::{epsilon_greedy, expected_epsilon_greedy, greedy, random};
use bjrl::{
    Action, AgentOptions, Algorithm, BasicStrategy, ConfigError, Decay, DecayIndex, Exploration,
    HandType, ILLEGAL, NUM_ACTIONS, NUM_STATES, State,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const ROW: [f64; NUM_ACTIONS] = [0.2, -0.4, ILLEGAL, 0.6];

fn chart_state(hand_type: HandType, value: u8, upcard: u8, can_double: bool) -> State {
    State::new(
        hand_type,
        value,
        upcard,
        can_double,
        hand_type == HandType::Pair,
    )
    .unwrap()
}

#[test]
fn greedy_ignores_masked_entries_and_breaks_ties_low() {
    assert_eq!(greedy(&ROW), Some(Action::Split));
    assert_eq!(greedy(&[0.1, 0.1, ILLEGAL, ILLEGAL]), Some(Action::Hit));
    assert_eq!(greedy(&[-5.0, ILLEGAL, -1.0, ILLEGAL]), Some(Action::DoubleDown));
    assert_eq!(greedy(&[ILLEGAL; NUM_ACTIONS]), None);
}

#[test]
fn random_never_picks_masked_entries() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut counts = [0_u32; NUM_ACTIONS];
    for _ in 0..3_000 {
        let action = random(&ROW, &mut rng).unwrap();
        counts[action.index()] += 1;
    }
    assert_eq!(counts[Action::DoubleDown.index()], 0);
    for action in [Action::Hit, Action::Stand, Action::Split] {
        assert!(counts[action.index()] > 800);
    }
    assert_eq!(random(&[ILLEGAL; NUM_ACTIONS], &mut rng), None);
}

#[test]
fn epsilon_extremes() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    for _ in 0..100 {
        assert_eq!(epsilon_greedy(&ROW, 0.0, &mut rng), Some(Action::Split));
    }
    let explored = (0..1_000)
        .filter(|_| epsilon_greedy(&ROW, 1.0, &mut rng) != Some(Action::Split))
        .count();
    assert!(explored > 500);
}

#[test]
fn expected_value_interpolates_max_and_mean() {
    assert!((expected_epsilon_greedy(&ROW, 0.0).unwrap() - 0.6).abs() < 1e-12);
    let mean = (0.2 - 0.4 + 0.6) / 3.0;
    assert!((expected_epsilon_greedy(&ROW, 1.0).unwrap() - mean).abs() < 1e-12);
    let half = 0.5 * 0.6 + 0.5 * mean;
    assert!((expected_epsilon_greedy(&ROW, 0.5).unwrap() - half).abs() < 1e-12);
    assert_eq!(expected_epsilon_greedy(&[ILLEGAL; NUM_ACTIONS], 0.5), None);
}

#[test]
fn decay_families() {
    let rational = Decay::Rational { c: 10.0 };
    assert!((rational.epsilon(0) - 1.0).abs() < 1e-12);
    assert!((rational.epsilon(90) - 0.1).abs() < 1e-12);

    let polynomial = Decay::Polynomial { c: 1.0, p: 2.0 };
    assert!((polynomial.epsilon(3) - 1.0 / 16.0).abs() < 1e-12);

    let logarithmic = Decay::Logarithmic { c: 1.0 };
    assert!((logarithmic.epsilon(0) - 1.0).abs() < 1e-12);
    assert!((logarithmic.epsilon(5) - 1.0 / 7.0_f64.ln()).abs() < 1e-12);
    assert!(logarithmic.epsilon(1_000) < 0.2);

    assert!((Decay::Constant { c: 0.3 }.epsilon(1_000_000) - 0.3).abs() < 1e-12);
    assert!((Decay::Constant { c: 4.0 }.epsilon(0) - 1.0).abs() < 1e-12);
}

#[test]
fn decay_from_name() {
    assert_eq!(
        Decay::from_name("Rational", Some(5.0), None),
        Ok(Decay::Rational { c: 5.0 })
    );
    assert_eq!(
        Decay::from_name("log", None, None),
        Ok(Decay::Logarithmic { c: 1.0 })
    );
    assert_eq!(
        Decay::from_name("polynomial", None, None),
        Err(ConfigError::MissingDecayParameter {
            family: "polynomial",
            parameter: "p"
        })
    );
    assert_eq!(
        Decay::from_name("constant", None, None),
        Err(ConfigError::MissingDecayParameter {
            family: "constant",
            parameter: "c"
        })
    );
    assert_eq!(
        Decay::from_name("cosine", None, None),
        Err(ConfigError::UnknownDecay("cosine".into()))
    );
    assert_eq!(
        Decay::from_name("rational", Some(0.0), None),
        Err(ConfigError::InvalidParameter("c"))
    );
}

#[test]
fn exploration_index_selects_count() {
    let by_episode = Exploration {
        decay: Decay::Rational { c: 1.0 },
        index: DecayIndex::Episode,
    };
    assert!((by_episode.epsilon(1, 99) - 0.5).abs() < 1e-12);
    let by_visits = Exploration::rational(1.0);
    assert!((by_visits.epsilon(1, 99) - 0.01).abs() < 1e-12);
    assert_eq!("episodes".parse::<DecayIndex>(), Ok(DecayIndex::Episode));
    assert_eq!("state-visits".parse::<DecayIndex>(), Ok(DecayIndex::StateVisits));
    assert!("hands".parse::<DecayIndex>().is_err());
}

#[test]
fn algorithm_names_parse() {
    assert_eq!("Q-Learning".parse(), Ok(Algorithm::QLearning));
    assert_eq!("sarsa".parse(), Ok(Algorithm::Sarsa));
    assert_eq!("expected_sarsa".parse(), Ok(Algorithm::ExpectedSarsa));
    assert_eq!("Monte Carlo".parse(), Ok(Algorithm::MonteCarlo));
    assert_eq!(
        "td-lambda".parse::<Algorithm>(),
        Err(ConfigError::UnknownAlgorithm("td-lambda".into()))
    );
    for algorithm in Algorithm::ALL {
        assert_eq!(algorithm.name().parse(), Ok(algorithm));
        assert_eq!(algorithm.to_string(), algorithm.name());
    }
}

#[test]
fn default_is_exploration_free_q_learning() {
    let options = AgentOptions::default();
    assert_eq!(options.algorithm, Algorithm::QLearning);
    assert_eq!(options.exploration, None);
    assert_eq!(options.seed, 42);
    assert_eq!(options.validate(), Ok(()));
}

#[test]
fn exploring_algorithms_need_a_schedule() {
    for algorithm in [Algorithm::Sarsa, Algorithm::ExpectedSarsa, Algorithm::MonteCarlo] {
        let options = AgentOptions::default().with_algorithm(algorithm);
        assert_eq!(
            options.validate(),
            Err(ConfigError::MissingDecayFactor(algorithm.name()))
        );
        assert_eq!(options.with_decay_factor(10.0).validate(), Ok(()));
    }
}

#[test]
fn options_reject_bad_numbers() {
    assert_eq!(
        AgentOptions::default()
            .with_initial_value(f64::NAN)
            .validate(),
        Err(ConfigError::InvalidParameter("initial_value"))
    );
    assert_eq!(
        AgentOptions::default()
            .with_algorithm(Algorithm::Sarsa)
            .with_decay_factor(-1.0)
            .validate(),
        Err(ConfigError::InvalidParameter("c"))
    );
}

#[test]
fn basic_strategy_chart_cells() {
    let cells = [
        (chart_state(HandType::Hard, 11, 11, true), Action::DoubleDown),
        (chart_state(HandType::Hard, 11, 11, false), Action::Hit),
        (chart_state(HandType::Hard, 16, 10, false), Action::Hit),
        (chart_state(HandType::Hard, 16, 6, false), Action::Stand),
        (chart_state(HandType::Soft, 18, 3, true), Action::DoubleDown),
        (chart_state(HandType::Soft, 18, 3, false), Action::Stand),
        (chart_state(HandType::Soft, 18, 9, false), Action::Hit),
        (chart_state(HandType::Pair, 8, 10, true), Action::Split),
        (chart_state(HandType::Pair, 10, 6, true), Action::Stand),
        (chart_state(HandType::Pair, 5, 9, true), Action::DoubleDown),
        (chart_state(HandType::Pair, 11, 11, true), Action::Split),
    ];
    for (state, action) in cells {
        assert_eq!(BasicStrategy::action(state), action, "{state:?}");
    }
}

#[test]
fn basic_strategy_only_picks_legal_actions() {
    for index in 0..NUM_STATES {
        let state = State::decode(index).unwrap();
        if state.is_legal() {
            assert!(state.allows(BasicStrategy::action(state)), "{state:?}");
        }
    }
}
