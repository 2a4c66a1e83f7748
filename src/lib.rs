//! Tabular reinforcement learning for infinite-shoe blackjack, with optional
//! `no_std` support.
//!
//! The crate provides a [`Game`] simulator with split recursion, a compact
//! state encoding shared by every table, four learning algorithms
//! (Q-learning, SARSA, Expected SARSA and first-visit Monte Carlo) and an
//! [`Agent`] that trains and evaluates them reproducibly from a seed.
//!
//! # Example
//!
//! ```
//! use bjrl::{Algorithm, evaluate, train};
//!
//! let (table, train_returns) = train(Algorithm::MonteCarlo, Some(10.0), 42, 2_000).unwrap();
//! assert_eq!(train_returns.len(), 2_000);
//!
//! let returns = evaluate(&table, 42, 500).unwrap();
//! assert_eq!(returns, evaluate(&table, 42, 500).unwrap());
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod agent;
pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod learn;
pub mod options;
pub mod policy;
pub mod result;
pub mod state;
pub mod strategy;
pub mod sweep;
pub mod table;

// Re-export main types
pub use agent::{Agent, evaluate, evaluate_policy, mean_return, train};
pub use card::{Card, Deck, Shoe, StackedDeck};
pub use error::{ActionError, ConfigError, Error, StateError, TableError};
pub use game::{Game, GameState};
pub use hand::{DealerHand, Hand, HandType};
pub use learn::Algorithm;
pub use options::AgentOptions;
pub use policy::{Decay, DecayIndex, EpsilonGreedy, Exploration, Greedy, Policy, Uniform};
pub use result::{FirstVisits, HandOutcome, HandResult, RoundOutcome, Settlement, Step};
pub use state::{Action, NUM_ACTIONS, NUM_STATES, SHAPE, State};
pub use strategy::BasicStrategy;
pub use sweep::{SweepOptions, Trial, TrialReport, decay_grid, run_trials};
pub use table::{ILLEGAL, ValueTable, VisitTable};
