//! Tabular learning algorithms.
//!
//! Every algorithm plays one episode through the step-by-step simulator and
//! folds what it saw into a [`ValueTable`] and its [`VisitTable`] with the
//! sample-average update. The episode's summed return is handed back to the
//! caller.

use core::fmt;
use core::str::FromStr;

use rand_chacha::ChaCha8Rng;

use crate::card::Deck;
use crate::error::{ConfigError, Error};
use crate::game::Game;
use crate::policy::{EpsilonGreedy, normalize};
use crate::table::{ValueTable, VisitTable};

pub mod monte_carlo;
pub mod td;

pub use monte_carlo::{
    EpisodeBuffers, Pending, SplitStack, monte_carlo_episode, monte_carlo_episode_with,
};
pub use td::{expected_sarsa_episode, q_learning_episode, sarsa_episode};

/// A tabular learning algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Off-policy TD control with a uniform behavior policy.
    QLearning,
    /// On-policy TD control with an epsilon-greedy behavior policy.
    Sarsa,
    /// SARSA bootstrapping from the expected epsilon-greedy value.
    ExpectedSarsa,
    /// First-visit Monte Carlo control.
    MonteCarlo,
}

impl Algorithm {
    /// All algorithms, in comparison order.
    pub const ALL: [Self; 4] = [
        Self::QLearning,
        Self::Sarsa,
        Self::ExpectedSarsa,
        Self::MonteCarlo,
    ];

    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::QLearning => "q-learning",
            Self::Sarsa => "sarsa",
            Self::ExpectedSarsa => "expected-sarsa",
            Self::MonteCarlo => "monte-carlo",
        }
    }

    /// Returns whether the behavior policy needs an exploration schedule.
    #[must_use]
    pub const fn requires_exploration(self) -> bool {
        !matches!(self, Self::QLearning)
    }

    /// Plays and learns from one episode.
    ///
    /// `behavior` is the epsilon-greedy policy of the exploring algorithms;
    /// Q-learning ignores it. `buffers` is Monte Carlo scratch space and is
    /// left untouched by the TD algorithms.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDecayFactor`] if an exploring algorithm
    /// gets no behavior policy, and propagates simulator and table errors.
    pub fn run_episode<D: Deck>(
        self,
        game: &mut Game<D>,
        table: &mut ValueTable,
        visits: &mut VisitTable,
        behavior: Option<&mut EpsilonGreedy>,
        buffers: &mut EpisodeBuffers,
        rng: &mut ChaCha8Rng,
    ) -> Result<f64, Error> {
        match (self, behavior) {
            (Self::QLearning, _) => q_learning_episode(game, table, visits, rng),
            (Self::Sarsa, Some(policy)) => sarsa_episode(game, table, visits, policy, rng),
            (Self::ExpectedSarsa, Some(policy)) => {
                expected_sarsa_episode(game, table, visits, policy, rng)
            }
            (Self::MonteCarlo, Some(policy)) => {
                monte_carlo_episode_with(buffers, game, table, visits, policy, rng)
            }
            (_, None) => Err(ConfigError::MissingDecayFactor(self.name()).into()),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "qlearning" | "q" => Ok(Self::QLearning),
            "sarsa" => Ok(Self::Sarsa),
            "expectedsarsa" | "esarsa" => Ok(Self::ExpectedSarsa),
            "montecarlo" | "mc" => Ok(Self::MonteCarlo),
            _ => Err(ConfigError::UnknownAlgorithm(s.into())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
