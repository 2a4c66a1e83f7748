//! Action selection over a value table and exploration schedules.

use alloc::string::String;
use core::str::FromStr;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::{ConfigError, TableError};
use crate::state::{Action, NUM_ACTIONS, State};
use crate::table::{ILLEGAL, ValueTable, VisitTable};

#[cfg(feature = "std")]
fn ln(x: f64) -> f64 {
    x.ln()
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn ln(x: f64) -> f64 {
    libm::log(x)
}

#[cfg(feature = "std")]
fn powf(x: f64, p: f64) -> f64 {
    x.powf(p)
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn powf(x: f64, p: f64) -> f64 {
    libm::pow(x, p)
}

pub(crate) fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Exploration-decay family: maps a count `n` to an exploration rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decay {
    /// `ε = c`.
    Constant {
        /// Constant rate.
        c: f64,
    },
    /// `ε = c / (n + 1)^p`.
    Polynomial {
        /// Scale.
        c: f64,
        /// Exponent.
        p: f64,
    },
    /// `ε = c / ln(n + 2)`.
    Logarithmic {
        /// Scale.
        c: f64,
    },
    /// `ε = c / (c + n)`.
    Rational {
        /// Decay factor.
        c: f64,
    },
}

impl Decay {
    /// Builds a decay family from its name and parameters.
    ///
    /// `c` defaults to 1 for every family except `constant`; `polynomial`
    /// also requires `p`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names, missing required parameters or
    /// invalid values.
    pub fn from_name(name: &str, c: Option<f64>, p: Option<f64>) -> Result<Self, ConfigError> {
        let decay = match normalize(name).as_str() {
            "constant" => Self::Constant {
                c: c.ok_or(ConfigError::MissingDecayParameter {
                    family: "constant",
                    parameter: "c",
                })?,
            },
            "polynomial" | "poly" => Self::Polynomial {
                c: c.unwrap_or(1.0),
                p: p.ok_or(ConfigError::MissingDecayParameter {
                    family: "polynomial",
                    parameter: "p",
                })?,
            },
            "logarithmic" | "log" => Self::Logarithmic {
                c: c.unwrap_or(1.0),
            },
            "rational" => Self::Rational {
                c: c.unwrap_or(1.0),
            },
            _ => return Err(ConfigError::UnknownDecay(name.into())),
        };
        decay.validate()?;
        Ok(decay)
    }

    /// Checks that the parameters are finite and in range.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Constant { c } | Self::Logarithmic { c } if !(c.is_finite() && c >= 0.0) => {
                Err(ConfigError::InvalidParameter("c"))
            }
            Self::Polynomial { c, .. } if !(c.is_finite() && c >= 0.0) => {
                Err(ConfigError::InvalidParameter("c"))
            }
            Self::Polynomial { p, .. } if !(p.is_finite() && p >= 0.0) => {
                Err(ConfigError::InvalidParameter("p"))
            }
            Self::Rational { c } if !(c.is_finite() && c > 0.0) => {
                Err(ConfigError::InvalidParameter("c"))
            }
            _ => Ok(()),
        }
    }

    /// Returns the exploration rate at count `n`, clamped to `[0, 1]`.
    #[must_use]
    pub fn epsilon(&self, n: u64) -> f64 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "counts stay far below 2^52"
        )]
        let n = n as f64;
        let epsilon = match *self {
            Self::Constant { c } => c,
            Self::Polynomial { c, p } => c / powf(n + 1.0, p),
            Self::Logarithmic { c } => c / ln(n + 2.0),
            Self::Rational { c } => c / (c + n),
        };
        epsilon.clamp(0.0, 1.0)
    }
}

/// Which count drives an exploration schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecayIndex {
    /// Number of episodes played so far.
    Episode,
    /// Number of visits to the current state so far.
    #[default]
    StateVisits,
}

impl FromStr for DecayIndex {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "episode" | "episodes" => Ok(Self::Episode),
            "state" | "statevisits" | "visits" => Ok(Self::StateVisits),
            _ => Err(ConfigError::UnknownDecayIndex(s.into())),
        }
    }
}

/// An exploration schedule: a decay family and the count it is indexed by.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exploration {
    /// Decay family.
    pub decay: Decay,
    /// Count driving the decay.
    pub index: DecayIndex,
}

impl Exploration {
    /// The count-based schedule `ε = k / (k + visits)` used by the learning
    /// algorithms.
    #[must_use]
    pub const fn rational(decay_factor: f64) -> Self {
        Self {
            decay: Decay::Rational { c: decay_factor },
            index: DecayIndex::StateVisits,
        }
    }

    /// Returns the exploration rate given the episode index and the visits to
    /// the current state.
    #[must_use]
    pub fn epsilon(&self, episode: u64, state_visits: u64) -> f64 {
        match self.index {
            DecayIndex::Episode => self.decay.epsilon(episode),
            DecayIndex::StateVisits => self.decay.epsilon(state_visits),
        }
    }
}

/// Picks the highest-valued legal action, breaking ties by lowest ordinal.
///
/// Returns `None` when every entry is masked.
#[must_use]
pub fn greedy(row: &[f64; NUM_ACTIONS]) -> Option<Action> {
    let mut best: Option<(Action, f64)> = None;
    for action in Action::ALL {
        let value = row[action.index()];
        if value == ILLEGAL {
            continue;
        }
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((action, value));
        }
    }
    best.map(|(action, _)| action)
}

/// Picks a legal action uniformly at random.
///
/// Returns `None` when every entry is masked.
pub fn random(row: &[f64; NUM_ACTIONS], rng: &mut ChaCha8Rng) -> Option<Action> {
    let legal = row.iter().filter(|&&value| value != ILLEGAL).count();
    if legal == 0 {
        return None;
    }
    let pick = rng.random_range(0..legal);
    Action::ALL
        .into_iter()
        .filter(|action| row[action.index()] != ILLEGAL)
        .nth(pick)
}

/// Explores with probability `epsilon`, otherwise acts greedily.
pub fn epsilon_greedy(
    row: &[f64; NUM_ACTIONS],
    epsilon: f64,
    rng: &mut ChaCha8Rng,
) -> Option<Action> {
    if rng.random::<f64>() < epsilon {
        random(row, rng)
    } else {
        greedy(row)
    }
}

/// Expected value of the action an epsilon-greedy policy would pick:
/// `(1 - ε) · max + ε · mean` over the legal entries.
#[must_use]
pub fn expected_epsilon_greedy(row: &[f64; NUM_ACTIONS], epsilon: f64) -> Option<f64> {
    let mut max = ILLEGAL;
    let mut sum = 0.0;
    let mut legal = 0_u32;
    for &value in row.iter().filter(|&&value| value != ILLEGAL) {
        max = max.max(value);
        sum += value;
        legal += 1;
    }
    if legal == 0 {
        return None;
    }
    #[expect(
        clippy::suboptimal_flops,
        reason = "mul_add is unavailable without std"
    )]
    let expected = (1.0 - epsilon) * max + epsilon * (sum / f64::from(legal));
    Some(expected)
}

/// A rule that picks an action in a state.
pub trait Policy {
    /// Chooses an action for `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state's table row has no legal action.
    fn choose(
        &mut self,
        state: State,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError>;
}

/// Always exploits the value table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Policy for Greedy {
    fn choose(
        &mut self,
        state: State,
        table: &ValueTable,
        _visits: &VisitTable,
        _rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        table.best_action(state.encode())
    }
}

/// Picks uniformly among the legal actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl Policy for Uniform {
    fn choose(
        &mut self,
        state: State,
        table: &ValueTable,
        _visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        let index = state.encode();
        random(table.row(index)?, rng).ok_or(TableError::NoLegalAction(index))
    }
}

/// Epsilon-greedy over the value table with a decaying exploration rate.
#[derive(Debug, Clone, Copy)]
pub struct EpsilonGreedy {
    exploration: Exploration,
    episode: u64,
}

impl EpsilonGreedy {
    /// Creates the policy at episode zero.
    #[must_use]
    pub const fn new(exploration: Exploration) -> Self {
        Self {
            exploration,
            episode: 0,
        }
    }

    /// Returns the exploration schedule.
    #[must_use]
    pub const fn exploration(&self) -> Exploration {
        self.exploration
    }

    /// Sets the episode index used by episode-indexed schedules.
    pub const fn set_episode(&mut self, episode: u64) {
        self.episode = episode;
    }

    /// Returns the current exploration rate for a state.
    #[must_use]
    pub fn epsilon(&self, state: usize, visits: &VisitTable) -> f64 {
        self.exploration
            .epsilon(self.episode, visits.state_visits(state))
    }

    /// Returns the expected value of the policy's action in a state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state is outside the table or fully masked.
    pub fn expected_value(
        &self,
        state: usize,
        table: &ValueTable,
        visits: &VisitTable,
    ) -> Result<f64, TableError> {
        expected_epsilon_greedy(table.row(state)?, self.epsilon(state, visits))
            .ok_or(TableError::NoLegalAction(state))
    }

    /// Chooses an action by state index.
    ///
    /// # Errors
    ///
    /// Returns an error if the state is outside the table or fully masked.
    pub fn choose_index(
        &self,
        state: usize,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        let epsilon = self.epsilon(state, visits);
        epsilon_greedy(table.row(state)?, epsilon, rng).ok_or(TableError::NoLegalAction(state))
    }
}

impl Policy for EpsilonGreedy {
    fn choose(
        &mut self,
        state: State,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        self.choose_index(state.encode(), table, visits, rng)
    }
}
