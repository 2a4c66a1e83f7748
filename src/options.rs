//! Agent configuration options.

use crate::error::ConfigError;
use crate::learn::Algorithm;
use crate::policy::Exploration;

/// Configuration options for a learning agent.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use bjrl::{AgentOptions, Algorithm};
///
/// let options = AgentOptions::default()
///     .with_algorithm(Algorithm::Sarsa)
///     .with_decay_factor(1_000.0)
///     .with_seed(7);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentOptions {
    /// Learning algorithm.
    pub algorithm: Algorithm,
    /// Exploration schedule of the behavior policy. Ignored by Q-learning,
    /// whose behavior policy is uniform.
    pub exploration: Option<Exploration>,
    /// Value every legal table entry starts from.
    pub initial_value: f64,
    /// Seed of every random stream of the agent.
    pub seed: u64,
    /// Episodes between progress log lines; 0 disables them.
    pub log_interval: u64,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::QLearning,
            exploration: None,
            initial_value: 0.0,
            seed: 42,
            log_interval: 0,
        }
    }
}

impl AgentOptions {
    /// Sets the learning algorithm.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::{AgentOptions, Algorithm};
    ///
    /// let options = AgentOptions::default().with_algorithm(Algorithm::MonteCarlo);
    /// assert_eq!(options.algorithm, Algorithm::MonteCarlo);
    /// ```
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the exploration schedule.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::{AgentOptions, Decay, DecayIndex, Exploration};
    ///
    /// let exploration = Exploration {
    ///     decay: Decay::Constant { c: 0.1 },
    ///     index: DecayIndex::Episode,
    /// };
    /// let options = AgentOptions::default().with_exploration(exploration);
    /// assert_eq!(options.exploration, Some(exploration));
    /// ```
    #[must_use]
    pub const fn with_exploration(mut self, exploration: Exploration) -> Self {
        self.exploration = Some(exploration);
        self
    }

    /// Sets the rational schedule `ε = k / (k + visits)` with decay factor `k`.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::{AgentOptions, Exploration};
    ///
    /// let options = AgentOptions::default().with_decay_factor(100.0);
    /// assert_eq!(options.exploration, Some(Exploration::rational(100.0)));
    /// ```
    #[must_use]
    pub const fn with_decay_factor(self, decay_factor: f64) -> Self {
        self.with_exploration(Exploration::rational(decay_factor))
    }

    /// Sets the initial value of the legal table entries.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::AgentOptions;
    ///
    /// let options = AgentOptions::default().with_initial_value(1.0);
    /// assert_eq!(options.initial_value, 1.0);
    /// ```
    #[must_use]
    pub const fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = value;
        self
    }

    /// Sets the seed.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::AgentOptions;
    ///
    /// let options = AgentOptions::default().with_seed(2024);
    /// assert_eq!(options.seed, 2024);
    /// ```
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of episodes between progress log lines.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::AgentOptions;
    ///
    /// let options = AgentOptions::default().with_log_interval(10_000);
    /// assert_eq!(options.log_interval, 10_000);
    /// ```
    #[must_use]
    pub const fn with_log_interval(mut self, interval: u64) -> Self {
        self.log_interval = interval;
        self
    }

    /// Checks the options before any table is allocated.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial value is not finite, an exploring
    /// algorithm has no schedule, or the schedule's parameters are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_value.is_finite() {
            return Err(ConfigError::InvalidParameter("initial_value"));
        }
        if !self.algorithm.requires_exploration() {
            return Ok(());
        }
        let exploration = self
            .exploration
            .ok_or(ConfigError::MissingDecayFactor(self.algorithm.name()))?;
        exploration.decay.validate()
    }
}
