//! Training and evaluation of a learning agent.
//!
//! Every run derives four independent ChaCha8 streams from its seed:
//! training cards, training policy draws, evaluation cards and evaluation
//! policy draws. Card draws and policy draws never share a stream.

use alloc::vec::Vec;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::card::Shoe;
use crate::error::Error;
use crate::game::Game;
use crate::learn::{Algorithm, EpisodeBuffers};
use crate::options::AgentOptions;
use crate::policy::{EpsilonGreedy, Greedy, Policy};
use crate::table::{ValueTable, VisitTable};

/// Stream of the training shoe.
pub const TRAIN_CARD_STREAM: u64 = 0;
/// Stream of the training policy's draws.
pub const TRAIN_POLICY_STREAM: u64 = 1;
/// Stream of the evaluation shoe.
pub const EVAL_CARD_STREAM: u64 = 2;
/// Stream of the evaluation policy's draws.
pub const EVAL_POLICY_STREAM: u64 = 3;

fn policy_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Mean of a slice of returns; zero when empty.
#[must_use]
pub fn mean_return(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "episode counts stay far below 2^52"
    )]
    let len = returns.len() as f64;
    returns.iter().sum::<f64>() / len
}

/// A learning agent: a value table, its visit counts and the machinery to
/// keep improving them.
///
/// Training is resumable: consecutive calls to [`Agent::train`] continue the
/// same card and policy streams.
#[derive(Debug, Clone)]
pub struct Agent {
    options: AgentOptions,
    table: ValueTable,
    visits: VisitTable,
    behavior: Option<EpsilonGreedy>,
    buffers: EpisodeBuffers,
    game: Game<Shoe>,
    rng: ChaCha8Rng,
    episodes: u64,
}

impl Agent {
    /// Creates an agent with freshly initialised tables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `options` fail validation.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::{Agent, AgentOptions, Algorithm};
    ///
    /// let options = AgentOptions::default()
    ///     .with_algorithm(Algorithm::ExpectedSarsa)
    ///     .with_decay_factor(100.0);
    /// let mut agent = Agent::new(options).unwrap();
    /// let returns = agent.train(1_000).unwrap();
    /// assert_eq!(returns.len(), 1_000);
    /// ```
    pub fn new(options: AgentOptions) -> Result<Self, Error> {
        options.validate()?;

        let behavior = if options.algorithm.requires_exploration() {
            options.exploration.map(EpsilonGreedy::new)
        } else {
            if options.exploration.is_some() {
                tracing::warn!(
                    algorithm = %options.algorithm,
                    "exploration schedule ignored; behavior policy is uniform"
                );
            }
            None
        };

        Ok(Self {
            options,
            table: ValueTable::new(options.initial_value),
            visits: VisitTable::new(),
            behavior,
            buffers: EpisodeBuffers::new(),
            game: Game::new(Shoe::with_stream(options.seed, TRAIN_CARD_STREAM)),
            rng: policy_rng(options.seed, TRAIN_POLICY_STREAM),
            episodes: 0,
        })
    }

    /// Returns the options the agent was built with.
    #[must_use]
    pub const fn options(&self) -> &AgentOptions {
        &self.options
    }

    /// Returns the algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.options.algorithm
    }

    /// Returns the value table.
    #[must_use]
    pub const fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Returns the visit counts.
    #[must_use]
    pub const fn visits(&self) -> &VisitTable {
        &self.visits
    }

    /// Returns the number of episodes trained so far.
    #[must_use]
    pub const fn episodes_trained(&self) -> u64 {
        self.episodes
    }

    /// Consumes the agent, returning its value and visit tables.
    #[must_use]
    pub fn into_tables(self) -> (ValueTable, VisitTable) {
        (self.table, self.visits)
    }

    /// Trains for `episodes` episodes and returns the return of each.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulator or a table update fails; the
    /// tables keep every update applied before the failure.
    pub fn train(&mut self, episodes: usize) -> Result<Vec<f64>, Error> {
        let algorithm = self.options.algorithm;
        let interval = self.options.log_interval;
        tracing::info!(
            %algorithm,
            episodes,
            seed = self.options.seed,
            "training started"
        );

        let mut returns = Vec::with_capacity(episodes);
        for _ in 0..episodes {
            if let Some(behavior) = self.behavior.as_mut() {
                behavior.set_episode(self.episodes);
            }
            let ret = algorithm.run_episode(
                &mut self.game,
                &mut self.table,
                &mut self.visits,
                self.behavior.as_mut(),
                &mut self.buffers,
                &mut self.rng,
            )?;
            returns.push(ret);
            self.episodes += 1;

            if interval != 0 && self.episodes % interval == 0 {
                tracing::debug!(
                    %algorithm,
                    episode = self.episodes,
                    mean_return = mean_return(&returns),
                    "training progress"
                );
            }
        }

        tracing::info!(
            %algorithm,
            episodes,
            mean_return = mean_return(&returns),
            "training finished"
        );
        Ok(returns)
    }

    /// Plays `episodes` greedy rounds with the current table on the
    /// evaluation streams and returns the return of each.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulator fails.
    pub fn evaluate(&self, episodes: usize) -> Result<Vec<f64>, Error> {
        evaluate(&self.table, self.options.seed, episodes)
    }
}

fn play_rounds<P: Policy>(
    policy: &mut P,
    table: &ValueTable,
    seed: u64,
    episodes: usize,
) -> Result<Vec<f64>, Error> {
    let mut game = Game::new(Shoe::with_stream(seed, EVAL_CARD_STREAM));
    let mut rng = policy_rng(seed, EVAL_POLICY_STREAM);
    let visits = VisitTable::new();
    tracing::info!(episodes, seed, "evaluation started");

    let mut returns = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        let outcome = game.play_round(policy, table, &visits, &mut rng)?;
        returns.push(outcome.total);
    }
    tracing::info!(
        episodes,
        seed,
        mean_return = mean_return(&returns),
        "evaluation finished"
    );
    Ok(returns)
}

/// Trains a fresh agent and returns its value table with the per-episode
/// training returns.
///
/// `decay_factor` sets the rational exploration schedule of the exploring
/// algorithms.
///
/// # Errors
///
/// Returns [`crate::ConfigError::MissingDecayFactor`] if the algorithm
/// explores and no decay factor is given, and propagates training errors.
pub fn train(
    algorithm: Algorithm,
    decay_factor: Option<f64>,
    seed: u64,
    episodes: usize,
) -> Result<(ValueTable, Vec<f64>), Error> {
    let mut options = AgentOptions::default()
        .with_algorithm(algorithm)
        .with_seed(seed);
    if let Some(decay_factor) = decay_factor {
        options = options.with_decay_factor(decay_factor);
    }

    let mut agent = Agent::new(options)?;
    let returns = agent.train(episodes)?;
    let (table, _) = agent.into_tables();
    Ok((table, returns))
}

/// Plays `episodes` rounds greedily with respect to `table`.
///
/// Repeated calls with the same arguments return identical results.
///
/// # Errors
///
/// Returns an error if the table has a reachable state without a legal
/// action or the simulator fails.
pub fn evaluate(table: &ValueTable, seed: u64, episodes: usize) -> Result<Vec<f64>, Error> {
    play_rounds(&mut Greedy, table, seed, episodes)
}

/// Plays `episodes` rounds with a fixed policy that does not read the value
/// table, such as [`crate::BasicStrategy`] or [`crate::Uniform`].
///
/// # Errors
///
/// Returns an error if the policy picks an illegal action.
pub fn evaluate_policy<P: Policy>(
    policy: &mut P,
    seed: u64,
    episodes: usize,
) -> Result<Vec<f64>, Error> {
    play_rounds(policy, &ValueTable::new(0.0), seed, episodes)
}
