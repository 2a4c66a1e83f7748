//! Independent train-then-evaluate trials over a grid of configurations.
//!
//! With the `parallel` feature the trials run on the rayon thread pool; each
//! one owns its tables and random streams, so no state is shared.

use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::agent::{self, mean_return};
use crate::error::{ConfigError, Error};
use crate::learn::Algorithm;

/// One configuration to train and evaluate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trial {
    /// Learning algorithm.
    pub algorithm: Algorithm,
    /// Decay factor of the exploration schedule, if the algorithm explores.
    pub decay_factor: Option<f64>,
}

/// Result of one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialReport {
    /// The trial that was run.
    pub trial: Trial,
    /// Mean return of the greedy policy over the evaluation episodes.
    pub mean_return: f64,
}

/// Episode counts and seed shared by every trial of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepOptions {
    /// Training episodes per trial.
    pub train_episodes: usize,
    /// Evaluation episodes per trial.
    pub eval_episodes: usize,
    /// Seed of every trial.
    pub seed: u64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            train_episodes: 1_000_000,
            eval_episodes: 1_000_000,
            seed: 42,
        }
    }
}

/// Builds the comparison grid: Q-learning once, then every exploring
/// algorithm with decay factors `step, 2·step, …` up to `max`.
///
/// # Errors
///
/// Returns an error if `step` is zero.
pub fn decay_grid(step: u32, max: u32) -> Result<Vec<Trial>, ConfigError> {
    if step == 0 {
        return Err(ConfigError::InvalidParameter("step"));
    }

    let mut trials = Vec::new();
    for algorithm in Algorithm::ALL {
        if algorithm.requires_exploration() {
            trials.extend((step..=max).step_by(step as usize).map(|factor| Trial {
                algorithm,
                decay_factor: Some(f64::from(factor)),
            }));
        } else {
            trials.push(Trial {
                algorithm,
                decay_factor: None,
            });
        }
    }
    Ok(trials)
}

fn run_trial(trial: Trial, options: &SweepOptions) -> Result<TrialReport, Error> {
    let (table, _) = agent::train(
        trial.algorithm,
        trial.decay_factor,
        options.seed,
        options.train_episodes,
    )?;
    let returns = agent::evaluate(&table, options.seed, options.eval_episodes)?;
    let report = TrialReport {
        trial,
        mean_return: mean_return(&returns),
    };
    tracing::info!(
        algorithm = %trial.algorithm,
        decay_factor = ?trial.decay_factor,
        mean_return = report.mean_return,
        "trial finished"
    );
    Ok(report)
}

#[cfg(feature = "parallel")]
fn run_all(trials: &[Trial], options: &SweepOptions) -> Result<Vec<TrialReport>, Error> {
    trials
        .par_iter()
        .map(|&trial| run_trial(trial, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_all(trials: &[Trial], options: &SweepOptions) -> Result<Vec<TrialReport>, Error> {
    trials
        .iter()
        .map(|&trial| run_trial(trial, options))
        .collect()
}

/// Trains and evaluates every trial, returning reports in trial order.
///
/// # Errors
///
/// Returns the first error any trial hits.
pub fn run_trials(trials: &[Trial], options: &SweepOptions) -> Result<Vec<TrialReport>, Error> {
    tracing::info!(trials = trials.len(), seed = options.seed, "sweep started");
    run_all(trials, options)
}
