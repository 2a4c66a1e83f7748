//! One-step temporal-difference control.
//!
//! The three variants share one episode loop and differ only in how they
//! act and how they value the states a decision leads to. A split leads to
//! two states, so the bootstrap sums over both branches.

use rand_chacha::ChaCha8Rng;

use crate::card::Deck;
use crate::error::{Error, TableError};
use crate::game::Game;
use crate::policy::{EpsilonGreedy, random};
use crate::result::Step;
use crate::state::{Action, State};
use crate::table::{ValueTable, VisitTable};

/// How a TD variant acts and bootstraps.
#[derive(Debug, Clone, Copy)]
enum Rule<'a> {
    QLearning,
    Sarsa(&'a EpsilonGreedy),
    ExpectedSarsa(&'a EpsilonGreedy),
}

impl Rule<'_> {
    fn behave(
        self,
        state: usize,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        match self {
            Self::QLearning => {
                random(table.row(state)?, rng).ok_or(TableError::NoLegalAction(state))
            }
            Self::Sarsa(policy) | Self::ExpectedSarsa(policy) => {
                policy.choose_index(state, table, visits, rng)
            }
        }
    }

    fn value(
        self,
        state: usize,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<f64, TableError> {
        match self {
            Self::QLearning => table.get(state, table.best_action(state)?),
            Self::Sarsa(policy) => {
                let next = policy.choose_index(state, table, visits, rng)?;
                table.get(state, next)
            }
            Self::ExpectedSarsa(policy) => policy.expected_value(state, table, visits),
        }
    }

    fn bootstrap(
        self,
        step: &Step,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<f64, TableError> {
        let mut sum = 0.0;
        for state in [step.next_state, step.split_state].into_iter().flatten() {
            sum += self.value(state.encode(), table, visits, rng)?;
        }
        Ok(sum)
    }
}

fn td_episode<D: Deck>(
    rule: Rule<'_>,
    game: &mut Game<D>,
    table: &mut ValueTable,
    visits: &mut VisitTable,
    rng: &mut ChaCha8Rng,
) -> Result<f64, Error> {
    game.deal();
    let mut total = 0.0;

    while !game.is_over() {
        let state: State = game.current_state()?;
        let index = state.encode();
        let action = rule.behave(index, table, visits, rng)?;
        let step = game.step(action)?;
        total += step.reward;

        let target = step.reward + rule.bootstrap(&step, table, visits, rng)?;
        table.sample_average(visits, index, action, target)?;
    }

    Ok(total)
}

/// Plays one Q-learning episode: uniform behavior, bootstrapping from the
/// greedy value of every state the decision leads to.
///
/// # Errors
///
/// Propagates simulator and table errors.
pub fn q_learning_episode<D: Deck>(
    game: &mut Game<D>,
    table: &mut ValueTable,
    visits: &mut VisitTable,
    rng: &mut ChaCha8Rng,
) -> Result<f64, Error> {
    td_episode(Rule::QLearning, game, table, visits, rng)
}

/// Plays one SARSA episode, bootstrapping from a next action sampled from
/// `policy` at update time.
///
/// # Errors
///
/// Propagates simulator and table errors.
pub fn sarsa_episode<D: Deck>(
    game: &mut Game<D>,
    table: &mut ValueTable,
    visits: &mut VisitTable,
    policy: &EpsilonGreedy,
    rng: &mut ChaCha8Rng,
) -> Result<f64, Error> {
    td_episode(Rule::Sarsa(policy), game, table, visits, rng)
}

/// Plays one Expected SARSA episode, bootstrapping from the expected value
/// of `policy` in each next state.
///
/// # Errors
///
/// Propagates simulator and table errors.
pub fn expected_sarsa_episode<D: Deck>(
    game: &mut Game<D>,
    table: &mut ValueTable,
    visits: &mut VisitTable,
    policy: &EpsilonGreedy,
    rng: &mut ChaCha8Rng,
) -> Result<f64, Error> {
    td_episode(Rule::ExpectedSarsa(policy), game, table, visits, rng)
}
