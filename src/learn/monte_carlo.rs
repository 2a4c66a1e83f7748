//! First-visit Monte Carlo control.
//!
//! Returns are only known once a hand settles, and a split's return only
//! once both of its branches have. Pending splits wait on a [`SplitStack`]
//! until then.

use alloc::vec::Vec;

use rand_chacha::ChaCha8Rng;

use crate::card::Deck;
use crate::error::Error;
use crate::game::Game;
use crate::policy::Policy;
use crate::result::{FirstVisits, Settlement};
use crate::state::{Action, split_state_action_index, state_action_index};
use crate::table::{ValueTable, VisitTable};

/// An entry of the split stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pending {
    /// A split decision, by state-action index, waiting for its branches.
    Split(usize),
    /// The return of a split's first branch, waiting for the second.
    Partial(f64),
}

/// Pairs completed branch returns with the splits that produced them.
#[derive(Debug, Clone, Default)]
pub struct SplitStack {
    pending: Vec<Pending>,
}

impl SplitStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Records a split decision.
    pub fn push_split(&mut self, index: usize) {
        self.pending.push(Pending::Split(index));
    }

    /// Returns whether no split is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending entry.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Returns the pending entries, bottom first.
    #[must_use]
    pub fn entries(&self) -> &[Pending] {
        &self.pending
    }

    /// Completes the innermost open branch with return `ret`.
    ///
    /// If that branch was a split's first, its return waits for the second.
    /// If it was the second, the split is credited with both returns and the
    /// sum completes the enclosing branch in turn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnpairedSplitReturn`] if a partial return has no
    /// split beneath it.
    pub fn complete(&mut self, ret: f64, visits: &mut FirstVisits) -> Result<(), Error> {
        let mut ret = ret;
        loop {
            match self.pending.pop() {
                None => return Ok(()),
                Some(Pending::Split(index)) => {
                    self.pending.push(Pending::Split(index));
                    self.pending.push(Pending::Partial(ret));
                    return Ok(());
                }
                Some(Pending::Partial(first)) => {
                    let Some(Pending::Split(index)) = self.pending.pop() else {
                        return Err(Error::UnpairedSplitReturn);
                    };
                    ret += first;
                    visits.assign(index, ret);
                }
            }
        }
    }
}

/// Scratch space of a Monte Carlo episode, reused across episodes.
#[derive(Debug, Clone, Default)]
pub struct EpisodeBuffers {
    first_visits: FirstVisits,
    splits: SplitStack,
    decisions: Vec<usize>,
}

impl EpisodeBuffers {
    /// Creates empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every buffer, keeping the allocations.
    pub fn clear(&mut self) {
        self.first_visits.clear();
        self.splits.clear();
        self.decisions.clear();
    }
}

/// Plays one episode under `policy` and applies the first-visit update.
///
/// Every state-action pair decided on a hand is credited with that hand's
/// return, and every split with the sum of its branches. Each pair is
/// updated at most once per episode.
///
/// Allocates fresh scratch space; training loops should hold an
/// [`EpisodeBuffers`] and call [`monte_carlo_episode_with`].
///
/// # Errors
///
/// Propagates simulator and table errors, and
/// [`Error::UnpairedSplitReturn`] on split bookkeeping corruption.
pub fn monte_carlo_episode<D: Deck, P: Policy>(
    game: &mut Game<D>,
    table: &mut ValueTable,
    visits: &mut VisitTable,
    policy: &mut P,
    rng: &mut ChaCha8Rng,
) -> Result<f64, Error> {
    monte_carlo_episode_with(
        &mut EpisodeBuffers::new(),
        game,
        table,
        visits,
        policy,
        rng,
    )
}

/// [`monte_carlo_episode`] with caller-owned scratch space.
///
/// # Errors
///
/// Same as [`monte_carlo_episode`].
pub fn monte_carlo_episode_with<D: Deck, P: Policy>(
    buffers: &mut EpisodeBuffers,
    game: &mut Game<D>,
    table: &mut ValueTable,
    visits: &mut VisitTable,
    policy: &mut P,
    rng: &mut ChaCha8Rng,
) -> Result<f64, Error> {
    buffers.clear();
    let EpisodeBuffers {
        first_visits,
        splits,
        decisions,
    } = buffers;

    game.deal();
    let mut total = 0.0;

    while !game.is_over() {
        let state = game.current_state()?;
        let action = policy.choose(state, table, visits, rng)?;
        let index = state_action_index(state.encode(), action);
        let step = game.step(action)?;
        total += step.reward;

        if action == Action::Split {
            splits.push_split(index);
        } else {
            decisions.push(index);
        }

        match step.settled {
            Settlement::Open => {}
            Settlement::Hand(ret) => {
                for decision in decisions.drain(..) {
                    first_visits.assign(decision, ret);
                }
                splits.complete(ret, first_visits)?;
            }
            Settlement::AcePair(first, second) => {
                splits.complete(first, first_visits)?;
                splits.complete(second, first_visits)?;
            }
        }
    }

    for (index, ret) in first_visits.iter() {
        let (state, action) = split_state_action_index(index);
        table.sample_average(visits, state, action, ret)?;
    }
    Ok(total)
}
