//! Settlement results and per-episode bookkeeping.

use alloc::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use hashbrown::HashMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::state::State;

/// Result of a single hand after settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOutcome {
    /// Player wins (dealer busts or player has higher value).
    Win,
    /// Player loses (player busts or dealer has higher value).
    Lose,
    /// Push (tie, including natural against natural).
    Push,
    /// Player has a natural against a dealer without one.
    Blackjack,
}

/// Result for a single settled hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandResult {
    /// The outcome of the hand.
    pub outcome: HandOutcome,
    /// Bet multiplier (2 after doubling down).
    pub bet: u8,
    /// Net return in units of the base bet.
    pub reward: f64,
    /// The player's hand value.
    pub player_value: u8,
    /// The dealer's hand value.
    pub dealer_value: u8,
}

/// Hands settled by a single step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settlement {
    /// The active hand is still being played.
    Open,
    /// The active hand settled with this return.
    Hand(f64),
    /// A split of aces settled both one-card hands at once, in play order.
    AcePair(f64, f64),
}

/// Outcome of one decision in the step-by-step simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Sum of the returns settled by this step.
    pub reward: f64,
    /// State of the hand that continues from this decision, if any.
    pub next_state: Option<State>,
    /// State of the second hand created by a split, if any.
    pub split_state: Option<State>,
    /// Hands settled by this step.
    pub settled: Settlement,
    /// Whether the round is over.
    pub terminated: bool,
}

/// First-visit returns of state-action pairs within one episode.
///
/// Each flat state-action index keeps the first return assigned to it;
/// iteration follows assignment order.
#[derive(Debug, Clone, Default)]
pub struct FirstVisits {
    returns: HashMap<usize, f64>,
    order: Vec<usize>,
}

impl FirstVisits {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `ret` to `index` unless it already holds a return.
    ///
    /// Returns whether the assignment happened.
    pub fn assign(&mut self, index: usize, ret: f64) -> bool {
        if self.returns.contains_key(&index) {
            return false;
        }
        self.returns.insert(index, ret);
        self.order.push(index);
        true
    }

    /// Returns the return assigned to `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.returns.get(&index).copied()
    }

    /// Returns the number of assigned pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether no pair has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forgets every assignment, keeping the allocations.
    pub fn clear(&mut self) {
        self.returns.clear();
        self.order.clear();
    }

    /// Iterates over `(index, return)` in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.order
            .iter()
            .filter_map(|index| self.returns.get(index).map(|&ret| (*index, ret)))
    }
}

/// Result of a full round played against a policy.
#[derive(Debug, Clone, Default)]
pub struct RoundOutcome {
    /// Sum of all hand returns.
    pub total: f64,
    /// Settled hands in play order.
    pub hands: Vec<HandResult>,
    /// First-visit return of every state-action pair decided this round.
    pub first_visits: FirstVisits,
}
