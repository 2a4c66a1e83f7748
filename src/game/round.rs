use alloc::boxed::Box;
use alloc::vec::Vec;

use rand_chacha::ChaCha8Rng;

use crate::card::{Card, Deck};
use crate::error::{ActionError, Error};
use crate::hand::{DealerHand, Hand};
use crate::policy::Policy;
use crate::result::RoundOutcome;
use crate::state::{Action, State, state_action_index};
use crate::table::{ValueTable, VisitTable};

use super::{Game, GameState, settle};

/// A resolved player hand, or a split into two resolved branches.
#[derive(Debug)]
enum Branch {
    Hand {
        hand: Hand,
        /// State-action indices decided on this hand, in order.
        decisions: Vec<usize>,
    },
    Split {
        /// State-action index of the split decision.
        decision: usize,
        first: Box<Branch>,
        second: Box<Branch>,
    },
}

impl Branch {
    const fn finished(hand: Hand, decisions: Vec<usize>) -> Self {
        Self::Hand { hand, decisions }
    }
}

/// Settles a branch against the dealer's final hand, recording first-visit
/// returns, and returns the branch total.
fn settle_branch(branch: Branch, dealer: &DealerHand, outcome: &mut RoundOutcome) -> f64 {
    match branch {
        Branch::Hand { hand, decisions } => {
            let result = settle(&hand, dealer);
            for decision in decisions {
                outcome.first_visits.assign(decision, result.reward);
            }
            outcome.hands.push(result);
            result.reward
        }
        Branch::Split {
            decision,
            first,
            second,
        } => {
            let total =
                settle_branch(*first, dealer, outcome) + settle_branch(*second, dealer, outcome);
            outcome.first_visits.assign(decision, total);
            total
        }
    }
}

impl<D: Deck> Game<D> {
    /// Plays a full round against `policy`.
    ///
    /// Every player hand (and, after splits, every sub-hand, first sub-hand
    /// first) is resolved before the dealer plays; hands are then settled in
    /// play order. The outcome carries the first-visit return of each
    /// decided state-action pair, a split being credited with the sum of
    /// its two branches.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy picks an action that is not allowed or
    /// a state has no legal action.
    pub fn play_round<P: Policy>(
        &mut self,
        policy: &mut P,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<RoundOutcome, Error> {
        self.deal();
        let hand = self.hands.pop().ok_or(ActionError::InvalidState)?;
        let upcard = self.upcard()?;
        let branch = self.play_branch(hand, upcard, policy, table, visits, rng)?;

        self.state = GameState::DealerTurn;
        self.dealer_play();

        let mut outcome = RoundOutcome::default();
        let total = settle_branch(branch, &self.dealer_hand, &mut outcome);
        outcome.total = total;
        self.results.extend_from_slice(&outcome.hands);
        self.state = GameState::RoundOver;
        Ok(outcome)
    }

    fn play_branch<P: Policy>(
        &mut self,
        mut hand: Hand,
        upcard: Card,
        policy: &mut P,
        table: &ValueTable,
        visits: &VisitTable,
        rng: &mut ChaCha8Rng,
    ) -> Result<Branch, Error> {
        let mut decisions = Vec::new();
        loop {
            let state = State::from_hand(&hand, upcard)?;
            let action = policy.choose(state, table, visits, rng)?;
            let decision = state_action_index(state.encode(), action);

            match action {
                Action::Stand => {
                    decisions.push(decision);
                    return Ok(Branch::finished(hand, decisions));
                }
                Action::Hit => {
                    decisions.push(decision);
                    hand.add_card(self.draw());
                    if hand.is_bust() {
                        return Ok(Branch::finished(hand, decisions));
                    }
                }
                Action::DoubleDown => {
                    if !hand.can_double() {
                        return Err(ActionError::CannotDouble.into());
                    }
                    decisions.push(decision);
                    hand.double_bet();
                    hand.add_card(self.draw());
                    return Ok(Branch::finished(hand, decisions));
                }
                Action::Split => {
                    let aces = hand.is_ace_pair();
                    let (first, second) = self.split_pair(hand)?;
                    let (first, second) = if aces {
                        (
                            Branch::finished(first, Vec::new()),
                            Branch::finished(second, Vec::new()),
                        )
                    } else {
                        (
                            self.play_branch(first, upcard, policy, table, visits, rng)?,
                            self.play_branch(second, upcard, policy, table, visits, rng)?,
                        )
                    };
                    return Ok(Branch::Split {
                        decision,
                        first: Box::new(first),
                        second: Box::new(second),
                    });
                }
            }
        }
    }
}
