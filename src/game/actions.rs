use crate::card::Deck;
use crate::error::ActionError;
use crate::hand::Hand;
use crate::result::{Settlement, Step};
use crate::state::{Action, State};

use super::{Game, GameState, settle};

impl<D: Deck> Game<D> {
    /// Applies a decision to the active hand.
    ///
    /// After a split the first sub-hand becomes active: its state is
    /// reported as `next_state` and the second sub-hand's as `split_state`.
    /// Split aces receive one card each and settle at once.
    ///
    /// The dealer plays out right before the first hand of the round
    /// settles. With split hands this means the dealer draws before any
    /// later sub-hand does; the dealer's hand is final from that point on.
    ///
    /// # Errors
    ///
    /// Returns an error if no hand is waiting for a decision or the action is
    /// not allowed for the active hand.
    pub fn step(&mut self, action: Action) -> Result<Step, ActionError> {
        if self.state != GameState::PlayerTurn || self.hands.is_empty() {
            return Err(ActionError::InvalidState);
        }

        match action {
            Action::Hit => self.hit(),
            Action::Stand => self.settle_active(),
            Action::DoubleDown => self.double_down(),
            Action::Split => self.split(),
        }
    }

    fn active_mut(&mut self) -> Result<&mut Hand, ActionError> {
        self.hands.last_mut().ok_or(ActionError::InvalidState)
    }

    fn observe_active(&self) -> Result<State, ActionError> {
        let hand = self.active_hand().ok_or(ActionError::InvalidState)?;
        Ok(State::from_hand(hand, self.upcard()?)?)
    }

    fn hit(&mut self) -> Result<Step, ActionError> {
        let card = self.draw();
        let hand = self.active_mut()?;
        hand.add_card(card);
        if hand.is_bust() {
            return self.settle_active();
        }

        Ok(Step {
            reward: 0.0,
            next_state: Some(self.observe_active()?),
            split_state: None,
            settled: Settlement::Open,
            terminated: false,
        })
    }

    fn double_down(&mut self) -> Result<Step, ActionError> {
        if !self.active_mut()?.can_double() {
            return Err(ActionError::CannotDouble);
        }
        let card = self.draw();
        let hand = self.active_mut()?;
        hand.double_bet();
        hand.add_card(card);
        self.settle_active()
    }

    fn split(&mut self) -> Result<Step, ActionError> {
        if !self.active_mut()?.can_split() {
            return Err(ActionError::CannotSplit);
        }
        let hand = self.hands.pop().ok_or(ActionError::InvalidState)?;
        let aces = hand.is_ace_pair();
        let (first, second) = self.split_pair(hand)?;

        if aces {
            let first = self.settle_hand(&first);
            let second = self.settle_hand(&second);
            return Ok(Step {
                reward: first + second,
                next_state: None,
                split_state: None,
                settled: Settlement::AcePair(first, second),
                terminated: self.finish_if_done(),
            });
        }

        let upcard = self.upcard()?;
        let next_state = State::from_hand(&first, upcard)?;
        let split_state = State::from_hand(&second, upcard)?;
        self.hands.push(second);
        self.hands.push(first);

        Ok(Step {
            reward: 0.0,
            next_state: Some(next_state),
            split_state: Some(split_state),
            settled: Settlement::Open,
            terminated: false,
        })
    }

    /// Settles and removes the active hand.
    fn settle_active(&mut self) -> Result<Step, ActionError> {
        let hand = self.hands.pop().ok_or(ActionError::InvalidState)?;
        let reward = self.settle_hand(&hand);
        Ok(Step {
            reward,
            next_state: None,
            split_state: None,
            settled: Settlement::Hand(reward),
            terminated: self.finish_if_done(),
        })
    }

    /// Settles a finished hand, letting the dealer play out first if needed.
    fn settle_hand(&mut self, hand: &Hand) -> f64 {
        self.dealer_play();
        let result = settle(hand, &self.dealer_hand);
        self.results.push(result);
        result.reward
    }

    fn finish_if_done(&mut self) -> bool {
        if self.hands.is_empty() {
            self.state = GameState::RoundOver;
            true
        } else {
            false
        }
    }
}
