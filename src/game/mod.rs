//! Episode simulator.
//!
//! A [`Game`] owns a [`Deck`], the pending player hands and the dealer hand.
//! It can be driven one decision at a time with [`Game::deal`] and
//! [`Game::step`], or a whole round at a time with [`Game::play_round`].

use alloc::vec::Vec;

use crate::card::{Card, Deck, Shoe};
use crate::error::ActionError;
use crate::hand::{DealerHand, Hand};
use crate::result::HandResult;
use crate::state::State;

mod actions;
mod dealer;
mod round;
pub mod state;

pub use dealer::{BLACKJACK_PAYS, settle};
pub use state::GameState;

/// A single-player blackjack table with an infinite shoe.
#[derive(Debug, Clone)]
pub struct Game<D = Shoe> {
    /// Card source.
    deck: D,
    /// Pending player hands; the last one is active.
    hands: Vec<Hand>,
    /// Dealer's hand.
    dealer_hand: DealerHand,
    /// Current phase.
    state: GameState,
    /// Whether the dealer has played out this round.
    dealer_done: bool,
    /// Hands settled this round, in settlement order.
    results: Vec<HandResult>,
}

impl Game<Shoe> {
    /// Creates a game drawing from an infinite shoe seeded with `seed`.
    ///
    /// # Example
    ///
    /// ```
    /// use bjrl::{Action, Game};
    ///
    /// let mut game = Game::seeded(42);
    /// game.deal();
    /// let step = game.step(Action::Stand).unwrap();
    /// assert!(step.terminated);
    /// ```
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(Shoe::new(seed))
    }
}

impl<D: Deck> Game<D> {
    /// Creates a game drawing from `deck`.
    #[must_use]
    pub const fn new(deck: D) -> Self {
        Self {
            deck,
            hands: Vec::new(),
            dealer_hand: DealerHand::new(),
            state: GameState::WaitingForDeal,
            dealer_done: false,
            results: Vec::new(),
        }
    }

    /// Starts a new round: two cards to the player and two to the dealer,
    /// alternating and starting with the player.
    pub fn deal(&mut self) {
        self.hands.clear();
        self.dealer_hand.clear();
        self.results.clear();
        self.dealer_done = false;

        let mut hand = Hand::new();
        for _ in 0..2 {
            hand.add_card(self.draw());
            let card = self.draw();
            self.dealer_hand.add_card(card);
        }
        self.hands.push(hand);
        self.state = GameState::PlayerTurn;
    }

    /// Draws a card from the deck.
    fn draw(&mut self) -> Card {
        self.deck.draw()
    }

    /// Returns the current game state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Returns whether the round is over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state == GameState::RoundOver
    }

    /// Returns the hand waiting for a decision.
    #[must_use]
    pub fn active_hand(&self) -> Option<&Hand> {
        self.hands.last()
    }

    /// Returns the pending player hands; the last one is active.
    #[must_use]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// Returns the dealer's hand, including the hole card.
    #[must_use]
    pub const fn dealer_hand(&self) -> &DealerHand {
        &self.dealer_hand
    }

    /// Returns the hands settled so far this round.
    #[must_use]
    pub fn results(&self) -> &[HandResult] {
        &self.results
    }

    /// Returns the dealer's upcard.
    ///
    /// # Errors
    ///
    /// Returns an error if no round has been dealt.
    pub fn upcard(&self) -> Result<Card, ActionError> {
        self.dealer_hand.up_card().ok_or(ActionError::InvalidState)
    }

    /// Observes the active hand.
    ///
    /// # Errors
    ///
    /// Returns an error if no hand is waiting for a decision.
    pub fn current_state(&self) -> Result<State, ActionError> {
        if self.state != GameState::PlayerTurn {
            return Err(ActionError::InvalidState);
        }
        let hand = self.active_hand().ok_or(ActionError::InvalidState)?;
        Ok(State::from_hand(hand, self.upcard()?)?)
    }

    /// Returns the deck.
    #[must_use]
    pub const fn deck(&self) -> &D {
        &self.deck
    }

    /// Splits a pair into two hands, drawing one card for each in order.
    fn split_pair(&mut self, mut hand: Hand) -> Result<(Hand, Hand), ActionError> {
        let second_card = hand.take_split_card().ok_or(ActionError::CannotSplit)?;
        let first_card = hand.cards().first().copied().ok_or(ActionError::CannotSplit)?;

        let mut first = Hand::from_split(first_card);
        let mut second = Hand::from_split(second_card);
        first.add_card(self.draw());
        second.add_card(self.draw());
        Ok((first, second))
    }
}
