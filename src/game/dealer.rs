use crate::card::Deck;
use crate::hand::{DealerHand, Hand};
use crate::result::{HandOutcome, HandResult};

use super::Game;

/// Payout ratio of a natural blackjack.
pub const BLACKJACK_PAYS: f64 = 1.5;

/// Settles a finished player hand against the dealer's final hand.
///
/// Returns are in units of the base bet: a natural pays 1.5 unless the
/// dealer also has one, a bust loses the bet whatever the dealer holds, and
/// otherwise a dealer bust or the higher total wins the (possibly doubled)
/// bet.
#[must_use]
pub fn settle(hand: &Hand, dealer: &DealerHand) -> HandResult {
    let bet = hand.bet();
    let stake = f64::from(bet);
    let player_value = hand.value();
    let dealer_value = dealer.value();

    let (outcome, reward) = if hand.is_natural() {
        if dealer.is_natural() {
            (HandOutcome::Push, 0.0)
        } else {
            (HandOutcome::Blackjack, BLACKJACK_PAYS * stake)
        }
    } else if hand.is_bust() {
        (HandOutcome::Lose, -stake)
    } else if dealer.is_bust() || player_value > dealer_value {
        (HandOutcome::Win, stake)
    } else if player_value < dealer_value {
        (HandOutcome::Lose, -stake)
    } else {
        (HandOutcome::Push, 0.0)
    };

    HandResult {
        outcome,
        bet,
        reward,
        player_value,
        dealer_value,
    }
}

impl<D: Deck> Game<D> {
    /// Dealer plays their hand: draws below 17 and on a soft 17, stopping on
    /// bust.
    ///
    /// Runs at most once per round; returns the number of cards drawn.
    pub fn dealer_play(&mut self) -> usize {
        if self.dealer_done {
            return 0;
        }
        self.dealer_done = true;

        let mut drawn = 0;
        while self.dealer_hand.must_draw() {
            let card = self.draw();
            self.dealer_hand.add_card(card);
            drawn += 1;
        }
        drawn
    }
}
