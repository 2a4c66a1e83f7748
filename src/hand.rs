//! Player and dealer hand representations.

use alloc::vec::Vec;

use crate::card::Card;

/// Blackjack total.
pub const BLACKJACK: u8 = 21;

/// Total at which the dealer stops drawing (hits a soft 17).
pub const DEALER_STANDS_ON: u8 = 17;

/// Evaluates a set of cards, returning the best total and whether an ace is
/// still counted as 11.
fn evaluate_cards(cards: &[Card]) -> (u8, bool) {
    let mut value: u8 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        value = value.saturating_add(card.value());
    }

    while value > BLACKJACK && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= BLACKJACK;
    (value, is_soft)
}

/// Classification of a player hand used by the state encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandType {
    /// No ace can count as 11.
    Hard,
    /// An ace counts as 11 without busting.
    Soft,
    /// Exactly two cards of equal rank.
    Pair,
}

impl HandType {
    /// Number of hand types.
    pub const COUNT: usize = 3;

    /// Every hand type in encoding order.
    pub const ALL: [Self; Self::COUNT] = [Self::Hard, Self::Soft, Self::Pair];

    /// Returns the ordinal used by the state encoding.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A player's hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    /// Cards in the hand.
    cards: Vec<Card>,
    /// Bet multiplier for this hand (2 after doubling down).
    bet: u8,
    /// Whether this hand is from a split.
    from_split: bool,
}

impl Hand {
    /// Creates a new empty hand with a unit bet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cards: Vec::new(),
            bet: 1,
            from_split: false,
        }
    }

    /// Creates a hand holding the given cards with a unit bet.
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            cards: cards.to_vec(),
            bet: 1,
            from_split: false,
        }
    }

    /// Creates a new hand from a split with a single card.
    #[must_use]
    pub fn from_split(card: Card) -> Self {
        Self {
            cards: alloc::vec![card],
            bet: 1,
            from_split: true,
        }
    }

    /// Adds a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the bet multiplier for this hand.
    #[must_use]
    pub const fn bet(&self) -> u8 {
        self.bet
    }

    /// Doubles the bet multiplier. A hand doubles at most once, so repeated
    /// calls leave the bet at 2.
    pub const fn double_bet(&mut self) {
        self.bet = 2;
    }

    /// Returns whether this hand is from a split.
    #[must_use]
    pub const fn is_from_split(&self) -> bool {
        self.from_split
    }

    /// Calculates the value of the hand.
    ///
    /// Aces are counted as 11 if possible without busting, otherwise as 1.
    #[must_use]
    pub fn value(&self) -> u8 {
        evaluate_cards(&self.cards).0
    }

    /// Returns whether the hand is soft (contains an ace counted as 11).
    #[must_use]
    pub fn is_soft(&self) -> bool {
        evaluate_cards(&self.cards).1
    }

    /// Classifies the hand as pair, soft or hard.
    #[must_use]
    pub fn hand_type(&self) -> HandType {
        if self.can_split() {
            HandType::Pair
        } else if self.is_soft() {
            HandType::Soft
        } else {
            HandType::Hard
        }
    }

    /// Returns whether the hand is bust (over 21).
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }

    /// Returns whether the hand is a natural blackjack.
    ///
    /// Hands created by a split never count as naturals.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        !self.from_split && self.cards.len() == 2 && self.value() == BLACKJACK
    }

    /// Returns whether the hand can be split.
    #[must_use]
    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && self.cards[0] == self.cards[1]
    }

    /// Returns whether the hand can be doubled.
    #[must_use]
    pub fn can_double(&self) -> bool {
        self.cards.len() == 2
    }

    /// Returns whether the hand is a pair of aces.
    #[must_use]
    pub fn is_ace_pair(&self) -> bool {
        self.can_split() && self.cards[0].is_ace()
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes and returns the second card (for splitting).
    pub fn take_split_card(&mut self) -> Option<Card> {
        if self.can_split() {
            self.cards.pop()
        } else {
            None
        }
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

/// The dealer's hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerHand {
    /// Cards in the hand.
    cards: Vec<Card>,
}

impl DealerHand {
    /// Creates a new empty dealer hand.
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Creates a dealer hand holding the given cards.
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            cards: cards.to_vec(),
        }
    }

    /// Adds a card to the hand.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns all cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the visible card (first card).
    #[must_use]
    pub fn up_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Calculates the full value of the hand.
    #[must_use]
    pub fn value(&self) -> u8 {
        evaluate_cards(&self.cards).0
    }

    /// Returns whether the hand is soft (contains an ace counted as 11).
    #[must_use]
    pub fn is_soft(&self) -> bool {
        evaluate_cards(&self.cards).1
    }

    /// Returns whether the hand is a natural blackjack.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.value() == BLACKJACK
    }

    /// Returns whether the hand is bust.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }

    /// Returns whether the dealer must draw another card.
    ///
    /// The dealer draws below 17 and on a soft 17.
    #[must_use]
    pub fn must_draw(&self) -> bool {
        let (value, is_soft) = evaluate_cards(&self.cards);
        value < DEALER_STANDS_ON || (value == DEALER_STANDS_ON && is_soft)
    }

    /// Returns the number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Clears the hand for a new round.
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl Default for DealerHand {
    fn default() -> Self {
        Self::new()
    }
}
