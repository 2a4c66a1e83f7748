//! Card types and deck utilities.

use alloc::vec::Vec;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of distinct ranks drawn by a [`Shoe`].
pub const RANKS: usize = 13;

/// A playing card, identified by rank only.
///
/// Suits never influence blackjack play, so the simulator models a card as
/// one of thirteen ranks drawn with equal probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Card {
    /// Ace, worth 11 or 1.
    Ace,
    /// Two.
    Two,
    /// Three.
    Three,
    /// Four.
    Four,
    /// Five.
    Five,
    /// Six.
    Six,
    /// Seven.
    Seven,
    /// Eight.
    Eight,
    /// Nine.
    Nine,
    /// Ten.
    Ten,
    /// Jack, worth 10.
    Jack,
    /// Queen, worth 10.
    Queen,
    /// King, worth 10.
    King,
}

impl Card {
    /// Every rank in draw order.
    pub const ALL: [Self; RANKS] = [
        Self::Ace,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
    ];

    /// Returns the blackjack value of the card, counting an ace as 11.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Ace => 11,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
        }
    }

    /// Returns whether the card is an ace.
    #[must_use]
    pub const fn is_ace(self) -> bool {
        matches!(self, Self::Ace)
    }
}

/// A source of cards for the simulator.
pub trait Deck {
    /// Draws the next card.
    fn draw(&mut self) -> Card;
}

/// An infinite shoe: every draw is an independent, uniform choice among the
/// thirteen ranks.
#[derive(Debug, Clone)]
pub struct Shoe {
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a shoe seeded on stream 0 of `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_stream(seed, 0)
    }

    /// Creates a shoe on a specific ChaCha stream of `seed`.
    ///
    /// Distinct streams of one seed never overlap, which lets training and
    /// evaluation draw from independent card sequences.
    #[must_use]
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }
}

impl Deck for Shoe {
    fn draw(&mut self) -> Card {
        Card::ALL[self.rng.random_range(0..RANKS)]
    }
}

/// A deck that replays a fixed script of cards, then repeats a fallback card.
///
/// Useful to reproduce a specific round exactly.
#[derive(Debug, Clone)]
pub struct StackedDeck {
    cards: Vec<Card>,
    next: usize,
    fallback: Card,
}

impl StackedDeck {
    /// Creates a deck that draws `cards` in order and then `fallback` forever.
    #[must_use]
    pub const fn new(cards: Vec<Card>, fallback: Card) -> Self {
        Self {
            cards,
            next: 0,
            fallback,
        }
    }

    /// Returns the number of cards drawn so far.
    #[must_use]
    pub const fn drawn(&self) -> usize {
        self.next
    }
}

impl Deck for StackedDeck {
    fn draw(&mut self) -> Card {
        let card = self.cards.get(self.next).copied().unwrap_or(self.fallback);
        self.next += 1;
        card
    }
}
