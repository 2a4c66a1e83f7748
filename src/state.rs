//! Actions and the discrete state encoding shared by every policy and table.
//!
//! A [`State`] is flattened into a single index with the digit order
//! (outermost first):
//!
//! ```text
//! hand_type (3) × value (20: 2..=21) × upcard (10: 2..=11) × can_double (2) × can_split (2)
//! ```
//!
//! so `index = (((type·20 + value−2)·10 + upcard−2)·2 + can_double)·2 + can_split`.
//! Value tables append the action as the innermost digit.

use crate::card::Card;
use crate::error::StateError;
use crate::hand::{BLACKJACK, Hand, HandType};

/// Lowest encodable hand value (a pair of twos).
pub const MIN_VALUE: u8 = 2;
/// Highest encodable hand value.
pub const MAX_VALUE: u8 = BLACKJACK;
/// Number of encodable hand values.
pub const NUM_VALUES: usize = (MAX_VALUE - MIN_VALUE + 1) as usize;
/// Lowest dealer upcard value.
pub const MIN_UPCARD: u8 = 2;
/// Highest dealer upcard value (an ace).
pub const MAX_UPCARD: u8 = 11;
/// Number of dealer upcard values.
pub const NUM_UPCARDS: usize = (MAX_UPCARD - MIN_UPCARD + 1) as usize;
/// Number of encoded states.
pub const NUM_STATES: usize = HandType::COUNT * NUM_VALUES * NUM_UPCARDS * 2 * 2;
/// Number of actions.
pub const NUM_ACTIONS: usize = Action::COUNT;
/// Multi-dimensional shape of a value table, action innermost.
pub const SHAPE: [usize; 6] = [HandType::COUNT, NUM_VALUES, NUM_UPCARDS, 2, 2, NUM_ACTIONS];

const MIN_HARD: u8 = 4;
const MIN_SOFT: u8 = 13;
const MAX_PAIR: u8 = 11;

/// A player decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Draw a card.
    Hit,
    /// End the hand.
    Stand,
    /// Double the bet, draw exactly one card and end the hand.
    DoubleDown,
    /// Split a pair into two hands.
    Split,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 4;

    /// Every action in ordinal order.
    pub const ALL: [Self; Self::COUNT] = [Self::Hit, Self::Stand, Self::DoubleDown, Self::Split];

    /// Returns the action ordinal.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the action with the given ordinal.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

/// The information a policy may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    hand_type: HandType,
    value: u8,
    upcard: u8,
    can_double: bool,
    can_split: bool,
}

impl State {
    /// Creates a state, validating that it is encodable.
    ///
    /// `value` is the hand total, or the pair rank's value for pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` or `upcard` is outside the encodable range.
    pub const fn new(
        hand_type: HandType,
        value: u8,
        upcard: u8,
        can_double: bool,
        can_split: bool,
    ) -> Result<Self, StateError> {
        if value < MIN_VALUE || value > MAX_VALUE {
            return Err(StateError::ValueOutOfRange(value));
        }
        if upcard < MIN_UPCARD || upcard > MAX_UPCARD {
            return Err(StateError::UpcardOutOfRange(upcard));
        }
        Ok(Self {
            hand_type,
            value,
            upcard,
            can_double,
            can_split,
        })
    }

    /// Observes a player hand against the dealer upcard.
    ///
    /// # Errors
    ///
    /// Returns an error if the hand is empty or bust.
    pub fn from_hand(hand: &Hand, upcard: Card) -> Result<Self, StateError> {
        let Some(&first) = hand.cards().first() else {
            return Err(StateError::EmptyHand);
        };
        let hand_type = hand.hand_type();
        let value = match hand_type {
            HandType::Pair => first.value(),
            HandType::Hard | HandType::Soft => hand.value(),
        };
        Self::new(
            hand_type,
            value,
            upcard.value(),
            hand.can_double(),
            hand.can_split(),
        )
    }

    /// Returns the hand type.
    #[must_use]
    pub const fn hand_type(&self) -> HandType {
        self.hand_type
    }

    /// Returns the hand total, or the pair rank's value for pairs.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Returns the dealer upcard value (2..=11).
    #[must_use]
    pub const fn upcard(&self) -> u8 {
        self.upcard
    }

    /// Returns whether the hand holds exactly two cards.
    #[must_use]
    pub const fn can_double(&self) -> bool {
        self.can_double
    }

    /// Returns whether the hand is a splittable pair.
    #[must_use]
    pub const fn can_split(&self) -> bool {
        self.can_split
    }

    /// Encodes the state as a table index.
    #[must_use]
    pub const fn encode(&self) -> usize {
        let mut index = self.hand_type.index();
        index = index * NUM_VALUES + (self.value - MIN_VALUE) as usize;
        index = index * NUM_UPCARDS + (self.upcard - MIN_UPCARD) as usize;
        index = index * 2 + self.can_double as usize;
        index * 2 + self.can_split as usize
    }

    /// Decodes a table index, inverting [`State::encode`].
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not below [`NUM_STATES`].
    pub const fn decode(index: usize) -> Result<Self, StateError> {
        if index >= NUM_STATES {
            return Err(StateError::IndexOutOfRange(index));
        }
        let mut rest = index;
        let can_split = rest % 2 == 1;
        rest /= 2;
        let can_double = rest % 2 == 1;
        rest /= 2;
        let upcard = (rest % NUM_UPCARDS) as u8 + MIN_UPCARD;
        rest /= NUM_UPCARDS;
        let value = (rest % NUM_VALUES) as u8 + MIN_VALUE;
        rest /= NUM_VALUES;
        Ok(Self {
            hand_type: HandType::ALL[rest],
            value,
            upcard,
            can_double,
            can_split,
        })
    }

    /// Returns whether the state belongs to the playable domain.
    ///
    /// States outside it have every action masked in a value table.
    #[must_use]
    pub const fn is_legal(&self) -> bool {
        match self.hand_type {
            HandType::Hard => self.value >= MIN_HARD && !self.can_split,
            HandType::Soft => self.value >= MIN_SOFT && !self.can_split,
            HandType::Pair => self.value <= MAX_PAIR && self.can_double && self.can_split,
        }
    }

    /// Returns whether `action` may be taken in this state.
    #[must_use]
    pub const fn allows(&self, action: Action) -> bool {
        if !self.is_legal() {
            return false;
        }
        match action {
            Action::Hit | Action::Stand => true,
            Action::DoubleDown => self.can_double,
            Action::Split => self.can_split,
        }
    }

    /// Iterates over the legal actions in ordinal order.
    pub fn legal_actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|&action| self.allows(action))
    }
}

/// Returns the flat index of a state-action pair.
#[must_use]
pub const fn state_action_index(state: usize, action: Action) -> usize {
    state * NUM_ACTIONS + action.index()
}

/// Splits a flat state-action index into its state index and action.
#[must_use]
pub const fn split_state_action_index(index: usize) -> (usize, Action) {
    (index / NUM_ACTIONS, Action::ALL[index % NUM_ACTIONS])
}
