//! Reference basic strategy for the infinite-shoe, hit-soft-17 game.

use rand_chacha::ChaCha8Rng;

use crate::error::TableError;
use crate::hand::HandType;
use crate::policy::Policy;
use crate::state::{Action, MIN_UPCARD, NUM_UPCARDS, State};
use crate::table::{ValueTable, VisitTable};

/// A cell of the strategy chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Play {
    /// Hit.
    H,
    /// Stand.
    S,
    /// Double if allowed, otherwise hit.
    D,
    /// Double if allowed, otherwise stand.
    Ds,
    /// Split.
    P,
}

use Play::{D, Ds, H, P, S};

type Row = [Play; NUM_UPCARDS];

const ALL_H: Row = [H; NUM_UPCARDS];
const ALL_S: Row = [S; NUM_UPCARDS];
const STIFF: Row = [S, S, S, S, S, H, H, H, H, H];

/// Hard totals 4..=21 against upcards 2..=A.
const HARD: [Row; 18] = [
    ALL_H,                        // 4
    ALL_H,                        // 5
    ALL_H,                        // 6
    ALL_H,                        // 7
    ALL_H,                        // 8
    [H, D, D, D, D, H, H, H, H, H], // 9
    [D, D, D, D, D, D, D, D, H, H], // 10
    [D; NUM_UPCARDS],             // 11
    [H, H, S, S, S, H, H, H, H, H], // 12
    STIFF,                        // 13
    STIFF,                        // 14
    STIFF,                        // 15
    STIFF,                        // 16
    ALL_S,                        // 17
    ALL_S,                        // 18
    ALL_S,                        // 19
    ALL_S,                        // 20
    ALL_S,                        // 21
];
const MIN_HARD: u8 = 4;

/// Soft totals 13..=21 against upcards 2..=A.
const SOFT: [Row; 9] = [
    [H, H, H, D, D, H, H, H, H, H],      // A,2
    [H, H, H, D, D, H, H, H, H, H],      // A,3
    [H, H, D, D, D, H, H, H, H, H],      // A,4
    [H, H, D, D, D, H, H, H, H, H],      // A,5
    [H, D, D, D, D, H, H, H, H, H],      // A,6
    [S, Ds, Ds, Ds, Ds, S, S, H, H, H],  // A,7
    ALL_S,                               // A,8
    ALL_S,                               // A,9
    ALL_S,                               // 21
];
const MIN_SOFT: u8 = 13;

/// Pairs by rank value 2..=A against upcards 2..=A.
const PAIRS: [Row; 10] = [
    [H, H, P, P, P, P, H, H, H, H], // 2,2
    [H, H, P, P, P, P, H, H, H, H], // 3,3
    ALL_H,                          // 4,4
    [D, D, D, D, D, D, D, D, H, H], // 5,5
    [P, P, P, P, P, H, H, H, H, H], // 6,6
    [P, P, P, P, P, P, H, H, H, H], // 7,7
    [P; NUM_UPCARDS],               // 8,8
    [P, P, P, P, P, S, P, P, S, S], // 9,9
    ALL_S,                          // 10,10
    [P; NUM_UPCARDS],               // A,A
];
const MIN_PAIR: u8 = 2;

fn lookup(chart: &[Row], min: u8, state: State) -> Play {
    let column = usize::from(state.upcard() - MIN_UPCARD);
    state
        .value()
        .checked_sub(min)
        .and_then(|row| chart.get(usize::from(row)))
        .map_or(H, |row| row[column])
}

/// The textbook basic strategy, used as a fixed baseline policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

impl BasicStrategy {
    /// Returns the chart action for a state.
    #[must_use]
    pub fn action(state: State) -> Action {
        let play = match state.hand_type() {
            HandType::Hard => lookup(&HARD, MIN_HARD, state),
            HandType::Soft => lookup(&SOFT, MIN_SOFT, state),
            HandType::Pair => lookup(&PAIRS, MIN_PAIR, state),
        };

        match play {
            H => Action::Hit,
            S => Action::Stand,
            D if state.can_double() => Action::DoubleDown,
            D => Action::Hit,
            Ds if state.can_double() => Action::DoubleDown,
            Ds => Action::Stand,
            P if state.can_split() => Action::Split,
            P => Action::Hit,
        }
    }
}

impl Policy for BasicStrategy {
    fn choose(
        &mut self,
        state: State,
        _table: &ValueTable,
        _visits: &VisitTable,
        _rng: &mut ChaCha8Rng,
    ) -> Result<Action, TableError> {
        Ok(Self::action(state))
    }
}
