//! Dense action-value and visit-count tables.
//!
//! Both tables are stored flat as one row of [`NUM_ACTIONS`] entries per
//! encoded state, in the digit order documented in [`crate::state`].

use alloc::vec::Vec;

use crate::error::TableError;
use crate::state::{Action, NUM_ACTIONS, NUM_STATES, State};

/// Sentinel stored in every structurally illegal entry.
pub const ILLEGAL: f64 = f64::NEG_INFINITY;

/// Returns whether the flat `(state, action)` entry is structurally legal.
fn entry_is_legal(state: usize, action: Action) -> bool {
    State::decode(state).is_ok_and(|decoded| decoded.allows(action))
}

/// Expected-return estimates for every state-action pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    rows: Vec<[f64; NUM_ACTIONS]>,
}

impl ValueTable {
    /// Creates a table with every legal entry set to `fill` and every illegal
    /// entry set to [`ILLEGAL`].
    #[must_use]
    pub fn new(fill: f64) -> Self {
        let rows = (0..NUM_STATES)
            .map(|state| {
                let mut row = [ILLEGAL; NUM_ACTIONS];
                for action in Action::ALL {
                    if entry_is_legal(state, action) {
                        row[action.index()] = fill;
                    }
                }
                row
            })
            .collect();
        Self { rows }
    }

    /// Rebuilds a table from its dense form (see [`ValueTable::as_dense`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the length differs from the table shape or the
    /// illegal-action mask does not match.
    pub fn from_dense(values: Vec<f64>) -> Result<Self, TableError> {
        let expected = NUM_STATES * NUM_ACTIONS;
        if values.len() != expected {
            return Err(TableError::ShapeMismatch {
                expected,
                found: values.len(),
            });
        }

        let mut rows = Vec::with_capacity(NUM_STATES);
        for (state, chunk) in values.chunks_exact(NUM_ACTIONS).enumerate() {
            let mut row = [ILLEGAL; NUM_ACTIONS];
            for action in Action::ALL {
                let value = chunk[action.index()];
                if entry_is_legal(state, action) != (value != ILLEGAL) {
                    return Err(TableError::MaskMismatch(
                        state * NUM_ACTIONS + action.index(),
                    ));
                }
                row[action.index()] = value;
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    /// Returns the table as one contiguous array, action innermost.
    #[must_use]
    pub fn as_dense(&self) -> &[f64] {
        self.rows.as_flattened()
    }

    /// Returns the `(num_states, num_actions)` view of the table.
    #[must_use]
    pub fn rows(&self) -> &[[f64; NUM_ACTIONS]] {
        &self.rows
    }

    /// Returns the action values of one state.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` is outside the table.
    pub fn row(&self, state: usize) -> Result<&[f64; NUM_ACTIONS], TableError> {
        self.rows
            .get(state)
            .ok_or(TableError::IndexOutOfRange(state))
    }

    /// Returns the value of one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` is outside the table.
    pub fn get(&self, state: usize, action: Action) -> Result<f64, TableError> {
        Ok(self.row(state)?[action.index()])
    }

    /// Returns whether the entry holds a value rather than the sentinel.
    #[must_use]
    pub fn is_legal(&self, state: usize, action: Action) -> bool {
        self.rows
            .get(state)
            .is_some_and(|row| row[action.index()] != ILLEGAL)
    }

    /// Applies the sample-average update `Q += (target - Q) / N` after
    /// counting the visit in `visits`. Returns the updated value.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is masked or outside the table; the
    /// visit is not counted in that case.
    pub fn sample_average(
        &mut self,
        visits: &mut VisitTable,
        state: usize,
        action: Action,
        target: f64,
    ) -> Result<f64, TableError> {
        let row = self
            .rows
            .get_mut(state)
            .ok_or(TableError::IndexOutOfRange(state))?;
        let entry = &mut row[action.index()];
        if *entry == ILLEGAL {
            return Err(TableError::IllegalEntry { state, action });
        }

        let count = visits.increment(state, action)?;
        #[expect(
            clippy::cast_precision_loss,
            reason = "visit counts stay far below 2^52"
        )]
        let step = 1.0 / count as f64;
        *entry += step * (target - *entry);
        Ok(*entry)
    }

    /// Returns the greedy action of a state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state is outside the table or has no legal
    /// action.
    pub fn best_action(&self, state: usize) -> Result<Action, TableError> {
        crate::policy::greedy(self.row(state)?).ok_or(TableError::NoLegalAction(state))
    }
}

/// Per-entry visit counts, shaped like [`ValueTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitTable {
    rows: Vec<[u64; NUM_ACTIONS]>,
}

impl VisitTable {
    /// Creates a table of zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: alloc::vec![[0; NUM_ACTIONS]; NUM_STATES],
        }
    }

    /// Returns the visit count of one entry (zero outside the table).
    #[must_use]
    pub fn get(&self, state: usize, action: Action) -> u64 {
        self.rows
            .get(state)
            .map_or(0, |row| row[action.index()])
    }

    /// Returns the number of visits to a state across all actions.
    #[must_use]
    pub fn state_visits(&self, state: usize) -> u64 {
        self.rows.get(state).map_or(0, |row| row.iter().sum())
    }

    /// Returns the total number of recorded visits.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.rows.iter().flatten().sum()
    }

    /// Returns the `(num_states, num_actions)` view of the counts.
    #[must_use]
    pub fn rows(&self) -> &[[u64; NUM_ACTIONS]] {
        &self.rows
    }

    /// Counts one visit and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` is outside the table.
    pub fn increment(&mut self, state: usize, action: Action) -> Result<u64, TableError> {
        let row = self
            .rows
            .get_mut(state)
            .ok_or(TableError::IndexOutOfRange(state))?;
        row[action.index()] += 1;
        Ok(row[action.index()])
    }
}

impl Default for VisitTable {
    fn default() -> Self {
        Self::new()
    }
}
