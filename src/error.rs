//! Error types for configuration, simulation and learning.

use alloc::string::String;

use thiserror::Error;

use crate::state::Action;

/// Errors raised while validating a training configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Algorithm name not recognised.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// Decay family name not recognised.
    #[error("unknown decay function `{0}`")]
    UnknownDecay(String),
    /// Decay index name not recognised.
    #[error("unknown decay index `{0}`")]
    UnknownDecayIndex(String),
    /// The algorithm explores but no decay factor was supplied.
    #[error("algorithm `{0}` requires a decay factor")]
    MissingDecayFactor(&'static str),
    /// A decay family is missing one of its parameters.
    #[error("decay function `{family}` requires parameter `{parameter}`")]
    MissingDecayParameter {
        /// Decay family name.
        family: &'static str,
        /// Missing parameter name.
        parameter: &'static str,
    },
    /// A numeric parameter is not finite or out of range.
    #[error("invalid value for `{0}`")]
    InvalidParameter(&'static str),
}

/// Errors raised when building or decoding a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// Hand value outside the encodable range.
    #[error("hand value {0} is outside the encodable range")]
    ValueOutOfRange(u8),
    /// Dealer upcard value outside the encodable range.
    #[error("upcard value {0} is outside the encodable range")]
    UpcardOutOfRange(u8),
    /// State index outside the table.
    #[error("state index {0} is outside the table")]
    IndexOutOfRange(usize),
    /// The hand has no cards to encode.
    #[error("cannot encode an empty hand")]
    EmptyHand,
}

/// Errors that can occur during player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No hand is waiting for a decision.
    #[error("no hand is waiting for a decision")]
    InvalidState,
    /// Cannot double down on this hand.
    #[error("cannot double down on this hand")]
    CannotDouble,
    /// Cannot split this hand.
    #[error("cannot split this hand")]
    CannotSplit,
    /// The active hand could not be encoded.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors raised by value-table access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// Attempted to read or update a masked entry.
    #[error("action {action:?} is illegal in state {state}")]
    IllegalEntry {
        /// State index.
        state: usize,
        /// Action.
        action: Action,
    },
    /// Every action of the state is masked.
    #[error("state {0} has no legal action")]
    NoLegalAction(usize),
    /// State index outside the table.
    #[error("state index {0} is outside the table")]
    IndexOutOfRange(usize),
    /// Dense array length does not match the table shape.
    #[error("expected {expected} values, found {found}")]
    ShapeMismatch {
        /// Expected number of values.
        expected: usize,
        /// Number of values provided.
        found: usize,
    },
    /// Dense array disagrees with the illegal-action mask at a flat index.
    #[error("illegal-action mask mismatch at flat index {0}")]
    MaskMismatch(usize),
}

/// Any error produced while training or evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Invalid state.
    #[error(transparent)]
    State(#[from] StateError),
    /// Invalid action.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// Invalid table access.
    #[error(transparent)]
    Table(#[from] TableError),
    /// A split branch completed with no pending split to pair with.
    #[error("split return completed without a pending split")]
    UnpairedSplitReturn,
}
