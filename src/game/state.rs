//! Round phase.

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// No round has been dealt yet.
    WaitingForDeal,
    /// Player hands are waiting for decisions.
    PlayerTurn,
    /// All player hands are resolved and the dealer plays out.
    DealerTurn,
    /// Every hand has been settled.
    RoundOver,
}
