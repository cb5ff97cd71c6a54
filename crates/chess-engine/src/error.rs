//! Engine error type.

use chess_core::{Color, Move, MoveParseError};
use thiserror::Error;

/// Errors raised by position manipulation and game-state queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The move is not among the legal moves of `color`. Nothing was changed.
    #[error("illegal move {mv} for {color}")]
    IllegalMove { mv: Move, color: Color },

    #[error("invalid move notation: {0}")]
    InvalidNotation(#[from] MoveParseError),

    #[error("{0} has no king on the board")]
    MissingKing(Color),

    #[error("{0} has more than one king on the board")]
    ExtraKing(Color),

    #[error("no move to undo")]
    EmptyHistory,
}

impl EngineError {
    /// Returns true for broken invariants, as opposed to rejected user input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EngineError::MissingKing(_) | EngineError::ExtraKing(_) | EngineError::EmptyHistory
        )
    }
}
