//! Core types for chess.
//!
//! This crate provides the value types shared by the engine and the search:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for move representation and coordinate notation ("e2e4", "a7a8q")
//! - FEN parsing

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{Move, MoveParseError};
pub use piece::Piece;
pub use square::{File, Rank, Square};
