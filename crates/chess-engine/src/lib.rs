//! Bitboard chess position with move generation and game-state checks.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit board representation with efficient operations
//! - [`Board`] - twelve piece bitboards, derived occupancy and the halfmove clock
//! - [`Position`] - a board plus a snapshot stack for exact apply/undo
//! - Move generation (pseudo-legal and legal) and attack queries
//! - Check, checkmate, stalemate and draw classification
//! - Zobrist hashing of piece placement
//!
//! # Architecture
//!
//! The engine uses bitboards for piece representation - each piece type/color
//! combination has a 64-bit integer where each bit represents a square.
//! The board does not know whose turn it is; every operation that depends
//! on the side takes a [`Color`](chess_core::Color).
//!
//! # Example
//!
//! ```
//! use chess_engine::{legal_moves, rules, Position};
//! use chess_core::Color;
//!
//! let mut position = Position::startpos();
//! assert_eq!(legal_moves(position.board(), Color::White).len(), 20);
//!
//! position.apply_notation("e2e4", Color::White).unwrap();
//! position.apply_notation("e7e5", Color::Black).unwrap();
//! assert_eq!(rules::in_check(position.board(), Color::White), Ok(false));
//!
//! position.undo().unwrap();
//! assert_eq!(position.history().len(), 1);
//! ```

mod bitboard;
mod error;
pub mod movegen;
mod position;
pub mod rules;
mod zobrist;

pub use bitboard::Bitboard;
pub use error::EngineError;
pub use movegen::{
    bishop_attacks, is_king_attacked, is_square_attacked, king_attacks, knight_attacks,
    legal_moves, pawn_attacks, pseudo_moves, queen_attacks, rook_attacks, MoveList,
};
pub use position::{Board, Position, Snapshot};
pub use rules::{
    game_result, in_check, is_checkmate, is_draw_by_fifty_moves, is_insufficient_material,
    is_legal_move, is_stalemate, DrawReason, GameResult,
};
pub use zobrist::{side_hash, zobrist_hash, ZobristKeys, ZOBRIST};
