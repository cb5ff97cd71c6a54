//! Zobrist hashing for position identification.
//!
//! One pseudo-random key per (color, piece, square); the hash of a board is
//! the XOR of the keys of every occupied square. The hash depends on piece
//! placement only: the halfmove clock, history and side to move do not
//! contribute.

use crate::Board;
use chess_core::{Color, Piece, Square};

/// Zobrist hash keys, indexed `[color][piece][square]`.
pub struct ZobristKeys {
    pieces: [[[u64; 64]; 6]; 2],
    side: u64,
}

impl ZobristKeys {
    /// Fills the table from a xorshift64 generator with a fixed seed, so
    /// keys are identical across runs and builds.
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 6]; 2];

        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[color][piece][square] = state;
                    square += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        ZobristKeys {
            pieces,
            side: next_random(state),
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[color.index()][piece.index()][square.index() as usize]
    }

    /// Key mixed into [`side_hash`] when Black is to move.
    #[inline]
    pub const fn side_key(&self) -> u64 {
        self.side
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Hashes the piece placement of a board.
pub fn zobrist_hash(board: &Board) -> u64 {
    let mut hash = 0u64;
    for color in Color::ALL {
        for piece in Piece::ALL {
            for sq in board.pieces_of(piece, color) {
                hash ^= ZOBRIST.piece_key(piece, color, sq);
            }
        }
    }
    hash
}

/// [`zobrist_hash`] with the side to move folded in.
#[inline]
pub fn side_hash(board: &Board, to_move: Color) -> u64 {
    match to_move {
        Color::White => zobrist_hash(board),
        Color::Black => zobrist_hash(board) ^ ZOBRIST.side_key(),
    }
}
