//! Move generation.
//!
//! Pseudo-legal moves come from attack tables (knight, king, pawn captures)
//! and ray walks (bishop, rook, queen). A pseudo-move is legal when the
//! mover's king is not attacked after playing it on a scratch copy of the
//! board. No move ever targets the enemy king's square.

mod attacks;
pub mod perft;

use crate::{Bitboard, Board};
use chess_core::{Color, Move, Piece, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves the list can hold.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Mutable view for in-place reordering.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates every pseudo-legal move for `color`, ignoring king safety.
///
/// Order: pawns, knights, bishops, rooks, queens, king.
pub fn pseudo_moves(board: &Board, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    let enemy_king = board.pieces_of(Piece::King, color.opposite());
    let targets = !board.color_occupancy(color) & !enemy_king;

    generate_pawn_moves(board, color, enemy_king, &mut moves);
    for from in board.pieces_of(Piece::Knight, color) {
        push_targets(from, knight_attacks(from) & targets, &mut moves);
    }
    for from in board.pieces_of(Piece::Bishop, color) {
        push_targets(from, bishop_attacks(from, board.occupied()) & targets, &mut moves);
    }
    for from in board.pieces_of(Piece::Rook, color) {
        push_targets(from, rook_attacks(from, board.occupied()) & targets, &mut moves);
    }
    for from in board.pieces_of(Piece::Queen, color) {
        push_targets(from, queen_attacks(from, board.occupied()) & targets, &mut moves);
    }
    for from in board.pieces_of(Piece::King, color) {
        push_targets(from, king_attacks(from) & targets, &mut moves);
    }

    moves
}

/// Generates the legal moves for `color`.
pub fn legal_moves(board: &Board, color: Color) -> MoveList {
    let mut moves = pseudo_moves(board, color);
    moves.retain(|m| {
        let mut scratch = *board;
        scratch.apply_in_place(*m, color);
        !is_king_attacked(&scratch, color)
    });
    moves
}

#[inline]
fn push_targets(from: Square, targets: Bitboard, moves: &mut MoveList) {
    for to in targets {
        moves.push(Move::normal(from, to));
    }
}

fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut MoveList) {
    if to.rank() == color.promotion_rank() {
        for piece in Piece::PROMOTIONS {
            moves.push(Move::promotion(from, to, piece));
        }
    } else {
        moves.push(Move::normal(from, to));
    }
}

/// Generates pseudo-legal pawn moves: pushes, double pushes from the start
/// rank and diagonal captures. Promotions expand to four moves.
fn generate_pawn_moves(board: &Board, color: Color, enemy_king: Bitboard, moves: &mut MoveList) {
    let pawns = board.pieces_of(Piece::Pawn, color);
    let empty = !board.occupied();
    let captures = board.color_occupancy(color.opposite()) & !enemy_king;
    let dir = color.pawn_direction();

    let (single_pushes, double_pushes) = match color {
        Color::White => {
            let single = pawns.north() & empty;
            (single, (single & Bitboard::RANK_2.north()).north() & empty)
        }
        Color::Black => {
            let single = pawns.south() & empty;
            (single, (single & Bitboard::RANK_7.south()).south() & empty)
        }
    };

    for from in pawns {
        if let Some(to) = from.offset(0, dir) {
            if single_pushes.contains(to) {
                push_pawn_move(from, to, color, moves);
            }
        }
        if from.rank() == color.pawn_start_rank() {
            if let Some(to) = from.offset(0, 2 * dir) {
                if double_pushes.contains(to) {
                    moves.push(Move::normal(from, to));
                }
            }
        }
        for to in pawn_attacks(from, color) & captures {
            push_pawn_move(from, to, color, moves);
        }
    }
}

/// Returns true if the given square is attacked by the given color.
pub fn is_square_attacked(board: &Board, sq: Square, by_color: Color) -> bool {
    let occupied = board.occupied();

    if (pawn_attacks(sq, by_color.opposite()) & board.pieces_of(Piece::Pawn, by_color))
        .is_not_empty()
    {
        return true;
    }

    if (knight_attacks(sq) & board.pieces_of(Piece::Knight, by_color)).is_not_empty() {
        return true;
    }

    if (king_attacks(sq) & board.pieces_of(Piece::King, by_color)).is_not_empty() {
        return true;
    }

    let queens = board.pieces_of(Piece::Queen, by_color);
    let diagonal = board.pieces_of(Piece::Bishop, by_color) | queens;
    if (bishop_attacks(sq, occupied) & diagonal).is_not_empty() {
        return true;
    }

    let orthogonal = board.pieces_of(Piece::Rook, by_color) | queens;
    (rook_attacks(sq, occupied) & orthogonal).is_not_empty()
}

/// Returns true if the king of the given color is attacked.
///
/// A board without a king of that color reports false.
pub fn is_king_attacked(board: &Board, king_color: Color) -> bool {
    board
        .pieces_of(Piece::King, king_color)
        .into_iter()
        .any(|king_sq| is_square_attacked(board, king_sq, king_color.opposite()))
}
