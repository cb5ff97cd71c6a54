//! Move ordering: captures and promotions first, quiet moves last.

use std::cmp::Reverse;

use chess_core::{Color, Move, Piece};
use chess_engine::Board;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::evaluation::piece_value;

/// Ordering key for `mv`: most valuable victim first, cheapest attacker
/// breaking ties, with the promoted piece's value added. Quiet moves score 0.
pub fn move_score(board: &Board, mv: Move, color: Color) -> i32 {
    let mut score = 0;
    if let Some((victim, victim_color)) = board.piece_at(mv.to()) {
        if victim_color != color {
            let attacker = board
                .piece_at(mv.from())
                .map_or(Piece::Pawn, |(piece, _)| piece);
            score += 10 * piece_value(victim) - piece_value(attacker) / 10 + 1;
        }
    }
    if let Some(promoted) = mv.promotion_piece() {
        score += piece_value(promoted);
    }
    score
}

/// Returns true for captures and promotions, the moves quiescence follows.
pub fn is_tactical(board: &Board, mv: Move, color: Color) -> bool {
    mv.is_promotion() || board.color_occupancy(color.opposite()).contains(mv.to())
}

/// Shuffles `moves` (when an RNG is given), then stable-sorts them by
/// descending [`move_score`]. Equal keys keep their shuffled order.
pub fn order_moves(board: &Board, moves: &mut [Move], color: Color, rng: Option<&mut StdRng>) {
    if let Some(rng) = rng {
        moves.shuffle(rng);
    }
    moves.sort_by_cached_key(|mv| Reverse(move_score(board, *mv, color)));
}
