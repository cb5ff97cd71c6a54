//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! The tree is walked with [`Position::apply`] and [`Position::undo`], so
//! it exercises the history stack as well.

use super::legal_moves;
use crate::{EngineError, Position};
use chess_core::Color;

/// Counts the number of leaf nodes at the given depth, `color` to move.
pub fn perft(position: &mut Position, depth: u32, color: Color) -> Result<u64, EngineError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = legal_moves(position.board(), color);

    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for m in &moves {
        position.apply(*m, color);
        nodes += perft(position, depth - 1, color.opposite())?;
        position.undo()?;
    }
    Ok(nodes)
}

/// Perft with divide: node count below each root move, sorted by notation.
pub fn perft_divide(
    position: &mut Position,
    depth: u32,
    color: Color,
) -> Result<Vec<(String, u64)>, EngineError> {
    let moves = legal_moves(position.board(), color);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        position.apply(*m, color);
        let nodes = perft(position, depth.saturating_sub(1), color.opposite())?;
        position.undo()?;
        results.push((m.to_notation(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}
