//! Game-state classification: check, mate, stalemate and draw rules.
//!
//! Every query takes the side it is asked about explicitly; a [`Board`]
//! does not track whose turn it is.

use crate::movegen::{is_square_attacked, legal_moves};
use crate::{Board, EngineError};
use chess_core::{Color, Move, Piece};

/// Halfmove clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Neither side can force mate (see [`is_insufficient_material`]).
    InsufficientMaterial,
    /// 100 plies without a pawn move or capture.
    FiftyMoveRule,
}

impl GameResult {
    /// The result when `color` has been checkmated.
    pub const fn checkmated(color: Color) -> Self {
        match color {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }

    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "checkmate, White wins"),
            GameResult::BlackWins => write!(f, "checkmate, Black wins"),
            GameResult::Draw(DrawReason::Stalemate) => write!(f, "draw by stalemate"),
            GameResult::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "draw by insufficient material")
            }
            GameResult::Draw(DrawReason::FiftyMoveRule) => write!(f, "draw by the fifty-move rule"),
        }
    }
}

/// Returns true if the king of `color` is attacked.
pub fn in_check(board: &Board, color: Color) -> Result<bool, EngineError> {
    let king = board
        .king_square(color)
        .ok_or(EngineError::MissingKing(color))?;
    Ok(is_square_attacked(board, king, color.opposite()))
}

/// In check with no legal move.
pub fn is_checkmate(board: &Board, color: Color) -> Result<bool, EngineError> {
    Ok(in_check(board, color)? && legal_moves(board, color).is_empty())
}

/// Not in check, but no legal move.
pub fn is_stalemate(board: &Board, color: Color) -> Result<bool, EngineError> {
    Ok(!in_check(board, color)? && legal_moves(board, color).is_empty())
}

#[inline]
pub fn is_draw_by_fifty_moves(board: &Board) -> bool {
    board.halfmove_clock >= FIFTY_MOVE_PLIES
}

/// True for exactly these material balances: K v K, K + one minor piece
/// v K (either side), and K + B v K + B. Any pawn, rook or queen on the
/// board means false, as does every other minor-piece combination.
pub fn is_insufficient_material(board: &Board) -> bool {
    let heavy = [Piece::Pawn, Piece::Rook, Piece::Queen];
    let has_heavy = Color::ALL.into_iter().any(|color| {
        heavy
            .into_iter()
            .any(|piece| board.pieces_of(piece, color).is_not_empty())
    });
    if has_heavy {
        return false;
    }

    let knights = |color| board.pieces_of(Piece::Knight, color).count();
    let bishops = |color| board.pieces_of(Piece::Bishop, color).count();
    let minors = |color| knights(color) + bishops(color);

    match (minors(Color::White), minors(Color::Black)) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (1, 1) => bishops(Color::White) == 1 && bishops(Color::Black) == 1,
        _ => false,
    }
}

/// Returns true if `mv` is among the legal moves of `color`.
pub fn is_legal_move(board: &Board, mv: Move, color: Color) -> bool {
    legal_moves(board, color).contains(&mv)
}

/// Classifies the board with `color` to move, or `None` while play continues.
///
/// Draw rules are checked before mate: insufficient material, fifty moves,
/// checkmate, stalemate.
pub fn game_result(board: &Board, color: Color) -> Result<Option<GameResult>, EngineError> {
    if is_insufficient_material(board) {
        return Ok(Some(GameResult::Draw(DrawReason::InsufficientMaterial)));
    }
    if is_draw_by_fifty_moves(board) {
        return Ok(Some(GameResult::Draw(DrawReason::FiftyMoveRule)));
    }
    let checked = in_check(board, color)?;
    if !legal_moves(board, color).is_empty() {
        return Ok(None);
    }
    Ok(Some(if checked {
        GameResult::checkmated(color)
    } else {
        GameResult::Draw(DrawReason::Stalemate)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn board(fen: &str) -> Board {
        *Position::from_fen(fen).unwrap().board()
    }

    fn fools_mate() -> Position {
        let mut pos = Position::startpos();
        let mut color = Color::White;
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            pos.apply_notation(text, color).unwrap();
            color = color.opposite();
        }
        pos
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let pos = fools_mate();
        assert_eq!(in_check(pos.board(), Color::White), Ok(true));
        assert_eq!(is_checkmate(pos.board(), Color::White), Ok(true));
        assert_eq!(is_stalemate(pos.board(), Color::White), Ok(false));
        assert_eq!(is_checkmate(pos.board(), Color::Black), Ok(false));
        assert_eq!(
            game_result(pos.board(), Color::White),
            Ok(Some(GameResult::BlackWins))
        );
    }

    #[test]
    fn startpos_is_quiet() {
        let start = *Position::startpos().board();
        assert_eq!(in_check(&start, Color::White), Ok(false));
        assert_eq!(game_result(&start, Color::White), Ok(None));
        assert!(!is_insufficient_material(&start));
    }

    #[test]
    fn bare_kings() {
        let b = board("4k3/8/8/8/8/8/8/4K3");
        assert_eq!(is_stalemate(&b, Color::White), Ok(false));
        assert_eq!(is_checkmate(&b, Color::White), Ok(false));
        assert!(is_insufficient_material(&b));
        assert_eq!(
            game_result(&b, Color::White),
            Ok(Some(GameResult::Draw(DrawReason::InsufficientMaterial)))
        );
    }

    #[test]
    fn stalemate() {
        // Black king on a8 boxed in by a queen on b6, not in check.
        let b = board("k7/8/1Q6/8/8/8/8/4K3");
        assert_eq!(is_stalemate(&b, Color::Black), Ok(true));
        assert_eq!(is_checkmate(&b, Color::Black), Ok(false));
        assert_eq!(
            game_result(&b, Color::Black),
            Ok(Some(GameResult::Draw(DrawReason::Stalemate)))
        );
        assert_eq!(is_stalemate(&b, Color::White), Ok(false));
    }

    #[test]
    fn missing_king_is_reported() {
        let b = board("8/8/8/8/8/8/8/4K3");
        assert_eq!(in_check(&b, Color::Black), Err(EngineError::MissingKing(Color::Black)));
        assert!(is_checkmate(&b, Color::Black).is_err());
    }

    #[test]
    fn fifty_move_rule() {
        let b = board("4k3/8/8/8/8/8/8/R3K3 w - - 99 80");
        assert!(!is_draw_by_fifty_moves(&b));
        assert_eq!(game_result(&b, Color::White), Ok(None));

        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        pos.apply_notation("a1a2", Color::White).unwrap();
        assert!(is_draw_by_fifty_moves(pos.board()));
        assert_eq!(
            game_result(pos.board(), Color::Black),
            Ok(Some(GameResult::Draw(DrawReason::FiftyMoveRule)))
        );
    }

    #[test]
    fn insufficient_material_subset() {
        assert!(is_insufficient_material(&board("4k3/8/8/8/8/8/8/2B1K3")));
        assert!(is_insufficient_material(&board("4k3/8/8/8/8/8/8/1N2K3")));
        assert!(is_insufficient_material(&board("2b1k3/8/8/8/8/8/8/4K3")));
        assert!(is_insufficient_material(&board("2b1k3/8/8/8/8/8/8/2B1K3")));
        assert!(is_insufficient_material(&board("3bk3/8/8/8/8/8/8/2B1K3")));

        assert!(!is_insufficient_material(&board("4k3/8/8/8/8/8/8/R3K3")));
        assert!(!is_insufficient_material(&board("4k3/8/8/8/8/8/8/3QK3")));
        assert!(!is_insufficient_material(&board("4k3/8/8/8/8/8/4P3/4K3")));
        assert!(!is_insufficient_material(&board("1n2k3/8/8/8/8/8/8/1N2K3")));
        assert!(!is_insufficient_material(&board("4k3/8/8/8/8/8/8/1NN1K3")));
        assert!(!is_insufficient_material(&board("2b1k3/8/8/8/8/8/8/1N2K3")));
    }

    #[test]
    fn legal_move_membership() {
        let start = *Position::startpos().board();
        let e2e4 = Move::parse("e2e4").unwrap();
        assert!(is_legal_move(&start, e2e4, Color::White));
        assert!(!is_legal_move(&start, e2e4, Color::Black));
        assert!(!is_legal_move(&start, Move::parse("e2e5").unwrap(), Color::White));
        assert!(!is_legal_move(&start, Move::NULL, Color::White));
    }

    #[test]
    fn result_helpers() {
        assert_eq!(GameResult::checkmated(Color::White), GameResult::BlackWins);
        assert_eq!(GameResult::WhiteWins.winner(), Some(Color::White));
        assert_eq!(GameResult::Draw(DrawReason::Stalemate).winner(), None);
        assert_eq!(GameResult::BlackWins.to_string(), "checkmate, Black wins");
    }
}
