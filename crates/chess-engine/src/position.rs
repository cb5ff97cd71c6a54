//! Board state and the move history stack.

use std::fmt;

use chess_core::{Color, FenError, FenParser, File, Move, Piece, Rank, Square};
use tracing::debug;

use crate::{rules, Bitboard, EngineError};

/// Piece placement plus the halfmove clock.
///
/// The twelve `[color][piece]` bitboards are the source of truth. The
/// per-color and combined occupancy sets are caches rebuilt by
/// [`Board::refresh_occupancy`] after every structural change.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    pieces: [[Bitboard; 6]; 2],
    colors: [Bitboard; 2],
    occupied: Bitboard,
    /// Plies since the last pawn move or capture.
    pub halfmove_clock: u32,
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            halfmove_clock: 0,
        }
    }

    /// Builds a board from a placement field already checked by [`FenParser`].
    pub(crate) fn from_placement(placement: &str) -> Self {
        let mut board = Board::empty();
        for (rank_idx, rank_str) in placement.split('/').enumerate() {
            let Some(rank) = 7u8.checked_sub(rank_idx as u8).and_then(Rank::from_index) else {
                continue;
            };
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file = file.saturating_add(skip as u8);
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    if let Some(file) = File::from_index(file) {
                        board.pieces[color.index()][piece.index()].set(Square::new(file, rank));
                    }
                    file = file.saturating_add(1);
                }
            }
        }
        board.refresh_occupancy();
        board
    }

    /// Recomputes the derived occupancy sets from the twelve piece sets.
    pub fn refresh_occupancy(&mut self) {
        for color in Color::ALL {
            self.colors[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        }
        self.occupied = self.colors[0] | self.colors[1];
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// All squares occupied by `color`.
    #[inline]
    pub fn color_occupancy(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        if !self.occupied.contains(sq) {
            return None;
        }
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces_of(*piece, color).contains(sq))
            .map(|piece| (piece, color))
    }

    /// Returns the square of the king of `color` (the lowest one if there are several).
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).lsb()
    }

    /// Places a piece, replacing whatever stood on the square.
    pub fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.clear_square(sq);
        self.pieces[color.index()][piece.index()].set(sq);
        self.refresh_occupancy();
    }

    /// Removes and returns the piece on the square.
    pub fn remove(&mut self, sq: Square) -> Option<(Piece, Color)> {
        let removed = self.clear_square(sq);
        self.refresh_occupancy();
        removed
    }

    fn clear_square(&mut self, sq: Square) -> Option<(Piece, Color)> {
        let found = self.piece_at(sq)?;
        let (piece, color) = found;
        self.pieces[color.index()][piece.index()].clear(sq);
        Some(found)
    }

    /// Applies a move for `color` without recording history or checking legality.
    ///
    /// Whatever stands on the destination is removed first. A promotion move
    /// only promotes when a pawn of `color` is on the origin; otherwise the
    /// piece of `color` on the origin is relocated.
    pub fn apply_in_place(&mut self, mv: Move, color: Color) {
        let from = mv.from();
        let to = mv.to();
        let is_pawn_move = self.pieces_of(Piece::Pawn, color).contains(from);
        let captured = if from != to {
            self.clear_square(to)
        } else {
            None
        };

        match mv.promotion_piece() {
            Some(promoted) if is_pawn_move => {
                self.pieces[color.index()][Piece::Pawn.index()].clear(from);
                self.pieces[color.index()][promoted.index()].set(to);
            }
            _ => {
                let moving = Piece::ALL
                    .into_iter()
                    .find(|piece| self.pieces_of(*piece, color).contains(from));
                if let Some(piece) = moving {
                    let bb = &mut self.pieces[color.index()][piece.index()];
                    bb.clear(from);
                    bb.set(to);
                }
            }
        }

        self.refresh_occupancy();

        if is_pawn_move || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
    }

    /// Renders the placement field of a FEN record.
    pub fn to_fen_placement(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8u8).rev().filter_map(Rank::from_index) {
            let mut empty_count = 0;
            for file in (0..8u8).filter_map(File::from_index) {
                match self.piece_at(Square::new(file, rank)) {
                    Some((piece, color)) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::R1 {
                fen.push('/');
            }
        }
        fen
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for rank in (0..8u8).rev().filter_map(Rank::from_index) {
            write!(f, "{} |", rank)?;
            for file in (0..8u8).filter_map(File::from_index) {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', |(piece, color)| piece.to_fen_char(color));
                write!(f, " {}", c)?;
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "  +-----------------+")?;
        writeln!(f, "    a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("placement", &self.to_fen_placement())
            .field("halfmove_clock", &self.halfmove_clock)
            .finish()
    }
}

/// The board as it was before a move, together with that move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub mv: Move,
}

/// A board with an undo stack.
///
/// Every [`Position::apply`] pushes a full snapshot, so [`Position::undo`]
/// restores the previous state exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    board: Board,
    history: Vec<Snapshot>,
}

impl Position {
    /// A position with no pieces.
    pub fn empty() -> Self {
        Position {
            board: Board::empty(),
            history: Vec::new(),
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN record or a bare placement field.
    ///
    /// Only placement and the halfmove clock are kept.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut board = Board::from_placement(&parsed.piece_placement);
        board.halfmove_clock = parsed.halfmove_clock;
        Ok(Position {
            board,
            history: Vec::new(),
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.board.halfmove_clock
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board.piece_at(sq)
    }

    /// Applied moves that have not been undone, oldest first.
    #[inline]
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|snapshot| snapshot.mv)
    }

    /// Places a piece for setup code. Does not touch history.
    pub fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.board.put(sq, piece, color);
    }

    /// Removes a piece for setup code. Does not touch history.
    pub fn remove(&mut self, sq: Square) -> Option<(Piece, Color)> {
        self.board.remove(sq)
    }

    /// Applies a move for `color` and records a snapshot. No legality check.
    pub fn apply(&mut self, mv: Move, color: Color) {
        self.history.push(Snapshot {
            board: self.board,
            mv,
        });
        self.board.apply_in_place(mv, color);
    }

    /// Restores the state before the last applied move and returns that move.
    pub fn undo(&mut self) -> Result<Move, EngineError> {
        let snapshot = self.history.pop().ok_or(EngineError::EmptyHistory)?;
        self.board = snapshot.board;
        Ok(snapshot.mv)
    }

    /// Applies the move only if it is legal for `color`.
    pub fn try_apply(&mut self, mv: Move, color: Color) -> Result<(), EngineError> {
        if !rules::is_legal_move(&self.board, mv, color) {
            debug!(%mv, %color, "rejected illegal move");
            return Err(EngineError::IllegalMove { mv, color });
        }
        self.apply(mv, color);
        Ok(())
    }

    /// Parses coordinate notation and applies the move if it is legal.
    pub fn apply_notation(&mut self, text: &str, color: Color) -> Result<Move, EngineError> {
        let mv = Move::parse(text)?;
        self.try_apply(mv, color)?;
        Ok(mv)
    }

    /// Checks that each side has exactly one king.
    pub fn validate(&self) -> Result<(), EngineError> {
        for color in Color::ALL {
            match self.board.pieces_of(Piece::King, color).count() {
                0 => return Err(EngineError::MissingKing(color)),
                1 => {}
                _ => return Err(EngineError::ExtraKing(color)),
            }
        }
        Ok(())
    }

    /// Renders the placement field of a FEN record.
    pub fn to_fen_placement(&self) -> String {
        self.board.to_fen_placement()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STARTPOS_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn mv(text: &str) -> Move {
        Move::parse(text).unwrap()
    }

    #[test]
    fn startpos_placement_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen_placement(), STARTPOS_PLACEMENT);
        assert!(pos.history().is_empty());
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn custom_placement_roundtrip() {
        let placement = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R";
        let pos = Position::from_fen(placement).unwrap();
        assert_eq!(pos.to_fen_placement(), placement);
    }

    #[test]
    fn halfmove_clock_from_fen() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/R3K2k w - - 42 80").unwrap();
        assert_eq!(pos.halfmove_clock(), 42);
    }

    #[test]
    fn occupancy_is_derived() {
        let pos = Position::startpos();
        let board = pos.board();
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.color_occupancy(Color::White).count(), 16);
        assert_eq!(board.color_occupancy(Color::Black).count(), 16);
        assert_eq!(board.pieces_of(Piece::Pawn, Color::White).count(), 8);
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
    }

    #[test]
    fn piece_at() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::E8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(sq("e4")), None);
    }

    #[test]
    fn put_and_remove() {
        let mut pos = Position::empty();
        pos.put(sq("d4"), Piece::Knight, Color::White);
        pos.put(sq("d4"), Piece::Rook, Color::Black);
        assert_eq!(pos.piece_at(sq("d4")), Some((Piece::Rook, Color::Black)));
        assert_eq!(pos.board().occupied().count(), 1);
        assert_eq!(pos.remove(sq("d4")), Some((Piece::Rook, Color::Black)));
        assert!(pos.board().occupied().is_empty());
        assert_eq!(pos.remove(sq("d4")), None);
    }

    #[test]
    fn apply_and_undo_restore_board() {
        let mut pos = Position::startpos();
        let before = pos.clone();
        pos.apply(mv("e2e4"), Color::White);
        assert_eq!(pos.piece_at(sq("e4")), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.piece_at(sq("e2")), None);
        assert_eq!(pos.history().len(), 1);
        assert_eq!(pos.last_move(), Some(mv("e2e4")));

        assert_eq!(pos.undo(), Ok(mv("e2e4")));
        assert_eq!(pos, before);
    }

    #[test]
    fn undo_on_empty_history() {
        let mut pos = Position::startpos();
        assert_eq!(pos.undo(), Err(EngineError::EmptyHistory));
        assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn halfmove_clock_counts_quiet_moves() {
        let mut pos = Position::startpos();
        pos.apply(mv("g1f3"), Color::White);
        pos.apply(mv("g8f6"), Color::Black);
        assert_eq!(pos.halfmove_clock(), 2);
        pos.apply(mv("e2e4"), Color::White);
        assert_eq!(pos.halfmove_clock(), 0);
        pos.apply(mv("f6e4"), Color::Black);
        assert_eq!(pos.halfmove_clock(), 0);
        pos.undo().unwrap();
        pos.undo().unwrap();
        assert_eq!(pos.halfmove_clock(), 2);
    }

    #[test]
    fn capture_removes_enemy_piece() {
        let mut pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        pos.apply(mv("e4d5"), Color::White);
        assert_eq!(pos.piece_at(sq("d5")), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.board().pieces_of(Piece::Pawn, Color::Black).count(), 0);
        assert_eq!(pos.board().occupied().count(), 3);
    }

    #[test]
    fn promotion_replaces_pawn() {
        let mut pos = Position::empty();
        pos.put(sq("a7"), Piece::Pawn, Color::White);
        pos.apply(mv("a7a8q"), Color::White);
        assert_eq!(pos.piece_at(Square::A8), Some((Piece::Queen, Color::White)));
        assert_eq!(pos.piece_at(sq("a7")), None);
        assert!(pos.board().pieces_of(Piece::Pawn, Color::White).is_empty());
    }

    #[test]
    fn promotion_letter_on_non_pawn_is_a_plain_move() {
        let mut pos = Position::empty();
        pos.put(sq("a7"), Piece::Rook, Color::White);
        pos.apply(mv("a7a8q"), Color::White);
        assert_eq!(pos.piece_at(Square::A8), Some((Piece::Rook, Color::White)));
    }

    #[test]
    fn try_apply_rejects_without_mutation() {
        let mut pos = Position::startpos();
        let err = pos.try_apply(mv("e2e5"), Color::White).unwrap_err();
        assert_eq!(
            err,
            EngineError::IllegalMove {
                mv: mv("e2e5"),
                color: Color::White
            }
        );
        assert_eq!(pos, Position::startpos());

        assert!(pos.try_apply(mv("e7e5"), Color::White).is_err());
        assert!(pos.try_apply(mv("e2e4"), Color::White).is_ok());
        assert_eq!(pos.history().len(), 1);
    }

    #[test]
    fn apply_notation() {
        let mut pos = Position::startpos();
        assert_eq!(pos.apply_notation("g1f3", Color::White), Ok(mv("g1f3")));
        assert!(matches!(
            pos.apply_notation("g8", Color::Black),
            Err(EngineError::InvalidNotation(_))
        ));
        assert!(matches!(
            pos.apply_notation("g8g6", Color::Black),
            Err(EngineError::IllegalMove { .. })
        ));
        assert_eq!(pos.history().len(), 1);
    }

    #[test]
    fn validate_kings() {
        assert!(Position::startpos().validate().is_ok());
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3").unwrap().validate(),
            Err(EngineError::MissingKing(Color::Black))
        );
        assert_eq!(
            Position::from_fen("k7/8/8/8/8/8/8/K3K3").unwrap().validate(),
            Err(EngineError::ExtraKing(Color::White))
        );
    }

    #[test]
    fn display_draws_diagram() {
        let text = Position::startpos().to_string();
        assert!(text.contains("8 | r n b q k b n r |"));
        assert!(text.contains("1 | R N B Q K B N R |"));
        assert!(text.contains("4 | . . . . . . . . |"));
        assert!(text.ends_with("    a b c d e f g h\n"));
    }

    #[test]
    fn halfmove_clock_saturates() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 4294967295 1").unwrap();
        assert_eq!(pos.halfmove_clock(), u32::MAX);
        pos.apply(Move::parse("a1a2").unwrap(), Color::White);
        assert_eq!(pos.halfmove_clock(), u32::MAX);
        pos.undo().unwrap();
        assert_eq!(pos.halfmove_clock(), u32::MAX);
    }

    #[test]
    fn oversized_empty_runs_stay_on_board() {
        let board = Board::from_placement(&"9".repeat(40));
        assert!(board.occupied().is_empty());

        let board = Board::from_placement("99k/8/8/8/8/8/8/4K3");
        assert!(board.pieces_of(Piece::King, Color::Black).is_empty());
        assert_eq!(board.pieces_of(Piece::King, Color::White).count(), 1);
    }

    proptest! {
        #[test]
        fn apply_undo_roundtrip(choices in proptest::collection::vec(any::<usize>(), 1..40)) {
            let mut pos = Position::startpos();
            let mut color = Color::White;
            let mut boards = vec![*pos.board()];
            for choice in &choices {
                let moves = crate::legal_moves(pos.board(), color);
                if moves.is_empty() {
                    break;
                }
                pos.apply(moves[choice % moves.len()], color);
                boards.push(*pos.board());
                color = color.opposite();
            }
            boards.pop();
            while let Some(expected) = boards.pop() {
                pos.undo().unwrap();
                prop_assert_eq!(pos.board(), &expected);
            }
            prop_assert!(pos.history().is_empty());
            prop_assert_eq!(pos, Position::startpos());
        }
    }
}
