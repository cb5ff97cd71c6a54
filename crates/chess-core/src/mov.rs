//! Move representation and coordinate notation.

use crate::{Piece, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing coordinate move notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid move format '{0}': expected 4 or 5 characters like e2e4 or a7a8q")]
    InvalidFormat(String),

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid promotion piece '{0}': expected one of q, r, n, b")]
    InvalidPromotion(char),
}

/// A chess move: origin, destination and an optional promotion piece.
///
/// Encoded compactly: 6 bits from, 6 bits to, 3 bits promotion = 16 bits.
/// A move does not know which position it came from; applying it is up to
/// the engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    const PROMOTION_SHIFT: u16 = 12;

    /// A null move (a1a1, no promotion). Returned when there is nothing to play.
    pub const NULL: Move = Move(0);

    /// Creates a new move.
    #[inline]
    pub const fn new(from: Square, to: Square, promotion: Option<Piece>) -> Self {
        let promo_bits: u16 = match promotion {
            Some(Piece::Knight) => 1,
            Some(Piece::Bishop) => 2,
            Some(Piece::Rook) => 3,
            Some(Piece::Queen) => 4,
            _ => 0,
        };
        Move(
            (from.index() as u16)
                | ((to.index() as u16) << 6)
                | (promo_bits << Self::PROMOTION_SHIFT),
        )
    }

    /// Creates a move without promotion.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, None)
    }

    /// Creates a promotion move.
    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        Self::new(from, to, Some(piece))
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_masked((self.0 & 0x3F) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_masked(((self.0 >> 6) & 0x3F) as u8)
    }

    /// Returns the promotion piece, if any.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self.0 >> Self::PROMOTION_SHIFT {
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    /// Returns true for the no-op move (origin equals destination, no promotion).
    #[inline]
    pub const fn is_null(self) -> bool {
        self.from().index() == self.to().index() && !self.is_promotion()
    }

    /// Parses coordinate notation: origin, destination, optional promotion letter.
    pub fn parse(s: &str) -> Result<Self, MoveParseError> {
        let s = s.trim();
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return Err(MoveParseError::InvalidFormat(s.to_string()));
        }
        let from = Square::from_algebraic(&s[0..2])
            .ok_or_else(|| MoveParseError::InvalidSquare(s[0..2].to_string()))?;
        let to = Square::from_algebraic(&s[2..4])
            .ok_or_else(|| MoveParseError::InvalidSquare(s[2..4].to_string()))?;
        let promotion = match s.chars().nth(4) {
            Some(c) => match Piece::from_char(c) {
                Some(piece) if piece.is_promotion_target() => Some(piece),
                _ => return Err(MoveParseError::InvalidPromotion(c)),
            },
            None => None,
        };
        Ok(Move::new(from, to, promotion))
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_notation(self) -> String {
        match self.promotion_piece() {
            Some(piece) => format!("{}{}{}", self.from(), self.to(), piece.to_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_notation())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    #[test]
    fn move_encoding() {
        let e7 = Square::new(File::E, Rank::R7);
        let e8 = Square::new(File::E, Rank::R8);
        let m = Move::promotion(e7, e8, Piece::Knight);

        assert_eq!(m.from(), e7);
        assert_eq!(m.to(), e8);
        assert_eq!(m.promotion_piece(), Some(Piece::Knight));
        assert!(m.is_promotion());
    }

    #[test]
    fn equality_covers_promotion() {
        let a7 = Square::new(File::A, Rank::R7);
        assert_ne!(
            Move::promotion(a7, Square::A8, Piece::Queen),
            Move::promotion(a7, Square::A8, Piece::Rook)
        );
        assert_ne!(
            Move::promotion(a7, Square::A8, Piece::Queen),
            Move::normal(a7, Square::A8)
        );
        assert_eq!(
            Move::promotion(a7, Square::A8, Piece::Queen),
            Move::parse("a7a8q").unwrap()
        );
    }

    #[test]
    fn pawn_and_king_promotions_are_dropped() {
        assert_eq!(Move::new(Square::A1, Square::A8, Some(Piece::King)).promotion_piece(), None);
        assert_eq!(Move::new(Square::A1, Square::A8, Some(Piece::Pawn)).promotion_piece(), None);
    }

    #[test]
    fn parse_and_display() {
        let m: Move = "e2e4".parse().unwrap();
        assert_eq!(m.from().to_algebraic(), "e2");
        assert_eq!(m.to().to_algebraic(), "e4");
        assert_eq!(m.promotion_piece(), None);
        assert_eq!(m.to_string(), "e2e4");

        for (text, piece) in [
            ("e7e8q", Piece::Queen),
            ("e7e8R", Piece::Rook),
            ("e7e8n", Piece::Knight),
            ("e7e8B", Piece::Bishop),
        ] {
            let m = Move::parse(text).unwrap();
            assert_eq!(m.promotion_piece(), Some(piece));
            assert_eq!(m.to_string(), text.to_ascii_lowercase());
        }
    }

    #[test]
    fn parse_rejects_bad_length() {
        assert!(matches!(Move::parse("e2"), Err(MoveParseError::InvalidFormat(_))));
        assert!(matches!(Move::parse("e2e"), Err(MoveParseError::InvalidFormat(_))));
        assert!(matches!(Move::parse("e2e4qq"), Err(MoveParseError::InvalidFormat(_))));
        assert!(matches!(Move::parse(""), Err(MoveParseError::InvalidFormat(_))));
    }

    #[test]
    fn parse_rejects_bad_squares_and_promotions() {
        assert_eq!(
            Move::parse("e2e9"),
            Err(MoveParseError::InvalidSquare("e9".to_string()))
        );
        assert_eq!(
            Move::parse("z2e4"),
            Err(MoveParseError::InvalidSquare("z2".to_string()))
        );
        assert_eq!(Move::parse("e7e8k"), Err(MoveParseError::InvalidPromotion('k')));
        assert_eq!(Move::parse("e7e8x"), Err(MoveParseError::InvalidPromotion('x')));
    }

    #[test]
    fn null_move() {
        assert!(Move::NULL.is_null());
        assert!(Move::default().is_null());
        assert_eq!(Move::NULL.from(), Square::A1);
        assert!(!Move::parse("e2e4").unwrap().is_null());
        let e5 = Square::new(File::E, Rank::R5);
        assert!(Move::normal(e5, e5).is_null());
    }

    #[test]
    fn move_debug() {
        let m = Move::parse("g1f3").unwrap();
        assert_eq!(format!("{:?}", m), "Move(g1f3)");
    }
}
