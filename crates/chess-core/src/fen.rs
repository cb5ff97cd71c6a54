//! FEN (Forsyth-Edwards Notation) parsing.
//!
//! The engine only keeps piece placement and the halfmove clock, so the
//! parser accepts either a bare placement field or a full six-field record.

use crate::Color;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 1 to 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling field: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parsed FEN data.
///
/// Holds the validated raw components. Castling and en passant fields are
/// checked for syntax but not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement (e.g., "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").
    pub piece_placement: String,
    /// Side to move, when the record has one.
    pub active_color: Option<Color>,
    /// Halfmove clock (0 when absent).
    pub halfmove_clock: u32,
    /// Fullmove number (1 when absent).
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() || parts.len() > 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let piece_placement = parts[0];
        Self::validate_piece_placement(piece_placement)?;

        let active_color = match parts.get(1) {
            None => None,
            Some(&"w") => Some(Color::White),
            Some(&"b") => Some(Color::Black),
            Some(other) => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        if let Some(castling) = parts.get(2) {
            Self::validate_castling(castling)?;
        }
        if let Some(en_passant) = parts.get(3) {
            Self::validate_en_passant(en_passant)?;
        }

        let halfmove_clock = match parts.get(4) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(field.to_string()))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(field.to_string()))?,
            None => 1,
        };

        Ok(FenParser {
            piece_placement: piece_placement.to_string(),
            active_color,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    squares += skip;
                } else if "pnbrqkPNBRQK".contains(c) {
                    squares += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - i,
                    squares
                )));
            }
        }

        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }
        match castling.chars().find(|c| !"KQkq".contains(*c)) {
            Some(c) => Err(FenError::InvalidCastlingRights(format!(
                "invalid character '{}'",
                c
            ))),
            None => Ok(()),
        }
    }

    fn validate_en_passant(en_passant: &str) -> Result<(), FenError> {
        if en_passant == "-" || crate::Square::from_algebraic(en_passant).is_some() {
            Ok(())
        } else {
            Err(FenError::InvalidEnPassantSquare(en_passant.to_string()))
        }
    }
}
