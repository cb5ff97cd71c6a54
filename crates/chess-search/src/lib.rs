//! Best-move search over a [`chess_engine::Position`].
//!
//! - [`evaluate`] - material plus piece-square tables, from White's view
//! - [`order_moves`] - captures and promotions first, seeded shuffle for ties
//! - [`Searcher`] - negamax with alpha-beta, quiescence, a transposition
//!   cache and a repetition counter
//! - [`SearchConfig`] - search tunables, loadable from TOML
//!
//! # Example
//!
//! ```
//! use chess_core::Color;
//! use chess_engine::Position;
//! use chess_search::best_move;
//!
//! let mut position = Position::startpos();
//! let outcome = best_move(&mut position, 2, Color::White).unwrap();
//! assert!(outcome.has_move());
//! assert_eq!(position, Position::startpos());
//! ```

mod config;
mod evaluation;
mod ordering;
mod repetition;
mod search;
mod tt;

pub use config::{ConfigError, SearchConfig, Strength};
pub use evaluation::{
    evaluate, evaluate_relative, is_mate_score, mate_distance, mated_in, piece_value,
    square_bonus, INFINITY, MATE_SCORE, MATE_THRESHOLD,
};
pub use ordering::{is_tactical, move_score, order_moves};
pub use repetition::RepetitionCounter;
pub use search::{best_move, SearchOutcome, SearchStats, Searcher};
pub use tt::{Bound, TranspositionTable, TtEntry, TtStats};
