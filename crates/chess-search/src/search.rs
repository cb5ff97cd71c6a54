//! Negamax alpha-beta search with quiescence.
//!
//! Scores inside the search are from the point of view of the side to move
//! at each node. [`SearchOutcome::score`] is converted to White's view.

use chess_core::{Color, Move};
use chess_engine::{
    in_check, is_draw_by_fifty_moves, is_insufficient_material, legal_moves, side_hash,
    EngineError, MoveList, Position,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::evaluation::{
    evaluate_relative, mated_in, score_from_cache, score_to_cache, INFINITY,
};
use crate::ordering::{is_tactical, order_moves};
use crate::repetition::RepetitionCounter;
use crate::tt::{Bound, TranspositionTable, TtEntry};

/// Counters collected during one `best_move` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Negamax nodes visited, root children included.
    pub nodes: u64,
    pub quiescence_nodes: u64,
    /// Nodes answered from the transposition cache.
    pub cache_hits: u64,
    /// Beta cutoffs in negamax and quiescence.
    pub cutoffs: u64,
}

/// Result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The chosen move, or [`Move::NULL`] when the side has no legal move.
    pub best_move: Move,
    /// Score of the chosen line from White's point of view.
    pub score: i32,
    /// Depth actually searched, in plies.
    pub depth: u32,
    pub stats: SearchStats,
}

impl SearchOutcome {
    #[inline]
    pub fn has_move(&self) -> bool {
        !self.best_move.is_null()
    }
}

/// Depth-bounded negamax searcher.
///
/// Owns its transposition cache and repetition counter, so independent
/// searchers never share state.
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
    cache: TranspositionTable,
    repetitions: RepetitionCounter,
    rng: Option<StdRng>,
    stats: SearchStats,
    root_color: Color,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            config,
            cache: TranspositionTable::new(),
            repetitions: RepetitionCounter::new(),
            rng: None,
            stats: SearchStats::default(),
            root_color: Color::White,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &TranspositionTable {
        &self.cache
    }

    /// Drops every cached score. Call this when the game history changed
    /// underneath a searcher that persists its cache.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Searches to the configured depth.
    pub fn search(
        &mut self,
        position: &mut Position,
        color: Color,
    ) -> Result<SearchOutcome, EngineError> {
        self.best_move(position, self.config.depth, color)
    }

    /// Picks the best move for `color` searching `depth` plies.
    ///
    /// The position is restored before returning. Ties keep the first move
    /// in search order. A depth of 0 is searched as 1.
    pub fn best_move(
        &mut self,
        position: &mut Position,
        depth: u32,
        color: Color,
    ) -> Result<SearchOutcome, EngineError> {
        position.validate()?;
        let depth = if depth == 0 {
            warn!("search depth 0 requested, searching 1 ply");
            1
        } else {
            depth
        };

        if !self.config.persist_cache {
            self.cache.clear();
        }
        self.stats = SearchStats::default();
        self.repetitions.reset();
        self.rng = self.config.shuffle_seed.map(StdRng::seed_from_u64);
        self.root_color = color;

        let board = *position.board();
        let root_hash = side_hash(&board, color);
        self.repetitions.enter(root_hash);

        let mut moves = legal_moves(&board, color);
        self.order(position, &mut moves, color);
        debug!(depth, %color, legal_moves = moves.len(), "searching");

        if moves.is_empty() {
            let score = if in_check(&board, color)? {
                mated_in(0)
            } else {
                self.draw_score(color)
            };
            self.repetitions.leave(root_hash);
            debug!(%color, "no legal move");
            return Ok(self.outcome(Move::NULL, color.sign() * score, depth));
        }

        let mut best_move = Move::NULL;
        let mut best_score = -INFINITY;
        let mut alpha = -INFINITY;
        for &mv in moves.iter() {
            position.apply(mv, color);
            let result = self.negamax(position, depth - 1, 1, -INFINITY, -alpha, color.opposite());
            position.undo()?;
            let score = -result?;
            trace!(%mv, score = color.sign() * score, "root move");

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if self.config.alpha_beta && score > alpha {
                alpha = score;
            }
        }
        self.repetitions.leave(root_hash);

        let outcome = self.outcome(best_move, color.sign() * best_score, depth);
        debug!(
            best_move = %outcome.best_move,
            score = outcome.score,
            nodes = outcome.stats.nodes,
            cache_hits = outcome.stats.cache_hits,
            "search finished"
        );
        Ok(outcome)
    }

    fn outcome(&self, best_move: Move, score: i32, depth: u32) -> SearchOutcome {
        SearchOutcome {
            best_move,
            score,
            depth,
            stats: self.stats,
        }
    }

    fn order(&mut self, position: &Position, moves: &mut MoveList, color: Color) {
        order_moves(position.board(), moves.as_mut_slice(), color, self.rng.as_mut());
    }

    /// Draw score for the side to move: `-contempt` for the searching side.
    fn draw_score(&self, color: Color) -> i32 {
        if color == self.root_color {
            -self.config.contempt
        } else {
            self.config.contempt
        }
    }

    fn negamax(
        &mut self,
        position: &mut Position,
        depth: u32,
        ply: u32,
        alpha: i32,
        beta: i32,
        color: Color,
    ) -> Result<i32, EngineError> {
        self.stats.nodes += 1;
        let hash = side_hash(position.board(), color);
        let occurrences = self.repetitions.enter(hash);
        let result = if occurrences >= self.config.repetition_limit {
            if ply == 1 {
                warn!(occurrences, "root move repeats a position, scoring it as a draw");
            }
            Ok(self.draw_score(color))
        } else {
            self.negamax_node(position, hash, depth, ply, alpha, beta, color)
        };
        self.repetitions.leave(hash);
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn negamax_node(
        &mut self,
        position: &mut Position,
        hash: u64,
        depth: u32,
        ply: u32,
        mut alpha: i32,
        beta: i32,
        color: Color,
    ) -> Result<i32, EngineError> {
        let original_alpha = alpha;

        if self.config.use_cache && depth > 0 {
            if let Some(entry) = self.cache.probe(hash) {
                let entry = TtEntry {
                    score: score_from_cache(entry.score, ply),
                    ..entry
                };
                if let Some(score) = entry.usable(depth, alpha, beta) {
                    self.stats.cache_hits += 1;
                    return Ok(score);
                }
            }
        }

        let board = *position.board();
        if is_insufficient_material(&board) || is_draw_by_fifty_moves(&board) {
            return Ok(self.draw_score(color));
        }

        let mut moves = legal_moves(&board, color);
        if moves.is_empty() {
            return Ok(if in_check(&board, color)? {
                mated_in(ply)
            } else {
                self.draw_score(color)
            });
        }

        if depth == 0 {
            return self.quiescence(position, 0, alpha, beta, color);
        }

        self.order(position, &mut moves, color);
        let mut best = -INFINITY;
        for &mv in moves.iter() {
            position.apply(mv, color);
            let result = self.negamax(position, depth - 1, ply + 1, -beta, -alpha, color.opposite());
            position.undo()?;
            let score = -result?;

            if score > best {
                best = score;
            }
            if self.config.alpha_beta {
                if score > alpha {
                    alpha = score;
                }
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
        }

        if self.config.use_cache {
            self.cache.store(
                hash,
                TtEntry {
                    depth,
                    score: score_to_cache(best, ply),
                    bound: Bound::from_window(best, original_alpha, beta),
                },
            );
        }
        Ok(best)
    }

    /// Captures and promotions only, with stand-pat on the static score.
    fn quiescence(
        &mut self,
        position: &mut Position,
        qply: u32,
        mut alpha: i32,
        beta: i32,
        color: Color,
    ) -> Result<i32, EngineError> {
        self.stats.quiescence_nodes += 1;
        let board = *position.board();
        let stand_pat = evaluate_relative(&board, color);
        if qply >= self.config.quiescence_limit {
            return Ok(stand_pat);
        }

        if self.config.alpha_beta {
            if stand_pat >= beta {
                self.stats.cutoffs += 1;
                return Ok(stand_pat);
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
        }

        let mut moves = legal_moves(&board, color);
        moves.retain(|m| is_tactical(&board, *m, color));
        self.order(position, &mut moves, color);

        let mut best = stand_pat;
        for &mv in moves.iter() {
            position.apply(mv, color);
            let result = self.quiescence(position, qply + 1, -beta, -alpha, color.opposite());
            position.undo()?;
            let score = -result?;

            if score > best {
                best = score;
            }
            if self.config.alpha_beta {
                if score > alpha {
                    alpha = score;
                }
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
        }
        Ok(best)
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new(SearchConfig::default())
    }
}

/// Searches with the default configuration.
pub fn best_move(
    position: &mut Position,
    depth: u32,
    color: Color,
) -> Result<SearchOutcome, EngineError> {
    Searcher::default().best_move(position, depth, color)
}
