//! Prints the best move for a position.
//!
//! ```text
//! bestmove --moves e2e4,e7e5 --depth 4
//! bestmove --fen "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1" --strength newbie
//! RUST_LOG=chess_search=debug bestmove --config search.toml
//! ```

use anyhow::Context;
use chess_core::{Color, FenParser};
use chess_engine::{game_result, Position};
use chess_search::{mate_distance, SearchConfig, Searcher, Strength};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Searches a position and prints the chosen move.
#[derive(Parser)]
#[command(name = "bestmove")]
#[command(about = "Searches a chess position and prints the best move")]
struct Args {
    /// Starting position as FEN
    #[arg(long, default_value = FenParser::STARTPOS)]
    fen: String,

    /// Comma-separated moves applied to the --fen position, starting with its side to move
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,

    /// Side to search for. Defaults to the side to move.
    #[arg(long)]
    color: Option<Color>,

    /// Search depth in plies
    #[arg(long, conflicts_with = "strength")]
    depth: Option<u32>,

    /// Named strength: newbie, club or grandmaster
    #[arg(long)]
    strength: Option<Strength>,

    /// TOML file with search settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(strength) = args.strength {
        config.depth = strength.depth();
    }
    if let Some(depth) = args.depth {
        config.depth = depth;
    }

    let fen = FenParser::parse(&args.fen).context("parsing --fen")?;
    let mut position = Position::from_fen(&args.fen).context("parsing --fen")?;
    position.validate()?;

    let mut to_move = fen.active_color.unwrap_or(Color::White);
    for text in args.moves.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
        position
            .apply_notation(text, to_move)
            .with_context(|| format!("applying {text}"))?;
        to_move = to_move.opposite();
    }
    let color = args.color.unwrap_or(to_move);

    println!("{position}");
    if let Some(result) = game_result(position.board(), color)? {
        println!("Game over: {result}");
        return Ok(());
    }
    tracing::info!(depth = config.depth, %color, "searching");
    let mut searcher = Searcher::new(config);
    let outcome = searcher.search(&mut position, color)?;

    // Mate distances are reported for the side that searched.
    match mate_distance(color.sign() * outcome.score) {
        Some(plies) if plies > 0 => {
            println!("{} {} (mate in {} plies)", color, outcome.best_move, plies)
        }
        Some(plies) => println!(
            "{} {} (mated in {} plies)",
            color,
            outcome.best_move,
            -plies
        ),
        None => println!("{} {} ({:+})", color, outcome.best_move, outcome.score),
    }
    tracing::info!(
        nodes = outcome.stats.nodes,
        quiescence_nodes = outcome.stats.quiescence_nodes,
        cache_hits = outcome.stats.cache_hits,
        cutoffs = outcome.stats.cutoffs,
        "search stats"
    );
    Ok(())
}
