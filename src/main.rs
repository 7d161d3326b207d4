use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vigil_board::Position;
use vigil_engine::{
    Clock, DEFAULT_HASH_MB, SearchControl, SearchLimits, SearchMode, Searcher, render_best_move,
};

/// Depth used when no depth or time limit is given.
const DEFAULT_DEPTH: u8 = 6;

#[derive(Parser, Debug)]
#[command(name = "vigil", version, about = "Search a chess position with iterative-deepening alpha-beta")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Moves to play from the FEN before searching, in coordinate notation
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,

    /// Maximum search depth in plies
    #[arg(long)]
    depth: Option<u8>,

    /// Fixed time for this move in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Remaining clock time in milliseconds
    #[arg(long)]
    time: Option<u64>,

    /// Increment per move in milliseconds
    #[arg(long, default_value_t = 0)]
    inc: u64,

    /// Moves until the next time control
    #[arg(long)]
    movestogo: Option<u32>,

    /// Transposition table size in MB
    #[arg(long, default_value_t = DEFAULT_HASH_MB)]
    hash: usize,

    /// Output format: console, uci or xboard
    #[arg(long, default_value = "console")]
    mode: SearchMode,
}

impl Args {
    fn limits(&self) -> SearchLimits {
        let clock = self.time.map(|remaining| Clock {
            remaining: Duration::from_millis(remaining),
            increment: Duration::from_millis(self.inc),
            moves_to_go: self.movestogo,
        });
        let movetime = self.movetime.map(Duration::from_millis);
        let depth = match (self.depth, movetime, clock) {
            (None, None, None) => Some(DEFAULT_DEPTH),
            (depth, _, _) => depth,
        };
        SearchLimits {
            depth,
            movetime,
            clock,
        }
    }
}

/// Spawn a reader on stdin; the returned flag goes up once a line arrives.
fn watch_stdin() -> Arc<AtomicBool> {
    let pending = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&pending);
    std::thread::spawn(move || {
        let mut line = String::new();
        if let Ok(n) = std::io::stdin().lock().read_line(&mut line) {
            if n > 0 {
                flag.store(true, Ordering::Relaxed);
            }
        }
    });
    pending
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(mode = %args.mode, hash_mb = args.hash, "vigil starting");

    let mut pos = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen)?
    };
    for text in &args.moves {
        pos.play_uci(text)
            .with_context(|| format!("applying move list {:?}", args.moves))?;
    }

    let mut searcher = Searcher::with_hash_mb(args.hash)?;
    let limits = args.limits();
    let input = watch_stdin();
    let mut control = SearchControl::from_limits(Arc::new(AtomicBool::new(false)), &limits)?
        .with_mode(args.mode)
        .with_input_probe(move || input.load(Ordering::Relaxed));

    let mode = control.mode();
    let result = searcher.search(&mut pos, &mut control, |report| {
        println!("{}", report.render(mode));
    });

    if result.best_move.is_none() {
        warn!(depth = result.depth, "search returned no move");
    }
    info!(
        depth = result.depth,
        score = result.score,
        nodes = result.stats.nodes,
        elapsed_ms = control.elapsed().as_millis() as u64,
        "search finished"
    );
    let best = result.best_move.map(|mv| pos.display_move(mv));
    println!("{}", render_best_move(mode, best));
    Ok(())
}
