//! Game-tree search for vigil: iterative-deepening alpha-beta with a
//! transposition table, quiescence, null-move pruning and killer/history
//! move ordering.

pub mod error;
pub mod report;
pub mod search;
pub mod time;

pub use error::EngineError;
pub use report::{IterationReport, SearchMode, render_best_move};
pub use search::control::{Clock, SearchControl, SearchLimits, SearchStats};
pub use search::negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY};
pub use search::tt::TableStats;
pub use search::{DEFAULT_HASH_MB, MAX_HASH_MB, SearchResult, Searcher};
