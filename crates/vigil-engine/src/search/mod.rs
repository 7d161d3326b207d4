//! Iterative-deepening search over the board collaborator.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
mod quiescence;
pub mod tt;

use tracing::debug;
use vigil_board::{Move, Position};

use crate::error::EngineError;
use crate::report::IterationReport;
use control::{SearchControl, SearchStats};
use heuristics::{HistoryTable, KillerTable};
use negamax::{INF, SearchContext, alpha_beta};
use tt::{TableStats, TranspositionTable};

/// Default transposition table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 64;

/// Largest accepted transposition table size in megabytes.
pub const MAX_HASH_MB: usize = 65_536;

/// Result of the last completed iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    /// `None` when no iteration completed or the root has no legal move.
    pub best_move: Option<Move>,
    pub pv: Vec<Move>,
    /// Score from the side to move's point of view.
    pub score: i32,
    /// Depth of the last completed iteration; 0 if none completed.
    pub depth: u8,
    /// Counters for the whole search, interrupted iteration included.
    pub stats: SearchStats,
    pub table: TableStats,
}

/// Owns the state that outlives a single search: the transposition table
/// and the killer and history tables.
pub struct Searcher {
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
}

impl Searcher {
    /// Create a searcher with a [`DEFAULT_HASH_MB`] table.
    pub fn new() -> Self {
        Self::with_table(TranspositionTable::new(DEFAULT_HASH_MB))
    }

    /// Create a searcher with a table of `mb` megabytes.
    pub fn with_hash_mb(mb: usize) -> Result<Self, EngineError> {
        if mb == 0 || mb > MAX_HASH_MB {
            return Err(EngineError::InvalidHashSize {
                mb,
                max: MAX_HASH_MB,
            });
        }
        Ok(Self::with_table(TranspositionTable::new(mb)))
    }

    /// Create a searcher around an existing table.
    pub fn with_table(tt: TranspositionTable) -> Self {
        Self {
            tt,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
        }
    }

    /// Forget every table entry, e.g. for a new game.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    pub fn table_stats(&self) -> TableStats {
        self.tt.stats()
    }

    /// Reset per-search scratch state. Table entries are kept.
    fn clear_for_search(&mut self, pos: &mut Position, control: &mut SearchControl) {
        self.history.clear();
        self.killers.clear();
        self.tt.clear_stats();
        self.tt.new_generation();
        pos.reset_ply();
        control.clear();
    }

    /// Run iterative deepening from `pos` until `control` stops it or its
    /// depth limit is reached.
    ///
    /// `on_iteration` is called after each completed iteration. An iteration
    /// cut short by the stop flag is discarded; the result always describes
    /// the last completed one. `pos` is unchanged on return.
    pub fn search<F>(
        &mut self,
        pos: &mut Position,
        control: &mut SearchControl,
        mut on_iteration: F,
    ) -> SearchResult
    where
        F: FnMut(&IterationReport),
    {
        self.clear_for_search(pos, control);
        let mut result = SearchResult::default();

        for depth in 1..=control.max_depth() {
            if control.is_stopped() {
                break;
            }

            let (score, root_best) = {
                let mut ctx = SearchContext::new(
                    &mut self.tt,
                    &mut self.killers,
                    &mut self.history,
                    &mut *control,
                );
                let score = alpha_beta(pos, -INF, INF, i32::from(depth), &mut ctx, true);
                (score, ctx.root_best)
            };

            if control.is_stopped() {
                debug!(depth, nodes = control.stats().nodes, "iteration interrupted, discarded");
                break;
            }

            let (pv, shown) = self.principal_variation(pos, usize::from(depth), root_best);
            let stats = control.stats();
            let table = self.tt.stats();
            let report = IterationReport {
                depth,
                score,
                nodes: stats.nodes,
                elapsed: control.elapsed(),
                pv: shown,
                ordering: stats.ordering(),
                table,
                null_cuts: stats.null_cuts,
            };
            debug!(
                depth,
                score,
                nodes = stats.nodes,
                ordering = stats.ordering(),
                tt_hits = table.hits,
                tt_cuts = table.cuts,
                null_cuts = stats.null_cuts,
                "iteration complete"
            );
            on_iteration(&report);

            result = SearchResult {
                best_move: pv.first().copied(),
                pv,
                score,
                depth,
                stats,
                table,
            };
        }

        result.stats = control.stats();
        result
    }

    /// Walk stored best moves from the root, at most `depth` plies.
    ///
    /// Starts from `root_best` when the root raised alpha this iteration.
    /// Every move is checked for legality before it is played; the position
    /// is restored before returning. Returns the playable line and the same
    /// line in display notation.
    fn principal_variation(
        &self,
        pos: &mut Position,
        depth: usize,
        root_best: Option<Move>,
    ) -> (Vec<Move>, Vec<Move>) {
        let mut pv = Vec::with_capacity(depth);
        let mut shown = Vec::with_capacity(depth);
        let mut next = root_best.or_else(|| self.tt.best_move(pos.key()));

        while let Some(mv) = next {
            if pv.len() >= depth || !pos.move_exists(mv) {
                break;
            }
            let text = pos.display_move(mv);
            if !pos.make_move(mv) {
                break;
            }
            pv.push(mv);
            shown.push(text);
            next = self.tt.best_move(pos.key());
        }

        for _ in 0..pv.len() {
            pos.take_move();
        }
        (pv, shown)
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher").field("tt", &self.tt).finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn small_searcher() -> Searcher {
        Searcher::with_table(TranspositionTable::with_capacity(1 << 16))
    }

    fn control(depth: u8) -> SearchControl {
        SearchControl::new_infinite(Arc::new(AtomicBool::new(false)))
            .with_depth(depth)
            .unwrap()
    }

    #[test]
    fn depth_one_returns_a_legal_move() {
        let mut pos = Position::startpos();
        let result = small_searcher().search(&mut pos, &mut control(1), |_| {});
        let best = result.best_move.expect("a move at depth 1");
        assert!(pos.move_exists(best));
        assert_eq!(result.depth, 1);
        assert!(result.score.abs() < negamax::MATE_THRESHOLD);
    }

    #[test]
    fn hash_size_is_validated() {
        assert!(matches!(
            Searcher::with_hash_mb(0),
            Err(EngineError::InvalidHashSize { mb: 0, .. })
        ));
        assert!(Searcher::with_hash_mb(MAX_HASH_MB + 1).is_err());
        assert!(Searcher::with_hash_mb(1).is_ok());
    }

    #[test]
    fn iterations_report_in_order() {
        let mut pos = Position::startpos();
        let mut depths = Vec::new();
        small_searcher().search(&mut pos, &mut control(4), |report| {
            assert!(!report.pv.is_empty(), "empty pv at depth {}", report.depth);
            assert!(report.pv.len() <= report.depth as usize);
            depths.push(report.depth);
        });
        assert_eq!(depths, vec![1, 2, 3, 4]);
    }

    #[test]
    fn pv_is_a_legal_line() {
        let mut pos = Position::startpos();
        let result = small_searcher().search(&mut pos, &mut control(4), |_| {});
        let mut replay = pos.clone();
        for mv in &result.pv {
            assert!(replay.make_move(*mv), "pv move {mv} is illegal");
        }
        assert_eq!(result.best_move, result.pv.first().copied());
    }

    #[test]
    fn castling_pv_is_shown_as_a_king_step() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/5PPP/4K2R w K - 0 1").unwrap();
        let castle = pos.parse_move("e1g1").unwrap();
        let key = pos.key();

        let (pv, shown) = small_searcher().principal_variation(&mut pos, 3, Some(castle));
        assert_eq!(pv, vec![castle]);
        assert_eq!(pv[0].to_string(), "e1h1");
        assert_eq!(shown[0].to_string(), "e1g1");
        assert_eq!(pos.parse_move(&shown[0].to_string()).unwrap(), castle);
        assert_eq!(pos.key(), key);
    }

    #[test]
    fn clear_for_search_resets_scratch_state() {
        let mut searcher = small_searcher();
        let mut pos = Position::startpos();
        let mut ctl = control(3);
        searcher.search(&mut pos, &mut ctl, |_| {});
        assert!(ctl.stats().nodes > 0);

        searcher.killers.store(1, "e2e4".parse().unwrap());
        ctl.stop();
        searcher.clear_for_search(&mut pos, &mut ctl);
        assert_eq!(searcher.killers.killers(1), [None, None]);
        assert_eq!(searcher.table_stats(), TableStats::default());
        assert_eq!(ctl.stats(), SearchStats::default());
        assert!(!ctl.is_stopped());
        // Entries survive for the next search
        assert!(searcher.tt.best_move(pos.key()).is_some());
    }

    #[test]
    fn clear_tt_forgets_entries() {
        let mut searcher = small_searcher();
        let mut pos = Position::startpos();
        searcher.search(&mut pos, &mut control(2), |_| {});
        searcher.clear_tt();
        assert_eq!(searcher.tt.best_move(pos.key()), None);
    }
}
