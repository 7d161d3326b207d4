//! Progress reports and their rendering for each front-end mode.

use std::fmt::Write as _;
use std::str::FromStr;
use std::time::Duration;

use vigil_board::Move;

use crate::error::EngineError;
use crate::search::negamax::{MATE_SCORE, MATE_THRESHOLD};
use crate::search::tt::TableStats;

/// Output convention of the front end driving the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Console,
    Uci,
    Xboard,
}

impl FromStr for SearchMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "uci" => Ok(Self::Uci),
            "xboard" | "winboard" => Ok(Self::Xboard),
            _ => Err(EngineError::UnknownMode {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Console => "console",
            Self::Uci => "uci",
            Self::Xboard => "xboard",
        })
    }
}

/// Snapshot taken after each completed iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub depth: u8,
    /// Score from the side to move's point of view.
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    /// Principal variation in display notation (castling as `e1g1`).
    pub pv: Vec<Move>,
    /// Share of cutoffs produced by the first move searched.
    pub ordering: f64,
    pub table: TableStats,
    pub null_cuts: u64,
}

/// Moves to mate for a mate score (negative when being mated), or `None`
/// for an ordinary score.
pub fn mate_distance(score: i32) -> Option<i32> {
    if score > MATE_THRESHOLD {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score < -MATE_THRESHOLD {
        Some(-(MATE_SCORE + score) / 2)
    } else {
        None
    }
}

fn push_pv(out: &mut String, pv: &[Move]) {
    for mv in pv {
        let _ = write!(out, " {mv}");
    }
}

impl IterationReport {
    /// Format the report as a single line for `mode`.
    pub fn render(&self, mode: SearchMode) -> String {
        let millis = self.elapsed.as_millis();
        let mut out = String::new();
        match mode {
            SearchMode::Uci => {
                let score = match mate_distance(self.score) {
                    Some(moves) => format!("mate {moves}"),
                    None => format!("cp {}", self.score),
                };
                let _ = write!(
                    out,
                    "info score {score} depth {} nodes {} time {millis} pv",
                    self.depth, self.nodes
                );
                push_pv(&mut out, &self.pv);
            }
            SearchMode::Xboard => {
                // Thinking output: ply, score, centiseconds, nodes, line
                let _ = write!(
                    out,
                    "{} {} {} {}",
                    self.depth,
                    self.score,
                    millis / 10,
                    self.nodes
                );
                push_pv(&mut out, &self.pv);
            }
            SearchMode::Console => {
                let _ = write!(
                    out,
                    "depth {} score {} nodes {} time {millis}ms ordering {:.2} tt {}/{} null {} pv",
                    self.depth,
                    self.score,
                    self.nodes,
                    self.ordering,
                    self.table.hits,
                    self.table.cuts,
                    self.null_cuts
                );
                push_pv(&mut out, &self.pv);
            }
        }
        out
    }
}

/// Final line announcing the chosen move. Pass the move through
/// `Position::display_move` first so castling prints as `e1g1`.
pub fn render_best_move(mode: SearchMode, best_move: Option<Move>) -> String {
    match (mode, best_move) {
        (SearchMode::Uci, Some(mv)) => format!("bestmove {mv}"),
        (SearchMode::Uci, None) => "bestmove 0000".to_string(),
        (SearchMode::Xboard, Some(mv)) => format!("move {mv}"),
        (SearchMode::Xboard, None) => "resign".to_string(),
        (SearchMode::Console, Some(mv)) => format!("best move: {mv}"),
        (SearchMode::Console, None) => "no move found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(score: i32) -> IterationReport {
        IterationReport {
            depth: 5,
            score,
            nodes: 12_345,
            elapsed: Duration::from_millis(250),
            pv: vec!["e2e4".parse().unwrap(), "e7e5".parse().unwrap()],
            ordering: 0.9,
            table: TableStats {
                hits: 40,
                cuts: 12,
                new_writes: 100,
                overwrites: 3,
            },
            null_cuts: 7,
        }
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("uci".parse::<SearchMode>().unwrap(), SearchMode::Uci);
        assert_eq!("XBoard".parse::<SearchMode>().unwrap(), SearchMode::Xboard);
        assert_eq!(" console ".parse::<SearchMode>().unwrap(), SearchMode::Console);
        assert!(matches!(
            "gtp".parse::<SearchMode>(),
            Err(EngineError::UnknownMode { .. })
        ));
        assert_eq!(SearchMode::Xboard.to_string(), "xboard");
    }

    #[test]
    fn uci_line() {
        assert_eq!(
            report(31).render(SearchMode::Uci),
            "info score cp 31 depth 5 nodes 12345 time 250 pv e2e4 e7e5"
        );
    }

    #[test]
    fn uci_line_reports_mate_distance() {
        assert!(report(MATE_SCORE - 1).render(SearchMode::Uci).contains("score mate 1 "));
        assert!(report(MATE_SCORE - 3).render(SearchMode::Uci).contains("score mate 2 "));
        assert!(report(-MATE_SCORE + 2).render(SearchMode::Uci).contains("score mate -1 "));
    }

    #[test]
    fn xboard_line() {
        assert_eq!(report(-15).render(SearchMode::Xboard), "5 -15 25 12345 e2e4 e7e5");
    }

    #[test]
    fn console_line_carries_diagnostics() {
        let line = report(0).render(SearchMode::Console);
        assert!(line.starts_with("depth 5 score 0 nodes 12345 time 250ms"));
        assert!(line.contains("ordering 0.90"));
        assert!(line.contains("tt 40/12"));
        assert!(line.contains("null 7"));
        assert!(line.ends_with("pv e2e4 e7e5"));
    }

    #[test]
    fn mate_distance_for_ordinary_scores_is_none() {
        assert_eq!(mate_distance(250), None);
        assert_eq!(mate_distance(-MATE_THRESHOLD), None);
    }

    #[test]
    fn best_move_lines() {
        let mv: Move = "g1f3".parse().unwrap();
        assert_eq!(render_best_move(SearchMode::Uci, Some(mv)), "bestmove g1f3");
        assert_eq!(render_best_move(SearchMode::Uci, None), "bestmove 0000");
        assert_eq!(render_best_move(SearchMode::Xboard, Some(mv)), "move g1f3");
        assert_eq!(render_best_move(SearchMode::Console, Some(mv)), "best move: g1f3");
    }
}
