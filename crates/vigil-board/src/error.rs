//! Errors raised when building or advancing a position outside the search.

/// Errors from FEN parsing and move text handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The FEN string was rejected by the board parser.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The move text is not coordinate notation (`e2e4`, `e7e8q`).
    #[error("malformed move: {text}")]
    InvalidMove {
        /// The move text that failed to parse.
        text: String,
    },

    /// The move is well-formed but not legal in the current position.
    #[error("illegal move: {text}")]
    IllegalMove {
        /// The rejected move text.
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::PositionError;

    #[test]
    fn illegal_move_display() {
        let err = PositionError::IllegalMove {
            text: "e2e5".to_string(),
        };
        assert_eq!(format!("{err}"), "illegal move: e2e5");
    }

    #[test]
    fn invalid_fen_display_mentions_input() {
        let err = PositionError::InvalidFen {
            fen: "8/8 w".to_string(),
            reason: "too few fields".to_string(),
        };
        assert!(format!("{err}").contains("\"8/8 w\""));
    }
}
