//! Configuration errors for the search engine.

/// Errors from validating search configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Requested transposition table size is zero or too large.
    #[error("hash size {mb} MB out of range (1..={max})")]
    InvalidHashSize { mb: usize, max: usize },

    /// Requested depth limit is zero or beyond the ply limit.
    #[error("depth {depth} out of range (1..={max})")]
    InvalidDepth { depth: u8, max: usize },

    /// Unrecognised output mode name.
    #[error("unknown search mode \"{value}\" (expected console, uci or xboard)")]
    UnknownMode { value: String },
}
