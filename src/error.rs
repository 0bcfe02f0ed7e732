use crate::engine::Move;

/// Errors reported by the coin-sorting library.
///
/// An exhausted search is not an error: solvers return `None` for it.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("invalid number of coins: {0} (expected 4, 6, 8 or 10)")]
    InvalidCoinCount(usize),

    #[error("unknown strategy '{0}' (expected dfs, bfs, greedy or astar)")]
    UnknownStrategy(String),

    #[error("illegal move {mv} at step {step}")]
    IllegalMove { step: usize, mv: Move },

    #[error("failed to parse state segment {segment}: {reason}")]
    Parse { segment: usize, reason: String },
}
