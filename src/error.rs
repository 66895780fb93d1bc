//! Error types for the search engine.
//!
//! Every error here is fatal for the decision in progress: the tree and the
//! real game have drifted apart, or the engine was configured badly, and no
//! move can be recommended.

use thiserror::Error;

/// Rejected [`MctsOptions`](crate::MctsOptions) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("exploration constant must be finite and non-negative, got {0}")]
    ExplorationConstant(f64),

    #[error("rollouts per iteration must be at least 1")]
    NoRollouts,

    #[error("worker thread count must be at least 1")]
    NoThreads,
}

/// Errors that abort a call to `select_move`.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The opponent's move does not match any child of the retained root.
    #[error("move {0} is not a child of the retained search tree")]
    UnknownMove(String),

    /// A position that was expected to have legal moves has none.
    #[error("no legal moves available from the position being expanded")]
    NoLegalMoves,

    /// The game state refused a move taken from the tree or a rollout.
    #[error("game state rejected move {0}")]
    IllegalMove(String),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SearchError {
    pub(crate) fn unknown_move<M: std::fmt::Debug>(mv: &M) -> Self {
        SearchError::UnknownMove(format!("{:?}", mv))
    }

    pub(crate) fn illegal_move<M: std::fmt::Debug>(mv: &M) -> Self {
        SearchError::IllegalMove(format!("{:?}", mv))
    }
}
