//! # Parallel MCTS Agent
//!
//! A Monte Carlo Tree Search engine for deterministic, perfect-information,
//! two-player games. Several worker threads share one search tree behind a
//! single coarse lock, and the tree is kept between turns so that statistics
//! gathered for the opponent's actual reply are reused on the next move.
//!
//! The rules of a game are supplied through the [`GameState`] trait. The
//! search itself lives in [`MctsAgent`].

pub mod agent;
pub mod config;
pub mod error;
pub mod games;
pub mod players;
pub mod rollout;
pub mod runner;
pub mod scheduler;
pub mod selection;
pub mod tree;

pub use agent::MctsAgent;
pub use config::MctsOptions;
pub use error::{ConfigError, SearchError};
pub use players::RandomPlayer;
pub use runner::GameRunner;
pub use scheduler::SearchStatistics;
pub use tree::{NodeId, SearchNode, SearchTree};

/// A legal move together with a flag telling whether playing it wins at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PossibleMove<M> {
    pub mv: M,
    pub is_winning: bool,
}

impl<M> PossibleMove<M> {
    pub fn new(mv: M, is_winning: bool) -> Self {
        PossibleMove { mv, is_winning }
    }
}

/// The state of the game. Must be cloneable to be used in the MCTS.
/// `Send` and `Sync` are required for parallel processing.
///
/// Players are identified by `i32`. The default [`GameState::get_opponent`]
/// assumes the two players are `1` and `-1`.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game.
    ///
    /// The same physical move from the same position must always compare
    /// equal, also across independently built states of the same game.
    type Move: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// Returns the player whose turn it is to move.
    fn get_current_player(&self) -> i32;
    /// Returns all legal moves from the current state.
    /// An empty vector means the player to move has lost.
    fn get_possible_moves(&self) -> Vec<PossibleMove<Self::Move>>;
    /// Applies a move to the state. Returns false and leaves the state
    /// untouched if the move is illegal.
    fn make_move(&mut self, mv: &Self::Move) -> bool;
    /// Returns the winner of the game, if any.
    fn get_winner(&self) -> Option<i32>;
    /// Returns all moves played so far, oldest first.
    fn get_past_moves(&self) -> &[Self::Move];

    /// Returns the opponent of `player`.
    fn get_opponent(&self, player: i32) -> i32 {
        -player
    }
}

/// Anything that can pick a move for the player to move in `state`.
pub trait Player<S: GameState> {
    fn select_move(&mut self, state: &S) -> Result<S::Move, SearchError>;
}
