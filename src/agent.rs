//! # MCTS Agent
//!
//! The agent owns a search tree that survives between its turns. Before each
//! search it follows the opponent's actual reply down the tree, so the
//! statistics already gathered for that position are kept; after the search
//! the chosen child becomes the root for the next turn.

use crate::config::MctsOptions;
use crate::error::SearchError;
use crate::scheduler::{run_iterations, worker_rngs, SearchStatistics};
use crate::selection::expand_node;
use crate::tree::{NodeId, SearchTree};
use crate::{GameState, Player};
use log::{debug, info, log_enabled, trace, Level};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// An AI player that picks moves with Monte Carlo Tree Search.
pub struct MctsAgent<S: GameState> {
    player_id: i32,
    options: MctsOptions,
    rng: Xoshiro256PlusPlus,
    tree: SearchTree<S::Move>,
    previous_tree: Option<SearchTree<S::Move>>,
    statistics: SearchStatistics,
}

impl<S: GameState> MctsAgent<S> {
    /// Creates an agent playing as `player_id`.
    pub fn new(player_id: i32, options: MctsOptions) -> Result<Self, SearchError> {
        options.validate()?;
        let rng = match options.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };
        Ok(MctsAgent {
            player_id,
            options,
            rng,
            tree: SearchTree::new(),
            previous_tree: None,
            statistics: SearchStatistics::default(),
        })
    }

    pub fn player_id(&self) -> i32 {
        self.player_id
    }

    pub fn options(&self) -> &MctsOptions {
        &self.options
    }

    /// The retained tree. Its root is the position after the agent's last move.
    pub fn tree(&self) -> &SearchTree<S::Move> {
        &self.tree
    }

    /// The tree as it stood when the last move was chosen, before the chosen
    /// child was promoted.
    pub fn previous_tree(&self) -> Option<&SearchTree<S::Move>> {
        self.previous_tree.as_ref()
    }

    /// The move returned by the last call to `select_move`.
    pub fn previous_move(&self) -> Option<&S::Move> {
        self.previous_tree.as_ref().and(self.tree.root_node().mv())
    }

    pub fn last_statistics(&self) -> SearchStatistics {
        self.statistics
    }

    /// Picks a move for the player to move in `state`.
    ///
    /// Fails if the retained tree cannot follow the game, i.e. the last move
    /// in `state` is not one of the replies the tree knows about, or if the
    /// game state and tree otherwise disagree.
    pub fn select_move(&mut self, state: &S) -> Result<S::Move, SearchError> {
        self.follow_opponent_move(state)?;

        let root = self.tree.root();
        if !self.tree.root_node().is_expanded() {
            expand_node(&mut self.tree, root, state)?;
        }
        debug!("current tree: {}", self.tree.root_node().debug_string());

        // A forced move is not worth any search effort.
        if self.tree.children(root).len() == 1 {
            let only = self.tree.children(root)[0];
            self.statistics = SearchStatistics {
                total_nodes: self.tree.len(),
                root_visits: self.tree.root_node().visits(),
                ..SearchStatistics::default()
            };
            return Ok(self.promote_choice(only));
        }

        let shared = Mutex::new(std::mem::take(&mut self.tree));
        let rngs = worker_rngs(&mut self.rng, self.options.num_threads);
        let result = run_iterations(&shared, state, &self.options, rngs);
        self.tree = shared.into_inner();
        self.statistics = result?;

        self.log_root_children();
        let best = self
            .tree
            .most_visited_child(root)
            .ok_or(SearchError::NoLegalMoves)?;
        info!(
            "player {} estimate of winning = {:.3}",
            self.player_id,
            self.tree.node(best).win_rate()
        );
        Ok(self.promote_choice(best))
    }

    /// Moves the root to the child matching the last move in `state`.
    fn follow_opponent_move(&mut self, state: &S) -> Result<(), SearchError> {
        let Some(last_move) = state.get_past_moves().last() else {
            return Ok(());
        };
        let root = self.tree.root();
        if self.tree.children(root).is_empty() {
            // Nothing below the root to reuse; its own statistics describe
            // the position before `last_move` was played.
            if self.tree.root_node().visits() > 0 {
                trace!("retained root was never expanded, starting a fresh tree");
                self.tree = SearchTree::new();
            }
            return Ok(());
        }

        debug!("updating tree for move {:?}", last_move);
        trace!("previous tree: {}", self.tree.root_node().debug_string());
        let child = self
            .tree
            .find_child(root, last_move)
            .ok_or_else(|| SearchError::unknown_move(last_move))?;
        self.tree = self.tree.promote(child);
        Ok(())
    }

    /// Makes `child` the new root and returns its move.
    fn promote_choice(&mut self, child: NodeId) -> S::Move {
        let promoted = self.tree.promote(child);
        self.previous_tree = Some(std::mem::replace(&mut self.tree, promoted));
        self.tree
            .root_node()
            .mv()
            .cloned()
            .expect("every child of the root carries a move")
    }

    fn log_root_children(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        let root = self.tree.root();
        debug!("MCTS picking from {} moves.", self.tree.children(root).len());
        for &child in self.tree.children(root) {
            debug!("{}", self.tree.node(child).debug_string());
            if log_enabled!(Level::Trace) {
                for &grand_child in self.tree.children(child) {
                    trace!("  {}", self.tree.node(grand_child).debug_string());
                }
            }
        }
    }
}

impl<S: GameState> Player<S> for MctsAgent<S> {
    fn select_move(&mut self, state: &S) -> Result<S::Move, SearchError> {
        MctsAgent::select_move(self, state)
    }
}
