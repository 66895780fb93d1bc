//! # Selection and Expansion
//!
//! Walks the tree from the root to the leaf an iteration should roll out
//! from, replaying each chosen move on the caller's game state. At most one
//! node is expanded per walk, and only once all of its siblings have been
//! visited at least once, so every move at a given ply gets a rollout before
//! the search commits depth below any of them.

use crate::error::SearchError;
use crate::tree::{NodeId, SearchTree};
use crate::{GameState, PossibleMove};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Calculates the UCB1 (Upper Confidence Bound 1) score of a child.
/// Unvisited children score `+inf`.
///
/// # Arguments
/// * `wins` - Rollouts through the child won by the child's mover.
/// * `visits` - Rollouts through the child.
/// * `parent_visits` - Rollouts through the child's parent.
/// * `exploration_constant` - A constant to tune the level of exploration.
pub fn ucb1(wins: u64, visits: u64, parent_visits: u64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let visits = visits as f64;
    let log_parent = (parent_visits.max(1) as f64).ln();
    wins as f64 / visits + exploration_constant * (log_parent / visits).sqrt()
}

/// A node may be expanded once every sibling has at least one visit, which
/// is the case when the parent's visits reach its number of children.
/// Terminal wins are never expanded; a root always may be.
fn should_expand<M>(tree: &SearchTree<M>, id: NodeId) -> bool {
    let node = tree.node(id);
    if node.is_terminal_win() {
        return false;
    }
    match node.parent() {
        None => true,
        Some(parent) => {
            let parent = tree.node(parent);
            parent.visits() >= parent.children().len() as u64
        }
    }
}

/// Creates one child of `id` per legal move in `state`.
///
/// A child is a terminal win if its move wins outright or leaves the
/// opponent without a legal reply.
pub fn expand_node<S: GameState>(
    tree: &mut SearchTree<S::Move>,
    id: NodeId,
    state: &S,
) -> Result<(), SearchError> {
    let node = tree.node(id);
    assert!(!node.is_expanded(), "expanding a non-leaf node: {}", node.debug_string());

    let possible_moves = state.get_possible_moves();
    if possible_moves.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }

    let mover = state.get_current_player();
    let mut children = Vec::with_capacity(possible_moves.len());
    for PossibleMove { mv, is_winning } in possible_moves {
        let mut child_state = state.clone();
        if !child_state.make_move(&mv) {
            return Err(SearchError::illegal_move(&mv));
        }
        let terminal_win = is_winning
            || child_state.get_winner() == Some(mover)
            || child_state.get_possible_moves().is_empty();
        children.push((mv, terminal_win));
    }

    tree.node_mut(id).expanded = true;
    for (mv, terminal_win) in children {
        tree.add_child(id, mv, mover, terminal_win);
    }
    Ok(())
}

fn apply_node_move<S: GameState>(
    tree: &SearchTree<S::Move>,
    id: NodeId,
    state: &mut S,
) -> Result<(), SearchError> {
    if let Some(mv) = tree.node(id).mv() {
        if !state.make_move(mv) {
            return Err(SearchError::illegal_move(mv));
        }
    }
    Ok(())
}

/// Returns the leaf to roll out from, starting at the root of `tree`.
///
/// `state` must hold the root position on entry and holds the leaf position
/// on return. A terminal-win child is always taken over any UCB1 choice.
/// Children sharing the best score are picked uniformly at random.
pub fn select_leaf<S: GameState, R: Rng + ?Sized>(
    tree: &mut SearchTree<S::Move>,
    state: &mut S,
    exploration_constant: f64,
    rng: &mut R,
) -> Result<NodeId, SearchError> {
    let mut current = tree.root();
    loop {
        if !tree.node(current).is_expanded() {
            if !should_expand(tree, current) {
                return Ok(current);
            }
            expand_node(tree, current, state)?;
        }

        let children = tree.children(current);
        // TODO: decide whether a proven win should also be pushed up to the
        // ancestors' statistics instead of only short-circuiting selection.
        if let Some(&winning) = children.iter().find(|&&child| tree.node(child).is_terminal_win()) {
            apply_node_move(tree, winning, state)?;
            return Ok(winning);
        }

        let parent_visits = tree.node(current).visits();
        let scores: Vec<f64> = children
            .iter()
            .map(|&child| {
                let node = tree.node(child);
                ucb1(node.wins(), node.visits(), parent_visits, exploration_constant)
            })
            .collect();
        let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let best: Vec<NodeId> = children
            .iter()
            .zip(&scores)
            .filter(|(_, score)| **score == max_score)
            .map(|(&child, _)| child)
            .collect();

        let next = *best.choose(rng).ok_or(SearchError::NoLegalMoves)?;
        apply_node_move(tree, next, state)?;
        current = next;
    }
}
