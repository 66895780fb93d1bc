//! # Concurrent Iteration Scheduler
//!
//! Runs a fixed budget of select → rollout → backpropagate iterations on a
//! pool of worker threads that share one tree behind a single
//! `parking_lot::Mutex`. Workers claim iteration indices from an atomic
//! counter until the budget is spent.
//!
//! The lock is held while walking down the tree and while backpropagating.
//! Rollouts, the expensive part, run unlocked on a private copy of the game
//! state. Two workers may therefore pick the same path before either has
//! recorded its visit; this only skews exploration and never breaks the
//! tree's invariants since each critical section is atomic.

use crate::config::MctsOptions;
use crate::error::SearchError;
use crate::rollout::rollout;
use crate::selection::select_leaf;
use crate::tree::SearchTree;
use crate::GameState;
use log::{debug, trace};
use parking_lot::Mutex;
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Counters describing the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Iterations completed.
    pub iterations: usize,
    /// Rollouts completed, each followed by one backpropagation.
    pub rollouts: usize,
    /// Nodes in the tree when the search ended.
    pub total_nodes: usize,
    /// Visits of the root when the search ended, including earlier turns.
    pub root_visits: u64,
}

/// Splits one independent random stream per worker off `master`.
pub fn worker_rngs(master: &mut Xoshiro256PlusPlus, workers: usize) -> Vec<Xoshiro256PlusPlus> {
    (0..workers)
        .map(|_| {
            let rng = master.clone();
            master.jump();
            rng
        })
        .collect()
}

/// Runs a single iteration and returns the number of rollouts it ran.
pub fn run_iteration<S: GameState, R: Rng + ?Sized>(
    tree: &Mutex<SearchTree<S::Move>>,
    root_state: &S,
    options: &MctsOptions,
    rng: &mut R,
) -> Result<usize, SearchError> {
    let mut state = root_state.clone();
    let (leaf, terminal_win, mover) = {
        let mut tree = tree.lock();
        let leaf = select_leaf(&mut tree, &mut state, options.exploration_constant, rng)?;
        let node = tree.node(leaf);
        (leaf, node.is_terminal_win(), node.player())
    };

    for i in 0..options.rollouts_per_iteration {
        let winner = rollout(state.clone(), rng)?;
        trace!("rollout {} winner is {}", i, winner);
        if terminal_win {
            debug_assert_eq!(Some(winner), mover, "a proven win was lost in a rollout");
        }
        tree.lock().backpropagate(leaf, winner);
    }
    Ok(options.rollouts_per_iteration)
}

/// Runs `options.iterations` iterations from `root_state` on
/// `options.num_threads` workers, one per entry of `rngs`.
///
/// The first error any worker hits stops all workers and is returned.
pub fn run_iterations<S: GameState>(
    tree: &Mutex<SearchTree<S::Move>>,
    root_state: &S,
    options: &MctsOptions,
    rngs: Vec<Xoshiro256PlusPlus>,
) -> Result<SearchStatistics, SearchError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(rngs.len())
        .thread_name(|i| format!("mcts-worker-{}", i))
        .build()?;
    debug!(
        "running {} iterations on {} worker threads",
        options.iterations,
        rngs.len()
    );

    let claimed = AtomicUsize::new(0);
    let completed = AtomicUsize::new(0);
    let rollouts = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let failure: Mutex<Option<SearchError>> = Mutex::new(None);

    pool.scope(|scope| {
        for mut rng in rngs {
            let (claimed, completed, rollouts, stop, failure) =
                (&claimed, &completed, &rollouts, &stop, &failure);
            scope.spawn(move |_| {
                while !stop.load(Ordering::Relaxed)
                    && claimed.fetch_add(1, Ordering::Relaxed) < options.iterations
                {
                    match run_iteration(tree, root_state, options, &mut rng) {
                        Ok(count) => {
                            completed.fetch_add(1, Ordering::Relaxed);
                            rollouts.fetch_add(count, Ordering::Relaxed);
                        }
                        Err(err) => {
                            stop.store(true, Ordering::Relaxed);
                            let mut slot = failure.lock();
                            if slot.is_none() {
                                *slot = Some(err);
                            }
                            return;
                        }
                    }
                }
            });
        }
    });

    if let Some(err) = failure.into_inner() {
        return Err(err);
    }

    let tree = tree.lock();
    Ok(SearchStatistics {
        iterations: completed.into_inner(),
        rollouts: rollouts.into_inner(),
        total_nodes: tree.len(),
        root_visits: tree.root_node().visits(),
    })
}
