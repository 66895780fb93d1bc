//! Baseline players.

use crate::error::SearchError;
use crate::{GameState, Player};
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Plays a uniformly random legal move.
pub struct RandomPlayer {
    rng: Xoshiro256PlusPlus,
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPlayer {
    pub fn new() -> Self {
        RandomPlayer {
            rng: Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomPlayer {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl<S: GameState> Player<S> for RandomPlayer {
    fn select_move(&mut self, state: &S) -> Result<S::Move, SearchError> {
        state
            .get_possible_moves()
            .choose(&mut self.rng)
            .map(|m| m.mv.clone())
            .ok_or(SearchError::NoLegalMoves)
    }
}
