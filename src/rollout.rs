//! Random playouts.

use crate::error::SearchError;
use crate::GameState;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Plays `state` to the end and returns the winner.
///
/// A player without legal moves loses. A move flagged as immediately winning
/// is always played; otherwise moves are picked uniformly at random. The
/// state is owned, so nothing outside this call is touched.
pub fn rollout<S: GameState, R: Rng + ?Sized>(mut state: S, rng: &mut R) -> Result<i32, SearchError> {
    loop {
        if let Some(winner) = state.get_winner() {
            return Ok(winner);
        }
        let possible_moves = state.get_possible_moves();
        let chosen = match possible_moves.iter().find(|m| m.is_winning) {
            Some(winning) => winning,
            None => match possible_moves.choose(rng) {
                Some(random) => random,
                None => return Ok(state.get_opponent(state.get_current_player())),
            },
        };
        if !state.make_move(&chosen.mv) {
            return Err(SearchError::illegal_move(&chosen.mv));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::nim::{NimMove, NimState};
    use crate::PossibleMove;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_rollout_takes_winning_move() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        // Player 1 can always empty a heap of 3 at once.
        for _ in 0..50 {
            assert_eq!(rollout(NimState::new(3, 3), &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_rollout_on_finished_game() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut state = NimState::new(2, 3);
        state.make_move(&NimMove(2));
        assert_eq!(rollout(state, &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_rollout_leaves_original_untouched() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let state = NimState::new(20, 3);
        let winner = rollout(state.clone(), &mut rng).unwrap();
        assert!(winner == 1 || winner == -1);
        assert_eq!(state.heap(), 20);
        assert!(state.get_past_moves().is_empty());
    }

    #[test]
    fn test_rollout_outcomes_vary() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let wins = (0..400)
            .filter(|_| rollout(NimState::new(20, 3), &mut rng).unwrap() == 1)
            .count();
        assert!(wins > 50 && wins < 350, "player 1 won {} of 400", wins);
    }

    /// A mover without moves and without a declared winner loses.
    #[derive(Clone)]
    struct Stuck {
        player: i32,
    }

    impl GameState for Stuck {
        type Move = u8;

        fn get_current_player(&self) -> i32 {
            self.player
        }
        fn get_possible_moves(&self) -> Vec<PossibleMove<u8>> {
            Vec::new()
        }
        fn make_move(&mut self, _mv: &u8) -> bool {
            false
        }
        fn get_winner(&self) -> Option<i32> {
            None
        }
        fn get_past_moves(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn test_player_without_moves_loses() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert_eq!(rollout(Stuck { player: 1 }, &mut rng).unwrap(), -1);
        assert_eq!(rollout(Stuck { player: -1 }, &mut rng).unwrap(), 1);
    }
}
