//! # Nim (Subtraction Game) Implementation
//!
//! This module implements the single-heap subtraction game.
//! Players take turns removing stones from a shared heap, and the player who
//! takes the last stone wins.
//!
//! ## Rules
//! - Each turn a player removes between 1 and `max_take` stones
//! - A player may not take more stones than are left
//! - Whoever empties the heap wins; the next player has no moves left
//! - There are no draws
//!
//! With perfect play the player to move loses exactly when the heap is a
//! multiple of `max_take + 1`, which makes the game a handy yardstick for the
//! search.

use crate::{GameState, PossibleMove};
use std::fmt;
use std::str::FromStr;

/// Represents a move in Nim
///
/// Contains the number of stones to remove from the heap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NimMove(pub u32);

/// Represents the complete state of a Nim game
#[derive(Debug, Clone)]
pub struct NimState {
    /// Stones left on the heap
    heap: u32,
    /// Largest number of stones a single move may remove
    max_take: u32,
    /// Current player (1 or -1)
    current_player: i32,
    /// Every move made so far
    past_moves: Vec<NimMove>,
}

impl fmt::Display for NimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3} ", self.heap)?;
        for _ in 0..self.heap {
            write!(f, "o")?;
        }
        writeln!(f)
    }
}

impl GameState for NimState {
    type Move = NimMove;

    fn get_current_player(&self) -> i32 {
        self.current_player
    }

    fn get_possible_moves(&self) -> Vec<PossibleMove<Self::Move>> {
        (1..=self.max_take.min(self.heap))
            .map(|take| PossibleMove::new(NimMove(take), take == self.heap))
            .collect()
    }

    fn make_move(&mut self, mv: &Self::Move) -> bool {
        if !self.is_legal(mv) {
            return false;
        }
        self.heap -= mv.0;
        self.past_moves.push(*mv);
        self.current_player = -self.current_player;
        true
    }

    fn get_winner(&self) -> Option<i32> {
        if self.heap == 0 && !self.past_moves.is_empty() {
            // Whoever moved last emptied the heap.
            Some(-self.current_player)
        } else {
            None
        }
    }

    fn get_past_moves(&self) -> &[Self::Move] {
        &self.past_moves
    }
}

impl NimState {
    /// Creates a new game with `heap` stones, player 1 to move.
    pub fn new(heap: u32, max_take: u32) -> Self {
        Self {
            heap,
            max_take,
            current_player: 1,
            past_moves: Vec::new(),
        }
    }

    pub fn heap(&self) -> u32 {
        self.heap
    }

    pub fn max_take(&self) -> u32 {
        self.max_take
    }

    /// Checks if a move is legal in the current game state
    ///
    /// A move is legal if it takes at least one stone, no more than
    /// `max_take`, and no more than are left.
    pub fn is_legal(&self, mv: &NimMove) -> bool {
        mv.0 >= 1 && mv.0 <= self.max_take && mv.0 <= self.heap
    }

    /// Whether the player to move loses against perfect play.
    pub fn is_losing_for_mover(&self) -> bool {
        self.heap % (self.max_take + 1) == 0
    }
}

impl FromStr for NimMove {
    type Err = String;

    /// Creates a NimMove from the number of stones as a string.
    ///
    /// # Examples
    /// ```
    /// use std::str::FromStr;
    /// use mcts::games::nim::NimMove;
    /// let mv = NimMove::from_str("2").unwrap();
    /// assert_eq!(mv.0, 2);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let take = s.trim().parse::<u32>().map_err(|e| e.to_string())?;
        Ok(NimMove(take))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = NimState::new(10, 3);
        assert_eq!(game.heap(), 10);
        assert_eq!(game.max_take(), 3);
        assert_eq!(game.get_current_player(), 1);
        assert!(game.get_past_moves().is_empty());
        assert_eq!(game.get_winner(), None);
    }

    #[test]
    fn test_legal_moves() {
        let game = NimState::new(10, 3);
        let moves = game.get_possible_moves();
        assert_eq!(moves.len(), 3);
        assert!(moves.iter().all(|m| !m.is_winning));

        let small = NimState::new(2, 3);
        let moves = small.get_possible_moves();
        assert_eq!(moves, vec![
            PossibleMove::new(NimMove(1), false),
            PossibleMove::new(NimMove(2), true),
        ]);
    }

    #[test]
    fn test_make_move() {
        let mut game = NimState::new(10, 3);
        assert!(game.make_move(&NimMove(3)));
        assert_eq!(game.heap(), 7);
        assert_eq!(game.get_current_player(), -1);
        assert_eq!(game.get_past_moves(), &[NimMove(3)]);
    }

    #[test]
    fn test_illegal_move_leaves_state_unchanged() {
        let mut game = NimState::new(2, 3);
        assert!(!game.make_move(&NimMove(3)));
        assert!(!game.make_move(&NimMove(0)));
        assert_eq!(game.heap(), 2);
        assert_eq!(game.get_current_player(), 1);
        assert!(game.get_past_moves().is_empty());
    }

    #[test]
    fn test_win_condition() {
        let mut game = NimState::new(4, 3);
        game.make_move(&NimMove(1)); // P1
        game.make_move(&NimMove(3)); // P-1 empties the heap

        assert_eq!(game.get_winner(), Some(-1));
        assert!(game.get_possible_moves().is_empty());
    }

    #[test]
    fn test_losing_positions() {
        assert!(NimState::new(8, 3).is_losing_for_mover());
        assert!(!NimState::new(9, 3).is_losing_for_mover());
    }
}
