//! # Game Runner
//!
//! Alternates two players until the game ends and notifies observers after
//! every move.

use crate::error::SearchError;
use crate::{GameState, Player};
use colored::Colorize;
use std::fmt::Display;

/// Called after every move with the new state and the move that led to it.
pub type Observer<S> = Box<dyn FnMut(&S, &<S as GameState>::Move)>;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: i32,
    /// Moves played before the game ended.
    pub moves: usize,
}

/// Plays one game between two players. `player_one` moves whenever the
/// current player is `1`, `player_two` whenever it is anything else.
pub struct GameRunner<S: GameState> {
    player_one: Box<dyn Player<S>>,
    player_two: Box<dyn Player<S>>,
    observers: Vec<Observer<S>>,
}

impl<S: GameState> GameRunner<S> {
    pub fn new(player_one: Box<dyn Player<S>>, player_two: Box<dyn Player<S>>) -> Self {
        GameRunner {
            player_one,
            player_two,
            observers: Vec::new(),
        }
    }

    /// Adds an observer, called after every move.
    pub fn add_observer(&mut self, observer: Observer<S>) {
        self.observers.push(observer);
    }

    /// Plays `state` to completion. A player left without moves loses.
    pub fn play(&mut self, mut state: S) -> Result<GameOutcome, SearchError> {
        let mut moves = 0;
        loop {
            if let Some(winner) = state.get_winner() {
                return Ok(GameOutcome { winner, moves });
            }
            let current = state.get_current_player();
            if state.get_possible_moves().is_empty() {
                return Ok(GameOutcome {
                    winner: state.get_opponent(current),
                    moves,
                });
            }

            let player = if current == 1 {
                &mut self.player_one
            } else {
                &mut self.player_two
            };
            let mv = player.select_move(&state)?;
            if !state.make_move(&mv) {
                return Err(SearchError::illegal_move(&mv));
            }
            moves += 1;
            for observer in &mut self.observers {
                observer(&state, &mv);
            }
        }
    }
}

/// Observer that prints each move and the resulting state to stdout.
pub fn printing_observer<S: GameState + Display + 'static>() -> Observer<S> {
    Box::new(|state: &S, mv: &S::Move| {
        println!("{}", format!("{:?}", mv).bold().cyan());
        print!("{}", state);
    })
}
