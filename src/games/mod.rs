//! # Game Implementations Module
//!
//! Reference implementations of the `GameState` trait. The search engine does
//! not depend on any of them; they exist so the engine can be exercised and
//! benchmarked end to end.
//!
//! ## Adding New Games
//! To add a new game, create a new module and implement:
//! 1. A move type whose values compare equal for the same physical move
//! 2. A game state type with the GameState trait, flagging immediately
//!    winning moves in `get_possible_moves`
//! 3. Parsing for moves

pub mod nim;
