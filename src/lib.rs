//! A Connect 4 engine with a turn controller for interactive play
//!
//! The engine keeps the board as a pair of bitboards, answers the player's moves with
//! a shallow negamax search backed by a small opening book, and splits every turn
//! into a player half and an opponent half so a front-end can pause in between.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::game::{Game, Outcome, TurnState};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut game = Game::new();
//! let outcome = game.submit_player_move(3)?;
//! assert_eq!(outcome, Outcome::Ongoing);
//! assert_eq!(game.turn_state(), TurnState::AwaitingOpponentHalf);
//!
//! // the centre opening is answered from the opening book
//! game.submit_opponent_half()?;
//! assert_eq!(game.observation()[2 * 6], -1.0);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod bitboard;

pub mod solver;

pub mod opening_book;

pub mod move_selector;

pub mod stats;

pub mod game;

pub mod error;

pub mod config;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of playable cells, and the length of an observation vector
pub const OBSERVATION_SIZE: usize = WIDTH * HEIGHT;

/// A flattened view of the board: `+1` player, `-1` opponent, `0` empty
pub type Observation = [f32; OBSERVATION_SIZE];

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
