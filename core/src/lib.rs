//! # Push 2048 Core Engine
//!
//! Game state machine for a single-player tile puzzle: a player token walks
//! a bordered square grid and pushes numbered tiles around. Pushing a tile
//! into another of the same value merges them into one of double the value.
//! New tiles appear on a cadence set by the difficulty. The session is won
//! when a single tile remains and lost once no tile can move or merge.
//!
//! Rendering and input capture are left to the caller: feed [`Command`]s to
//! a [`Game`] and draw its [`Snapshot`] (or the [`Board`] `Display` output).
//!
//! ## Example
//!
//! ```rust
//! use push_2048_core::{Command, Difficulty, Direction, Game, Outcome};
//!
//! let mut game = Game::with_seed(Difficulty::Normal, 42);
//! let result = game.handle_command(Command::Move(Direction::Left));
//! println!("Score: {}, Moved: {}", game.score(), result.moved);
//! assert_ne!(result.outcome, Outcome::Quit);
//! ```

pub mod board;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod movement;
pub mod rules;
pub mod spawn;

pub use board::{Board, BoardConfig, Direction, Position, Tile, GRID_SIZE, MAX_TILES};
pub use difficulty::{Difficulty, DifficultyParams};
pub use error::{ConfigError, ParseError};
pub use game::{init_board, time_seed, Command, Game, Outcome, Snapshot, TurnResult};
