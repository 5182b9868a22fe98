//! Turn orchestration and the session lifecycle.
//!
//! A [`Game`] owns the board and the session's random source. Each command
//! runs to completion: movement, then the move counter and a possible spawn,
//! then the win check. A deadlocked board is detected at the start of the
//! next turn, before the command is looked at.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Board, BoardConfig, Direction, Position, Tile};
use crate::difficulty::Difficulty;
use crate::movement::{move_player, teleport_player};
use crate::rules::{has_moves_left, is_won};
use crate::spawn::try_spawn;

/// One player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Command {
    Move(Direction),
    Teleport,
    Quit,
}

impl Command {
    /// Get all six commands.
    pub fn all() -> [Command; 6] {
        [
            Command::Move(Direction::Up),
            Command::Move(Direction::Down),
            Command::Move(Direction::Left),
            Command::Move(Direction::Right),
            Command::Teleport,
            Command::Quit,
        ]
    }
}

/// Session state. Everything but `Playing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Playing,
    Won,
    Lost,
    Quit,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Playing
    }
}

/// Result of handling one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnResult {
    /// Whether the player moved (or teleported).
    pub moved: bool,
    /// Session state after the turn.
    pub outcome: Outcome,
}

/// Read-only view handed to renderers after each turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub player: Position,
    pub tiles: Vec<Tile>,
    pub score: u32,
    pub tile_count: usize,
    pub move_count: u32,
    pub difficulty: Difficulty,
    pub outcome: Outcome,
}

/// Seed derived from the wall clock.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Fresh board: player at the centre, two tiles spawned at move 0.
pub fn init_board<R: Rng + ?Sized>(
    config: BoardConfig,
    difficulty: Difficulty,
    rng: &mut R,
) -> Board {
    let mut board = Board::new(config, difficulty);
    try_spawn(&mut board, rng);
    try_spawn(&mut board, rng);
    board
}

/// A single play session.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    rng: SmallRng,
    outcome: Outcome,
}

impl Game {
    /// Start a session on the default grid, seeded from the clock.
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, time_seed())
    }

    /// Start a session on the default grid with a fixed seed.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_config(BoardConfig::default(), difficulty, seed)
    }

    pub fn with_config(config: BoardConfig, difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = init_board(config, difficulty, &mut rng);
        info!(%difficulty, seed, tiles = board.tile_count(), "session started");
        Game {
            board,
            rng,
            outcome: Outcome::Playing,
        }
    }

    /// Resume play on an existing board.
    pub fn from_board(board: Board, seed: u64) -> Self {
        Game {
            board,
            rng: SmallRng::seed_from_u64(seed),
            outcome: Outcome::Playing,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    /// Check for deadlock before reading the next command.
    ///
    /// Moves a playing session to `Lost` when no tile can move or merge.
    pub fn begin_turn(&mut self) -> Outcome {
        if self.outcome == Outcome::Playing && !has_moves_left(&self.board) {
            self.finish(Outcome::Lost);
        }
        self.outcome
    }

    /// Run one full turn for `command`.
    ///
    /// Terminal sessions ignore every command.
    pub fn handle_command(&mut self, command: Command) -> TurnResult {
        if self.begin_turn().is_terminal() {
            return TurnResult {
                moved: false,
                outcome: self.outcome,
            };
        }

        let moved = match command {
            Command::Move(direction) => move_player(&mut self.board, direction),
            Command::Teleport => teleport_player(&mut self.board, &mut self.rng),
            Command::Quit => {
                self.finish(Outcome::Quit);
                false
            }
        };

        if moved {
            self.board.move_count += 1;
            try_spawn(&mut self.board, &mut self.rng);
            if is_won(&self.board) {
                self.finish(Outcome::Won);
            }
        }

        TurnResult {
            moved,
            outcome: self.outcome,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.board.player(),
            tiles: self.board.tiles().to_vec(),
            score: self.board.score(),
            tile_count: self.board.tile_count(),
            move_count: self.board.move_count(),
            difficulty: self.board.difficulty(),
            outcome: self.outcome,
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!(
            ?outcome,
            score = self.board.score(),
            moves = self.board.move_count(),
            "session ended"
        );
        self.outcome = outcome;
    }
}

// =============================================================================
// Tests
// =============================================================================
