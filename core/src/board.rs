//! Board state: the player, the tiles and the session counters.
//!
//! The grid is a fixed even-sized square. Its outer ring is the border: the
//! player and tiles only ever occupy the interior, the cells strictly
//! between the first and last row and column.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::difficulty::Difficulty;
use crate::error::ConfigError;

/// Side length of the default grid.
pub const GRID_SIZE: i32 = 12;

/// Default tile capacity. Spawning stops silently once reached.
pub const MAX_TILES: usize = 50;

// =============================================================================
// Geometry
// =============================================================================

/// Grid coordinates; `x` is the column, `y` is the row (row 0 at the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The neighbouring cell one step in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

/// The four push directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// Convert a u8 to a Direction (0=Up, 1=Down, 2=Left, 3=Right).
    /// Returns None for invalid values.
    pub fn from_u8(value: u8) -> Option<Direction> {
        match value {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Get all four directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// Unit vector `(dx, dy)`; up decreases `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A numbered tile. `value` is always a power of two, at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    pub position: Position,
    pub value: u32,
}

impl Tile {
    pub const fn new(position: Position, value: u32) -> Self {
        Tile { position, value }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Construction-time board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardConfig {
    size: i32,
    max_tiles: usize,
}

impl BoardConfig {
    /// Smallest grid that still has an interior around its centre.
    pub const MIN_SIZE: i32 = 4;

    pub fn new(size: i32, max_tiles: usize) -> Result<Self, ConfigError> {
        if size < Self::MIN_SIZE {
            return Err(ConfigError::TooSmall {
                size,
                min: Self::MIN_SIZE,
            });
        }
        if size % 2 != 0 {
            return Err(ConfigError::OddSize(size));
        }
        if max_tiles < 2 {
            return Err(ConfigError::CapacityTooSmall(max_tiles));
        }
        Ok(BoardConfig { size, max_tiles })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn max_tiles(&self) -> usize {
        self.max_tiles
    }

    /// The player's starting cell.
    pub fn center(&self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    /// Inside the grid, border ring included.
    pub fn in_grid(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.size && pos.y >= 0 && pos.y < self.size
    }

    /// Strictly inside the border ring.
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x > 0 && pos.x < self.size - 1 && pos.y > 0 && pos.y < self.size - 1
    }

    /// Every interior cell, row by row.
    pub fn interior_cells(&self) -> impl Iterator<Item = Position> {
        let last = self.size - 1;
        (1..last).flat_map(move |y| (1..last).map(move |x| Position::new(x, y)))
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            size: GRID_SIZE,
            max_tiles: MAX_TILES,
        }
    }
}

// =============================================================================
// Board
// =============================================================================

/// The authoritative game data for one session.
///
/// Tiles are kept in an unordered collection: removing a tile may move
/// another one to a different slot, but never changes its position or value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    config: BoardConfig,
    pub(crate) player: Position,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) score: u32,
    pub(crate) move_count: u32,
    difficulty: Difficulty,
}

impl Board {
    /// An empty board with the player at the centre.
    pub fn new(config: BoardConfig, difficulty: Difficulty) -> Self {
        Board {
            config,
            player: config.center(),
            tiles: Vec::with_capacity(config.max_tiles),
            score: 0,
            move_count: 0,
            difficulty,
        }
    }

    /// Build a board from explicit parts, with zeroed counters.
    ///
    /// The caller is responsible for the cell invariants: at most one tile
    /// per cell, nothing on the border, and no more tiles than the capacity.
    pub fn from_parts(
        config: BoardConfig,
        difficulty: Difficulty,
        player: Position,
        tiles: Vec<Tile>,
    ) -> Self {
        Board {
            config,
            player,
            tiles,
            score: 0,
            move_count: 0,
            difficulty,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn player(&self) -> Position {
        self.player
    }

    /// Tiles in storage order, which carries no meaning.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_full(&self) -> bool {
        self.tiles.len() >= self.config.max_tiles
    }

    /// Storage slot of the tile at `pos`, if any.
    pub fn tile_index_at(&self, pos: Position) -> Option<usize> {
        self.tiles.iter().position(|t| t.position == pos)
    }

    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.position == pos)
    }

    /// Interior cells holding neither the player nor a tile.
    pub fn free_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.config
            .interior_cells()
            .filter(move |&pos| pos != self.player && self.tile_at(pos).is_none())
    }

    /// Pick a free interior cell uniformly at random.
    pub fn random_free_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let free: Vec<Position> = self.free_cells().collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }

    /// Add a tile unless the collection is at capacity.
    pub(crate) fn insert_tile(&mut self, tile: Tile) -> bool {
        if self.is_full() {
            return false;
        }
        self.tiles.push(tile);
        true
    }

    /// Remove the tile in `slot`; the last tile takes its place.
    pub(crate) fn remove_tile(&mut self, slot: usize) -> Tile {
        self.tiles.swap_remove(slot)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.config.size {
            for x in 0..self.config.size {
                let pos = Position::new(x, y);
                if pos == self.player {
                    write!(f, "{:>5}", "P")?;
                } else if let Some(tile) = self.tile_at(pos) {
                    write!(f, "{:5}", tile.value)?;
                } else {
                    write!(f, "    .")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "Score: {}  Tiles: {}  Level: {}",
            self.score,
            self.tiles.len(),
            self.difficulty
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
