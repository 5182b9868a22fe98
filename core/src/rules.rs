//! Win and loss evaluation.
//!
//! The mobility probe bounds tiles by the whole grid, border ring included,
//! while actual moves are limited to the interior. A tile next to the border
//! therefore always counts as movable here.

use crate::board::{Board, Direction};

/// Won when exactly one tile is left, whatever its value.
pub fn is_won(board: &Board) -> bool {
    board.tile_count() == 1
}

/// Whether the tile in `slot` could move or merge in `direction`.
///
/// Ignores the player entirely: it does not matter whether anyone can
/// actually push the tile.
pub fn can_tile_move(board: &Board, slot: usize, direction: Direction) -> bool {
    let tile = &board.tiles()[slot];
    let dest = tile.position.step(direction);
    if !board.config().in_grid(dest) {
        return false;
    }
    match board.tile_at(dest) {
        Some(other) => other.value == tile.value,
        None => true,
    }
}

/// False once no tile can move or merge in any direction.
pub fn has_moves_left(board: &Board) -> bool {
    (0..board.tile_count())
        .any(|slot| Direction::all().into_iter().any(|d| can_tile_move(board, slot, d)))
}

// =============================================================================
// Tests
// =============================================================================
