//! Player movement, tile pushes and merges.
//!
//! A move targets the neighbouring cell. A tile standing there is pushed one
//! cell further; if that cell holds a tile of the same value the two merge.
//! Only interior cells are reachable, for the player and for pushed tiles.

use rand::Rng;
use tracing::{debug, trace};

use crate::board::{Board, Direction};

/// Move the player one cell, pushing or merging a tile in the way.
///
/// Returns false, leaving the board untouched, when the player's target or
/// the pushed tile's destination lies outside the interior.
///
/// A push into a tile of a different value is still reported as a success:
/// neither tile moves and the player steps onto the pushed tile's cell.
pub fn move_player(board: &mut Board, direction: Direction) -> bool {
    let target = board.player.step(direction);
    if !board.config().is_interior(target) {
        trace!(?direction, x = target.x, y = target.y, "player move out of bounds");
        return false;
    }

    if let Some(slot) = board.tile_index_at(target) {
        if !push_tile(board, slot, direction) {
            return false;
        }
    }

    board.player = target;
    true
}

/// Push the tile in `slot` one cell in `direction`.
fn push_tile(board: &mut Board, slot: usize, direction: Direction) -> bool {
    let tile = board.tiles[slot];
    let dest = tile.position.step(direction);
    if !board.config().is_interior(dest) {
        trace!(?direction, x = dest.x, y = dest.y, "push out of bounds");
        return false;
    }

    match board.tile_index_at(dest) {
        None => board.tiles[slot].position = dest,
        Some(other) if board.tiles[other].value == tile.value => {
            // The merged tile ends up on the destination cell.
            let value = tile.value * 2;
            board.tiles[other].value = value;
            board.remove_tile(slot);
            board.score = board.score.saturating_add(value);
            debug!(x = dest.x, y = dest.y, value, score = board.score, "merged tiles");
        }
        Some(_) => {
            trace!(x = dest.x, y = dest.y, "push blocked by unequal tile");
        }
    }
    true
}

/// Move the player to a random free interior cell.
///
/// Returns false only when no free cell exists.
pub fn teleport_player<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> bool {
    match board.random_free_cell(rng) {
        Some(pos) => {
            debug!(x = pos.x, y = pos.y, "teleported player");
            board.player = pos;
            true
        }
        None => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
