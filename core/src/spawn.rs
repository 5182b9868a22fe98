//! When new tiles appear and what they are worth.

use rand::Rng;
use tracing::{debug, trace};

use crate::board::{Board, Tile};
use crate::difficulty::Difficulty;

/// True on every `frequency`-th move, including move 0.
pub fn should_spawn(difficulty: Difficulty, move_count: u32) -> bool {
    move_count % difficulty.frequency() == 0
}

/// Draw `2^e` with `e` uniform in `1..=max_exponent`.
pub fn sample_value<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> u32 {
    let exponent = rng.gen_range(1..=difficulty.max_exponent());
    1 << exponent
}

/// Spawn a tile if the cadence allows it, there is room in the collection
/// and a free interior cell exists. Returns the new tile.
pub fn try_spawn<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Tile> {
    if board.is_full() {
        trace!(tiles = board.tile_count(), "tile capacity reached, spawn skipped");
        return None;
    }
    if !should_spawn(board.difficulty(), board.move_count()) {
        return None;
    }

    let position = board.random_free_cell(rng)?;
    let tile = Tile::new(position, sample_value(board.difficulty(), rng));
    if !board.insert_tile(tile) {
        return None;
    }
    debug!(x = position.x, y = position.y, value = tile.value, "spawned tile");
    Some(tile)
}
