//! Property tests over random sessions.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use push_2048_core::movement::move_player;
use push_2048_core::spawn::{sample_value, should_spawn};
use push_2048_core::{Board, Command, Difficulty, Direction, Game, Outcome, MAX_TILES};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Normal),
        Just(Difficulty::Hard),
        Just(Difficulty::Expert)
    ]
}

fn direction() -> impl Strategy<Value = Direction> {
    (0u8..4).prop_map(|v| Direction::from_u8(v).unwrap())
}

/// Any command except quit.
fn play_command() -> impl Strategy<Value = Command> {
    (0usize..5).prop_map(|i| Command::all()[i])
}

fn assert_cells_valid(board: &Board) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for tile in board.tiles() {
        prop_assert!(seen.insert(tile.position), "two tiles on {:?}", tile.position);
        prop_assert!(board.config().is_interior(tile.position));
        prop_assert!(tile.value >= 2 && tile.value.is_power_of_two());
    }
    prop_assert!(board.tile_count() <= MAX_TILES);
    prop_assert!(board.config().is_interior(board.player()));
    Ok(())
}

proptest! {
    #[test]
    fn sample_value_stays_in_range(d in difficulty(), seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..64 {
            let v = sample_value(d, &mut rng);
            prop_assert!(v.is_power_of_two());
            prop_assert!(v >= 2 && v <= 1 << d.max_exponent());
        }
    }

    #[test]
    fn should_spawn_is_modulo_frequency(d in difficulty(), m in 0u32..100_000) {
        prop_assert_eq!(should_spawn(d, m), m % d.frequency() == 0);
    }

    #[test]
    fn failed_moves_leave_board_untouched(
        d in difficulty(),
        seed in any::<u64>(),
        directions in prop::collection::vec(direction(), 1..150),
    ) {
        let mut game = Game::with_seed(d, seed);
        for direction in directions {
            let mut probe = game.board().clone();
            if !move_player(&mut probe, direction) {
                prop_assert_eq!(&probe, game.board());
            }
            if game.handle_command(Command::Move(direction)).outcome.is_terminal() {
                break;
            }
        }
    }

    #[test]
    fn counters_only_grow(
        d in difficulty(),
        seed in any::<u64>(),
        commands in prop::collection::vec(play_command(), 0..300),
    ) {
        let mut game = Game::with_seed(d, seed);
        for command in commands {
            let score = game.board().score();
            let moves = game.board().move_count();
            let result = game.handle_command(command);

            prop_assert!(game.board().score() >= score);
            prop_assert_eq!(game.board().move_count(), moves + u32::from(result.moved));
            assert_cells_valid(game.board())?;

            if result.outcome == Outcome::Won {
                prop_assert_eq!(game.board().tile_count(), 1);
            }
            if result.outcome.is_terminal() {
                break;
            }
        }
    }
}
