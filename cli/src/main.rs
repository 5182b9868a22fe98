//! # Push 2048 CLI
//!
//! Play the push-and-merge tile puzzle in the terminal, or run headless
//! sessions with a random command policy.

use std::io::{self, BufRead, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;
use push_2048_core::{time_seed, Command, Difficulty, Direction, Game, Outcome};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "push-2048")]
#[command(author, version, about = "Push and merge tiles in the terminal")]
struct Args {
    /// Difficulty: normal, hard or expert (asked interactively when omitted)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Random seed (defaults to the current time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of sessions to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Maximum commands per headless session (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Show the board after each command in headless mode
    #[arg(long)]
    verbose: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let seed = args.seed.unwrap_or_else(time_seed);

    if let Some(episodes) = args.episodes {
        run_headless(&args, seed, episodes)
    } else {
        let difficulty = match args.difficulty {
            Some(d) => d,
            None => prompt_difficulty()?,
        };
        run_interactive(difficulty, seed)
    }
}

/// Logs go to stderr so they never land inside the drawn board.
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt_difficulty() -> Result<Difficulty> {
    println!("\nChoose a difficulty:");
    println!("1. Normal (tiles 2-4, one every 3 moves)");
    println!("2. Hard   (tiles 2-8, one every 2 moves)");
    println!("3. Expert (tiles 2-16, one every move)");
    print!("Your choice (1-3): ");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read difficulty choice")?;

    Ok(parse_menu_choice(&line).unwrap_or_else(|| {
        println!("Invalid choice. Using Normal.");
        Difficulty::Normal
    }))
}

fn parse_menu_choice(line: &str) -> Option<Difficulty> {
    line.trim().parse().ok().and_then(Difficulty::from_menu_choice)
}

/// Run interactive mode where the user plays with the keyboard.
fn run_interactive(difficulty: Difficulty, seed: u64) -> Result<()> {
    let mut game = Game::with_seed(difficulty, seed);

    {
        let _raw = RawMode::enable();
        play(&mut game, io::stdin().lock(), io::stdout().lock())?;
    }

    info!(score = game.score(), outcome = ?game.outcome(), "session finished");
    println!("\nThanks for playing! Final score: {}", game.score());
    Ok(())
}

/// Draw, read one key, run its command. Stops on a finished session or
/// when the input runs dry.
fn play<R: Read, W: Write>(game: &mut Game, mut input: R, mut out: W) -> Result<()> {
    let mut buffer = [0u8; 3];

    loop {
        draw(game, &mut out)?;

        if game.begin_turn() == Outcome::Lost {
            writeln!(out, "\n  Game over! No moves left. Score: {}", game.score())?;
            break;
        }

        let bytes_read = input.read(&mut buffer).context("failed to read key")?;
        if bytes_read == 0 {
            break;
        }

        let Some(command) = parse_input(&buffer[..bytes_read]) else {
            continue;
        };

        match game.handle_command(command).outcome {
            Outcome::Won => {
                draw(game, &mut out)?;
                writeln!(out, "\n  Victory! Score: {}", game.score())?;
                break;
            }
            Outcome::Quit => break,
            Outcome::Playing | Outcome::Lost => {}
        }
    }

    out.flush().context("failed to flush output")
}

fn draw<W: Write>(game: &Game, out: &mut W) -> Result<()> {
    write!(out, "\x1b[2J\x1b[H")?; // Clear screen
    writeln!(out, "=== Push 2048 ===")?;
    writeln!(out, "Controls: WASD or Arrow Keys | T to teleport | Q to quit\n")?;
    write!(out, "{}", game.board())?;
    out.flush().context("failed to draw board")
}

/// Run headless sessions with a random command policy.
fn run_headless(args: &Args, seed: u64, episodes: u32) -> Result<()> {
    let difficulty = args.difficulty.unwrap_or_default();
    let mut scores: Vec<u32> = Vec::with_capacity(episodes as usize);
    let (mut won, mut lost, mut capped) = (0u32, 0u32, 0u32);
    let mut total_score: u64 = 0;

    // Separate RNG for command selection
    let mut policy_rng = SmallRng::seed_from_u64(seed.wrapping_add(1000));

    for episode in 0..episodes {
        let mut game = Game::with_seed(difficulty, seed.wrapping_add(episode as u64));
        let mut steps = 0;

        while game.begin_turn() == Outcome::Playing
            && (args.max_steps == 0 || steps < args.max_steps)
        {
            let command = random_command(&mut policy_rng);
            game.handle_command(command);
            steps += 1;

            if args.verbose {
                println!("Episode {} Step {}: {:?}", episode + 1, steps, command);
                print!("{}", game.board());
            }
        }

        match game.outcome() {
            Outcome::Won => won += 1,
            Outcome::Lost => lost += 1,
            Outcome::Playing | Outcome::Quit => capped += 1,
        }

        let score = game.score();
        scores.push(score);
        total_score += score as u64;

        if args.verbose {
            println!(
                "Episode {}: Score={}, Outcome={:?}, Steps={}",
                episode + 1,
                score,
                game.outcome(),
                steps
            );
        }
    }

    scores.sort_unstable();
    let avg_score = if episodes == 0 {
        0.0
    } else {
        total_score as f64 / episodes as f64
    };

    let mut out = io::stdout().lock();
    writeln!(out, "=== Simulation Results ===")?;
    writeln!(out, "episodes={}", episodes)?;
    writeln!(out, "difficulty={}", difficulty)?;
    writeln!(out, "seed={}", seed)?;
    writeln!(out, "max_steps={}", args.max_steps)?;
    writeln!(out, "avg_score={:.2}", avg_score)?;
    writeln!(out, "median_score={:.2}", median(&scores))?;
    writeln!(out, "min_score={}", scores.first().unwrap_or(&0))?;
    writeln!(out, "max_score={}", scores.last().unwrap_or(&0))?;
    writeln!(out, "won={}", won)?;
    writeln!(out, "lost={}", lost)?;
    writeln!(out, "capped={}", capped)?;
    Ok(())
}

/// Median of sorted scores.
fn median(sorted: &[u32]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 0 {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    } else {
        sorted[n / 2] as f64
    }
}

/// Any command but quit, uniformly.
fn random_command(rng: &mut SmallRng) -> Command {
    let commands = Command::all();
    commands[rng.gen_range(0..commands.len() - 1)]
}

fn parse_input(bytes: &[u8]) -> Option<Command> {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => Some(Command::Move(Direction::Up)),
        [27, 91, 66] => Some(Command::Move(Direction::Down)),
        [27, 91, 67] => Some(Command::Move(Direction::Right)),
        [27, 91, 68] => Some(Command::Move(Direction::Left)),

        // WASD keys
        [b'w'] | [b'W'] => Some(Command::Move(Direction::Up)),
        [b's'] | [b'S'] => Some(Command::Move(Direction::Down)),
        [b'a'] | [b'A'] => Some(Command::Move(Direction::Left)),
        [b'd'] | [b'D'] => Some(Command::Move(Direction::Right)),

        [b't'] | [b'T'] => Some(Command::Teleport),
        // A lone Esc may be the start of a split arrow sequence, so it is ignored
        [b'q'] | [b'Q'] | [3] => Some(Command::Quit), // q, Q, Ctrl+C

        _ => None,
    }
}

/// Raw terminal mode for single-key input, restored on drop.
struct RawMode;

impl RawMode {
    fn enable() -> Self {
        enable_raw_mode();
        RawMode
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        disable_raw_mode();
    }
}

// Platform-specific terminal raw mode handling
#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // Without raw mode every key needs Enter
}

#[cfg(not(unix))]
fn disable_raw_mode() {}

#[cfg(test)]
mod tests {
    use super::*;
    use push_2048_core::{Board, BoardConfig, Position, Tile};

    #[test]
    fn test_parse_arrows_and_wasd() {
        assert_eq!(parse_input(&[27, 91, 65]), Some(Command::Move(Direction::Up)));
        assert_eq!(parse_input(&[27, 91, 68]), Some(Command::Move(Direction::Left)));
        assert_eq!(parse_input(b"d"), Some(Command::Move(Direction::Right)));
        assert_eq!(parse_input(b"S"), Some(Command::Move(Direction::Down)));
    }

    #[test]
    fn test_parse_teleport_and_quit() {
        assert_eq!(parse_input(b"t"), Some(Command::Teleport));
        assert_eq!(parse_input(b"Q"), Some(Command::Quit));
        assert_eq!(parse_input(&[3]), Some(Command::Quit));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        assert_eq!(parse_input(b"x"), None);
        assert_eq!(parse_input(b"r"), None);
        assert_eq!(parse_input(&[27, 91, 70]), None);
        // Esc alone, or the tail of an arrow sequence split across reads
        assert_eq!(parse_input(&[27]), None);
        assert_eq!(parse_input(&[91, 65]), None);
    }

    fn game_with(tiles: &[(i32, i32, u32)]) -> Game {
        let board = Board::from_parts(
            BoardConfig::default(),
            Difficulty::Normal,
            Position::new(6, 6),
            tiles
                .iter()
                .map(|&(x, y, v)| Tile::new(Position::new(x, y), v))
                .collect(),
        );
        Game::from_board(board, 3)
    }

    #[test]
    fn test_play_stops_at_end_of_input() {
        let mut game = Game::with_seed(Difficulty::Normal, 1);
        let mut out = Vec::new();
        play(&mut game, io::empty(), &mut out).unwrap();

        assert_eq!(game.outcome(), Outcome::Playing);
        assert_eq!(game.board().move_count(), 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("=== Push 2048 ===").count(), 1);
    }

    #[test]
    fn test_play_quit_key() {
        let mut game = game_with(&[(2, 2, 2), (8, 8, 4)]);
        let mut out = Vec::new();
        play(&mut game, &b"q"[..], &mut out).unwrap();
        assert_eq!(game.outcome(), Outcome::Quit);
    }

    #[test]
    fn test_play_reports_victory() {
        let mut game = game_with(&[(5, 6, 4), (4, 6, 4)]);
        let mut out = Vec::new();
        play(&mut game, &b"a"[..], &mut out).unwrap();

        assert_eq!(game.outcome(), Outcome::Won);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Victory! Score: 8"));
    }

    #[test]
    fn test_play_ignores_unknown_keys() {
        let mut game = game_with(&[(2, 2, 2), (8, 8, 4)]);
        let before = game.board().clone();
        let mut out = Vec::new();
        play(&mut game, &b"x"[..], &mut out).unwrap();

        assert_eq!(game.outcome(), Outcome::Playing);
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(parse_menu_choice("2\n"), Some(Difficulty::Hard));
        assert_eq!(parse_menu_choice(" 3 "), Some(Difficulty::Expert));
        assert_eq!(parse_menu_choice("9\n"), None);
        assert_eq!(parse_menu_choice("hard"), None);
    }

    #[test]
    fn test_random_command_never_quits() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..500 {
            assert_ne!(random_command(&mut rng), Command::Quit);
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[4]), 4.0);
        assert_eq!(median(&[2, 4, 8, 16]), 6.0);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["push-2048", "--difficulty", "expert", "--seed", "9"]);
        assert_eq!(args.difficulty, Some(Difficulty::Expert));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.episodes, None);
    }
}
