//! Error types for the outer surface of the engine.
//!
//! Game-rule failures (blocked moves, a full tile collection, unknown keys)
//! are never errors: they surface as `false` or as a no-op turn. The types
//! here only cover building a board and parsing a difficulty name.

use thiserror::Error;

/// Rejected [`BoardConfig`](crate::BoardConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be even, got {0}")]
    OddSize(i32),

    #[error("grid size must be at least {min}, got {size}")]
    TooSmall { size: i32, min: i32 },

    #[error("tile capacity must be at least 2, got {0}")]
    CapacityTooSmall(usize),
}

/// Text that does not name a difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown difficulty: {0:?} (expected normal, hard or expert)")]
    UnknownDifficulty(String),
}
