//! Difficulty levels and the spawn parameters they select.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseError;

/// Session difficulty, fixed for the lifetime of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
    Expert,
}

/// Spawn parameters bundled by a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyParams {
    /// Moves between spawn attempts.
    pub frequency: u32,
    /// Largest exponent a spawned tile can have (values are `2^1..=2^max_exponent`).
    pub max_exponent: u32,
    pub label: &'static str,
}

const PARAMS: [DifficultyParams; 3] = [
    DifficultyParams {
        frequency: 3,
        max_exponent: 2,
        label: "Normal",
    },
    DifficultyParams {
        frequency: 2,
        max_exponent: 3,
        label: "Hard",
    },
    DifficultyParams {
        frequency: 1,
        max_exponent: 4,
        label: "Expert",
    },
];

impl Difficulty {
    /// Get all three difficulties, easiest first.
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Normal, Difficulty::Hard, Difficulty::Expert]
    }

    /// Convert a menu choice (1=Normal, 2=Hard, 3=Expert).
    /// Returns None for anything else.
    pub fn from_menu_choice(choice: u32) -> Option<Difficulty> {
        match choice {
            1 => Some(Difficulty::Normal),
            2 => Some(Difficulty::Hard),
            3 => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn params(self) -> DifficultyParams {
        PARAMS[self as usize]
    }

    pub fn frequency(self) -> u32 {
        self.params().frequency
    }

    pub fn max_exponent(self) -> u32 {
        self.params().max_exponent
    }

    pub fn label(self) -> &'static str {
        self.params().label
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "1" => Ok(Difficulty::Normal),
            "hard" | "2" => Ok(Difficulty::Hard),
            "expert" | "3" => Ok(Difficulty::Expert),
            _ => Err(ParseError::UnknownDifficulty(s.to_string())),
        }
    }
}
