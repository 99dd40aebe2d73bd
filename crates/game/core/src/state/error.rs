//! Level construction errors.
//!
//! Raised while assembling a level from rows, room tables and placements.
//! Play itself never fails with these; movement problems are verdicts.

use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelError {
    #[error("level must have at least one row and one column (got {width}x{height})")]
    EmptyLevel { width: usize, height: usize },

    #[error("level is {width}x{height}, larger than the {max_width}x{max_height} limit")]
    TooLarge {
        width: usize,
        height: usize,
        max_width: u32,
        max_height: u32,
    },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown map glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },

    #[error("position {position} is outside the level")]
    OutOfBounds { position: Position },

    #[error("level has no actor start ('@')")]
    MissingStart,

    #[error("level has more than one actor start (second at {position})")]
    DuplicateStart { position: Position },

    #[error("too many rooms (max {max})")]
    TooManyRooms { max: usize },
}

impl GameError for LevelError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyLevel { .. } => "LEVEL_EMPTY",
            Self::TooLarge { .. } => "LEVEL_TOO_LARGE",
            Self::RaggedRow { .. } => "LEVEL_RAGGED_ROW",
            Self::UnknownGlyph { .. } => "LEVEL_UNKNOWN_GLYPH",
            Self::OutOfBounds { .. } => "LEVEL_OUT_OF_BOUNDS",
            Self::MissingStart => "LEVEL_MISSING_START",
            Self::DuplicateStart { .. } => "LEVEL_DUPLICATE_START",
            Self::TooManyRooms { .. } => "LEVEL_TOO_MANY_ROOMS",
        }
    }
}
