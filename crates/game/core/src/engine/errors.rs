//! Errors for malformed movement commands.
//!
//! A well-formed command never fails: walls, monsters and refusals come back
//! as a [`TurnOutcome`](super::TurnOutcome). These errors reject input the
//! engine cannot interpret at all.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Delta, Position, RunMode};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("step {delta} is not a move to an adjacent square or a level change")]
    InvalidStep { delta: Delta },

    #[error("{mode:?} is not a run mode")]
    InvalidRun { mode: RunMode },

    #[error("travel target {target} is outside the level")]
    TargetOutOfBounds { target: Position },

    #[error("repeat count must be at least one")]
    ZeroRepeat,

    #[error("no movement sequence to resume")]
    Idle,
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Idle => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStep { .. } => "COMMAND_INVALID_STEP",
            Self::InvalidRun { .. } => "COMMAND_INVALID_RUN",
            Self::TargetOutOfBounds { .. } => "COMMAND_TARGET_OUT_OF_BOUNDS",
            Self::ZeroRepeat => "COMMAND_ZERO_REPEAT",
            Self::Idle => "COMMAND_IDLE",
        }
    }
}
