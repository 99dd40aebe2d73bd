//! Turn-continuation state for multi-step movement.

use super::{Delta, Position};

/// How a continuous movement sequence reacts to its surroundings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RunMode {
    /// Single steps.
    #[default]
    Off,
    /// Rush: ignores side features, follows corridors, stops only for the
    /// unusual.
    Rush,
    /// Go: stops at forks and anything interesting.
    Go,
    /// Follow: like go, but turns to follow corridors.
    Follow,
    /// Goal-directed travel, including autoexplore.
    Travel,
}

impl RunMode {
    /// Go, follow and travel; the modes that halt in front of boulders and
    /// traps.
    pub fn is_cautious(self) -> bool {
        matches!(self, RunMode::Go | RunMode::Follow | RunMode::Travel)
    }

    /// Modes that auto-turn along corridors.
    pub fn follows_corridors(self) -> bool {
        matches!(self, RunMode::Rush | RunMode::Follow | RunMode::Travel)
    }
}

/// How often a caller should redraw during continuous motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RunDisplay {
    /// Only the end of the run.
    Teleport,
    /// Every seventh move.
    #[default]
    Leap,
    /// Every step.
    Step,
    /// Every step, slowly.
    Crawl,
}

/// State that persists across driver invocations within one sequence.
///
/// Reset whenever a command starts a new sequence; cleared by [`RunState::cancel`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunState {
    /// Back to [`RunMode::Off`] once the driver sees the sequence has ended.
    pub mode: RunMode,
    /// Direction of the current run; updated by auto-turns.
    pub heading: Delta,
    /// Steps left in the sequence; zero when idle.
    pub remaining: u32,
    /// Accumulated turn taken since the run started, within -2..=2.
    pub last_turn: i8,
    pub travel: bool,
    /// Set for the first step of a travel command only.
    pub first_step: bool,
    pub autoexplore: bool,
    /// Move without picking up or fighting.
    pub no_pickup: bool,
    pub force_fight: bool,
    pub target: Option<Position>,
}

impl RunState {
    /// Repeat count that never runs out; only cancellation ends the sequence.
    pub const ENDLESS: u32 = u32::MAX;

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn is_exploring(&self) -> bool {
        self.travel && self.autoexplore
    }

    /// Starts a fresh sequence, discarding anything left from the previous one.
    pub fn begin(&mut self, mode: RunMode, heading: Delta, remaining: u32) {
        *self = Self {
            mode,
            heading,
            remaining,
            ..Self::default()
        };
    }

    /// Ends the current sequence.
    ///
    /// Command-scoped flags (`no_pickup`, `force_fight`, `autoexplore`) stay
    /// until the next command resets them.
    pub fn cancel(&mut self) {
        self.remaining = 0;
        self.mode = RunMode::Off;
        self.travel = false;
        self.first_step = false;
    }

    /// Consumes one repeat; returns false when the sequence just ran out.
    pub fn advance(&mut self) -> bool {
        match self.remaining {
            0 => false,
            Self::ENDLESS => true,
            _ => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.cancel();
                    false
                } else {
                    true
                }
            }
        }
    }
}
