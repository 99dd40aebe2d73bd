//! Authoritative game state representation.
//!
//! This module owns the level grid, the actor and the turn-continuation state.
//! Collaborators receive the state by mutable reference; the movement kernel
//! itself only changes position and run state after legality is resolved.
pub mod builder;
pub mod error;
#[cfg(feature = "serde")]
pub mod root;
pub mod types;

use arrayvec::ArrayVec;

pub use builder::LevelBuilder;
pub use error::LevelError;
#[cfg(feature = "serde")]
pub use root::compute_state_root;
pub use types::{
    Actor, Attitude, BodySize, Capabilities, Delta, DigProgress, Direction, Disguise, DoorState,
    Encumbrance, Entrapment, EntrapmentKind, Glyph, Level, LevelFlags, MapDimensions, Monster,
    MonsterId, Neighbours, Perception, Position, RememberedObject, Room, RoomKind, RunDisplay,
    RunMode, RunState, StatusFlags, TerrainKind, Tick, Tile, TileMemory, TrapKind, WallInfo,
};

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at game initialization and never modified.
    /// Combined with `moves` to derive a unique seed for each roll.
    pub seed: u64,
    /// Turns the actor has spent.
    pub moves: Tick,
    pub level: Level,
    pub actor: Actor,
    pub run: RunState,
    /// Excavation in progress, if any.
    pub dig: Option<DigProgress>,
    pub messages: MessageLog,
}

impl GameState {
    pub fn new(seed: u64, level: Level, actor: Actor) -> Self {
        Self {
            seed,
            moves: Tick::ZERO,
            level,
            actor,
            run: RunState::default(),
            dig: None,
            messages: MessageLog::default(),
        }
    }

    pub fn message(&mut self, text: impl Into<String>) {
        self.messages.push(text);
    }

    /// The tile the actor stands on.
    pub fn here(&self) -> Option<&Tile> {
        self.level.tile(self.actor.position)
    }
}

/// Bounded log of player-facing messages; the oldest entry is dropped first.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageLog {
    entries: ArrayVec<String, { MessageLog::CAPACITY }>,
}

impl MessageLog {
    pub const CAPACITY: usize = 32;

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(message = %text, "message");
        if self.entries.is_full() {
            self.entries.remove(0);
        }
        self.entries.push(text);
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.iter().any(|entry| entry == text)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns every entry, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        self.entries.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_log_drops_oldest_when_full() {
        let mut log = MessageLog::default();
        for index in 0..=MessageLog::CAPACITY {
            log.push(format!("message {index}"));
        }
        assert!(!log.contains("message 0"));
        assert_eq!(log.last(), Some(format!("message {}", MessageLog::CAPACITY).as_str()));
        assert_eq!(log.drain().len(), MessageLog::CAPACITY);
        assert!(log.is_empty());
    }
}
