//! Memory refresh after the actor changes square.

use crate::state::{DoorState, GameState, Glyph, Level, Position, RoomKind, StatusFlags};

/// Vision collaborator, called after every committed position change.
pub trait Vision: Send + Sync {
    fn recompute(&self, state: &mut GameState, from: Position, to: Position);
}

/// Remembers every square within `radius` that has a clear line to the actor.
///
/// A blind actor only feels the square underfoot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineOfSight {
    pub radius: u32,
}

impl LineOfSight {
    pub const DEFAULT_RADIUS: u32 = 10;

    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// Copies the current appearance of `at` into the player's memory.
    pub fn remember(level: &mut Level, at: Position) {
        let in_shop = level.in_room_of(at, RoomKind::Shop);
        let Some(tile) = level.tile_mut(at) else {
            return;
        };
        let glyph = Glyph::of(tile.terrain, tile.door);
        let object = tile.visible_object();
        let memory = &mut tile.memory;
        memory.glyph = glyph;
        memory.object = object;
        memory.seen = true;
        memory.in_room = tile.room.is_some();
        memory.in_shop = in_shop;
        if tile.trap.is_none() {
            memory.trap = None;
        }
        if !tile.door.contains(DoorState::LOCKED) {
            memory.door_locked = false;
        }
    }

    /// Squares currently in view from `center`.
    pub fn visible_from(&self, level: &Level, center: Position) -> Vec<Position> {
        let radius = self.radius as i32;
        let mut out = Vec::new();
        for y in center.y - radius..=center.y + radius {
            for x in center.x - radius..=center.x + radius {
                let position = Position::new(x, y);
                if level.has_clear_line(center, position) {
                    out.push(position);
                }
            }
        }
        out
    }
}

impl Default for LineOfSight {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

impl Vision for LineOfSight {
    fn recompute(&self, state: &mut GameState, from: Position, to: Position) {
        if state.actor.is(StatusFlags::BLIND) {
            Self::remember(&mut state.level, to);
            return;
        }
        let visible = self.visible_from(&state.level, to);
        tracing::trace!(%from, %to, count = visible.len(), "vision recomputed");
        for position in visible {
            Self::remember(&mut state.level, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Actor, LevelBuilder};

    #[test]
    fn walls_hide_what_lies_behind() {
        let mut state = LevelBuilder::from_rows(&["@.|.."])
            .unwrap()
            .into_state(1, Actor::new(Position::ORIGIN))
            .unwrap();
        LineOfSight::default().recompute(&mut state, Position::ORIGIN, Position::ORIGIN);
        let memory = |x| state.level.tile(Position::new(x, 0)).unwrap().memory;
        assert_eq!(memory(1).glyph, Glyph::Room);
        assert_eq!(memory(2).glyph, Glyph::Wall);
        assert!(!memory(3).seen);
    }

    #[test]
    fn blind_actors_only_feel_their_square() {
        let mut actor = Actor::new(Position::ORIGIN);
        actor.status = StatusFlags::BLIND;
        let mut state = LevelBuilder::from_rows(&["@.."])
            .unwrap()
            .into_state(1, actor)
            .unwrap();
        LineOfSight::default().recompute(&mut state, Position::ORIGIN, Position::ORIGIN);
        assert!(state.level.tile(Position::ORIGIN).unwrap().memory.seen);
        assert!(!state.level.tile(Position::new(1, 0)).unwrap().memory.seen);
    }
}
