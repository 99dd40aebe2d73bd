//! What autoexplore considers worth walking to.
//!
//! [`unexplored`] and [`travel_weight`] read only what the player remembers.
//! [`interesting_to_explore`] may peek at the real map, but only to word the
//! report when exploring stops.

use crate::state::{Actor, Glyph, Level, Position, RememberedObject, RoomKind, TerrainKind};

/// True when some stepped square lies in the 3x3 block around `center`.
fn stepped_near(level: &Level, center: Position) -> bool {
    (-1..=1).any(|dy| {
        (-1..=1).any(|dx| {
            level
                .tile(Position::new(center.x + dx, center.y + dy))
                .is_some_and(|tile| tile.memory.stepped)
        })
    })
}

/// Whether the remembered square at `at` is worth visiting.
pub fn unexplored(level: &Level, at: Position) -> bool {
    let Some(tile) = level.tile(at) else {
        return false;
    };
    let memory = &tile.memory;

    if memory.stepped {
        return false;
    }
    if memory.glyph.is_closed_door() && memory.door_locked {
        return false;
    }
    if memory.trap.is_some() {
        return false;
    }
    match memory.object {
        Some(RememberedObject::Boulder | RememberedObject::Statue { piled: false }) => {
            return false;
        }
        // Shop wares are only worth a look on the black market.
        Some(_) if memory.in_shop => return level.is_black_market(),
        Some(_) => return true,
        None => {}
    }
    if memory.glyph == Glyph::Altar || memory.glyph.is_stairway() {
        return true;
    }
    // Shop doorways interrupt autoexplore before the shopkeeper does.
    if memory.glyph.is_door() && memory.in_shop {
        return true;
    }

    // Neighbours only; `at` itself is known once the actor has seen it.
    let corridor = memory.glyph == Glyph::Corridor;
    level.neighbours(at, corridor).into_iter().any(|next| {
        level
            .tile(next)
            .is_some_and(|tile| tile.memory.glyph == Glyph::Unexplored)
            && !stepped_near(level, next)
    })
}

/// Whether the actor could stand on `at` at all.
fn enterable(level: &Level, actor: &Actor, at: Position) -> bool {
    let Some(tile) = level.tile(at) else {
        return false;
    };
    if tile.terrain.is_rock() && !actor.passes_walls() {
        return false;
    }
    if tile.terrain == TerrainKind::IronBars && !actor.passes_walls() {
        return false;
    }
    if matches!(tile.terrain, TerrainKind::Pool | TerrainKind::Lava) && !actor.ignores_liquid() {
        return false;
    }
    at == actor.position || level.monster_at(at).is_none()
}

/// Ground-truth variant of [`unexplored`] that skips what the player cannot
/// know about (secret passages, vaults) and plain corridors.
pub fn interesting_to_explore(level: &Level, actor: &Actor, at: Position) -> bool {
    if !enterable(level, actor, at) || !unexplored(level, at) {
        return false;
    }
    let Some(tile) = level.tile(at) else {
        return false;
    };
    !tile.terrain.is_secret()
        && !level.in_room_of(at, RoomKind::Vault)
        && tile.terrain != TerrainKind::Corridor
}

/// Cost of heading for `at` when it lies `distance` layers away.
///
/// Lower is better: objects and stairs win ties with rooms, rooms beat
/// everything else.
pub fn travel_weight(level: &Level, at: Position, distance: u32) -> u32 {
    let Some(tile) = level.tile(at) else {
        return distance.saturating_mul(10);
    };
    let memory = &tile.memory;
    if memory.object.is_some() || memory.glyph == Glyph::Altar || memory.glyph.is_stairway() {
        distance
    } else if memory.in_room && !memory.glyph.is_closed_door() {
        distance.saturating_mul(2)
    } else {
        distance.saturating_mul(10)
    }
}

/// How autoexplore ended when no step toward anything interesting remains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplorationReport {
    Done,
    /// Some interesting squares exist but cannot be reached.
    Partial { unreachable: usize },
}

impl ExplorationReport {
    pub fn message(&self) -> &'static str {
        match self {
            ExplorationReport::Done => "Done exploring.",
            ExplorationReport::Partial { .. } => "Partly explored, can't reach some places.",
        }
    }
}

/// Counts what is still interesting anywhere on the level.
pub fn exploration_census(level: &Level, actor: &Actor) -> ExplorationReport {
    let unreachable = level
        .positions()
        .filter(|&at| interesting_to_explore(level, actor, at))
        .count();
    tracing::debug!(unreachable, "exploration census");
    if unreachable == 0 {
        ExplorationReport::Done
    } else {
        ExplorationReport::Partial { unreachable }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DoorState, LevelBuilder, LevelFlags, TrapKind};

    fn level(rows: &[&str]) -> Level {
        LevelBuilder::from_rows(rows).unwrap().build()
    }

    fn remember(level: &mut Level, at: Position, glyph: Glyph) {
        if let Some(tile) = level.tile_mut(at) {
            tile.memory.glyph = glyph;
            tile.memory.seen = true;
        }
    }

    #[test]
    fn edge_of_the_map_memory_is_interesting() {
        let mut level = level(&["..."]);
        let center = Position::new(1, 0);
        remember(&mut level, center, Glyph::Room);
        remember(&mut level, Position::new(2, 0), Glyph::Room);
        assert!(unexplored(&level, center));

        // The only unexplored neighbour sits next to a stepped square.
        if let Some(tile) = level.tile_mut(Position::ORIGIN) {
            tile.memory.stepped = true;
        }
        assert!(!unexplored(&level, center));
    }

    #[test]
    fn corridors_ignore_unexplored_diagonals() {
        let mut level = level(&["...", "...", "..."]);
        for at in level.positions().collect::<Vec<_>>() {
            if at.x == 1 || at.y == 1 {
                remember(&mut level, at, Glyph::Corridor);
            }
        }
        assert!(!unexplored(&level, Position::new(1, 1)));
        remember(&mut level, Position::new(1, 1), Glyph::Room);
        assert!(unexplored(&level, Position::new(1, 1)));
    }

    #[test]
    fn remembered_objects_and_features() {
        let mut level = level(&["...", "...", "..."]);
        for at in level.positions().collect::<Vec<_>>() {
            remember(&mut level, at, Glyph::Room);
        }
        let center = Position::new(1, 1);
        assert!(!unexplored(&level, center));

        remember(&mut level, center, Glyph::StairsDown);
        assert!(unexplored(&level, center));

        remember(&mut level, center, Glyph::Room);
        if let Some(tile) = level.tile_mut(center) {
            tile.memory.object = Some(RememberedObject::Boulder);
        }
        assert!(!unexplored(&level, center));

        if let Some(tile) = level.tile_mut(center) {
            tile.memory.object = Some(RememberedObject::Item);
            tile.memory.in_shop = true;
        }
        assert!(!unexplored(&level, center));
        level.flags = LevelFlags::BLACK_MARKET;
        assert!(unexplored(&level, center));
    }

    #[test]
    fn known_traps_and_locked_doors_are_skipped() {
        let mut level = level(&["...", "...", "..."]);
        let center = Position::new(1, 1);
        remember(&mut level, center, Glyph::ClosedDoor);
        if let Some(tile) = level.tile_mut(center) {
            tile.memory.door_locked = true;
        }
        assert!(!unexplored(&level, center));

        remember(&mut level, center, Glyph::Room);
        if let Some(tile) = level.tile_mut(center) {
            tile.memory.door_locked = false;
            tile.memory.trap = Some(TrapKind::Pit);
        }
        assert!(!unexplored(&level, center));
    }

    #[test]
    fn classification_ignores_ground_truth() {
        let mut level = level(&["...", "...", "..."]);
        let center = Position::new(1, 1);
        remember(&mut level, center, Glyph::Room);
        let before = unexplored(&level, center);
        if let Some(tile) = level.tile_mut(center) {
            tile.terrain = TerrainKind::Door;
            tile.door = DoorState::CLOSED | DoorState::LOCKED;
            tile.boulders = 2;
            tile.trap = Some(TrapKind::Hole);
        }
        assert_eq!(unexplored(&level, center), before);
    }

    #[test]
    fn weights_prefer_objects_then_rooms() {
        let mut level = level(&["..."]);
        let item = Position::new(0, 0);
        let room = Position::new(1, 0);
        let other = Position::new(2, 0);
        if let Some(tile) = level.tile_mut(item) {
            tile.memory.object = Some(RememberedObject::Item);
        }
        if let Some(tile) = level.tile_mut(room) {
            tile.memory.in_room = true;
            tile.memory.glyph = Glyph::Room;
        }
        assert_eq!(travel_weight(&level, item, 4), 4);
        assert_eq!(travel_weight(&level, room, 4), 8);
        assert_eq!(travel_weight(&level, other, 4), 40);
    }

    #[test]
    fn census_skips_vaults_and_secrets() {
        let level = LevelBuilder::from_rows(&["@.S"])
            .unwrap()
            .room(RoomKind::Vault, Position::new(1, 0), Position::new(1, 0))
            .unwrap()
            .build();
        let actor = Actor::new(Position::ORIGIN);
        assert!(!interesting_to_explore(&level, &actor, Position::new(1, 0)));
        assert!(!interesting_to_explore(&level, &actor, Position::new(2, 0)));
        assert!(interesting_to_explore(&level, &actor, Position::ORIGIN));
        assert_eq!(
            exploration_census(&level, &actor),
            ExplorationReport::Partial { unreachable: 1 }
        );
    }
}
