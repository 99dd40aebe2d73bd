//! Pushing boulders out of the way of a committed step.

use crate::state::{Capabilities, Delta, GameState, Position, TerrainKind, TrapKind};

/// What became of an attempt to push every boulder on the next square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// All boulders rolled away (or vanished into traps and water).
    Cleared,
    /// A boulder stayed put but the actor slips past it.
    SqueezedPast,
    /// The actor stays where they are; no turn is spent.
    Stuck,
}

impl PushOutcome {
    pub fn lets_actor_through(self) -> bool {
        !matches!(self, PushOutcome::Stuck)
    }
}

fn with_article(name: &str) -> String {
    let article = match name.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    format!("{article} {name}")
}

/// Whether a boulder can roll onto `to` when pushed by `delta`.
fn can_roll_onto(state: &GameState, to: Position, delta: Delta) -> bool {
    let Some(tile) = state.level.tile(to) else {
        return false;
    };
    !tile.terrain.is_rock()
        && tile.terrain != TerrainKind::IronBars
        && !(tile.terrain.is_door() && delta.is_diagonal() && tile.door.has_door())
        && !tile.has_boulder()
}

/// Push the boulders on `actor + delta` one square further along `delta`.
pub fn push(state: &mut GameState, delta: Delta) -> PushOutcome {
    let origin = state.actor.position;
    let from = origin.offset(delta);
    let to = from.offset(delta);

    while state.level.has_boulder(from) {
        state.run.cancel();
        if state.actor.can(Capabilities::LEVITATING) {
            state.message("You don't have enough leverage to push the boulder.");
            return PushOutcome::Stuck;
        }
        if state.actor.is_tiny() {
            state.message("You're too small to push that boulder.");
            return cannot_push(state, origin, from, delta);
        }
        if !can_roll_onto(state, to, delta) {
            state.message("You try to move the boulder, but in vain.");
            return cannot_push(state, origin, from, delta);
        }
        if state.level.is_sokoban() && delta.is_diagonal() {
            state.message("The boulder won't roll diagonally on this floor.");
            return cannot_push(state, origin, from, delta);
        }
        if let Some(monster) = state.level.monster_at(to) {
            let text = if monster.is_spotted() {
                format!("There's {} on the other side.", with_article(&monster.name))
            } else {
                "You hear a monster behind the boulder.".to_string()
            };
            state.message(text);
            state.message("Perhaps that's why you cannot move it.");
            return cannot_push(state, origin, from, delta);
        }

        let trap = state.level.tile(to).and_then(|tile| tile.trap);
        match trap {
            Some(TrapKind::Pit | TrapKind::SpikedPit) => {
                take_boulder(state, from);
                if let Some(tile) = state.level.tile_mut(to) {
                    tile.trap = None;
                    tile.memory.trap = None;
                }
                state.message("The boulder fills a pit.");
                continue;
            }
            Some(kind @ (TrapKind::Hole | TrapKind::TrapDoor)) => {
                take_boulder(state, from);
                if let Some(tile) = state.level.tile_mut(to) {
                    tile.trap = None;
                    tile.memory.trap = None;
                }
                state.message(if kind == TrapKind::Hole {
                    "The boulder falls into and plugs a hole in the floor!"
                } else {
                    "The boulder triggers and plugs a trap door in the floor!"
                });
                continue;
            }
            Some(kind @ (TrapKind::Teleport | TrapKind::LevelTeleport)) => {
                take_boulder(state, from);
                if let Some(tile) = state.level.tile_mut(to) {
                    tile.memory.trap = Some(kind);
                }
                state.message("You push the boulder and suddenly it disappears!");
                continue;
            }
            _ => {}
        }

        if state.level.is_closed_door(to) {
            state.message("You try to move the boulder, but in vain.");
            return cannot_push(state, origin, from, delta);
        }

        let liquid = state.level.terrain(to).filter(|terrain| {
            matches!(terrain, TerrainKind::Pool | TerrainKind::Lava)
        });
        if let Some(liquid) = liquid {
            take_boulder(state, from);
            if let Some(tile) = state.level.tile_mut(to) {
                tile.terrain = TerrainKind::Room;
            }
            state.message(if liquid == TerrainKind::Pool {
                "There is a large splash as the boulder fills a pool."
            } else {
                "The boulder fills a pool of lava."
            });
            continue;
        }

        let effort = if state.actor.can(Capabilities::THROWS_ROCKS) {
            "little"
        } else {
            "great"
        };
        state.message(format!("With {effort} effort you move the boulder."));
        take_boulder(state, from);
        if let Some(tile) = state.level.tile_mut(to) {
            tile.boulders += 1;
        }
        tracing::debug!(%from, %to, "boulder pushed");
    }
    PushOutcome::Cleared
}

fn take_boulder(state: &mut GameState, at: Position) {
    if let Some(tile) = state.level.tile_mut(at) {
        tile.boulders = tile.boulders.saturating_sub(1);
    }
}

fn cannot_push(state: &mut GameState, origin: Position, from: Position, delta: Delta) -> PushOutcome {
    if state.actor.can(Capabilities::THROWS_ROCKS) {
        state.message("However, you can easily push it aside.");
        return PushOutcome::SqueezedPast;
    }
    let corners_rock = !delta.is_diagonal() || {
        let rock = |at: Position| state.level.terrain(at).is_some_and(TerrainKind::is_rock);
        rock(Position::new(origin.x, from.y)) && rock(Position::new(from.x, origin.y))
    };
    if (state.actor.is_lightly_loaded() && corners_rock) || state.actor.is_tiny() {
        state.message("However, you can squeeze yourself into a small opening.");
        return PushOutcome::SqueezedPast;
    }
    PushOutcome::Stuck
}
