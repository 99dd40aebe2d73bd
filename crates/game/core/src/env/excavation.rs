//! Multi-turn excavation: chewing with teeth and digging with a tool.

use crate::config::GameConfig;
use crate::state::{Delta, DigProgress, DoorState, GameState, Position, TerrainKind, WallInfo};

/// Excavation collaborator.
///
/// Each call performs one unit of work and reports whether the square is
/// still impassable afterwards.
pub trait Excavator: Send + Sync {
    /// Chew at `at` (rock, door, iron bars or a boulder).
    fn chew(&self, state: &mut GameState, at: Position) -> bool;

    /// Dig toward `at` with the wielded tool.
    fn dig(&self, state: &mut GameState, at: Position, delta: Delta) -> bool;
}

/// Effort-tracking excavator; progress lives in [`GameState::dig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Tunneling;

impl Tunneling {
    /// Head start when chewing solid rock.
    const ROCK_HEAD_START: u32 = 30;
    /// Head start for trees, doors, bars and boulders.
    const OTHER_HEAD_START: u32 = 60;
    const CHEW_PER_TURN: u32 = 30;
    const DIG_PER_TURN: u32 = 25;

    fn restart(state: &mut GameState, at: Position, chewing: bool, effort: u32) -> bool {
        let fresh = state
            .dig
            .is_none_or(|dig| dig.position != at || dig.chewing != chewing);
        if fresh {
            state.dig = Some(DigProgress {
                position: at,
                effort,
                chewing,
            });
        }
        fresh
    }
}

impl Excavator for Tunneling {
    fn chew(&self, state: &mut GameState, at: Position) -> bool {
        let Some(tile) = state.level.tile(at).copied() else {
            return true;
        };
        let boulder = tile.has_boulder();
        let terrain = tile.terrain;

        if !boulder && terrain.is_structural() && tile.wall.contains(WallInfo::NONDIGGABLE) {
            let what = if terrain == TerrainKind::Tree { "tree" } else { "hard stone" };
            state.message(format!("You hurt your teeth on the {what}."));
            state.run.cancel();
            return true;
        }

        let head_start = if terrain.is_rock() && terrain != TerrainKind::Tree {
            Self::ROCK_HEAD_START
        } else {
            Self::OTHER_HEAD_START
        };
        if Self::restart(state, at, true, head_start) {
            let what = if boulder {
                "on a boulder"
            } else if terrain == TerrainKind::IronBars {
                "on the iron bars"
            } else if terrain == TerrainKind::Tree {
                "on a tree"
            } else if terrain.is_rock() {
                "a hole in the rock"
            } else {
                "a hole in the door"
            };
            state.message(format!("You start chewing {what}."));
            return true;
        }

        let effort = match state.dig.as_mut() {
            Some(dig) => {
                dig.effort += Self::CHEW_PER_TURN;
                dig.effort
            }
            None => return true,
        };
        if effort <= GameConfig::DIG_EFFORT_DONE {
            let what = if boulder {
                "boulder"
            } else if terrain == TerrainKind::IronBars {
                "bars"
            } else if terrain == TerrainKind::Tree {
                "tree"
            } else if terrain.is_rock() {
                "rock"
            } else {
                "door"
            };
            state.message(format!("You continue chewing on the {what}."));
            return true;
        }

        state.dig = None;
        let in_room = state.level.room_kind(at).is_some();
        let Some(tile) = state.level.tile_mut(at) else {
            return true;
        };
        let text = if boulder {
            tile.boulders -= 1;
            let still_blocked = tile.terrain.is_rock() || tile.is_closed_door() || tile.has_boulder();
            state.message("You eat the boulder.");
            return still_blocked;
        } else {
            match tile.terrain {
                TerrainKind::Wall => {
                    tile.terrain = TerrainKind::Door;
                    tile.door = DoorState::NO_DOOR;
                    "You chew a hole in the wall."
                }
                TerrainKind::Tree => {
                    tile.terrain = TerrainKind::Room;
                    "You chew through the tree."
                }
                TerrainKind::IronBars => {
                    tile.terrain = if in_room {
                        TerrainKind::Room
                    } else {
                        TerrainKind::Corridor
                    };
                    "You chew through the iron bars."
                }
                TerrainKind::SecretDoor | TerrainKind::Door => {
                    let secret = tile.terrain == TerrainKind::SecretDoor;
                    tile.terrain = TerrainKind::Door;
                    if tile.door.contains(DoorState::TRAPPED) {
                        tile.door = DoorState::NO_DOOR;
                        "KABOOM!! The door was booby-trapped!"
                    } else {
                        tile.door = DoorState::BROKEN;
                        if secret {
                            "You chew through the secret door."
                        } else {
                            "You chew through the door."
                        }
                    }
                }
                _ => {
                    tile.terrain = TerrainKind::Corridor;
                    "You chew a passage through the rock."
                }
            }
        };
        tracing::debug!(%at, "chewed through");
        state.message(text);
        false
    }

    fn dig(&self, state: &mut GameState, at: Position, delta: Delta) -> bool {
        let Some(tile) = state.level.tile(at).copied() else {
            return true;
        };
        if tile.terrain.is_structural() && tile.wall.contains(WallInfo::NONDIGGABLE) {
            let what = match tile.terrain {
                TerrainKind::Tree => "tree",
                TerrainKind::Wall => "wall",
                _ => "stone",
            };
            state.message(format!("The {what} here is too hard to dig in."));
            state.dig = None;
            return true;
        }
        if !tile.terrain.is_rock() {
            return false;
        }

        if Self::restart(state, at, false, 0) {
            let verb = if tile.terrain == TerrainKind::Tree {
                "cutting"
            } else {
                "digging"
            };
            state.message(format!("You start {verb}."));
            tracing::debug!(%at, %delta, "dig started");
            return true;
        }
        let effort = match state.dig.as_mut() {
            Some(dig) => {
                dig.effort += Self::DIG_PER_TURN;
                dig.effort
            }
            None => return true,
        };
        if effort <= GameConfig::DIG_EFFORT_DONE {
            return true;
        }

        state.dig = None;
        let Some(tile) = state.level.tile_mut(at) else {
            return true;
        };
        let text = match tile.terrain {
            TerrainKind::Tree => {
                tile.terrain = TerrainKind::Room;
                "You cut down the tree."
            }
            TerrainKind::Wall | TerrainKind::SecretDoor => {
                tile.terrain = TerrainKind::Door;
                tile.door = DoorState::NO_DOOR;
                "You make an opening in the wall."
            }
            _ => {
                tile.terrain = TerrainKind::Corridor;
                "You succeed in cutting away some rock."
            }
        };
        state.message(text);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Actor, LevelBuilder};

    fn state(rows: &[&str]) -> GameState {
        LevelBuilder::from_rows(rows)
            .unwrap()
            .into_state(1, Actor::new(Position::ORIGIN))
            .unwrap()
    }

    #[test]
    fn chewing_rock_takes_three_turns() {
        let mut state = state(&["@ "]);
        let rock = Position::new(1, 0);
        assert!(Tunneling.chew(&mut state, rock));
        assert!(Tunneling.chew(&mut state, rock));
        assert!(Tunneling.chew(&mut state, rock));
        assert!(!Tunneling.chew(&mut state, rock));
        assert_eq!(state.level.terrain(rock), Some(TerrainKind::Corridor));
        assert!(state.dig.is_none());
    }

    #[test]
    fn chewing_a_door_breaks_it() {
        let mut state = state(&["@+"]);
        let door = Position::new(1, 0);
        assert!(Tunneling.chew(&mut state, door));
        assert!(Tunneling.chew(&mut state, door));
        assert!(!Tunneling.chew(&mut state, door));
        let tile = state.level.tile(door).unwrap();
        assert_eq!(tile.door, DoorState::BROKEN);
    }

    #[test]
    fn undiggable_walls_hurt() {
        let mut state = LevelBuilder::from_rows(&["@|"])
            .unwrap()
            .wall_info(Position::new(1, 0), WallInfo::NONDIGGABLE)
            .unwrap()
            .into_state(1, Actor::new(Position::ORIGIN))
            .unwrap();
        assert!(Tunneling.chew(&mut state, Position::new(1, 0)));
        assert_eq!(state.messages.last(), Some("You hurt your teeth on the hard stone."));
        assert!(Tunneling.dig(&mut state, Position::new(1, 0), Delta::new(1, 0)));
    }

    #[test]
    fn digging_opens_a_wall() {
        let mut state = state(&["@|"]);
        let wall = Position::new(1, 0);
        let mut turns = 0;
        while Tunneling.dig(&mut state, wall, Delta::new(1, 0)) {
            turns += 1;
            assert!(turns < 10);
        }
        assert_eq!(state.level.terrain(wall), Some(TerrainKind::Door));
    }
}
