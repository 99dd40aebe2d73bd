//! Single-step legality.
//!
//! [`check_step`] answers whether the actor may step from `origin` by `delta`.
//! The same rules serve four purposes, selected by [`Mode`]:
//!
//! - **Commit**: the driver is about to move. Obstacles that can be worked
//!   on (rock to chew, rock to dig, a boulder to push) come back as a
//!   [`Verdict::Contingent`] side effect for the driver to carry out.
//! - **Probe**: a pure "could I step there right now".
//! - **Traverse**: an optimistic hint for the travel planner. Closed doors
//!   and pushable boulders are assumed to give way.
//! - **Hazard**: whether a known trap or liquid rejects the square during
//!   travel. [`Verdict::Allowed`] means the hazard vetoes the step.
//!
//! Non-commit modes never change anything and depend only on the tile state.

use crate::config::GameConfig;
use crate::state::{
    Actor, Capabilities, Delta, DoorState, GameState, Level, Position, RunMode, StatusFlags,
    TerrainKind, Tile, WallInfo,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    Commit,
    Probe,
    Traverse,
    Hazard,
}

/// Work the driver must do before a committed step can happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SideEffect {
    /// Eat through rock, a door, iron bars or a boulder.
    Chew(Position),
    /// Dig with the wielded tool.
    Dig { at: Position, delta: Delta },
    PushBoulder { at: Position, delta: Delta },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqueezeFailure {
    Sokoban,
    TooLarge,
    TooHeavy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HazardKind {
    Trap,
    Water,
    Lava,
    Swamp,
}

/// Why a step was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Blocker {
    OutOfBounds,
    Solid,
    /// Phasing actor against Sokoban walls.
    SokobanWalls,
    ClosedDoor {
        /// Artifact-reinforced door.
        heavy: bool,
        /// The actor walked into it rather than noticing it.
        bumped: bool,
        orthogonal: bool,
    },
    /// Amorphous actor against a reinforced door.
    ReinforcedGap,
    /// Tunneller against a reinforced door.
    ReinforcedTeeth,
    /// Amorphous actor carrying too much to ooze under a door.
    OozeBurdened,
    /// Diagonal step into a doorway.
    DoorwayDiagonal,
    Squeeze(SqueezeFailure),
    Hazard(HazardKind),
    /// Diagonal step out of a doorway.
    DoorwayExit,
    Boulder,
    /// Hazard mode only: nothing known rejects the square.
    NoHazard,
}

impl Blocker {
    /// Message shown when a committed step is refused.
    ///
    /// Some refusals only explain themselves while autoexploring.
    pub fn message(&self, autoexploring: bool) -> Option<&'static str> {
        let text = match self {
            Blocker::SokobanWalls => "The Sokoban walls resist your ability.",
            Blocker::ClosedDoor {
                orthogonal: false, ..
            } => return None,
            Blocker::ClosedDoor {
                heavy: true,
                bumped: true,
                ..
            } => "Ouch!  You bump into a heavy door.",
            Blocker::ClosedDoor { bumped: true, .. } => "Ouch!  You bump into a door.",
            Blocker::ClosedDoor { .. } => "That door is closed.",
            Blocker::ReinforcedGap => "You try to ooze under the door, but the gap is too small.",
            Blocker::ReinforcedTeeth => "You hurt your teeth on the reinforced door.",
            Blocker::OozeBurdened => {
                "You try to ooze under the door, but can't squeeze your possessions through."
            }
            Blocker::Squeeze(SqueezeFailure::Sokoban) => "You cannot pass that way.",
            Blocker::Squeeze(SqueezeFailure::TooLarge) => "Your body is too large to fit through.",
            Blocker::Squeeze(SqueezeFailure::TooHeavy) => "You are carrying too much to get through.",
            Blocker::Hazard(kind) if autoexploring => match kind {
                HazardKind::Water => "A body of water blocks your way.",
                HazardKind::Lava => "A pool of lava blocks your way.",
                HazardKind::Swamp => "A muddy swamp blocks your way.",
                HazardKind::Trap => return None,
            },
            Blocker::DoorwayExit if autoexploring => "The doorway blocks your way.",
            Blocker::Boulder if autoexploring => "A boulder blocks your way.",
            _ => return None,
        };
        Some(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Allowed,
    Blocked(Blocker),
    /// Commit mode only.
    Contingent(SideEffect),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }
}

/// Everything the oracle reads besides the two squares involved.
#[derive(Clone, Copy, Debug)]
pub struct MoveContext<'a> {
    pub level: &'a Level,
    pub actor: &'a Actor,
    pub run: RunMode,
    /// A travel command is in progress.
    pub travelling: bool,
    pub autoexploring: bool,
    pub no_pickup: bool,
    pub autodig: bool,
}

impl<'a> MoveContext<'a> {
    pub fn new(state: &'a GameState, config: &GameConfig) -> Self {
        Self {
            level: &state.level,
            actor: &state.actor,
            run: state.run.mode,
            travelling: state.run.travel,
            autoexploring: state.run.is_exploring(),
            no_pickup: state.run.no_pickup,
            autodig: config.autodig,
        }
    }

    #[must_use]
    pub fn with_run(mut self, run: RunMode) -> Self {
        self.run = run;
        self
    }
}

fn may_dig(tile: &Tile) -> bool {
    !(tile.terrain.is_structural() && tile.wall.contains(WallInfo::NONDIGGABLE))
}

fn may_passwall(tile: &Tile) -> bool {
    !(tile.terrain.is_structural() && tile.wall.contains(WallInfo::NONPASSWALL))
}

/// Whether `at` is a corner the actor cannot cut past diagonally.
pub fn bad_rock(level: &Level, actor: &Actor, at: Position) -> bool {
    let Some(tile) = level.tile(at) else {
        return true;
    };
    (level.is_sokoban() && tile.has_boulder())
        || (tile.terrain.is_rock()
            && (!actor.can(Capabilities::TUNNELS)
                || actor.can(Capabilities::NEEDS_PICK)
                || !may_dig(tile))
            && !(may_passwall(tile) && actor.passes_walls()))
}

fn hazard_at(actor: &Actor, tile: &Tile) -> Option<HazardKind> {
    let liquid = match tile.terrain {
        TerrainKind::Pool => Some(HazardKind::Water),
        TerrainKind::Lava => Some(HazardKind::Lava),
        TerrainKind::Swamp => Some(HazardKind::Swamp),
        _ => None,
    };
    if tile.known_trap().is_some() {
        return Some(liquid.unwrap_or(HazardKind::Trap));
    }
    if actor.ignores_liquid() || !tile.memory.seen {
        return None;
    }
    liquid
}

pub fn check_step(ctx: &MoveContext<'_>, origin: Position, delta: Delta, mode: Mode) -> Verdict {
    let dest = origin.offset(delta);
    let Some(tile) = ctx.level.tile(dest) else {
        return Verdict::Blocked(Blocker::OutOfBounds);
    };
    let actor = ctx.actor;
    let sokoban = ctx.level.is_sokoban();
    let diagonal = delta.is_diagonal();
    let commit = mode == Mode::Commit;

    if tile.terrain.is_rock() || tile.terrain == TerrainKind::IronBars {
        if actor.passes_walls() && may_passwall(tile) {
            // phases through
        } else if tile.terrain == TerrainKind::IronBars {
            if commit && !ctx.no_pickup && actor.can(Capabilities::METALLIVORE) {
                return Verdict::Contingent(SideEffect::Chew(dest));
            }
            if !(actor.passes_walls() || actor.can(Capabilities::PASSES_BARS)) {
                return Verdict::Blocked(Blocker::Solid);
            }
        } else if actor.chews_rock() {
            if commit {
                return Verdict::Contingent(SideEffect::Chew(dest));
            }
        } else if ctx.autodig && ctx.run == RunMode::Off && !ctx.no_pickup && actor.wields_digger {
            return if commit {
                Verdict::Contingent(SideEffect::Dig { at: dest, delta })
            } else {
                Verdict::Blocked(Blocker::Solid)
            };
        } else if actor.passes_walls() && sokoban {
            return Verdict::Blocked(Blocker::SokobanWalls);
        } else {
            return Verdict::Blocked(Blocker::Solid);
        }
    } else if tile.terrain.is_door() {
        let doorway_check = if tile.is_closed_door() {
            let bumped = actor.is_clumsy();
            let orthogonal = !diagonal;
            if tile.door.contains(DoorState::REINFORCED) {
                let blocker = if actor.can(Capabilities::AMORPHOUS) {
                    Blocker::ReinforcedGap
                } else if actor.chews_rock() {
                    Blocker::ReinforcedTeeth
                } else {
                    Blocker::ClosedDoor {
                        heavy: true,
                        bumped,
                        orthogonal,
                    }
                };
                return Verdict::Blocked(blocker);
            } else if actor.passes_walls() || actor.can_ooze() {
                false
            } else if actor.chews_rock() {
                if commit {
                    return Verdict::Contingent(SideEffect::Chew(dest));
                }
                false
            } else if matches!(mode, Mode::Traverse | Mode::Hazard) {
                true
            } else if actor.can(Capabilities::AMORPHOUS) {
                return Verdict::Blocked(Blocker::OozeBurdened);
            } else {
                return Verdict::Blocked(Blocker::ClosedDoor {
                    heavy: false,
                    bumped,
                    orthogonal,
                });
            }
        } else {
            true
        };
        if doorway_check && diagonal && !actor.passes_walls() && tile.door.has_door() {
            return Verdict::Blocked(Blocker::DoorwayDiagonal);
        }
    }

    if diagonal
        && bad_rock(ctx.level, actor, Position::new(origin.x, dest.y))
        && bad_rock(ctx.level, actor, Position::new(dest.x, origin.y))
    {
        let failure = if sokoban {
            Some(SqueezeFailure::Sokoban)
        } else if actor.is_large() {
            Some(SqueezeFailure::TooLarge)
        } else if actor.carried_weight > Actor::SQUEEZE_WEIGHT {
            Some(SqueezeFailure::TooHeavy)
        } else {
            None
        };
        if let Some(failure) = failure {
            return Verdict::Blocked(Blocker::Squeeze(failure));
        }
    }

    // The planner walks toward the actor, so the actor's own square is never
    // a hazard.
    if ctx.run == RunMode::Travel && dest != actor.position {
        if let Some(kind) = hazard_at(actor, tile) {
            return match mode {
                Mode::Hazard => Verdict::Allowed,
                Mode::Commit if !ctx.travelling => Verdict::Allowed,
                _ => Verdict::Blocked(Blocker::Hazard(kind)),
            };
        }
    }
    if mode == Mode::Hazard {
        return Verdict::Blocked(Blocker::NoHazard);
    }

    if diagonal && !actor.passes_walls() {
        let doorway = ctx
            .level
            .tile(origin)
            .is_some_and(|here| here.terrain.is_door() && here.door.has_door());
        if doorway {
            return Verdict::Blocked(Blocker::DoorwayExit);
        }
    }

    if tile.has_boulder() && (sokoban || !actor.passes_walls()) {
        let sees = !actor
            .status
            .intersects(StatusFlags::BLIND | StatusFlags::HALLUCINATING);
        if sees && ctx.run.is_cautious() && mode != Mode::Traverse {
            return Verdict::Blocked(Blocker::Boulder);
        }
        match mode {
            Mode::Commit => {
                let effect = if actor.chews_rock() && !sokoban {
                    SideEffect::Chew(dest)
                } else {
                    SideEffect::PushBoulder { at: dest, delta }
                };
                return Verdict::Contingent(effect);
            }
            Mode::Probe => return Verdict::Blocked(Blocker::Boulder),
            Mode::Traverse => {
                if sokoban || (ctx.level.has_boulder(origin) && !actor.has_way_through()) {
                    return Verdict::Blocked(Blocker::Boulder);
                }
            }
            Mode::Hazard => {}
        }
    }

    Verdict::Allowed
}

/// True when a known hazard on the destination rejects the step during travel.
pub fn hazard_vetoes(ctx: &MoveContext<'_>, origin: Position, delta: Delta) -> bool {
    check_step(ctx, origin, delta, Mode::Hazard).is_allowed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BodySize, LevelBuilder, LevelFlags, TrapKind};

    fn state(rows: &[&str]) -> GameState {
        LevelBuilder::from_rows(rows)
            .unwrap()
            .into_state(1, Actor::new(Position::ORIGIN))
            .unwrap()
    }

    fn judge(state: &GameState, delta: Delta, mode: Mode) -> Verdict {
        let config = GameConfig::default();
        let ctx = MoveContext::new(state, &config);
        check_step(&ctx, state.actor.position, delta, mode)
    }

    #[test]
    fn walls_block_and_floors_allow() {
        let state = state(&["@.|"]);
        assert_eq!(judge(&state, Delta::new(1, 0), Mode::Probe), Verdict::Allowed);
        assert_eq!(
            judge(&state, Delta::new(-1, 0), Mode::Probe),
            Verdict::Blocked(Blocker::OutOfBounds)
        );
        let mut state = state;
        state.actor.position = Position::new(1, 0);
        assert_eq!(
            judge(&state, Delta::new(1, 0), Mode::Commit),
            Verdict::Blocked(Blocker::Solid)
        );
    }

    #[test]
    fn tunnellers_chew_only_when_committing() {
        let mut state = state(&["@ "]);
        state.actor.capabilities = Capabilities::TUNNELS;
        assert_eq!(
            judge(&state, Delta::new(1, 0), Mode::Commit),
            Verdict::Contingent(SideEffect::Chew(Position::new(1, 0)))
        );
        assert_eq!(judge(&state, Delta::new(1, 0), Mode::Probe), Verdict::Allowed);
    }

    #[test]
    fn autodig_needs_a_wielded_tool_and_no_run() {
        let mut state = state(&["@ "]);
        state.actor.wields_digger = true;
        let config = GameConfig::default().with_autodig(true);
        let ctx = MoveContext::new(&state, &config);
        assert!(matches!(
            check_step(&ctx, Position::ORIGIN, Delta::new(1, 0), Mode::Commit),
            Verdict::Contingent(SideEffect::Dig { .. })
        ));
        let running = ctx.with_run(RunMode::Rush);
        assert_eq!(
            check_step(&running, Position::ORIGIN, Delta::new(1, 0), Mode::Commit),
            Verdict::Blocked(Blocker::Solid)
        );
    }

    #[test]
    fn closed_doors_are_optimistic_only_for_planning() {
        let state = state(&["@+."]);
        let east = Delta::new(1, 0);
        assert!(matches!(
            judge(&state, east, Mode::Commit),
            Verdict::Blocked(Blocker::ClosedDoor { orthogonal: true, .. })
        ));
        assert!(matches!(
            judge(&state, east, Mode::Probe),
            Verdict::Blocked(Blocker::ClosedDoor { .. })
        ));
        assert_eq!(judge(&state, east, Mode::Traverse), Verdict::Allowed);
    }

    #[test]
    fn door_messages_depend_on_clumsiness() {
        let closed = Blocker::ClosedDoor {
            heavy: false,
            bumped: false,
            orthogonal: true,
        };
        assert_eq!(closed.message(false), Some("That door is closed."));
        let bumped = Blocker::ClosedDoor {
            heavy: false,
            bumped: true,
            orthogonal: true,
        };
        assert_eq!(bumped.message(false), Some("Ouch!  You bump into a door."));
        let sideways = Blocker::ClosedDoor {
            heavy: false,
            bumped: true,
            orthogonal: false,
        };
        assert_eq!(sideways.message(true), None);
    }

    #[test]
    fn reinforced_doors_stop_even_oozers() {
        let mut state = state(&["@R"]);
        state.actor.capabilities = Capabilities::AMORPHOUS;
        assert_eq!(
            judge(&state, Delta::new(1, 0), Mode::Traverse),
            Verdict::Blocked(Blocker::ReinforcedGap)
        );

        let mut plain = self::state(&["@+"]);
        plain.actor.capabilities = Capabilities::AMORPHOUS;
        assert_eq!(judge(&plain, Delta::new(1, 0), Mode::Commit), Verdict::Allowed);
        plain.actor.carried_weight = Actor::OOZE_WEIGHT + 1;
        assert_eq!(
            judge(&plain, Delta::new(1, 0), Mode::Commit),
            Verdict::Blocked(Blocker::OozeBurdened)
        );
    }

    #[test]
    fn no_diagonal_steps_into_or_out_of_doorways() {
        let state = state(&["@.", ".'"]);
        assert_eq!(
            judge(&state, Delta::new(1, 1), Mode::Probe),
            Verdict::Blocked(Blocker::DoorwayDiagonal)
        );
        let mut leaving = self::state(&["@.", ".'"]);
        leaving.actor.position = Position::new(1, 1);
        assert_eq!(
            judge(&leaving, Delta::new(-1, -1), Mode::Probe),
            Verdict::Blocked(Blocker::DoorwayExit)
        );
        let broken = self::state(&["@.", ".b"]);
        assert_eq!(judge(&broken, Delta::new(1, 1), Mode::Probe), Verdict::Allowed);
    }

    #[test]
    fn sokoban_allows_diagonals_through_empty_doorways() {
        let mut state = state(&["@.", ".,"]);
        state.level.flags = LevelFlags::SOKOBAN;
        assert_eq!(judge(&state, Delta::new(1, 1), Mode::Probe), Verdict::Allowed);

        state.actor.position = Position::new(1, 1);
        assert_eq!(judge(&state, Delta::new(-1, -1), Mode::Probe), Verdict::Allowed);
    }

    #[test]
    fn squeezing_between_rock_depends_on_size_and_load() {
        let mut state = state(&["@ ", " ."]);
        let diagonal = Delta::new(1, 1);
        assert_eq!(judge(&state, diagonal, Mode::Probe), Verdict::Allowed);
        state.actor.carried_weight = 601;
        assert_eq!(
            judge(&state, diagonal, Mode::Probe),
            Verdict::Blocked(Blocker::Squeeze(SqueezeFailure::TooHeavy))
        );
        state.actor.carried_weight = 0;
        state.actor.size = BodySize::Large;
        assert_eq!(
            judge(&state, diagonal, Mode::Probe),
            Verdict::Blocked(Blocker::Squeeze(SqueezeFailure::TooLarge))
        );
        state.actor.size = BodySize::Medium;
        state.level.flags = LevelFlags::SOKOBAN;
        assert_eq!(
            judge(&state, diagonal, Mode::Probe),
            Verdict::Blocked(Blocker::Squeeze(SqueezeFailure::Sokoban))
        );
    }

    #[test]
    fn known_traps_only_matter_while_travelling() {
        let mut state = LevelBuilder::from_rows(&["@.."])
            .unwrap()
            .known_trap(Position::new(1, 0), TrapKind::Arrow)
            .unwrap()
            .into_state(1, Actor::new(Position::ORIGIN))
            .unwrap();
        let east = Delta::new(1, 0);
        assert!(!hazard_vetoes(
            &MoveContext::new(&state, &GameConfig::default()),
            Position::ORIGIN,
            east
        ));

        state.run.mode = RunMode::Travel;
        state.run.travel = true;
        let config = GameConfig::default();
        let ctx = MoveContext::new(&state, &config);
        assert!(hazard_vetoes(&ctx, Position::ORIGIN, east));
        assert_eq!(
            check_step(&ctx, Position::ORIGIN, east, Mode::Commit),
            Verdict::Blocked(Blocker::Hazard(HazardKind::Trap))
        );
        assert_eq!(
            check_step(&ctx, Position::ORIGIN, east, Mode::Traverse),
            Verdict::Blocked(Blocker::Hazard(HazardKind::Trap))
        );
    }

    #[test]
    fn remembered_water_only_stops_walkers() {
        let mut state = state(&["@}"]);
        state.run.mode = RunMode::Travel;
        state.run.travel = true;
        if let Some(tile) = state.level.tile_mut(Position::new(1, 0)) {
            tile.memory.seen = true;
        }
        let config = GameConfig::default();
        assert!(hazard_vetoes(
            &MoveContext::new(&state, &config),
            Position::ORIGIN,
            Delta::new(1, 0)
        ));
        state.actor.capabilities = Capabilities::FLYING;
        assert!(!hazard_vetoes(
            &MoveContext::new(&state, &config),
            Position::ORIGIN,
            Delta::new(1, 0)
        ));
    }

    #[test]
    fn boulders_push_when_committing_and_block_when_running() {
        let mut state = state(&["@0."]);
        let east = Delta::new(1, 0);
        assert_eq!(
            judge(&state, east, Mode::Commit),
            Verdict::Contingent(SideEffect::PushBoulder {
                at: Position::new(1, 0),
                delta: east
            })
        );
        assert_eq!(judge(&state, east, Mode::Probe), Verdict::Blocked(Blocker::Boulder));
        assert_eq!(judge(&state, east, Mode::Traverse), Verdict::Allowed);

        state.run.mode = RunMode::Go;
        assert_eq!(judge(&state, east, Mode::Commit), Verdict::Blocked(Blocker::Boulder));
        assert_eq!(Blocker::Boulder.message(true), Some("A boulder blocks your way."));
        assert_eq!(Blocker::Boulder.message(false), None);
    }

    #[test]
    fn planning_refuses_boulder_chains_without_tools() {
        let mut state = state(&["@0."]);
        state.actor.position = Position::new(1, 0);
        if let Some(tile) = state.level.tile_mut(Position::new(2, 0)) {
            tile.boulders = 1;
        }
        let east = Delta::new(1, 0);
        assert_eq!(judge(&state, east, Mode::Traverse), Verdict::Blocked(Blocker::Boulder));
        state.actor.carries_digger = true;
        assert_eq!(judge(&state, east, Mode::Traverse), Verdict::Allowed);
    }
}
