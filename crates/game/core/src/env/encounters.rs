//! Everything that happens when the actor meets something on the map.
//!
//! Combat, pickup, trap effects, door handling and level changes are owned by
//! the surrounding game. The kernel only needs to know whether a turn was
//! spent, so these hooks report just that.

use crate::state::{
    DoorState, Entrapment, EntrapmentKind, GameState, Glyph, MonsterId, Position, TerrainKind,
    TrapKind,
};

/// Result of trying to open a closed door.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorAttempt {
    Opened,
    /// The door resisted; the turn is still spent.
    Stuck,
    /// Locked; no turn is spent.
    Locked,
}

pub trait Encounters: Send + Sync {
    /// Attack the monster; true when the attack used up the turn.
    fn attack(&self, state: &mut GameState, target: MonsterId) -> bool;

    /// Pick up (or look at) whatever lies on `at`.
    fn pickup(&self, state: &mut GameState, at: Position);

    /// Trigger the trap on `at`.
    fn spring_trap(&self, state: &mut GameState, at: Position, kind: TrapKind);

    fn open_door(&self, state: &mut GameState, at: Position) -> DoorAttempt;

    /// Climb stairs or a ladder; true when the attempt used up the turn.
    fn change_level(&self, state: &mut GameState, dz: i32) -> bool;
}

/// Deterministic stand-in for the full game: no damage, no inventory.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passive;

impl Passive {
    const PIT_TURNS: u32 = 5;
    const BEAR_TRAP_TURNS: u32 = 4;
    const WEB_TURNS: u32 = 2;
}

impl Encounters for Passive {
    fn attack(&self, state: &mut GameState, target: MonsterId) -> bool {
        let Some(monster) = state.level.monster(target) else {
            tracing::warn!(?target, "attack on a monster that is not on the level");
            return false;
        };
        let text = format!("You miss the {}.", monster.name);
        state.message(text);
        true
    }

    fn pickup(&self, state: &mut GameState, at: Position) {
        let Some(count) = state.level.tile(at).map(|tile| tile.items) else {
            return;
        };
        match count {
            0 => {}
            1 => state.message("You see here an object."),
            _ => state.message("There are several objects here."),
        }
    }

    fn spring_trap(&self, state: &mut GameState, at: Position, kind: TrapKind) {
        let sokoban = state.level.is_sokoban();
        if let Some(tile) = state.level.tile_mut(at) {
            tile.memory.trap = Some(kind);
        }
        if state.actor.is_airborne() && kind.spares_airborne(sokoban) {
            state.message(format!("You pass over a {}.", kind.name()));
            return;
        }
        state.run.cancel();
        let (text, entrapment) = match kind {
            TrapKind::Pit | TrapKind::SpikedPit => (
                "You fall into a pit!",
                Some((EntrapmentKind::Pit, Self::PIT_TURNS)),
            ),
            TrapKind::BearTrap => (
                "A bear trap closes on your foot!",
                Some((EntrapmentKind::BearTrap, Self::BEAR_TRAP_TURNS)),
            ),
            TrapKind::Web => (
                "You stumble into a spider web!",
                Some((EntrapmentKind::Web, Self::WEB_TURNS)),
            ),
            TrapKind::SqueakyBoard => ("A board beneath you squeaks loudly.", None),
            TrapKind::Hole | TrapKind::TrapDoor => ("A trap door opens up under you!", None),
            TrapKind::Teleport | TrapKind::LevelTeleport => ("You feel a wrenching sensation.", None),
            TrapKind::VibratingSquare => ("You feel a strange vibration under your feet.", None),
            _ => ("You trigger a trap!", None),
        };
        state.message(text);
        if let Some((kind, turns)) = entrapment {
            state.actor.entrapment = Some(Entrapment { kind, turns });
        }
        tracing::debug!(%at, trap = kind.name(), "trap sprung");
    }

    fn open_door(&self, state: &mut GameState, at: Position) -> DoorAttempt {
        let Some(tile) = state.level.tile_mut(at) else {
            return DoorAttempt::Locked;
        };
        if tile.door.contains(DoorState::LOCKED) {
            tile.memory.door_locked = true;
            tile.memory.glyph = Glyph::ClosedDoor;
            state.message("This door is locked.");
            return DoorAttempt::Locked;
        }
        tile.door.remove(DoorState::CLOSED);
        tile.door.insert(DoorState::OPEN);
        tile.memory.glyph = Glyph::OpenDoor;
        state.message("The door opens.");
        DoorAttempt::Opened
    }

    fn change_level(&self, state: &mut GameState, dz: i32) -> bool {
        let terrain = state.here().map(|tile| tile.terrain);
        let (way, fits) = if dz < 0 {
            ("up", matches!(terrain, Some(TerrainKind::StairsUp | TerrainKind::LadderUp)))
        } else {
            ("down", matches!(terrain, Some(TerrainKind::StairsDown | TerrainKind::LadderDown)))
        };
        if !fits {
            state.message(format!("You can't go {way} here."));
            return false;
        }
        let what = match terrain {
            Some(TerrainKind::LadderUp | TerrainKind::LadderDown) => "ladder",
            _ => "stairs",
        };
        state.message(format!("You climb {way} the {what}."));
        true
    }
}
