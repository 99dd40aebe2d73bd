//! Tile ground truth and the player's memory of it.
//!
//! Every tile carries two independent layers: the real terrain, door, trap and
//! object state, and a [`TileMemory`] describing what the player remembers.
//! Exploration heuristics read only the memory layer.

use bitflags::bitflags;

/// Canonical terrain classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TerrainKind {
    Stone,
    Wall,
    Tree,
    SecretDoor,
    SecretCorridor,
    Pool,
    Lava,
    Swamp,
    IronBars,
    Door,
    Corridor,
    Room,
    StairsUp,
    StairsDown,
    LadderUp,
    LadderDown,
    Altar,
    Fountain,
    Sink,
    Throne,
    Grave,
}

impl TerrainKind {
    /// Solid terrain: stone, walls, trees and undiscovered secret passages.
    pub const fn is_rock(self) -> bool {
        matches!(
            self,
            TerrainKind::Stone
                | TerrainKind::Wall
                | TerrainKind::Tree
                | TerrainKind::SecretDoor
                | TerrainKind::SecretCorridor
        )
    }

    /// Stone, walls and trees honour the non-diggable and non-passwall bits.
    pub const fn is_structural(self) -> bool {
        matches!(self, TerrainKind::Stone | TerrainKind::Wall | TerrainKind::Tree)
    }

    pub const fn is_door(self) -> bool {
        matches!(self, TerrainKind::Door)
    }

    pub const fn is_secret(self) -> bool {
        matches!(self, TerrainKind::SecretDoor | TerrainKind::SecretCorridor)
    }

    pub const fn is_furniture(self) -> bool {
        matches!(
            self,
            TerrainKind::StairsUp
                | TerrainKind::StairsDown
                | TerrainKind::LadderUp
                | TerrainKind::LadderDown
                | TerrainKind::Altar
                | TerrainKind::Fountain
                | TerrainKind::Sink
                | TerrainKind::Throne
                | TerrainKind::Grave
        )
    }

    pub const fn is_liquid(self) -> bool {
        matches!(self, TerrainKind::Pool | TerrainKind::Lava | TerrainKind::Swamp)
    }

    /// Blocks line of sight.
    pub const fn is_opaque(self) -> bool {
        self.is_rock()
    }
}

bitflags! {
    /// Door sub-state. An empty mask is a doorless doorway.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DoorState: u8 {
        const BROKEN = 1 << 0;
        const OPEN = 1 << 1;
        const CLOSED = 1 << 2;
        const LOCKED = 1 << 3;
        const TRAPPED = 1 << 4;
        /// Artifact-reinforced door: nothing oozes, chews or phases through.
        const REINFORCED = 1 << 5;
    }
}

impl DoorState {
    pub const NO_DOOR: Self = Self::empty();

    pub fn is_closed(self) -> bool {
        self.intersects(Self::CLOSED | Self::LOCKED)
    }

    /// True when a physical door (open or shut) occupies the doorway.
    pub fn has_door(self) -> bool {
        !(self - Self::BROKEN).is_empty()
    }
}

bitflags! {
    /// Per-wall restrictions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WallInfo: u8 {
        const NONDIGGABLE = 1 << 0;
        const NONPASSWALL = 1 << 1;
    }
}

/// Trap varieties the movement kernel needs to reason about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapKind {
    #[strum(serialize = "arrow trap")]
    Arrow,
    #[strum(serialize = "dart trap")]
    Dart,
    #[strum(serialize = "falling rock trap")]
    FallingRock,
    #[strum(serialize = "squeaky board")]
    SqueakyBoard,
    #[strum(serialize = "bear trap")]
    BearTrap,
    #[strum(serialize = "land mine")]
    LandMine,
    #[strum(serialize = "sleeping gas trap")]
    SleepingGas,
    #[strum(serialize = "fire trap")]
    Fire,
    #[strum(serialize = "pit")]
    Pit,
    #[strum(serialize = "spiked pit")]
    SpikedPit,
    #[strum(serialize = "hole")]
    Hole,
    #[strum(serialize = "trap door")]
    TrapDoor,
    #[strum(serialize = "teleportation trap")]
    Teleport,
    #[strum(serialize = "level teleporter")]
    LevelTeleport,
    #[strum(serialize = "web")]
    Web,
    #[strum(serialize = "magic trap")]
    Magic,
    #[strum(serialize = "vibrating square")]
    VibratingSquare,
}

impl TrapKind {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn is_pit(self) -> bool {
        matches!(self, TrapKind::Pit | TrapKind::SpikedPit)
    }

    /// Traps that do nothing to an actor passing above the floor.
    pub fn spares_airborne(self, sokoban: bool) -> bool {
        match self {
            TrapKind::SqueakyBoard
            | TrapKind::BearTrap
            | TrapKind::SpikedPit
            | TrapKind::TrapDoor => true,
            TrapKind::Pit | TrapKind::Hole => !sokoban,
            _ => false,
        }
    }
}

/// Remembered appearance of a square's background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Glyph {
    /// Never seen.
    #[default]
    Unexplored,
    /// Seen, dark or solid: nothing to walk on as far as the player knows.
    Stone,
    Wall,
    Tree,
    Room,
    Corridor,
    Doorway,
    BrokenDoor,
    OpenDoor,
    ClosedDoor,
    IronBars,
    Pool,
    Lava,
    Swamp,
    StairsUp,
    StairsDown,
    LadderUp,
    LadderDown,
    Altar,
    Fountain,
    Sink,
    Throne,
    Grave,
}

impl Glyph {
    pub const fn is_stairway(self) -> bool {
        matches!(
            self,
            Glyph::StairsUp | Glyph::StairsDown | Glyph::LadderUp | Glyph::LadderDown
        )
    }

    pub const fn is_closed_door(self) -> bool {
        matches!(self, Glyph::ClosedDoor)
    }

    pub const fn is_door(self) -> bool {
        matches!(
            self,
            Glyph::Doorway | Glyph::BrokenDoor | Glyph::OpenDoor | Glyph::ClosedDoor
        )
    }

    /// Appearance of a square whose terrain and door state are in view.
    pub fn of(terrain: TerrainKind, door: DoorState) -> Glyph {
        match terrain {
            TerrainKind::Stone | TerrainKind::SecretCorridor => Glyph::Stone,
            TerrainKind::Wall | TerrainKind::SecretDoor => Glyph::Wall,
            TerrainKind::Tree => Glyph::Tree,
            TerrainKind::Pool => Glyph::Pool,
            TerrainKind::Lava => Glyph::Lava,
            TerrainKind::Swamp => Glyph::Swamp,
            TerrainKind::IronBars => Glyph::IronBars,
            TerrainKind::Door => {
                if door.is_closed() {
                    Glyph::ClosedDoor
                } else if door.contains(DoorState::OPEN) {
                    Glyph::OpenDoor
                } else if door.contains(DoorState::BROKEN) {
                    Glyph::BrokenDoor
                } else {
                    Glyph::Doorway
                }
            }
            TerrainKind::Corridor => Glyph::Corridor,
            TerrainKind::Room => Glyph::Room,
            TerrainKind::StairsUp => Glyph::StairsUp,
            TerrainKind::StairsDown => Glyph::StairsDown,
            TerrainKind::LadderUp => Glyph::LadderUp,
            TerrainKind::LadderDown => Glyph::LadderDown,
            TerrainKind::Altar => Glyph::Altar,
            TerrainKind::Fountain => Glyph::Fountain,
            TerrainKind::Sink => Glyph::Sink,
            TerrainKind::Throne => Glyph::Throne,
            TerrainKind::Grave => Glyph::Grave,
        }
    }
}

/// Top object the player remembers on a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RememberedObject {
    Item,
    Boulder,
    /// A statue; `piled` when other objects were seen with it.
    Statue { piled: bool },
}

/// What the player remembers about a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMemory {
    pub glyph: Glyph,
    pub object: Option<RememberedObject>,
    pub trap: Option<TrapKind>,
    /// The player has stood on this square.
    pub stepped: bool,
    /// The square has been in view at least once.
    pub seen: bool,
    /// The player learned the door here is locked.
    pub door_locked: bool,
    pub in_room: bool,
    pub in_shop: bool,
}

/// One grid square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain: TerrainKind,
    pub door: DoorState,
    pub wall: WallInfo,
    /// Index into the level's room table.
    pub room: Option<u8>,
    pub trap: Option<TrapKind>,
    pub boulders: u8,
    pub items: u16,
    pub statue: bool,
    pub memory: TileMemory,
}

impl Tile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            door: DoorState::NO_DOOR,
            wall: WallInfo::empty(),
            room: None,
            trap: None,
            boulders: 0,
            items: 0,
            statue: false,
            memory: TileMemory {
                glyph: Glyph::Unexplored,
                object: None,
                trap: None,
                stepped: false,
                seen: false,
                door_locked: false,
                in_room: false,
                in_shop: false,
            },
        }
    }

    pub fn door(door: DoorState) -> Self {
        Self {
            door,
            ..Self::new(TerrainKind::Door)
        }
    }

    pub fn is_closed_door(&self) -> bool {
        self.terrain.is_door() && self.door.is_closed()
    }

    /// A trap both present and known to the player.
    pub fn known_trap(&self) -> Option<TrapKind> {
        self.trap.and(self.memory.trap)
    }

    pub fn has_boulder(&self) -> bool {
        self.boulders > 0
    }

    /// Top object as the player would see it now.
    pub fn visible_object(&self) -> Option<RememberedObject> {
        if self.boulders > 0 {
            Some(RememberedObject::Boulder)
        } else if self.statue {
            Some(RememberedObject::Statue {
                piled: self.items > 0,
            })
        } else if self.items > 0 {
            Some(RememberedObject::Item)
        } else {
            None
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TerrainKind::Stone)
    }
}
