pub mod actor;
pub mod common;
pub mod level;
pub mod monster;
pub mod run;
pub mod tile;

pub use actor::{
    Actor, BodySize, Capabilities, DigProgress, Encumbrance, Entrapment, EntrapmentKind, StatusFlags,
};
pub use common::{Delta, Direction, Position, Tick};
pub use level::{Level, LevelFlags, MapDimensions, Neighbours, Room, RoomKind};
pub use monster::{Attitude, Disguise, Monster, MonsterId, Perception};
pub use run::{RunDisplay, RunMode, RunState};
pub use tile::{
    DoorState, Glyph, RememberedObject, TerrainKind, Tile, TileMemory, TrapKind, WallInfo,
};
