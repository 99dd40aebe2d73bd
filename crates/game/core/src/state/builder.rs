//! Assembles levels from ASCII rows.
//!
//! | Glyph | Terrain |
//! |-------|---------|
//! | ` ` | stone |
//! | `-` `\|` | wall |
//! | `T` | tree |
//! | `S` `C` | secret door, secret corridor |
//! | `.` | room floor |
//! | `#` | corridor |
//! | `+` `L` `R` | closed, locked, reinforced door |
//! | `'` `,` `b` | open door, empty doorway, broken door |
//! | `}` `~` `=` | pool, lava, swamp |
//! | `X` | iron bars |
//! | `<` `>` `U` `D` | stairs up/down, ladder up/down |
//! | `_` `{` `K` `\` `G` | altar, fountain, sink, throne, grave |
//! | `@` `0` `` ` `` `*` | actor start, boulder, statue, item (on room floor) |

use super::{
    Actor, DoorState, GameState, Level, LevelError, LevelFlags, MapDimensions, Monster, Position,
    Room, RoomKind, TerrainKind, Tile, TrapKind, WallInfo,
};
use crate::config::GameConfig;

#[derive(Clone, Debug)]
pub struct LevelBuilder {
    level: Level,
    start: Option<Position>,
}

impl LevelBuilder {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyLevel { width, height });
        }
        let (max_width, max_height) = (GameConfig::MAX_WIDTH, GameConfig::MAX_HEIGHT);
        if width > max_width as usize || height > max_height as usize {
            return Err(LevelError::TooLarge {
                width,
                height,
                max_width,
                max_height,
            });
        }

        let mut level = Level::new(MapDimensions::new(width as u32, height as u32));
        let mut start = None;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let tile = decode(glyph).ok_or(LevelError::UnknownGlyph { glyph, position })?;
                if glyph == '@' {
                    if start.is_some() {
                        return Err(LevelError::DuplicateStart { position });
                    }
                    start = Some(position);
                }
                if let Some(slot) = level.tile_mut(position) {
                    *slot = tile;
                }
            }
        }
        Ok(Self { level, start })
    }

    #[must_use]
    pub fn flags(mut self, flags: LevelFlags) -> Self {
        self.level.flags |= flags;
        self
    }

    /// Marks the inclusive rectangle `from..=to` as one room.
    pub fn room(mut self, kind: RoomKind, from: Position, to: Position) -> Result<Self, LevelError> {
        if self.level.rooms().len() > u8::MAX as usize {
            return Err(LevelError::TooManyRooms {
                max: u8::MAX as usize + 1,
            });
        }
        for corner in [from, to] {
            if !self.level.contains(corner) {
                return Err(LevelError::OutOfBounds { position: corner });
            }
        }
        let index = self.level.add_room(Room::new(kind));
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                if let Some(tile) = self.level.tile_mut(Position::new(x, y)) {
                    tile.room = Some(index);
                }
            }
        }
        Ok(self)
    }

    pub fn terrain(mut self, at: Position, terrain: TerrainKind) -> Result<Self, LevelError> {
        self.tile_mut(at)?.terrain = terrain;
        Ok(self)
    }

    pub fn door(mut self, at: Position, door: DoorState) -> Result<Self, LevelError> {
        let tile = self.tile_mut(at)?;
        tile.terrain = TerrainKind::Door;
        tile.door = door;
        Ok(self)
    }

    pub fn wall_info(mut self, at: Position, info: WallInfo) -> Result<Self, LevelError> {
        self.tile_mut(at)?.wall |= info;
        Ok(self)
    }

    pub fn trap(mut self, at: Position, kind: TrapKind) -> Result<Self, LevelError> {
        self.tile_mut(at)?.trap = Some(kind);
        Ok(self)
    }

    /// Places a trap the player already knows about.
    pub fn known_trap(mut self, at: Position, kind: TrapKind) -> Result<Self, LevelError> {
        let tile = self.tile_mut(at)?;
        tile.trap = Some(kind);
        tile.memory.trap = Some(kind);
        Ok(self)
    }

    pub fn boulder(mut self, at: Position) -> Result<Self, LevelError> {
        self.tile_mut(at)?.boulders += 1;
        Ok(self)
    }

    pub fn item(mut self, at: Position) -> Result<Self, LevelError> {
        self.tile_mut(at)?.items += 1;
        Ok(self)
    }

    pub fn monster(mut self, monster: Monster) -> Result<Self, LevelError> {
        if !self.level.contains(monster.position) {
            return Err(LevelError::OutOfBounds {
                position: monster.position,
            });
        }
        self.level.add_monster(monster);
        Ok(self)
    }

    pub fn start(mut self, at: Position) -> Result<Self, LevelError> {
        if !self.level.contains(at) {
            return Err(LevelError::OutOfBounds { position: at });
        }
        self.start = Some(at);
        Ok(self)
    }

    pub fn start_position(&self) -> Option<Position> {
        self.start
    }

    pub fn build(self) -> Level {
        self.level
    }

    /// Places `actor` at the start square and wraps everything in a fresh state.
    pub fn into_state(self, seed: u64, mut actor: Actor) -> Result<GameState, LevelError> {
        let start = self.start.ok_or(LevelError::MissingStart)?;
        actor.position = start;
        Ok(GameState::new(seed, self.level, actor))
    }

    fn tile_mut(&mut self, at: Position) -> Result<&mut Tile, LevelError> {
        self.level
            .tile_mut(at)
            .ok_or(LevelError::OutOfBounds { position: at })
    }
}

fn decode(glyph: char) -> Option<Tile> {
    let terrain = match glyph {
        ' ' => TerrainKind::Stone,
        '-' | '|' => TerrainKind::Wall,
        'T' => TerrainKind::Tree,
        'S' => {
            return Some(Tile {
                door: DoorState::CLOSED,
                ..Tile::new(TerrainKind::SecretDoor)
            });
        }
        'C' => TerrainKind::SecretCorridor,
        '.' | '@' => TerrainKind::Room,
        '#' => TerrainKind::Corridor,
        '+' => return Some(Tile::door(DoorState::CLOSED)),
        'L' => return Some(Tile::door(DoorState::CLOSED | DoorState::LOCKED)),
        'R' => {
            return Some(Tile::door(
                DoorState::CLOSED | DoorState::LOCKED | DoorState::REINFORCED,
            ));
        }
        '\'' => return Some(Tile::door(DoorState::OPEN)),
        ',' => return Some(Tile::door(DoorState::NO_DOOR)),
        'b' => return Some(Tile::door(DoorState::BROKEN)),
        '}' => TerrainKind::Pool,
        '~' => TerrainKind::Lava,
        '=' => TerrainKind::Swamp,
        'X' => TerrainKind::IronBars,
        '<' => TerrainKind::StairsUp,
        '>' => TerrainKind::StairsDown,
        'U' => TerrainKind::LadderUp,
        'D' => TerrainKind::LadderDown,
        '_' => TerrainKind::Altar,
        '{' => TerrainKind::Fountain,
        'K' => TerrainKind::Sink,
        '\\' => TerrainKind::Throne,
        'G' => TerrainKind::Grave,
        '0' => {
            return Some(Tile {
                boulders: 1,
                ..Tile::new(TerrainKind::Room)
            });
        }
        '`' => {
            return Some(Tile {
                statue: true,
                ..Tile::new(TerrainKind::Room)
            });
        }
        '*' => {
            return Some(Tile {
                items: 1,
                ..Tile::new(TerrainKind::Room)
            });
        }
        _ => return None,
    };
    Some(Tile::new(terrain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn decodes_rows_and_start() {
        let builder = LevelBuilder::from_rows(&["-----", "|@.+#", "-----"]).unwrap();
        assert_eq!(builder.start_position(), Some(Position::new(1, 1)));
        let level = builder.build();
        assert_eq!(level.terrain(Position::new(1, 1)), Some(TerrainKind::Room));
        assert!(level.is_closed_door(Position::new(3, 1)));
        assert_eq!(level.terrain(Position::new(4, 1)), Some(TerrainKind::Corridor));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = LevelBuilder::from_rows(&["...", ".."]).unwrap_err();
        assert_eq!(
            err,
            LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_levels_past_the_size_limit() {
        let row = format!("@{}", ".".repeat(354));
        let err = LevelBuilder::from_rows(&[row]).unwrap_err();
        assert!(matches!(
            err,
            LevelError::TooLarge {
                width: 355,
                height: 1,
                ..
            }
        ));
        assert_eq!(err.error_code(), "LEVEL_TOO_LARGE");

        let widest = format!("@{}", ".".repeat(254));
        assert!(LevelBuilder::from_rows(&[widest]).is_ok());
    }

    #[test]
    fn rejects_unknown_glyphs() {
        let err = LevelBuilder::from_rows(&["..?"]).unwrap_err();
        assert!(matches!(err, LevelError::UnknownGlyph { glyph: '?', .. }));
    }

    #[test]
    fn rooms_cover_their_rectangle() {
        let level = LevelBuilder::from_rows(&["....", "...."])
            .unwrap()
            .room(RoomKind::Shop, Position::new(1, 0), Position::new(2, 1))
            .unwrap()
            .build();
        assert_eq!(level.room_kind(Position::new(2, 1)), Some(RoomKind::Shop));
        assert_eq!(level.room_kind(Position::new(0, 0)), None);
    }

    #[test]
    fn state_requires_a_start() {
        let err = LevelBuilder::from_rows(&["..."])
            .unwrap()
            .into_state(0, Actor::new(Position::ORIGIN))
            .unwrap_err();
        assert_eq!(err, LevelError::MissingStart);
    }
}
