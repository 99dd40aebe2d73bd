use arrayvec::ArrayVec;
use bitflags::bitflags;

use super::{Monster, MonsterId, Position, TerrainKind, Tile};

/// Grid extents of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Longest straight run that fits on the grid.
    pub fn span(&self) -> u32 {
        self.width.max(self.height)
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }
}

bitflags! {
    /// Level-wide rules.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LevelFlags: u8 {
        /// Boulder puzzle level: no diagonal pushes, no squeezing past boulders.
        const SOKOBAN = 1 << 0;
        const BLACK_MARKET = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RoomKind {
    Ordinary,
    Shop,
    Vault,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub kind: RoomKind,
}

impl Room {
    pub const fn new(kind: RoomKind) -> Self {
        Self { kind }
    }
}

pub type Neighbours = ArrayVec<Position, 8>;

/// One dungeon level: tile grid, room table and the monsters on it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    dimensions: MapDimensions,
    pub flags: LevelFlags,
    tiles: Vec<Tile>,
    rooms: Vec<Room>,
    monsters: Vec<Monster>,
}

impl Level {
    /// A level of solid stone.
    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            flags: LevelFlags::empty(),
            tiles: vec![Tile::default(); dimensions.area()],
            rooms: Vec::new(),
            monsters: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.dimensions.index(position).map(|index| &self.tiles[index])
    }

    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.dimensions
            .index(position)
            .map(move |index| &mut self.tiles[index])
    }

    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.tile(position).map(|tile| tile.terrain)
    }

    /// Row-major iteration over every in-bounds position.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let MapDimensions { width, height } = self.dimensions;
        (0..height as i32).flat_map(move |y| (0..width as i32).map(move |x| Position::new(x, y)))
    }

    /// In-bounds squares around `center`, optionally orthogonal only.
    pub fn neighbours(&self, center: Position, orthogonal_only: bool) -> Neighbours {
        let mut out = Neighbours::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx == 0 && dy == 0) || (orthogonal_only && dx != 0 && dy != 0) {
                    continue;
                }
                let position = Position::new(center.x + dx, center.y + dy);
                if self.contains(position) {
                    out.push(position);
                }
            }
        }
        out
    }

    pub fn is_sokoban(&self) -> bool {
        self.flags.contains(LevelFlags::SOKOBAN)
    }

    pub fn is_black_market(&self) -> bool {
        self.flags.contains(LevelFlags::BLACK_MARKET)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn add_room(&mut self, room: Room) -> u8 {
        self.rooms.push(room);
        (self.rooms.len() - 1) as u8
    }

    /// Kind of room covering `position`.
    ///
    /// A room index that does not resolve is reported and treated as no room.
    pub fn room_kind(&self, position: Position) -> Option<RoomKind> {
        let index = self.tile(position)?.room?;
        match self.rooms.get(index as usize) {
            Some(room) => Some(room.kind),
            None => {
                tracing::warn!(%position, index, "tile refers to a missing room");
                None
            }
        }
    }

    pub fn in_room_of(&self, position: Position, kind: RoomKind) -> bool {
        self.room_kind(position) == Some(kind)
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn add_monster(&mut self, monster: Monster) {
        self.monsters.push(monster);
    }

    pub fn monster_at(&self, position: Position) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.position == position)
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.id == id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|monster| monster.id == id)
    }

    pub fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        let index = self.monsters.iter().position(|monster| monster.id == id)?;
        Some(self.monsters.remove(index))
    }

    pub fn has_boulder(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::has_boulder)
    }

    pub fn is_closed_door(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_closed_door)
    }

    /// Whether `position` blocks sight.
    pub fn blocks_sight(&self, position: Position) -> bool {
        self.tile(position).is_none_or(|tile| {
            tile.terrain.is_opaque() || tile.is_closed_door() || tile.has_boulder()
        })
    }

    /// True when nothing opaque lies strictly between `from` and `to`.
    ///
    /// The squares themselves may be opaque: a wall is visible, and so is a
    /// closed door in a corridor.
    pub fn has_clear_line(&self, from: Position, to: Position) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = (to.x - from.x).signum();
        let sy = (to.y - from.y).signum();
        let mut err = dx + dy;
        let mut cursor = from;
        while cursor != to {
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                cursor.x += sx;
            }
            if doubled <= dx {
                err += dx;
                cursor.y += sy;
            }
            if cursor != to && self.blocks_sight(cursor) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_level(width: u32, height: u32) -> Level {
        let mut level = Level::new(MapDimensions::new(width, height));
        for position in level.positions().collect::<Vec<_>>() {
            if let Some(tile) = level.tile_mut(position) {
                tile.terrain = TerrainKind::Room;
            }
        }
        level
    }

    #[test]
    fn out_of_bounds_has_no_tile() {
        let level = open_level(4, 3);
        assert!(level.tile(Position::new(-1, 0)).is_none());
        assert!(level.tile(Position::new(4, 0)).is_none());
        assert!(level.tile(Position::new(3, 2)).is_some());
    }

    #[test]
    fn corner_neighbours_are_clipped() {
        let level = open_level(4, 3);
        assert_eq!(level.neighbours(Position::ORIGIN, false).len(), 3);
        assert_eq!(level.neighbours(Position::ORIGIN, true).len(), 2);
        assert_eq!(level.neighbours(Position::new(1, 1), false).len(), 8);
    }

    #[test]
    fn missing_room_index_reads_as_no_room() {
        let mut level = open_level(3, 3);
        if let Some(tile) = level.tile_mut(Position::new(1, 1)) {
            tile.room = Some(7);
        }
        assert_eq!(level.room_kind(Position::new(1, 1)), None);
    }

    #[test]
    fn walls_block_lines_but_are_visible() {
        let mut level = open_level(7, 3);
        if let Some(tile) = level.tile_mut(Position::new(3, 1)) {
            tile.terrain = TerrainKind::Wall;
        }
        assert!(level.has_clear_line(Position::new(0, 1), Position::new(3, 1)));
        assert!(!level.has_clear_line(Position::new(0, 1), Position::new(6, 1)));
        assert!(level.has_clear_line(Position::new(0, 0), Position::new(6, 0)));
    }
}
