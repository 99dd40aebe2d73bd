//! Level data loader.
//!
//! A level file holds the map rows (same glyph legend as
//! [`LevelBuilder::from_rows`]) plus placement tables for everything a glyph
//! cannot express: rooms, hidden or remembered traps, monsters and the actor.

use std::path::Path;

use delver_core::GameError;
use delver_core::state::{
    Actor, Attitude, Capabilities, Encumbrance, GameState, LevelBuilder, LevelError, LevelFlags,
    Monster, MonsterId, Perception, Position, RoomKind, StatusFlags, TrapKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSpec {
    pub kind: RoomKind,
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapSpec {
    pub at: Position,
    pub kind: TrapKind,
    /// Already discovered by the player.
    #[serde(default)]
    pub known: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterSpec {
    pub id: u32,
    pub name: String,
    pub at: Position,
    #[serde(default)]
    pub attitude: Option<Attitude>,
    #[serde(default)]
    pub perception: Option<Perception>,
    #[serde(default)]
    pub harmless: bool,
    #[serde(default)]
    pub sessile: bool,
}

impl MonsterSpec {
    fn build(&self) -> Monster {
        let mut monster = Monster::new(MonsterId(self.id), self.name.clone(), self.at);
        if let Some(attitude) = self.attitude {
            monster = monster.with_attitude(attitude);
        }
        if let Some(perception) = self.perception {
            monster = monster.with_perception(perception);
        }
        monster.harmless = self.harmless;
        monster.sessile = self.sessile;
        monster
    }
}

/// Overrides applied to a fresh [`Actor`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSpec {
    pub capabilities: Capabilities,
    pub status: StatusFlags,
    pub encumbrance: Encumbrance,
    pub hp: Option<i32>,
    pub carried_weight: Option<u32>,
    pub wields_digger: bool,
    pub orthogonal_only: bool,
}

impl ActorSpec {
    pub fn build(&self) -> Actor {
        let mut actor = Actor::new(Position::ORIGIN);
        actor.capabilities = self.capabilities;
        actor.status = self.status;
        actor.encumbrance = self.encumbrance;
        if let Some(hp) = self.hp {
            actor.hp = hp;
        }
        if let Some(weight) = self.carried_weight {
            actor.carried_weight = weight;
        }
        actor.wields_digger = self.wields_digger;
        actor.carries_digger |= self.wields_digger;
        actor.orthogonal_only = self.orthogonal_only;
        actor
    }
}

/// Level file contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSpec {
    pub rows: Vec<String>,
    #[serde(default)]
    pub sokoban: bool,
    #[serde(default)]
    pub black_market: bool,
    /// Start square; overrides an `@` in the rows.
    #[serde(default)]
    pub start: Option<Position>,
    #[serde(default)]
    pub rooms: Vec<RoomSpec>,
    #[serde(default)]
    pub traps: Vec<TrapSpec>,
    #[serde(default)]
    pub boulders: Vec<Position>,
    #[serde(default)]
    pub items: Vec<Position>,
    #[serde(default)]
    pub monsters: Vec<MonsterSpec>,
    #[serde(default)]
    pub actor: ActorSpec,
}

impl LevelSpec {
    /// Assembles the level; every placement is checked against the bounds.
    pub fn builder(&self) -> LoadResult<LevelBuilder> {
        let mut builder = LevelBuilder::from_rows(&self.rows)
            .map_err(|e| invalid("Invalid level rows", e))?;

        let mut flags = LevelFlags::empty();
        flags.set(LevelFlags::SOKOBAN, self.sokoban);
        flags.set(LevelFlags::BLACK_MARKET, self.black_market);
        builder = builder.flags(flags);

        for room in &self.rooms {
            builder = builder
                .room(room.kind, room.from, room.to)
                .map_err(|e| invalid(format!("Invalid room {:?}", room.kind), e))?;
        }
        for trap in &self.traps {
            builder = if trap.known {
                builder.known_trap(trap.at, trap.kind)
            } else {
                builder.trap(trap.at, trap.kind)
            }
            .map_err(|e| invalid(format!("Invalid trap {}", trap.kind.name()), e))?;
        }
        for &at in &self.boulders {
            builder = builder
                .boulder(at)
                .map_err(|e| invalid("Invalid boulder", e))?;
        }
        for &at in &self.items {
            builder = builder
                .item(at)
                .map_err(|e| invalid("Invalid item", e))?;
        }
        for monster in &self.monsters {
            builder = builder
                .monster(monster.build())
                .map_err(|e| invalid(format!("Invalid monster {}", monster.name), e))?;
        }
        if let Some(start) = self.start {
            builder = builder
                .start(start)
                .map_err(|e| invalid("Invalid start", e))?;
        }
        Ok(builder)
    }

    /// Fresh game state on this level, with the actor at the start square.
    pub fn into_state(&self, seed: u64) -> LoadResult<GameState> {
        let state = self
            .builder()?
            .into_state(seed, self.actor.build())
            .map_err(|e| invalid("Invalid level", e))?;
        tracing::debug!(
            width = state.level.dimensions().width,
            height = state.level.dimensions().height,
            monsters = self.monsters.len(),
            start = %state.actor.position,
            "level loaded"
        );
        Ok(state)
    }
}

fn invalid(what: impl std::fmt::Display, error: LevelError) -> anyhow::Error {
    tracing::warn!(code = error.error_code(), "{}: {}", what, error);
    anyhow::anyhow!("{}: {}", what, error)
}

/// Loader for level data from RON files.
pub struct LevelLoader;

impl LevelLoader {
    pub fn load(path: &Path) -> LoadResult<LevelSpec> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<LevelSpec> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse level RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const CLOSET: &str = r#"(
        rows: [
            "-----",
            "|@.0|",
            "|..+|",
            "-----",
        ],
        rooms: [(kind: Shop, from: (x: 1, y: 1), to: (x: 3, y: 2))],
        traps: [(at: (x: 2, y: 2), kind: BearTrap, known: true)],
        monsters: [
            (id: 7, name: "kitten", at: (x: 1, y: 2), attitude: Some(Tame)),
        ],
        actor: (capabilities: "FLYING", hp: Some(4)),
    )"#;

    #[test]
    fn parses_every_table() {
        let spec = LevelLoader::parse(CLOSET).unwrap();
        let state = spec.into_state(3).unwrap();

        assert_eq!(state.actor.position, Position::new(1, 1));
        assert!(state.actor.can(Capabilities::FLYING));
        assert_eq!(state.actor.hp, 4);
        assert!(state.level.has_boulder(Position::new(3, 1)));
        assert!(state.level.is_closed_door(Position::new(3, 2)));
        assert_eq!(
            state.level.tile(Position::new(2, 2)).and_then(|tile| tile.known_trap()),
            Some(TrapKind::BearTrap)
        );
        assert!(state.level.in_room_of(Position::new(2, 1), RoomKind::Shop));
        assert!(
            state
                .level
                .monster(MonsterId(7))
                .is_some_and(|kitten| kitten.is_tame())
        );
    }

    #[test]
    fn placements_outside_the_rows_are_rejected() {
        let spec = LevelLoader::parse(r#"(rows: ["@.."], boulders: [(x: 5, y: 0)])"#).unwrap();
        let error = spec.into_state(1).unwrap_err();
        assert!(error.to_string().contains("Invalid boulder"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(rows: ["@.", ".."], sokoban: true)"#).unwrap();
        let state = LevelLoader::load(file.path()).unwrap().into_state(0).unwrap();
        assert!(state.level.is_sokoban());
    }
}
