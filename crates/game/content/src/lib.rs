//! Data-driven level and configuration files for delver.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Level layouts with rooms, traps, boulders, items and monsters (RON)
//! - Game configuration (TOML)
//!
//! All loaders produce delver-core types directly; nothing here takes part in
//! movement decisions.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorSpec, ConfigLoader, ContentFactory, LevelLoader, LevelSpec, LoadResult, MonsterSpec,
    RoomSpec, TrapSpec,
};
