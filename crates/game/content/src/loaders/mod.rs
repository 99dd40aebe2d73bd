//! Content loaders for reading game data from files.
//!
//! Each loader parses one file format into delver-core types. Errors carry
//! the offending path so the binary can report them as-is.

pub mod config;
pub mod factory;
pub mod level;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use level::{ActorSpec, LevelLoader, LevelSpec, MonsterSpec, RoomSpec, TrapSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
