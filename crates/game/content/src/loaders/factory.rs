//! Content factory for loading levels and configuration from a data directory.

use std::path::{Path, PathBuf};

use delver_core::GameConfig;

use crate::loaders::{ConfigLoader, LevelLoader, LevelSpec, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── levels/
///     ├── closet.ron
///     └── sokoban.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or the defaults when the
    /// directory has none.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load a level from `levels/{level_name}.ron`.
    pub fn load_level(&self, level_name: &str) -> LoadResult<LevelSpec> {
        let path = self.level_path(level_name);
        LevelLoader::load(&path)
    }

    pub fn level_path(&self, level_name: &str) -> PathBuf {
        self.data_dir
            .join("levels")
            .join(format!("{}.ron", level_name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn levels_live_under_levels() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("levels")).unwrap();
        std::fs::write(
            dir.path().join("levels").join("hall.ron"),
            r#"(rows: ["@..."])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let state = factory.load_level("hall").unwrap().into_state(1).unwrap();
        assert_eq!(state.level.dimensions().width, 4);
        assert!(factory.load_level("missing").is_err());
    }
}
