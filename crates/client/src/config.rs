//! Client runtime settings read from the environment.
use std::env;
use std::path::PathBuf;

/// Settings for one headless session.
///
/// Game rules live in `config.toml` inside the data directory; these only
/// decide what to load and how the session is reported.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub level: String,
    /// Explicit config file; overrides `data_dir/config.toml`.
    pub config_path: Option<PathBuf>,
    pub seed: u64,
    /// Hard stop for multi-turn commands.
    pub max_turns: u32,
    /// Answer yes to every confirmation prompt.
    pub assume_yes: bool,
    /// Print the remembered map to stderr whenever a frame should be shown.
    pub show_map: bool,
    pub session_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            level: "closet".to_string(),
            config_path: None,
            seed: 0,
            max_turns: 500,
            assume_yes: false,
            show_map: false,
            session_id: None,
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DELVER_DATA_DIR` - Directory holding `config.toml` and `levels/` (default: `data`)
    /// - `DELVER_LEVEL` - Level name under `levels/` (default: `closet`)
    /// - `DELVER_CONFIG` - Explicit game config file
    /// - `DELVER_SEED` - Game seed (default: 0)
    /// - `DELVER_MAX_TURNS` - Turn budget for multi-turn commands (default: 500)
    /// - `DELVER_ASSUME_YES` - Answer prompts with yes (default: false)
    /// - `DELVER_SHOW_MAP` - Draw the map while moving (default: false)
    /// - `DELVER_SESSION_ID` - Log directory name (default: timestamp)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("DELVER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(level) = env::var("DELVER_LEVEL") {
            config.level = level;
        }
        config.config_path = env::var_os("DELVER_CONFIG").map(PathBuf::from);
        if let Some(seed) = read_env::<u64>("DELVER_SEED") {
            config.seed = seed;
        }
        if let Some(turns) = read_env::<u32>("DELVER_MAX_TURNS") {
            config.max_turns = turns.max(1);
        }
        if let Some(yes) = read_env::<bool>("DELVER_ASSUME_YES") {
            config.assume_yes = yes;
        }
        if let Some(show) = read_env::<bool>("DELVER_SHOW_MAP") {
            config.show_map = show;
        }
        config.session_id = env::var("DELVER_SESSION_ID").ok();

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
