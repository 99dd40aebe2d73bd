//! Delver headless client.
//!
//! Loads a level from the data directory, plays one movement command and
//! prints a JSON summary of what happened.
//!
//! ```bash
//! delver explore
//! DELVER_LEVEL=closet delver travel 12 4
//! delver run l --mode follow
//! delver walk "llljjh"
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use delver_client::{ClientConfig, Command, SessionBuilder, delta_for_key, parse_keys, setup_logging};
use delver_core::{Position, RunMode};

/// Headless front end for the delver movement kernel
#[derive(Parser)]
#[command(name = "delver")]
#[command(about = "Play movement commands against a delver level", long_about = None)]
#[command(version)]
struct Cli {
    /// Level name under the data directory's `levels/`
    #[arg(long)]
    level: Option<String>,

    /// Game seed
    #[arg(long)]
    seed: Option<u64>,

    /// Turn budget for multi-turn commands
    #[arg(long)]
    max_turns: Option<u32>,

    /// Answer yes to confirmation prompts
    #[arg(long)]
    yes: bool,

    /// Draw the remembered map to stderr while moving
    #[arg(long)]
    show_map: bool,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Autoexplore until nothing reachable is left
    Explore,

    /// Travel to a square
    Travel { x: i32, y: i32 },

    /// Run in a direction given as a vi key (h j k l y u b n)
    Run {
        direction: char,
        #[arg(long, value_enum, default_value_t = RunArg::Rush)]
        mode: RunArg,
    },

    /// Take single steps, one vi key each; `<` and `>` climb
    Walk { keys: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum RunArg {
    Rush,
    Go,
    Follow,
}

impl From<RunArg> for RunMode {
    fn from(arg: RunArg) -> Self {
        match arg {
            RunArg::Rush => RunMode::Rush,
            RunArg::Go => RunMode::Go,
            RunArg::Follow => RunMode::Follow,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(level) = cli.level {
        config.level = level;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(turns) = cli.max_turns {
        config.max_turns = turns.max(1);
    }
    config.assume_yes |= cli.yes;
    config.show_map |= cli.show_map;

    let _guard = setup_logging(&config.session_id)?;

    let command = match cli.command {
        Action::Explore => Command::Explore,
        Action::Travel { x, y } => Command::Travel(Position::new(x, y)),
        Action::Run { direction, mode } => {
            let delta = delta_for_key(direction)
                .ok_or_else(|| anyhow::anyhow!("Unknown direction key '{direction}'"))?;
            Command::Run {
                delta,
                mode: mode.into(),
            }
        }
        Action::Walk { keys } => Command::Walk(parse_keys(&keys)?),
    };

    let mut session = SessionBuilder::new().client_config(config).build()?;
    let summary = session.play(&command)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
