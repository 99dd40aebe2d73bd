//! Deterministic movement kernel for a grid roguelike.
//!
//! `delver-core` decides whether a single step is legal, plans travel and
//! autoexplore paths over what the player remembers, and drives runs turn by
//! turn. All state mutation flows through [`engine::GameEngine`]; combat,
//! vision, digging and prompts are reached through the collaborator traits in
//! [`env`].
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod motion;
pub mod state;

pub use config::GameConfig;
pub use engine::{CommandError, GameEngine, TurnOutcome};
pub use env::{
    AlwaysNo, AlwaysYes, DoorAttempt, Encounters, Env, Excavator, LineOfSight, Passive, PcgRng,
    Prompter, RngOracle, Tunneling, Vision,
};
pub use error::{ErrorSeverity, GameError};
pub use motion::{ExplorationReport, Mode, MoveContext, PlannedStep, ScanOutcome, Verdict};
#[cfg(feature = "serde")]
pub use state::compute_state_root;
pub use state::{
    Actor, Delta, Direction, GameState, Level, LevelBuilder, LevelError, Monster, MonsterId,
    Position, RunDisplay, RunMode, RunState, Tick,
};
