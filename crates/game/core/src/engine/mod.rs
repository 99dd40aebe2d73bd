//! Movement commands and their continuation.
//!
//! The [`GameEngine`] is the only entry point that mutates [`GameState`] in
//! response to player input. Each command validates its arguments, primes the
//! run state, then hands the first step to the driver. Multi-turn commands
//! (runs, counted moves, travel, autoexplore) leave the run state active;
//! callers keep calling [`GameEngine::resume`] until it goes idle.

mod driver;
mod errors;

pub use driver::TurnOutcome;
pub use errors::CommandError;

use crate::config::GameConfig;
use crate::env::Env;
use crate::state::{Delta, GameState, Position, RunDisplay, RunMode, RunState};

/// Movement engine over a borrowed game state.
///
/// Holding the state by `&mut` keeps every change on one path: the engine
/// borrows, applies one turn, and releases.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// One step along `delta`; a vertical delta climbs stairs or ladders.
    pub fn step(&mut self, env: Env<'_>, delta: Delta) -> Result<TurnOutcome, CommandError> {
        self.single(env, delta, |_| {})
    }

    /// Step without picking anything up; bumping into a monster does not
    /// attack it.
    pub fn step_without_pickup(
        &mut self,
        env: Env<'_>,
        delta: Delta,
    ) -> Result<TurnOutcome, CommandError> {
        self.single(env, delta, |run| run.no_pickup = true)
    }

    /// Attack whatever is on the adjacent square, even if nothing is seen.
    pub fn fight(&mut self, env: Env<'_>, delta: Delta) -> Result<TurnOutcome, CommandError> {
        self.single(env, delta, |run| run.force_fight = true)
    }

    /// Repeat the same step `count` times unless something interrupts.
    pub fn step_repeated(
        &mut self,
        env: Env<'_>,
        delta: Delta,
        count: u32,
    ) -> Result<TurnOutcome, CommandError> {
        validate_step(delta)?;
        if count == 0 {
            return Err(CommandError::ZeroRepeat);
        }
        self.state.run.begin(RunMode::Off, delta, count);
        Ok(self.drive(env, delta))
    }

    /// Start running along `delta` in one of the run modes.
    pub fn run(
        &mut self,
        env: Env<'_>,
        delta: Delta,
        mode: RunMode,
        no_pickup: bool,
    ) -> Result<TurnOutcome, CommandError> {
        validate_step(delta)?;
        if delta.is_vertical() || matches!(mode, RunMode::Off | RunMode::Travel) {
            return Err(CommandError::InvalidRun { mode });
        }
        self.state.run.begin(mode, delta, RunState::ENDLESS);
        self.state.run.no_pickup = no_pickup;
        Ok(self.drive(env, delta))
    }

    /// Walk toward `target` along the shortest known path.
    pub fn travel(&mut self, env: Env<'_>, target: Position) -> Result<TurnOutcome, CommandError> {
        if !self.state.level.contains(target) {
            return Err(CommandError::TargetOutOfBounds { target });
        }
        self.begin_travel(target, false);
        Ok(self.drive(env, Delta::ZERO))
    }

    /// Travel to the most promising unexplored square, repeatedly.
    pub fn autoexplore(&mut self, env: Env<'_>) -> Result<TurnOutcome, CommandError> {
        let here = self.state.actor.position;
        self.begin_travel(here, true);
        Ok(self.drive(env, Delta::ZERO))
    }

    /// Next turn of the active sequence.
    pub fn resume(&mut self, env: Env<'_>) -> Result<TurnOutcome, CommandError> {
        if !self.state.run.is_active() {
            return Err(CommandError::Idle);
        }
        let heading = self.state.run.heading;
        Ok(self.drive(env, heading))
    }

    pub fn is_running(&self) -> bool {
        self.state.run.is_active()
    }

    /// Whether a front end should redraw after the latest turn.
    pub fn should_present(&self, config: &GameConfig) -> bool {
        if !self.is_running() {
            return true;
        }
        match config.run_display {
            RunDisplay::Teleport => false,
            RunDisplay::Leap => self.state.moves.0 % GameConfig::LEAP_INTERVAL == 0,
            RunDisplay::Step | RunDisplay::Crawl => true,
        }
    }

    /// Refresh the actor's memory of the surroundings without moving.
    pub fn refresh_view(&mut self, env: Env<'_>) {
        let here = self.state.actor.position;
        if let Some(tile) = self.state.level.tile_mut(here) {
            tile.memory.stepped = true;
        }
        env.vision().recompute(self.state, here, here);
    }

    fn single(
        &mut self,
        env: Env<'_>,
        delta: Delta,
        prime: impl FnOnce(&mut RunState),
    ) -> Result<TurnOutcome, CommandError> {
        validate_step(delta)?;
        self.state.run.begin(RunMode::Off, delta, 0);
        prime(&mut self.state.run);
        Ok(self.drive(env, delta))
    }

    fn begin_travel(&mut self, target: Position, autoexplore: bool) {
        let run = &mut self.state.run;
        run.begin(RunMode::Travel, Delta::ZERO, RunState::ENDLESS);
        run.travel = true;
        run.first_step = true;
        run.autoexplore = autoexplore;
        run.target = Some(target);
        tracing::debug!(%target, autoexplore, "travel started");
    }

    /// One driver turn along `delta` under the current run state.
    pub fn drive(&mut self, env: Env<'_>, delta: Delta) -> TurnOutcome {
        driver::drive(self.state, env, delta)
    }
}

fn validate_step(delta: Delta) -> Result<(), CommandError> {
    let planar = delta.dz == 0
        && !delta.is_zero()
        && (-1..=1).contains(&delta.dx)
        && (-1..=1).contains(&delta.dy);
    let vertical = delta.is_vertical() && (delta.dz == 1 || delta.dz == -1);
    if planar || vertical {
        Ok(())
    } else {
        Err(CommandError::InvalidStep { delta })
    }
}
