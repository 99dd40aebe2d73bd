//! One headless play session.

use anyhow::{Context, Result};
use delver_content::{ConfigLoader, ContentFactory};
use delver_core::motion::exploration_census;
use delver_core::{
    AlwaysNo, AlwaysYes, Delta, Env, GameConfig, GameEngine, GameState, Position, Prompter,
    RunMode, TurnOutcome, compute_state_root,
};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::render::render_memory;

/// A movement command as typed on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Autoexplore until nothing reachable is left.
    Explore,
    Travel(Position),
    Run { delta: Delta, mode: RunMode },
    /// Single steps, one per key.
    Walk(Vec<Delta>),
}

impl Command {
    fn label(&self) -> String {
        match self {
            Command::Explore => "explore".to_string(),
            Command::Travel(target) => format!("travel {target}"),
            Command::Run { delta, mode } => {
                let mode: &'static str = (*mode).into();
                format!("run {mode} {delta}")
            }
            Command::Walk(path) => format!("walk {} steps", path.len()),
        }
    }
}

/// What a command did, printed as JSON by the binary.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub level: String,
    pub seed: u64,
    pub command: String,
    /// Turns the command spent.
    pub turns: u64,
    pub start: Position,
    pub position: Position,
    /// Every square the actor stepped onto, in order.
    pub path: Vec<Position>,
    pub messages: Vec<String>,
    /// True when the turn budget cut the command short.
    pub truncated: bool,
    pub exploration: &'static str,
    pub state_root: String,
}

/// Builder for a [`Session`].
///
/// Only the client configuration is required; the game config and state are
/// loaded from its data directory unless given explicitly.
#[derive(Default)]
pub struct SessionBuilder {
    client: Option<ClientConfig>,
    game: Option<GameConfig>,
    state: Option<GameState>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client configuration (required).
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client = Some(config);
        self
    }

    /// Use these rules instead of the data directory's `config.toml`.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game = Some(config);
        self
    }

    /// Start from this state instead of loading the configured level.
    pub fn state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the client configuration is missing, or if the
    /// config file or level cannot be loaded.
    pub fn build(self) -> Result<Session> {
        let client = self
            .client
            .context("Client configuration is required. Use .client_config() to set it.")?;
        let factory = ContentFactory::new(&client.data_dir);

        let game = match (self.game, &client.config_path) {
            (Some(game), _) => game,
            (None, Some(path)) => ConfigLoader::load(path)?,
            (None, None) => factory.load_config()?,
        };

        let state = match self.state {
            Some(state) => state,
            None => factory
                .load_level(&client.level)?
                .into_state(client.seed)
                .with_context(|| format!("Failed to build level '{}'", client.level))?,
        };

        tracing::info!(
            level = %client.level,
            seed = state.seed,
            start = %state.actor.position,
            "session ready"
        );

        Ok(Session {
            client,
            game,
            state,
        })
    }
}

/// Owns a game state and plays commands against it.
pub struct Session {
    client: ClientConfig,
    game: GameConfig,
    state: GameState,
}

impl Session {
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.game
    }

    /// Plays `command` to completion or until the turn budget is used up.
    pub fn play(&mut self, command: &Command) -> Result<RunSummary> {
        let prompter: &dyn Prompter = if self.client.assume_yes {
            &AlwaysYes
        } else {
            &AlwaysNo
        };
        let env = Env::new(&self.game).with_prompter(prompter);
        let budget = u64::from(self.client.max_turns);
        let start = self.state.actor.position;
        let first_move = self.state.moves.0;

        let mut engine = GameEngine::new(&mut self.state);
        engine.refresh_view(env);
        let mut tracker = Tracker {
            path: Vec::new(),
            show_map: self.client.show_map,
            game: &self.game,
        };

        let mut truncated = false;
        match command {
            Command::Explore => loop {
                let mark = spent(&engine, first_move);
                if mark >= budget {
                    truncated = true;
                    break;
                }
                let outcome = engine.autoexplore(env)?;
                tracker.record(&engine, outcome);
                if !outcome.moved() && !engine.is_running() {
                    break;
                }
                truncated = follow(&mut engine, env, &mut tracker, first_move, budget)?;
                if truncated || spent(&engine, first_move) == mark {
                    break;
                }
            },
            Command::Travel(target) => {
                let outcome = engine.travel(env, *target)?;
                tracker.record(&engine, outcome);
                truncated = follow(&mut engine, env, &mut tracker, first_move, budget)?;
            }
            Command::Run { delta, mode } => {
                let outcome = engine.run(env, *delta, *mode, false)?;
                tracker.record(&engine, outcome);
                truncated = follow(&mut engine, env, &mut tracker, first_move, budget)?;
            }
            Command::Walk(path) => {
                for (walked, &delta) in path.iter().enumerate() {
                    if spent(&engine, first_move) >= budget {
                        tracing::info!(budget, remaining = path.len() - walked, "turn budget exhausted");
                        truncated = true;
                        break;
                    }
                    let outcome = engine.step(env, delta)?;
                    tracker.record(&engine, outcome);
                }
            }
        }

        if engine.is_running() {
            self.state.run.cancel();
        }

        let turns = self.state.moves.0 - first_move;
        let exploration = exploration_census(&self.state.level, &self.state.actor).message();
        tracing::info!(
            command = %command.label(),
            turns,
            position = %self.state.actor.position,
            "command finished"
        );

        Ok(RunSummary {
            level: self.client.level.clone(),
            seed: self.state.seed,
            command: command.label(),
            turns,
            start,
            position: self.state.actor.position,
            path: tracker.path,
            messages: self.state.messages.drain(),
            truncated,
            exploration,
            state_root: hex::encode(compute_state_root(&self.state)),
        })
    }
}

fn spent(engine: &GameEngine<'_>, first_move: u64) -> u64 {
    engine.state().moves.0 - first_move
}

/// Resumes the active sequence until it stops or the budget runs out.
///
/// Returns true when the budget cut the sequence short.
fn follow(
    engine: &mut GameEngine<'_>,
    env: Env<'_>,
    tracker: &mut Tracker<'_>,
    first_move: u64,
    budget: u64,
) -> Result<bool> {
    while engine.is_running() {
        if spent(engine, first_move) >= budget {
            tracing::info!(budget, "turn budget exhausted");
            return Ok(true);
        }
        let outcome = engine.resume(env)?;
        tracker.record(engine, outcome);
        if outcome == TurnOutcome::Free && engine.is_running() {
            tracing::warn!(at = %engine.state().actor.position, "sequence stalled on a free turn");
            break;
        }
    }
    Ok(false)
}

struct Tracker<'a> {
    path: Vec<Position>,
    show_map: bool,
    game: &'a GameConfig,
}

impl Tracker<'_> {
    fn record(&mut self, engine: &GameEngine<'_>, outcome: TurnOutcome) {
        if let TurnOutcome::Moved { to, .. } = outcome {
            self.path.push(to);
        }
        if self.show_map && engine.should_present(self.game) {
            eprintln!("{}", render_memory(engine.state()));
        }
    }
}

#[cfg(test)]
mod tests {
    use delver_core::state::LevelBuilder;
    use delver_core::Actor;

    use super::*;

    fn session(rows: &[&str]) -> Session {
        let state = LevelBuilder::from_rows(rows)
            .unwrap()
            .into_state(4, Actor::new(Position::ORIGIN))
            .unwrap();
        SessionBuilder::new()
            .client_config(ClientConfig::default())
            .game_config(GameConfig::default())
            .state(state)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_requires_client_config() {
        let error = SessionBuilder::new().build().err().unwrap();
        assert!(error.to_string().contains("Client configuration is required"));
    }

    #[test]
    fn walk_records_each_square() {
        let mut session = session(&["@...", "...."]);
        let summary = session
            .play(&Command::Walk(vec![Delta::new(1, 0), Delta::new(1, 1)]))
            .unwrap();

        assert_eq!(summary.path, vec![Position::new(1, 0), Position::new(2, 1)]);
        assert_eq!(summary.turns, 2);
        assert!(!summary.truncated);
        assert_eq!(summary.state_root.len(), 64);
    }

    #[test]
    fn budget_cuts_runs_short() {
        let mut session = session(&["@........."]);
        session.client.max_turns = 3;
        let summary = session
            .play(&Command::Run {
                delta: Delta::new(1, 0),
                mode: RunMode::Rush,
            })
            .unwrap();

        assert_eq!(summary.turns, 3);
        assert_eq!(summary.position, Position::new(3, 0));
        assert!(summary.truncated);
        assert!(!session.state().run.is_active());
    }

    #[test]
    fn travel_reaches_a_seen_target() {
        let mut session = session(&["@....", "....."]);
        let summary = session
            .play(&Command::Travel(Position::new(4, 1)))
            .unwrap();

        assert_eq!(summary.position, Position::new(4, 1));
        assert_eq!(summary.path.last(), Some(&Position::new(4, 1)));
    }
}
