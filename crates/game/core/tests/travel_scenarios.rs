//! End-to-end movement scenarios driven through the public engine API.

use std::sync::Mutex;

use delver_core::env::Prompter;
use delver_core::motion::{Mode, MoveContext, TravelRequest, check_step, hazard_vetoes, plan_travel};
use delver_core::state::{Glyph, LevelBuilder, RememberedObject, TrapKind};
use delver_core::{
    Actor, Delta, Env, GameConfig, GameEngine, GameState, Position, RunMode, TurnOutcome,
};

fn state_from(builder: LevelBuilder, seed: u64) -> GameState {
    builder
        .into_state(seed, Actor::new(Position::ORIGIN))
        .expect("level should have a start")
}

fn rows(rows: &[&str]) -> LevelBuilder {
    LevelBuilder::from_rows(rows).expect("rows should parse")
}

/// Records every question and answers with a fixed reply.
struct Recording {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl Recording {
    fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    fn questions(&self) -> Vec<String> {
        self.asked.lock().expect("prompt log poisoned").clone()
    }
}

impl Prompter for Recording {
    fn confirm(&self, question: &str) -> bool {
        self.asked
            .lock()
            .expect("prompt log poisoned")
            .push(question.to_string());
        self.answer
    }
}

/// Travel down a straight corridor: one step south per call, arriving on
/// the third.
#[test]
fn straight_corridor_travel_arrives_in_three_steps() {
    let builder = rows(&[
        "          ",
        "          ",
        "          ",
        "          ",
        "          ",
        "     #    ",
        "     #    ",
        "     #    ",
        "     #    ",
        "          ",
    ])
    .start(Position::new(5, 5))
    .expect("start in bounds");
    let mut state = state_from(builder, 21);
    let config = GameConfig::default();
    let env = Env::new(&config);
    let target = Position::new(5, 8);

    let mut engine = GameEngine::new(&mut state);
    engine.refresh_view(env);

    let mut outcomes = vec![engine.travel(env, target).expect("target is on the level")];
    while engine.is_running() {
        outcomes.push(engine.resume(env).expect("travel is active"));
    }

    let expected: Vec<TurnOutcome> = (5..8)
        .map(|y| TurnOutcome::Moved {
            from: Position::new(5, y),
            to: Position::new(5, y + 1),
        })
        .collect();
    assert_eq!(outcomes, expected);
    assert_eq!(engine.state().actor.position, target);
    assert_eq!(engine.state().moves.0, 3);
}

/// A walled-in target has no exact route, and asking costs nothing.
#[test]
fn enclosed_target_has_no_exact_route() {
    let builder = rows(&[
        "@.......",
        "....---.",
        "....|.|.",
        "....---.",
    ]);
    let state = state_from(builder, 5);
    let config = GameConfig::default();
    let ctx = MoveContext::new(&state, &config);
    let request = TravelRequest::new(Position::new(5, 2), &config);

    assert_eq!(plan_travel(&ctx, &request), None);
    assert_eq!(state.moves.0, 0);
}

/// A remembered item ten squares away behind a closed door loses to a room
/// square three squares away.
#[test]
fn autoexplore_prefers_the_nearby_room_square() {
    let builder = rows(&[
        "-------------------",
        "|.....@...+......*|",
        "-------------------",
    ]);
    let mut state = state_from(builder, 8);
    let positions: Vec<Position> = state.level.positions().collect();
    for at in positions {
        let Some(tile) = state.level.tile_mut(at) else {
            continue;
        };
        if at.y == 1 && (at.x == 1 || at.x == 2) {
            continue;
        }
        tile.memory.glyph = Glyph::of(tile.terrain, tile.door);
        tile.memory.seen = true;
        tile.memory.in_room = at.y == 1;
        tile.memory.stepped = at.y == 1 && (4..=9).contains(&at.x);
    }
    if let Some(tile) = state.level.tile_mut(Position::new(17, 1)) {
        tile.memory.object = Some(RememberedObject::Item);
    }

    let config = GameConfig::default();
    let mut engine = GameEngine::new(&mut state);
    let outcome = engine
        .autoexplore(Env::new(&config))
        .expect("autoexplore takes no arguments");

    assert_eq!(
        outcome,
        TurnOutcome::Moved {
            from: Position::new(6, 1),
            to: Position::new(5, 1),
        }
    );
}

/// Rushing east into a corridor that bends south turns exactly once and
/// keeps going.
#[test]
fn rush_follows_a_single_bend() {
    let builder = rows(&["    ", "### ", "  # ", "  # "])
        .start(Position::new(0, 1))
        .expect("start in bounds");
    let mut state = state_from(builder, 3);
    let config = GameConfig::default();
    let env = Env::new(&config);

    let mut engine = GameEngine::new(&mut state);
    engine
        .run(env, Delta::new(1, 0), RunMode::Rush, false)
        .expect("rush is a run mode");

    let mut headings = vec![engine.state().run.heading];
    while engine.is_running() {
        engine.resume(env).expect("run is active");
        if engine.is_running() {
            headings.push(engine.state().run.heading);
        }
    }
    headings.dedup();

    assert_eq!(headings, vec![Delta::new(1, 0), Delta::new(0, 1)]);
    assert_eq!(engine.state().actor.position, Position::new(2, 3));
}

/// Whatever the hazard check flags, a plain step either refuses or asks first.
#[test]
fn hazards_are_refused_or_confirmed() {
    let builder = rows(&["@.."])
        .known_trap(Position::new(1, 0), TrapKind::BearTrap)
        .expect("trap in bounds");
    let mut state = state_from(builder, 13);
    let config = GameConfig::default();

    let travelling = MoveContext::new(&state, &config).with_run(RunMode::Travel);
    assert!(hazard_vetoes(&travelling, Position::ORIGIN, Delta::new(1, 0)));
    let walking = MoveContext::new(&state, &config);
    assert!(!hazard_vetoes(&walking, Position::ORIGIN, Delta::new(1, 0)));
    assert!(check_step(&walking, Position::ORIGIN, Delta::new(1, 0), Mode::Probe).is_allowed());

    let decline = Recording::new(false);
    let env = Env::new(&config).with_prompter(&decline);
    let mut engine = GameEngine::new(&mut state);
    let outcome = engine.step(env, Delta::new(1, 0)).expect("adjacent step");

    assert_eq!(outcome, TurnOutcome::Free);
    assert_eq!(decline.questions(), vec!["Really step into that bear trap?".to_string()]);
    assert_eq!(engine.state().actor.position, Position::ORIGIN);
}

/// Planning twice from the same state gives the same answer and touches
/// nothing, on a level large enough to exercise every layer.
#[test]
fn planning_is_repeatable_and_terminates() {
    let mut map = vec![".".repeat(60); 20];
    map[0].replace_range(0..1, "@");
    for row in map.iter_mut().skip(2).take(16) {
        row.replace_range(30..31, "|");
    }
    let builder = LevelBuilder::from_rows(&map).expect("rows should parse");
    let mut state = state_from(builder, 99);
    let positions: Vec<Position> = state.level.positions().collect();
    for at in positions {
        if let Some(tile) = state.level.tile_mut(at) {
            tile.memory.glyph = Glyph::of(tile.terrain, tile.door);
            tile.memory.seen = true;
        }
    }
    let before = state.clone();
    let config = GameConfig::default();
    let ctx = MoveContext::new(&state, &config);

    for target in [Position::new(59, 19), Position::new(31, 10), Position::new(0, 19)] {
        let request = TravelRequest::new(target, &config);
        let first = plan_travel(&ctx, &request);
        assert_eq!(first, plan_travel(&ctx, &request));
        assert!(first.is_some(), "open level should reach {target}");
    }
    assert_eq!(state, before);
}
