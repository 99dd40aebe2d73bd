//! Per-turn movement controller.
//!
//! [`drive`] takes one intended step and carries it through every rule that
//! can stop, redirect or replace it, in a fixed order. Each early exit says
//! whether the attempt used up the actor's turn.

use crate::env::{DoorAttempt, Env, compute_seed, roll};
use crate::motion::{
    ExplorationReport, MoveContext, Mode, PlannedStep, ScanOutcome, SideEffect, StepKind, Verdict,
    bad_rock, boulder, check_step, exploration_census, look_around, next_explore_step,
    next_travel_step,
};
use crate::state::{
    Capabilities, Delta, Direction, Encumbrance, EntrapmentKind, GameState, Glyph,
    Position, RunMode, StatusFlags, TerrainKind,
};

/// What one driver invocation did with the actor's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnOutcome {
    Moved { from: Position, to: Position },
    /// The turn passed without the actor changing squares.
    Spent,
    /// Nothing happened; the turn is still available.
    Free,
}

impl TurnOutcome {
    pub fn spent_turn(&self) -> bool {
        !matches!(self, TurnOutcome::Free)
    }

    pub fn moved(&self) -> bool {
        matches!(self, TurnOutcome::Moved { .. })
    }
}

fn roll_seed(state: &GameState, context: u32) -> u64 {
    compute_seed(state.seed, state.moves.0, context)
}

/// Runs one turn of movement along `delta` and applies continuation rules.
pub(crate) fn drive(state: &mut GameState, env: Env<'_>, delta: Delta) -> TurnOutcome {
    let outcome = attempt(state, env, delta);
    if outcome.spent_turn() {
        state.moves = state.moves.next();
        continue_run(state, env, outcome);
    }
    if !state.run.is_active() {
        // Arrival keeps the travel mode for its final step only.
        state.run.mode = RunMode::Off;
    }
    tracing::trace!(?outcome, moves = %state.moves, "turn resolved");
    outcome
}

/// Repeat bookkeeping and the post-step scan.
fn continue_run(state: &mut GameState, env: Env<'_>, outcome: TurnOutcome) {
    if !state.run.is_active() || !state.run.advance() || !outcome.moved() {
        return;
    }
    match look_around(&state.level, &state.actor, &state.run, env.config()) {
        ScanOutcome::Continue => {}
        ScanOutcome::Stop => state.run.cancel(),
        ScanOutcome::Turn { heading, last_turn } => {
            state.run.heading = heading;
            state.run.last_turn = last_turn;
        }
    }
}

fn attempt(state: &mut GameState, env: Env<'_>, delta: Delta) -> TurnOutcome {
    if delta.is_vertical() {
        state.run.cancel();
        return if env.encounters().change_level(state, delta.dz) {
            TurnOutcome::Spent
        } else {
            TurnOutcome::Free
        };
    }

    if state.actor.is(StatusFlags::HELPLESS) {
        tracing::debug!("helpless actor cannot move");
        state.run.cancel();
        return TurnOutcome::Free;
    }

    if state
        .actor
        .status
        .intersects(StatusFlags::STUNNED | StatusFlags::CONFUSED)
    {
        let refused = if state.run.travel {
            Some(if state.run.autoexplore { "explore" } else { "travel" })
        } else if state.run.mode != RunMode::Off {
            Some("run")
        } else {
            None
        };
        if let Some(what) = refused {
            state.message(format!("Your head is spinning too badly to {what}."));
            state.run.cancel();
            return TurnOutcome::Free;
        }
    }

    let mut delta = delta;
    if state.run.travel {
        let Some(step) = plan_step(state, env) else {
            state.run.cancel();
            return TurnOutcome::Free;
        };
        delta = step.delta;
        state.run.heading = delta;
        match step.kind {
            StepKind::EnRoute => {}
            StepKind::Adjacent => state.run.cancel(),
            StepKind::Arrival => {
                state.run.cancel();
                state.run.mode = RunMode::Travel;
            }
        }
    }

    let actor = &state.actor;
    if actor.encumbrance >= Encumbrance::Strained && actor.is_winded() {
        state.message("You don't have enough stamina to move.");
        state.run.cancel();
        return TurnOutcome::Spent;
    }
    if actor.encumbrance >= Encumbrance::Overloaded {
        state.message("You collapse under your load.");
        state.run.cancel();
        return TurnOutcome::Spent;
    }

    let intended = state.actor.position.offset(delta);
    if stumbles(state, env) {
        match redirect(state, env) {
            Some(random) => delta = random,
            None => {
                state.run.cancel();
                return TurnOutcome::Spent;
            }
        }
    }
    let dest = state.actor.position.offset(delta);
    let Some(tile) = state.level.tile(dest).copied() else {
        state.run.cancel();
        return TurnOutcome::Free;
    };

    let mut was_running = false;
    let feared_liquid = state.actor.is(StatusFlags::BLIND)
        && !state.actor.ignores_liquid()
        && matches!(tile.terrain, TerrainKind::Pool | TerrainKind::Lava)
        && tile.memory.seen;
    if tile.known_trap().is_some() || feared_liquid {
        match state.run.mode {
            RunMode::Go | RunMode::Follow | RunMode::Travel => {
                if tile.known_trap().is_some() && state.run.is_exploring() {
                    state.message("A trap blocks your way.");
                }
                state.run.cancel();
                return TurnOutcome::Free;
            }
            RunMode::Rush => was_running = true,
            RunMode::Off => {}
        }
        state.run.cancel();
    }

    if let Some(outcome) = meet_monster(state, env, dest) {
        return outcome;
    }

    if state.run.force_fight {
        state.message("You attack thin air.");
        state.run.cancel();
        return TurnOutcome::Spent;
    }

    if state.actor.is(StatusFlags::ROOTED) {
        let place = if state.actor.can(Capabilities::LEVITATING) {
            "in place"
        } else {
            "to the ground"
        };
        state.message(format!("You are rooted {place}."));
        state.run.cancel();
        return TurnOutcome::Spent;
    }
    if try_escape_trap(state, env, dest, delta) {
        return TurnOutcome::Spent;
    }

    if env.config().confirm_traps && !confirm_trap(state, env, intended, was_running) {
        state.run.cancel();
        return TurnOutcome::Free;
    }

    let actor = &state.actor;
    let opens_doors = !(actor.passes_walls() || actor.can_ooze() || actor.chews_rock());
    if opens_doors && tile.terrain.is_door() && tile.door.is_closed() {
        return match env.encounters().open_door(state, dest) {
            DoorAttempt::Opened | DoorAttempt::Stuck => TurnOutcome::Spent,
            DoorAttempt::Locked => {
                state.run.cancel();
                TurnOutcome::Free
            }
        };
    }

    let origin = state.actor.position;
    let verdict = {
        let ctx = MoveContext::new(state, env.config());
        check_step(&ctx, origin, delta, Mode::Commit)
    };
    match verdict {
        Verdict::Allowed => {}
        Verdict::Blocked(blocker) => {
            if let Some(text) = blocker.message(state.run.is_exploring()) {
                state.message(text);
            }
            tracing::debug!(?blocker, %dest, "step refused");
            state.run.cancel();
            return TurnOutcome::Free;
        }
        Verdict::Contingent(SideEffect::Chew(at)) => {
            if env.excavator().chew(state, at) {
                return TurnOutcome::Spent;
            }
        }
        Verdict::Contingent(SideEffect::Dig { at, delta }) => {
            if env.excavator().dig(state, at, delta) {
                return TurnOutcome::Spent;
            }
        }
        Verdict::Contingent(SideEffect::PushBoulder { delta, .. }) => {
            if !boulder::push(state, delta).lets_actor_through() {
                return TurnOutcome::Free;
            }
        }
    }

    if let Some(liquid) = paranoid_stop(state, env, intended) {
        state.message(format!("You stop for the {liquid}!"));
        state.message("(Use m-direction to move there anyway.)");
        state.run.cancel();
        return TurnOutcome::Free;
    }

    let oozed = state.level.is_closed_door(dest) && state.actor.can_ooze();
    commit(state, env, origin, dest, delta);
    if oozed {
        state.message("You ooze under the door.");
    }
    TurnOutcome::Moved {
        from: origin,
        to: dest,
    }
}

/// Next travel or autoexplore step, or `None` when travel should end.
fn plan_step(state: &mut GameState, env: Env<'_>) -> Option<PlannedStep> {
    let config = env.config();
    let first_step = std::mem::take(&mut state.run.first_step);

    if state.run.autoexplore {
        let refusal = if state.actor.is(StatusFlags::BLIND) {
            Some("You can't see where you're going!")
        } else if state.level.is_sokoban() {
            Some("You somehow know the layout of this place without exploring.")
        } else if state.actor.is(StatusFlags::WEAK) {
            Some("You feel too weak from hunger to explore.")
        } else {
            None
        };
        if let Some(text) = refusal {
            state.message(text);
            return None;
        }
        state.run.target = Some(state.actor.position);
        let step = next_explore_step(&MoveContext::new(state, config), config);
        if step.is_none() {
            let report = exploration_census(&state.level, &state.actor);
            state.run.autoexplore = false;
            if let ExplorationReport::Partial { unreachable } = report {
                tracing::info!(unreachable, "exploration stopped short");
            }
            state.message(report.message());
        }
        return step;
    }

    let target = state.run.target?;
    next_travel_step(&MoveContext::new(state, config), target, first_step, config)
}

fn stumbles(state: &GameState, env: Env<'_>) -> bool {
    if state.actor.is(StatusFlags::STUNNED) {
        return true;
    }
    state.actor.is(StatusFlags::CONFUSED)
        && env.rng().one_in(
            roll_seed(state, roll::STUMBLE),
            crate::config::GameConfig::CONFUSION_STUMBLE_ONE_IN,
        )
}

/// Random direction the actor could step toward; `None` when every try failed.
///
/// Draws from the rotation order; four-directional actors only land on its
/// orthogonal entries.
fn redirect(state: &GameState, env: Env<'_>) -> Option<Delta> {
    let orthogonal_only = state.actor.orthogonal_only;
    let ctx = MoveContext::new(state, env.config());
    let origin = state.actor.position;
    (0..=env.config().confusion_retries).find_map(|attempt| {
        let seed = roll_seed(state, roll::REDIRECT.wrapping_add(attempt));
        let index = if orthogonal_only {
            env.rng().below(seed, 4) * 2
        } else {
            env.rng().below(seed, Direction::ALL.len() as u32)
        };
        let delta = Direction::ALL[index as usize].delta();
        check_step(&ctx, origin, delta, Mode::Probe)
            .is_allowed()
            .then_some(delta)
    })
}

/// Monster on the destination: bump, fight, or let the step go ahead.
fn meet_monster(state: &mut GameState, env: Env<'_>, dest: Position) -> Option<TurnOutcome> {
    let monster = state.level.monster_at(dest)?.clone();
    let blind = state.actor.is(StatusFlags::BLIND);

    if !monster.is_safe_pet() {
        let noticed = (!blind && monster.is_seen() && !monster.is_disguised())
            || monster.perception == crate::state::Perception::Sensed;
        if state.run.mode != RunMode::Off && noticed {
            if state.run.is_exploring() {
                state.message(format!("The {} blocks your way.", monster.name));
            }
            state.run.cancel();
            return Some(TurnOutcome::Free);
        }
    }

    if !monster.is_safe_pet() || state.run.force_fight {
        state.run.cancel();
    }

    if state.run.no_pickup && !state.run.travel && monster.is_spotted() {
        let text = if monster.is_disguised() {
            if let Some(mimic) = state.level.monster_mut(monster.id) {
                mimic.disguise = None;
            }
            format!("Wait!  That's a {}!", monster.name)
        } else if monster.is_peaceful() && !state.actor.is(StatusFlags::HALLUCINATING) {
            format!("Pardon me, {}.", monster.name)
        } else {
            format!("You move right into the {}.", monster.name)
        };
        state.message(text);
        return Some(TurnOutcome::Spent);
    }

    if (!monster.is_safe_pet() || state.run.force_fight)
        && env.encounters().attack(state, monster.id)
    {
        return Some(TurnOutcome::Spent);
    }
    None
}

/// One attempt to get loose; true when the actor is (or was) held this turn.
fn try_escape_trap(state: &mut GameState, env: Env<'_>, dest: Position, delta: Delta) -> bool {
    let Some(mut trap) = state.actor.entrapment else {
        return false;
    };
    let seed = roll_seed(state, roll::ESCAPE);
    match trap.kind {
        EntrapmentKind::Pit => {
            let boulder_here = state.level.has_boulder(state.actor.position);
            if boulder_here && env.rng().below(seed, 2) == 0 {
                state.message("Your leg gets stuck in a crevice.");
                state.message("You free your leg.");
            } else {
                trap.turns = trap.turns.saturating_sub(1);
                state.message(if trap.turns == 0 {
                    "You crawl to the edge of the pit."
                } else {
                    "You are still in a pit."
                });
            }
        }
        EntrapmentKind::Lava => {
            state.message("You are stuck in the lava.");
            if state.level.terrain(dest) != Some(TerrainKind::Lava) {
                trap.turns = trap.turns.saturating_sub(1);
                if trap.turns == 0 {
                    state.message("You pull yourself to the edge of the lava.");
                }
            }
        }
        EntrapmentKind::Web => {
            trap.turns = trap.turns.saturating_sub(1);
            state.message(if trap.turns == 0 {
                "You disentangle yourself."
            } else {
                "You are stuck to the web."
            });
        }
        EntrapmentKind::Swamp => {
            trap.turns = trap.turns.saturating_sub(1);
            if trap.turns > 0 {
                state.message("You are stuck in the mud.");
            }
        }
        EntrapmentKind::BearTrap => {
            state.message("You are caught in a bear trap.");
            if delta.is_diagonal() || env.rng().one_in(seed, 5) {
                trap.turns = trap.turns.saturating_sub(1);
                if trap.turns == 0 {
                    state.message("You escape the bear trap.");
                }
            }
        }
    }
    state.actor.entrapment = (trap.turns > 0).then_some(trap);
    true
}

/// Asks before walking into a known trap that could matter; true to go ahead.
fn confirm_trap(state: &GameState, env: Env<'_>, intended: Position, was_running: bool) -> bool {
    let Some(kind) = state.level.tile(intended).and_then(|tile| tile.known_trap()) else {
        return true;
    };
    let actor = &state.actor;
    let harmless = kind == crate::state::TrapKind::VibratingSquare
        || (actor.is_airborne() && kind.spares_airborne(state.level.is_sokoban()));
    if harmless && !actor.is(StatusFlags::HALLUCINATING) {
        return true;
    }
    if was_running {
        return false;
    }
    let verb = if actor.can(Capabilities::FLYING) {
        "fly"
    } else if actor.can(Capabilities::LEVITATING) {
        "float"
    } else {
        "step"
    };
    env.prompter()
        .confirm(&format!("Really {verb} into that {}?", kind.name()))
}

/// Liquid a walker would rather not step into without asking for it.
fn paranoid_stop(state: &GameState, env: Env<'_>, intended: Position) -> Option<&'static str> {
    let run = &state.run;
    if (run.no_pickup && run.mode == RunMode::Off) || run.is_exploring() {
        return None;
    }
    if state.actor.ignores_liquid() {
        return None;
    }
    let tile = state.level.tile(intended)?;
    if !tile.memory.seen {
        return None;
    }
    let here = state.here().map(|tile| tile.terrain);
    let config = env.config();
    match tile.terrain {
        TerrainKind::Lava if config.stop_for_lava && here != Some(TerrainKind::Lava) => Some("lava"),
        TerrainKind::Pool if config.stop_for_water && here != Some(TerrainKind::Pool) => Some("water"),
        TerrainKind::Swamp if config.stop_for_water && here != Some(TerrainKind::Swamp) => {
            Some("muddy swamp")
        }
        _ => None,
    }
}

/// Moves the actor and runs everything that follows arrival.
fn commit(state: &mut GameState, env: Env<'_>, origin: Position, dest: Position, delta: Delta) {
    let pet = state
        .level
        .monster_at(dest)
        .filter(|monster| monster.is_safe_pet())
        .map(|monster| (monster.id, monster.name.clone()));
    state.actor.position = dest;

    if let Some((id, name)) = pet {
        let squeezed = delta.is_diagonal()
            && bad_rock(&state.level, &state.actor, Position::new(dest.x, origin.y))
            && bad_rock(&state.level, &state.actor, Position::new(origin.x, dest.y));
        if let Some(monster) = state.level.monster_mut(id) {
            monster.position = origin;
        }
        if squeezed {
            tracing::debug!(%dest, "pet swapped through a tight gap");
        }
        state.message(format!("You displaced your {name}."));
    }

    stop_after_step(state, dest);

    if let Some(tile) = state.level.tile_mut(dest) {
        tile.memory.stepped = true;
    }
    env.vision().recompute(state, origin, dest);
    if !state.run.no_pickup {
        env.encounters().pickup(state, dest);
    }
    if let Some(kind) = state.level.tile(dest).and_then(|tile| tile.trap) {
        env.encounters().spring_trap(state, dest, kind);
    }
}

/// Ends continuous motion on squares that deserve a look.
fn stop_after_step(state: &mut GameState, dest: Position) {
    let Some(tile) = state.level.tile(dest).copied() else {
        return;
    };
    match state.run.mode {
        RunMode::Off => {}
        RunMode::Rush | RunMode::Go | RunMode::Follow => {
            if tile.terrain.is_door() || tile.terrain.is_rock() || tile.terrain.is_furniture() {
                state.run.cancel();
            }
        }
        RunMode::Travel if state.run.is_exploring() => {
            let walls: u32 = [
                Delta::new(-1, 0),
                Delta::new(1, 0),
                Delta::new(0, -1),
                Delta::new(0, 1),
            ]
            .into_iter()
            .filter_map(|step| state.level.tile(dest.offset(step)))
            .map(|next| u32::from(next.terrain.is_rock()) + 3 * u32::from(next.has_boulder()))
            .sum();
            let feature = !tile.memory.stepped
                && (tile.memory.glyph == Glyph::Altar || tile.memory.glyph.is_stairway());
            if walls >= 3 || feature {
                tracing::debug!(%dest, walls, feature, "autoexplore pauses");
                state.run.cancel();
            }
        }
        RunMode::Travel => {}
    }
}
