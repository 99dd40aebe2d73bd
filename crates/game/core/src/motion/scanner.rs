//! Look around after each step of continuous motion.
//!
//! The scanner decides whether a run should stop because something
//! interesting appeared, and whether it should bend to follow a corridor.

use crate::config::GameConfig;
use crate::state::{
    Actor, Capabilities, Delta, Level, Monster, Position, RunMode, RunState, StatusFlags,
    TerrainKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanOutcome {
    Continue,
    Stop,
    /// Follow the corridor: new heading plus the accumulated turn.
    Turn { heading: Delta, last_turn: i8 },
}

/// A monster worth interrupting the run for, wherever it is.
fn alarming(monster: &Monster, actor: &Actor, sense_radius: u32) -> bool {
    let noticed = monster.is_seen()
        || (monster.is_spotted() && actor.position.chebyshev(monster.position) <= sense_radius);
    noticed
        && !monster.is_disguised()
        && (!monster.is_peaceful() || actor.is(StatusFlags::HALLUCINATING))
        && !monster.harmless
        && !monster.sessile
}

/// A monster in the 3x3 block the actor can make out.
fn visible_nearby(monster: &Monster, actor: &Actor) -> bool {
    !monster.is_disguised()
        && (!monster.invisible || actor.can(Capabilities::SEE_INVISIBLE))
        && !monster.hidden
}

/// Running tally of corridor squares that could continue the run.
#[derive(Debug)]
struct Continuations {
    count: u32,
    /// Squared distance from the square ahead to the best candidate.
    nearest: u32,
    best: Position,
    occupied: bool,
    no_turn: bool,
}

impl Continuations {
    fn new() -> Self {
        Self {
            count: 0,
            nearest: 9,
            best: Position::ORIGIN,
            occupied: true,
            no_turn: false,
        }
    }

    /// Counts `at` as a corridor square. Off-room actors only.
    fn record(&mut self, level: &Level, actor: &Actor, run: &RunState, at: Position) {
        if level.terrain(actor.position) == Some(TerrainKind::Room) {
            return;
        }
        if run.mode.follows_corridors() {
            let ahead = actor.position.offset(run.heading);
            let distance = at.distance_squared(ahead);
            if distance > 2 {
                return;
            }
            if self.count == 1 && at.distance_squared(self.best) != 1 {
                self.no_turn = true;
            }
            if distance < self.nearest {
                self.nearest = distance;
                self.best = at;
                self.occupied = level.monster_at(at).is_some();
            }
        }
        self.count += 1;
    }
}

/// How the heading bends when turning toward `best`, from -2 (hard left) to
/// 2 (hard right).
fn turn_amount(origin: Position, heading: Delta, best: Position, nearest: u32) -> i8 {
    let (dx, dy) = (heading.dx, heading.dy);
    if nearest == 2 {
        if dx == best.y - origin.y && dy == origin.x - best.x {
            2
        } else {
            -2
        }
    } else if heading.is_diagonal() {
        if (dx == dy && best.y == origin.y) || (dx != dy && best.y != origin.y) {
            -1
        } else {
            1
        }
    } else {
        let (ox, oy) = (best.x - origin.x, best.y - origin.y);
        if (ox == oy && dy == 0) || (ox != oy && dy != 0) {
            1
        } else {
            -1
        }
    }
}

/// Decides whether continuous motion goes on after the actor's last step.
pub fn look_around(level: &Level, actor: &Actor, run: &RunState, config: &GameConfig) -> ScanOutcome {
    let mode = run.mode;
    let heading = run.heading;
    let origin = actor.position;

    if actor.orthogonal_only && heading.is_diagonal() {
        return ScanOutcome::Stop;
    }

    if mode != RunMode::Rush
        && level
            .monsters()
            .iter()
            .any(|monster| alarming(monster, actor, config.sense_radius))
    {
        tracing::debug!("hostile in view; stopping");
        return ScanOutcome::Stop;
    }

    if actor.is(StatusFlags::BLIND) || mode == RunMode::Off {
        return ScanOutcome::Continue;
    }

    let ahead = origin.offset(heading);
    let behind = origin.offset(heading.reversed());
    let mut continuations = Continuations::new();

    for x in origin.x - 1..=origin.x + 1 {
        for y in origin.y - 1..=origin.y + 1 {
            let at = Position::new(x, y);
            let Some(tile) = level.tile(at) else {
                continue;
            };
            if actor.orthogonal_only && x != origin.x && y != origin.y {
                continue;
            }
            if at == origin {
                continue;
            }

            let monster = level
                .monster_at(at)
                .filter(|monster| visible_nearby(monster, actor));
            if let Some(monster) = monster {
                let friendly = monster.is_peaceful();
                if (mode != RunMode::Rush && !friendly)
                    || (at == ahead && (mode != RunMode::Travel || !friendly))
                {
                    return ScanOutcome::Stop;
                }
            }

            if tile.terrain == TerrainKind::Stone || at == behind {
                continue;
            }
            if tile.terrain.is_rock() || tile.terrain == TerrainKind::Room {
                continue;
            }

            if tile.is_closed_door() {
                if mode == RunMode::Travel || (x != origin.x && y != origin.y) {
                    continue;
                }
                if mode != RunMode::Rush {
                    return ScanOutcome::Stop;
                }
                continuations.record(level, actor, run, at);
                continue;
            }
            if tile.terrain == TerrainKind::Corridor {
                continuations.record(level, actor, run, at);
                continue;
            }
            if tile.known_trap().is_some() {
                if mode == RunMode::Rush {
                    continuations.record(level, actor, run, at);
                    continue;
                }
                if at == ahead {
                    return ScanOutcome::Stop;
                }
                continue;
            }
            if matches!(tile.terrain, TerrainKind::Pool | TerrainKind::Lava) {
                if !actor.ignores_liquid() && at == ahead {
                    return ScanOutcome::Stop;
                }
                continue;
            }

            // Doorways, furniture and the like.
            if mode == RunMode::Rush {
                continuations.record(level, actor, run, at);
                continue;
            }
            if mode == RunMode::Travel || level.monster_at(at).is_some() {
                continue;
            }
            if (x == origin.x - heading.dx && y != origin.y + heading.dy)
                || (y == origin.y - heading.dy && x != origin.x + heading.dx)
            {
                continue;
            }
            tracing::debug!(%at, "feature beside the run; stopping");
            return ScanOutcome::Stop;
        }
    }

    if continuations.count > 1 && mode == RunMode::Go {
        tracing::debug!("fork; stopping");
        return ScanOutcome::Stop;
    }

    let Continuations {
        count,
        nearest,
        best,
        occupied,
        no_turn,
    } = continuations;
    if mode.follows_corridors()
        && !no_turn
        && !occupied
        && nearest != 0
        && (count == 1 || (count == 2 && nearest == 1))
    {
        let turn = turn_amount(origin, heading, best, nearest) + run.last_turn;
        if (-2..=2).contains(&turn) {
            let heading = origin.delta_to(best);
            tracing::debug!(%heading, turn, "following corridor");
            return ScanOutcome::Turn {
                heading,
                last_turn: turn,
            };
        }
    }
    ScanOutcome::Continue
}
