//! Travel path planning.
//!
//! The planner runs a layered breadth-first search from the travel target
//! back toward the actor, so the first time the search touches the actor the
//! square it came from is the next step. Squares that usually cost extra
//! turns (closed doors, boulders, bystanders, known hazards) are deferred: the
//! search keeps re-queueing the square in front of them for a few layers,
//! giving a detour the chance to win.
//!
//! When the target cannot be reached, a guess picks the best reachable
//! stand-in and the exact search is repeated toward it.

use crate::config::GameConfig;
use crate::state::{Delta, Direction, Level, MapDimensions, Position, RunMode, StatusFlags};

use super::frontier::{travel_weight, unexplored};
use super::legality::{Mode, MoveContext, check_step, hazard_vetoes};

/// Layer labels of one planning call; zero means unvisited.
#[derive(Clone, Debug)]
pub struct TravelMatrix {
    dimensions: MapDimensions,
    labels: Vec<u32>,
}

impl TravelMatrix {
    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            labels: vec![0; dimensions.area()],
        }
    }

    fn index(&self, at: Position) -> Option<usize> {
        self.dimensions
            .contains(at)
            .then(|| at.y as usize * self.dimensions.width as usize + at.x as usize)
    }

    pub fn label(&self, at: Position) -> u32 {
        self.index(at).map_or(0, |index| self.labels[index])
    }

    fn set(&mut self, at: Position, label: u32) {
        if let Some(index) = self.index(at) {
            self.labels[index] = label;
        }
    }

    /// Labelled squares, column by column.
    pub fn labelled(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        let MapDimensions { width, height } = self.dimensions;
        (0..width as i32)
            .flat_map(move |x| (0..height as i32).map(move |y| Position::new(x, y)))
            .filter_map(|at| {
                let label = self.label(at);
                (label > 0).then_some((at, label))
            })
    }
}

/// How to pick a stand-in when the target itself cannot be reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Guess {
    /// Closest square to the target that the actor could see.
    LineOfSight,
    /// Cheapest interesting square by travel weight.
    Explore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// More steps follow.
    EnRoute,
    /// This step lands on the travel target.
    Arrival,
    /// Travel to a neighbouring square, taken as an ordinary move.
    Adjacent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlannedStep {
    pub delta: Delta,
    pub kind: StepKind,
}

impl PlannedStep {
    /// This step ends the travel command.
    pub fn arrives(&self) -> bool {
        matches!(self.kind, StepKind::Arrival | StepKind::Adjacent)
    }
}

/// One planning request.
#[derive(Clone, Copy, Debug)]
pub struct TravelRequest {
    pub target: Position,
    pub guess: Option<Guess>,
    /// First call of a travel command.
    pub first_step: bool,
    pub detour_margin: u32,
}

impl TravelRequest {
    pub fn new(target: Position, config: &GameConfig) -> Self {
        Self {
            target,
            guess: None,
            first_step: false,
            detour_margin: config.detour_margin,
        }
    }

    #[must_use]
    pub fn with_guess(mut self, guess: Guess) -> Self {
        self.guess = Some(guess);
        self
    }

    #[must_use]
    pub fn first_step(mut self, first_step: bool) -> Self {
        self.first_step = first_step;
        self
    }
}

enum Search {
    Found(PlannedStep),
    Exhausted(TravelMatrix),
}

/// Whether the actor could see `at` from where they stand.
fn in_view(level: &Level, ctx: &MoveContext<'_>, at: Position) -> bool {
    level.has_clear_line(ctx.actor.position, at)
}

fn accepts(ctx: &MoveContext<'_>, guess: Guess, at: Position) -> bool {
    match guess {
        Guess::LineOfSight => in_view(ctx.level, ctx, at),
        Guess::Explore => unexplored(ctx.level, at),
    }
}

/// Squares that usually cost extra turns to get through.
fn slows_travel(ctx: &MoveContext<'_>, at: Position) -> bool {
    let level = ctx.level;
    let actor = ctx.actor;
    if !actor.passes_walls() && !actor.can_ooze() && level.is_closed_door(at) {
        return true;
    }
    if level.has_boulder(at) {
        return true;
    }
    level.monster_at(at).is_some_and(|monster| {
        monster.is_apparent()
            && ((monster.is_peaceful() && !actor.is(StatusFlags::HALLUCINATING))
                || monster.harmless)
    })
}

/// Layered search from `seed` toward `goal`.
///
/// `target` is the square the travel command ultimately wants; a step counts
/// as arriving when the square it leads to is the target. With a guess the
/// goal is never returned and never labelled.
fn search(
    ctx: &MoveContext<'_>,
    seed: Position,
    goal: Position,
    target: Position,
    guess: Option<Guess>,
    margin: u32,
) -> Search {
    let level = ctx.level;
    let blind = ctx.actor.is(StatusFlags::BLIND);
    let directions = Direction::search_set(ctx.actor.orthogonal_only);
    let mut matrix = TravelMatrix::new(level.dimensions());
    let mut frontier = vec![seed];
    let mut radius: u32 = 1;

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &cell in &frontier {
            let mut requeued = false;
            for direction in directions {
                let delta = direction.delta();
                let neighbour = cell.offset(delta);
                if !level.contains(neighbour) {
                    continue;
                }
                if guess == Some(Guess::LineOfSight) && !in_view(level, ctx, neighbour) {
                    continue;
                }

                let hazard = hazard_vetoes(ctx, cell, delta);
                if slows_travel(ctx, neighbour) || hazard {
                    let label = i64::from(matrix.label(cell));
                    if label > i64::from(radius) - i64::from(margin) {
                        if !requeued {
                            next.push(cell);
                            requeued = true;
                        }
                        continue;
                    }
                }

                let passable = hazard || check_step(ctx, cell, delta, Mode::Traverse).is_allowed();
                if !passable {
                    continue;
                }
                let known = level
                    .tile(neighbour)
                    .is_some_and(|tile| tile.memory.seen);
                if !known && (blind || !in_view(level, ctx, neighbour)) {
                    continue;
                }

                if neighbour == goal {
                    if guess.is_none() {
                        let kind = if cell == target {
                            StepKind::Arrival
                        } else {
                            StepKind::EnRoute
                        };
                        return Search::Found(PlannedStep {
                            delta: goal.delta_to(cell),
                            kind,
                        });
                    }
                } else if matrix.label(neighbour) == 0 {
                    matrix.set(neighbour, radius);
                    next.push(neighbour);
                }
            }
        }
        frontier = next;
        radius += 1;
    }
    Search::Exhausted(matrix)
}

/// Best labelled square under `guess`, if any beats standing still.
fn pick_stand_in(
    ctx: &MoveContext<'_>,
    matrix: &TravelMatrix,
    target: Position,
    guess: Guess,
) -> Option<Position> {
    let actor = ctx.actor.position;
    let (mut best, mut best_d2) = match guess {
        Guess::Explore => (u32::MAX, u32::MAX),
        Guess::LineOfSight => (target.chebyshev(actor), target.distance_squared(actor)),
    };
    let mut pick = None;
    for (cell, label) in matrix.labelled() {
        let distance = match guess {
            Guess::Explore => travel_weight(ctx.level, cell, label),
            Guess::LineOfSight => target.chebyshev(cell),
        };
        if distance == best && accepts(ctx, guess, cell) {
            let d2 = target.distance_squared(cell);
            if d2 < best_d2 {
                pick = Some(cell);
                best_d2 = d2;
            }
        } else if distance < best && accepts(ctx, guess, cell) {
            pick = Some(cell);
            best = distance;
            best_d2 = target.distance_squared(cell);
        }
    }
    pick.filter(|&cell| cell != actor)
}

/// Next step toward `request.target`, or `None` to stop without spending a turn.
///
/// Pure: reads the level and actor only.
pub fn plan_travel(ctx: &MoveContext<'_>, request: &TravelRequest) -> Option<PlannedStep> {
    let actor = ctx.actor.position;
    let target = request.target;

    if request.guess.is_none() && request.first_step && actor.chebyshev(target) == 1 {
        let walking = ctx.with_run(RunMode::Off);
        if check_step(&walking, actor, actor.delta_to(target), Mode::Probe).is_allowed() {
            return Some(PlannedStep {
                delta: actor.delta_to(target),
                kind: StepKind::Adjacent,
            });
        }
    }
    if target == actor && request.guess != Some(Guess::Explore) {
        return None;
    }

    let Some(guess) = request.guess else {
        return match search(ctx, target, actor, target, None, request.detour_margin) {
            Search::Found(step) => {
                tracing::debug!(%target, delta = %step.delta, kind = ?step.kind, "travel step");
                Some(step)
            }
            Search::Exhausted(_) => None,
        };
    };

    // Phase one: what can the actor reach at all?
    let Search::Exhausted(matrix) =
        search(ctx, actor, target, target, Some(guess), request.detour_margin)
    else {
        return None;
    };

    let Some(stand_in) = pick_stand_in(ctx, &matrix, target, guess) else {
        let heading = actor.heading_to(target);
        if heading.is_zero() {
            return None;
        }
        tracing::debug!(%target, %heading, "no stand-in; heading straight for target");
        return check_step(ctx, actor, heading, Mode::Probe)
            .is_allowed()
            .then_some(PlannedStep {
                delta: heading,
                kind: StepKind::EnRoute,
            });
    };

    // Phase two: the exact route to the stand-in.
    tracing::debug!(guess = <&str>::from(guess), %stand_in, "travel stand-in");
    match search(ctx, stand_in, actor, target, None, request.detour_margin) {
        Search::Found(step) => Some(step),
        Search::Exhausted(_) => None,
    }
}

/// Exact travel toward `target`, falling back to a line-of-sight guess.
pub fn next_travel_step(
    ctx: &MoveContext<'_>,
    target: Position,
    first_step: bool,
    config: &GameConfig,
) -> Option<PlannedStep> {
    let request = TravelRequest::new(target, config).first_step(first_step);
    plan_travel(ctx, &request)
        .or_else(|| plan_travel(ctx, &request.first_step(false).with_guess(Guess::LineOfSight)))
}

/// Autoexplore's next step toward the cheapest interesting square.
pub fn next_explore_step(ctx: &MoveContext<'_>, config: &GameConfig) -> Option<PlannedStep> {
    let request = TravelRequest::new(ctx.actor.position, config).with_guess(Guess::Explore);
    plan_travel(ctx, &request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Actor, GameState, Glyph, LevelBuilder, RememberedObject};

    fn travelling(rows: &[&str]) -> GameState {
        let mut state = LevelBuilder::from_rows(rows)
            .unwrap()
            .into_state(1, Actor::new(Position::ORIGIN))
            .unwrap();
        state.run.mode = RunMode::Travel;
        state.run.travel = true;
        for at in state.level.positions().collect::<Vec<_>>() {
            if let Some(tile) = state.level.tile_mut(at) {
                tile.memory.seen = true;
            }
        }
        state
    }

    fn plan(state: &GameState, target: Position) -> Option<PlannedStep> {
        let config = GameConfig::default();
        let ctx = MoveContext::new(state, &config);
        next_travel_step(&ctx, target, false, &config)
    }

    #[test]
    fn straight_corridor_heads_for_target() {
        let state = travelling(&["@....."]);
        let step = plan(&state, Position::new(4, 0)).unwrap();
        assert_eq!(step.delta, Delta::new(1, 0));
        assert_eq!(step.kind, StepKind::EnRoute);
    }

    #[test]
    fn last_step_arrives() {
        let mut state = travelling(&["@..."]);
        state.actor.position = Position::new(2, 0);
        let step = plan(&state, Position::new(3, 0)).unwrap();
        assert_eq!(step.kind, StepKind::Arrival);
        assert!(step.arrives());
    }

    #[test]
    fn first_step_to_a_neighbour_is_an_ordinary_move() {
        let state = travelling(&["@."]);
        let config = GameConfig::default();
        let ctx = MoveContext::new(&state, &config);
        let request = TravelRequest::new(Position::new(1, 0), &config).first_step(true);
        let step = plan_travel(&ctx, &request).unwrap();
        assert_eq!(step.kind, StepKind::Adjacent);
    }

    #[test]
    fn walls_are_walked_around() {
        let state = travelling(&["@|.", "..."]);
        let step = plan(&state, Position::new(2, 0)).unwrap();
        assert_eq!(step.delta, Delta::new(1, 1));
    }

    #[test]
    fn enclosed_targets_have_no_exact_route() {
        let state = travelling(&["@..---", "...|.|", "...---"]);
        let config = GameConfig::default();
        let ctx = MoveContext::new(&state, &config);
        let request = TravelRequest::new(Position::new(4, 1), &config);
        assert_eq!(plan_travel(&ctx, &request), None);
    }

    #[test]
    fn closed_doors_are_detoured_when_cheap() {
        // Through the door is three steps; around the wall it is four.
        let state = travelling(&[
            "@+..",
            ".|..",
            "....",
        ]);
        let step = plan(&state, Position::new(3, 0)).unwrap();
        assert_eq!(step.delta, Delta::new(0, 1));
    }

    #[test]
    fn planning_leaves_state_untouched() {
        let state = travelling(&["@....", ".---.", "....."]);
        let before = state.clone();
        let first = plan(&state, Position::new(4, 2));
        assert_eq!(state, before);
        assert_eq!(plan(&state, Position::new(4, 2)), first);
    }

    #[test]
    fn unseen_squares_out_of_view_are_not_searched() {
        let mut state = travelling(&["@.|..."]);
        for x in 3..6 {
            if let Some(tile) = state.level.tile_mut(Position::new(x, 0)) {
                tile.memory.seen = false;
            }
        }
        let config = GameConfig::default();
        let ctx = MoveContext::new(&state, &config);
        let request = TravelRequest::new(Position::new(5, 0), &config);
        assert_eq!(plan_travel(&ctx, &request), None);
    }

    #[test]
    fn explore_prefers_a_near_room_square_to_a_far_item() {
        let mut state = travelling(&["@......", "       "]);
        for x in 0..7 {
            if let Some(tile) = state.level.tile_mut(Position::new(x, 0)) {
                tile.memory.glyph = Glyph::Room;
                tile.memory.in_room = true;
                tile.memory.stepped = x < 2;
            }
        }
        if let Some(tile) = state.level.tile_mut(Position::new(6, 0)) {
            tile.memory.object = Some(RememberedObject::Item);
        }
        state.run.autoexplore = true;
        let config = GameConfig::default();
        let ctx = MoveContext::new(&state, &config);
        let step = next_explore_step(&ctx, &config).unwrap();
        assert_eq!(step.delta, Delta::new(1, 0));
        assert_eq!(step.kind, StepKind::EnRoute);
    }

    #[test]
    fn explore_with_nothing_left_stops() {
        let mut state = travelling(&["@.."]);
        for at in state.level.positions().collect::<Vec<_>>() {
            if let Some(tile) = state.level.tile_mut(at) {
                tile.memory.glyph = Glyph::Room;
                tile.memory.stepped = true;
            }
        }
        state.run.autoexplore = true;
        let config = GameConfig::default();
        let ctx = MoveContext::new(&state, &config);
        assert_eq!(next_explore_step(&ctx, &config), None);
    }
}
