//! Movement rules: where the actor may step, how it gets somewhere, and
//! when continuous motion should stop.
//!
//! * [`legality`] answers single-step questions for every caller.
//! * [`planner`] finds the first step of a travel or autoexplore path.
//! * [`frontier`] classifies remembered squares for autoexplore.
//! * [`scanner`] inspects the surroundings between run steps.
//! * [`boulder`] resolves pushes on committed steps.
pub mod boulder;
pub mod frontier;
pub mod legality;
pub mod planner;
pub mod scanner;

pub use boulder::PushOutcome;
pub use frontier::{
    ExplorationReport, exploration_census, interesting_to_explore, travel_weight, unexplored,
};
pub use legality::{
    Blocker, HazardKind, Mode, MoveContext, SideEffect, SqueezeFailure, Verdict, bad_rock,
    check_step, hazard_vetoes,
};
pub use planner::{
    Guess, PlannedStep, StepKind, TravelMatrix, TravelRequest, next_explore_step,
    next_travel_step, plan_travel,
};
pub use scanner::{ScanOutcome, look_around};
