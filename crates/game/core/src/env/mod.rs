//! Collaborators the movement kernel calls out to.
//!
//! The kernel decides legality and paths; excavation, vision, encounters and
//! player prompts belong to the surrounding game. The [`Env`] aggregate bundles
//! them so the engine can reach everything it needs without hard coupling to
//! concrete implementations.
mod encounters;
mod excavation;
mod prompt;
mod rng;
mod vision;

pub use encounters::{DoorAttempt, Encounters, Passive};
pub use excavation::{Excavator, Tunneling};
pub use prompt::{AlwaysNo, AlwaysYes, Prompter};
pub use rng::{PcgRng, RngOracle, compute_seed, roll};
pub use vision::{LineOfSight, Vision};

use crate::config::GameConfig;

static PCG: PcgRng = PcgRng;
static TUNNELING: Tunneling = Tunneling;
static LINE_OF_SIGHT: LineOfSight = LineOfSight::new(LineOfSight::DEFAULT_RADIUS);
static PASSIVE: Passive = Passive;
static ALWAYS_NO: AlwaysNo = AlwaysNo;

/// Aggregates the configuration and every collaborator the driver uses.
///
/// `Env::new` fills each slot with the deterministic default; replace slots
/// with the `with_*` builders.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    config: &'a GameConfig,
    rng: &'a dyn RngOracle,
    excavator: &'a dyn Excavator,
    vision: &'a dyn Vision,
    encounters: &'a dyn Encounters,
    prompter: &'a dyn Prompter,
}

impl<'a> Env<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self {
            config,
            rng: &PCG,
            excavator: &TUNNELING,
            vision: &LINE_OF_SIGHT,
            encounters: &PASSIVE,
            prompter: &ALWAYS_NO,
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn with_excavator(mut self, excavator: &'a dyn Excavator) -> Self {
        self.excavator = excavator;
        self
    }

    #[must_use]
    pub fn with_vision(mut self, vision: &'a dyn Vision) -> Self {
        self.vision = vision;
        self
    }

    #[must_use]
    pub fn with_encounters(mut self, encounters: &'a dyn Encounters) -> Self {
        self.encounters = encounters;
        self
    }

    #[must_use]
    pub fn with_prompter(mut self, prompter: &'a dyn Prompter) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn excavator(&self) -> &'a dyn Excavator {
        self.excavator
    }

    pub fn vision(&self) -> &'a dyn Vision {
        self.vision
    }

    pub fn encounters(&self) -> &'a dyn Encounters {
        self.encounters
    }

    pub fn prompter(&self) -> &'a dyn Prompter {
        self.prompter
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
