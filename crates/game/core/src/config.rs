use crate::state::RunDisplay;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Walking into rock with a wielded digging tool starts digging.
    pub autodig: bool,
    /// Ask before stepping onto a known trap.
    pub confirm_traps: bool,
    /// Refuse to walk into water or swamp unless moving with no-pickup.
    pub stop_for_water: bool,
    /// Refuse to walk into lava unless moving with no-pickup.
    pub stop_for_lava: bool,
    /// Attempts at finding a usable random direction while stunned or confused.
    pub confusion_retries: u32,
    /// Layers a path may be lengthened to avoid doors, boulders and hazards.
    pub detour_margin: u32,
    /// Sensed (unseen) hostiles closer than this stop a run.
    pub sense_radius: u32,
    pub run_display: RunDisplay,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Maximum level width accepted by loaders.
    pub const MAX_WIDTH: u32 = 255;
    /// Maximum level height accepted by loaders.
    pub const MAX_HEIGHT: u32 = 255;
    /// Effort at which a dug or chewed square gives way.
    pub const DIG_EFFORT_DONE: u32 = 100;
    /// Under the leap display, every Nth move is presented.
    pub const LEAP_INTERVAL: u64 = 7;
    /// Chance denominator for a confused actor to stumble in a random direction.
    pub const CONFUSION_STUMBLE_ONE_IN: u32 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CONFUSION_RETRIES: u32 = 50;
    pub const DEFAULT_DETOUR_MARGIN: u32 = 5;
    pub const DEFAULT_SENSE_RADIUS: u32 = 5;

    pub fn new() -> Self {
        Self {
            autodig: false,
            confirm_traps: true,
            stop_for_water: true,
            stop_for_lava: true,
            confusion_retries: Self::DEFAULT_CONFUSION_RETRIES,
            detour_margin: Self::DEFAULT_DETOUR_MARGIN,
            sense_radius: Self::DEFAULT_SENSE_RADIUS,
            run_display: RunDisplay::default(),
        }
    }

    #[must_use]
    pub fn with_autodig(mut self, autodig: bool) -> Self {
        self.autodig = autodig;
        self
    }

    #[must_use]
    pub fn with_run_display(mut self, run_display: RunDisplay) -> Self {
        self.run_display = run_display;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
