use super::Position;

/// Stable monster identifier within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attitude {
    Hostile,
    Peaceful,
    Tame,
}

/// How the player currently perceives a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Perception {
    /// In plain view.
    Seen,
    /// Detected by other senses (telepathy, warning).
    Sensed,
    Unnoticed,
}

/// What a mimicking monster pretends to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Disguise {
    Furniture,
    Object,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub position: Position,
    pub attitude: Attitude,
    pub perception: Perception,
    pub disguise: Option<Disguise>,
    /// Has no attacks at all.
    pub harmless: bool,
    /// Cannot move on its own.
    pub sessile: bool,
    /// Hiding under an object or in the floor.
    pub hidden: bool,
    pub invisible: bool,
}

impl Monster {
    pub fn new(id: MonsterId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            attitude: Attitude::Hostile,
            perception: Perception::Seen,
            disguise: None,
            harmless: false,
            sessile: false,
            hidden: false,
            invisible: false,
        }
    }

    #[must_use]
    pub fn with_attitude(mut self, attitude: Attitude) -> Self {
        self.attitude = attitude;
        self
    }

    #[must_use]
    pub fn with_perception(mut self, perception: Perception) -> Self {
        self.perception = perception;
        self
    }

    #[must_use]
    pub fn harmless(mut self) -> Self {
        self.harmless = true;
        self
    }

    #[must_use]
    pub fn sessile(mut self) -> Self {
        self.sessile = true;
        self
    }

    pub fn is_seen(&self) -> bool {
        self.perception == Perception::Seen
    }

    /// Seen or sensed.
    pub fn is_spotted(&self) -> bool {
        self.perception != Perception::Unnoticed
    }

    pub fn is_disguised(&self) -> bool {
        self.disguise.is_some()
    }

    /// Peaceful or tame.
    pub fn is_peaceful(&self) -> bool {
        !matches!(self.attitude, Attitude::Hostile)
    }

    pub fn is_tame(&self) -> bool {
        matches!(self.attitude, Attitude::Tame)
    }

    /// A pet the actor may swap places with instead of attacking.
    pub fn is_safe_pet(&self) -> bool {
        self.is_tame() && self.is_spotted() && !self.is_disguised()
    }

    /// Recognisable as a monster at all.
    pub fn is_apparent(&self) -> bool {
        self.is_spotted() && !self.is_disguised() && !self.hidden
    }
}
