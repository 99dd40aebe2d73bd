use bitflags::bitflags;

use super::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodySize {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
}

bitflags! {
    /// Intrinsic movement capabilities of the actor's current form.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u16 {
        const PASSES_WALLS = 1 << 0;
        const TUNNELS = 1 << 1;
        /// Tunnelling requires a digging tool.
        const NEEDS_PICK = 1 << 2;
        const AMORPHOUS = 1 << 3;
        const METALLIVORE = 1 << 4;
        const PASSES_BARS = 1 << 5;
        const LEVITATING = 1 << 6;
        const FLYING = 1 << 7;
        const CLINGER = 1 << 8;
        const THROWS_ROCKS = 1 << 9;
        const SEE_INVISIBLE = 1 << 10;
    }
}

bitflags! {
    /// Transient conditions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u16 {
        const STUNNED = 1 << 0;
        const CONFUSED = 1 << 1;
        const BLIND = 1 << 2;
        const HALLUCINATING = 1 << 3;
        const FUMBLING = 1 << 4;
        /// Weak from hunger.
        const WEAK = 1 << 5;
        /// Current form cannot move at all.
        const ROOTED = 1 << 6;
        const HELPLESS = 1 << 7;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encumbrance {
    #[default]
    Unencumbered,
    Burdened,
    Stressed,
    Strained,
    Overtaxed,
    Overloaded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntrapmentKind {
    Pit,
    BearTrap,
    Web,
    Lava,
    Swamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entrapment {
    pub kind: EntrapmentKind,
    pub turns: u32,
}

/// Ongoing excavation of one square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DigProgress {
    pub position: Position,
    /// Work done so far; the square gives way past 100.
    pub effort: u32,
    /// Chewing with teeth rather than digging with a tool.
    pub chewing: bool,
}

/// The player character as far as movement is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub position: Position,
    pub size: BodySize,
    /// Grid-bug form: no diagonal steps.
    pub orthogonal_only: bool,
    pub capabilities: Capabilities,
    pub status: StatusFlags,
    pub encumbrance: Encumbrance,
    pub hp: i32,
    pub max_hp: i32,
    pub carried_weight: u32,
    pub capacity: u32,
    pub dexterity: u8,
    pub wields_digger: bool,
    pub carries_digger: bool,
    pub entrapment: Option<Entrapment>,
}

impl Actor {
    /// Ceiling on carried weight for oozing under a door.
    pub const OOZE_WEIGHT: u32 = 100;
    /// Ceiling on carried weight for a diagonal squeeze between rock.
    pub const SQUEEZE_WEIGHT: u32 = 600;
    /// Free capacity needed to slip past an immovable boulder.
    pub const BOULDER_SQUEEZE_SLACK: u32 = 850;

    pub fn new(position: Position) -> Self {
        Self {
            position,
            size: BodySize::Medium,
            orthogonal_only: false,
            capabilities: Capabilities::empty(),
            status: StatusFlags::empty(),
            encumbrance: Encumbrance::Unencumbered,
            hp: 16,
            max_hp: 16,
            carried_weight: 0,
            capacity: 1000,
            dexterity: 14,
            wields_digger: false,
            carries_digger: false,
            entrapment: None,
        }
    }

    pub fn can(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is(&self, status: StatusFlags) -> bool {
        self.status.contains(status)
    }

    pub fn passes_walls(&self) -> bool {
        self.can(Capabilities::PASSES_WALLS)
    }

    /// Tunnels without needing a tool.
    pub fn chews_rock(&self) -> bool {
        self.can(Capabilities::TUNNELS) && !self.can(Capabilities::NEEDS_PICK)
    }

    pub fn can_ooze(&self) -> bool {
        self.can(Capabilities::AMORPHOUS) && self.carried_weight <= Self::OOZE_WEIGHT
    }

    pub fn is_large(&self) -> bool {
        self.size >= BodySize::Large
    }

    pub fn is_tiny(&self) -> bool {
        self.size == BodySize::Tiny
    }

    /// Moves above the floor: liquids and most floor traps do not apply.
    pub fn is_airborne(&self) -> bool {
        self.capabilities
            .intersects(Capabilities::LEVITATING | Capabilities::FLYING)
    }

    /// Unaffected by standing liquid underfoot.
    pub fn ignores_liquid(&self) -> bool {
        self.is_airborne() || self.can(Capabilities::CLINGER)
    }

    /// Room to spare for slipping past a boulder.
    pub fn is_lightly_loaded(&self) -> bool {
        self.carried_weight + Self::BOULDER_SQUEEZE_SLACK <= self.capacity
    }

    /// Hit points low enough that heavy loads pin the actor down.
    pub fn is_winded(&self) -> bool {
        self.hp < 10 && self.hp != self.max_hp
    }

    /// Clumsy enough to bump into closed doors.
    pub fn is_clumsy(&self) -> bool {
        self.status
            .intersects(StatusFlags::BLIND | StatusFlags::STUNNED | StatusFlags::FUMBLING)
            || self.dexterity < 10
    }

    /// Has a tool that could dig through a blocking boulder.
    pub fn has_way_through(&self) -> bool {
        self.passes_walls() || self.chews_rock() || self.carries_digger || self.wields_digger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oozing_requires_light_pack() {
        let mut actor = Actor::new(Position::ORIGIN);
        actor.capabilities = Capabilities::AMORPHOUS;
        actor.carried_weight = 100;
        assert!(actor.can_ooze());
        actor.carried_weight = 101;
        assert!(!actor.can_ooze());
    }

    #[test]
    fn tools_are_not_needed_for_chewing_forms() {
        let mut actor = Actor::new(Position::ORIGIN);
        actor.capabilities = Capabilities::TUNNELS | Capabilities::NEEDS_PICK;
        assert!(!actor.chews_rock());
        actor.capabilities.remove(Capabilities::NEEDS_PICK);
        assert!(actor.chews_rock());
    }

    #[test]
    fn encumbrance_is_ordered() {
        assert!(Encumbrance::Overloaded > Encumbrance::Strained);
        assert!(Encumbrance::Strained > Encumbrance::Stressed);
    }
}
