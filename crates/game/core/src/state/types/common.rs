use std::fmt;

/// Discrete grid position expressed in tile coordinates.
///
/// `x` grows eastward and `y` grows southward, matching row-major level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position reached by applying the horizontal part of `delta`.
    #[inline]
    pub const fn offset(self, delta: Delta) -> Self {
        Self {
            x: self.x + delta.dx,
            y: self.y + delta.dy,
        }
    }

    /// Chebyshev distance (number of king moves between the two squares).
    #[inline]
    pub fn chebyshev(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_squared(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx * dx + dy * dy
    }

    /// Single-step delta pointing from `self` toward `other` (per-axis sign).
    pub fn heading_to(self, other: Position) -> Delta {
        Delta::new((other.x - self.x).signum(), (other.y - self.y).signum())
    }

    /// Raw difference `other - self` as a delta.
    pub fn delta_to(self, other: Position) -> Delta {
        Delta::new(other.x - self.x, other.y - self.y)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Signed step the driver evaluates this turn.
///
/// `dz` is non-zero only for vertical moves (stairs, ladders, holes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl Delta {
    pub const ZERO: Self = Self {
        dx: 0,
        dy: 0,
        dz: 0,
    };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy, dz: 0 }
    }

    pub const fn vertical(dz: i32) -> Self {
        Self { dx: 0, dy: 0, dz }
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0 && self.dz == 0
    }

    #[inline]
    pub const fn is_vertical(self) -> bool {
        self.dz != 0
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    /// The opposite horizontal step.
    pub const fn reversed(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dz != 0 {
            write!(f, "[dz {}]", self.dz)
        } else {
            write!(f, "[{}, {}]", self.dx, self.dy)
        }
    }
}

/// The eight compass directions in the canonical rotation order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    West,
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
}

impl Direction {
    /// Rotation order; random redirection indexes into this table.
    ///
    /// Orthogonal directions sit at the even indices.
    pub const ALL: [Direction; 8] = [
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
    ];

    /// Search order: the four orthogonals first, then the diagonals.
    ///
    /// Four-directional actors use only the first four entries.
    pub const SEARCH_ORDER: [Direction; 8] = [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    pub const fn delta(self) -> Delta {
        match self {
            Direction::West => Delta::new(-1, 0),
            Direction::NorthWest => Delta::new(-1, -1),
            Direction::North => Delta::new(0, -1),
            Direction::NorthEast => Delta::new(1, -1),
            Direction::East => Delta::new(1, 0),
            Direction::SouthEast => Delta::new(1, 1),
            Direction::South => Delta::new(0, 1),
            Direction::SouthWest => Delta::new(-1, 1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        self.delta().is_diagonal()
    }

    /// Directions an actor may search along.
    pub fn search_set(orthogonal_only: bool) -> &'static [Direction] {
        if orthogonal_only {
            &Self::SEARCH_ORDER[..4]
        } else {
            &Self::SEARCH_ORDER
        }
    }
}

/// Monotonic move counter; one unit per turn the actor spends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_order_lists_orthogonals_first() {
        let orthogonal = Direction::search_set(true);
        assert_eq!(orthogonal.len(), 4);
        assert!(orthogonal.iter().all(|dir| !dir.is_diagonal()));
        assert!(Direction::SEARCH_ORDER[4..].iter().all(|dir| dir.is_diagonal()));
    }

    #[test]
    fn distances_match_king_and_euclid() {
        let a = Position::new(2, 3);
        let b = Position::new(5, 7);
        assert_eq!(a.chebyshev(b), 4);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(a.heading_to(b), Delta::new(1, 1));
        assert_eq!(a.heading_to(a), Delta::ZERO);
    }
}
