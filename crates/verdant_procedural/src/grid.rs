//! # Grid Coordinates
//!
//! Integer grid positions and the six axis-aligned face directions.
//!
//! Every block, chunk key and column lookup in the engine is keyed by
//! [`GridPos`]. Floats never serve as map keys.

use std::fmt;
use std::ops::{Add, Sub};

/// An integer position on the block grid.
///
/// Used for chunk-local block positions, world grid positions and chunk
/// keys alike. `y` is always zero for chunk keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (height).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl GridPos {
    /// The origin. Also the sentinel returned by failed lookups.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Creates a new grid position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the neighbouring position across the given face.
    #[inline]
    #[must_use]
    pub const fn neighbour(self, face: Face) -> Self {
        let [dx, dy, dz] = face.offset();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Same position with a different height.
    #[inline]
    #[must_use]
    pub const fn with_y(self, y: i32) -> Self {
        Self::new(self.x, y, self.z)
    }

    /// Squared distance on the XZ plane.
    #[inline]
    #[must_use]
    pub const fn distance_sq_xz(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }
}

impl Add for GridPos {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for GridPos {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six axis-aligned faces of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +Z
    Front,
    /// -Z
    Back,
    /// +X
    Right,
    /// -X
    Left,
}

impl Face {
    /// All faces, in mesh emission order.
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
        Self::Right,
        Self::Left,
    ];

    /// The four horizontal neighbours, used for gap filling and node queries.
    pub const HORIZONTAL: [Self; 4] = [Self::Right, Self::Left, Self::Front, Self::Back];

    /// Side faces in the order used by the side-texture randomizer.
    pub const RANDOM_SIDES: [Self; 4] = [Self::Left, Self::Right, Self::Back, Self::Front];

    /// Unit grid offset across this face.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::Top => [0, 1, 0],
            Self::Bottom => [0, -1, 0],
            Self::Front => [0, 0, 1],
            Self::Back => [0, 0, -1],
            Self::Right => [1, 0, 0],
            Self::Left => [-1, 0, 0],
        }
    }

    /// Outward unit normal.
    #[inline]
    #[must_use]
    pub const fn normal(self) -> [f32; 3] {
        let [x, y, z] = self.offset();
        [x as f32, y as f32, z as f32]
    }

    /// Atlas side index (`Side 0` = -X, `Side 1` = -Z, `Side 2` = +X, `Side 3` = +Z).
    ///
    /// `None` for top and bottom.
    #[inline]
    #[must_use]
    pub const fn side_index(self) -> Option<u8> {
        match self {
            Self::Left => Some(0),
            Self::Back => Some(1),
            Self::Right => Some(2),
            Self::Front => Some(3),
            Self::Top | Self::Bottom => None,
        }
    }

    /// Position of this face in [`Face::RANDOM_SIDES`].
    #[inline]
    #[must_use]
    pub const fn random_side_index(self) -> Option<i32> {
        match self {
            Self::Left => Some(0),
            Self::Right => Some(1),
            Self::Back => Some(2),
            Self::Front => Some(3),
            Self::Top | Self::Bottom => None,
        }
    }

    /// True for the four side faces.
    #[inline]
    #[must_use]
    pub const fn is_side(self) -> bool {
        self.side_index().is_some()
    }
}
