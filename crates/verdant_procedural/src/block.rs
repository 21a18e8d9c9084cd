//! # Blocks and Walkability Nodes
//!
//! Plain data. A [`Block`] never changes after creation; regenerating a
//! chunk replaces its blocks wholesale. A [`Node`] mirrors one ground block
//! for path-cost bookkeeping and refers back to it by grid key only.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::GridPos;

/// Every kind of block the world can contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    /// Plains surface.
    Grass = 0,
    /// Desert surface.
    Sand = 1,
    /// Tree trunk.
    Wood = 2,
    /// Mountain surface.
    Stone = 3,
    /// Whole-tree marker block.
    Tree = 4,
    /// Tree canopy.
    Leaf = 5,
    /// Boulder.
    Rock = 6,
    /// Placed platform.
    Platform = 7,
    /// Placed tower.
    Tower = 8,
    /// Water.
    Water = 9,
    /// Lava.
    Lava = 10,
}

impl BlockType {
    /// All block types, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Grass,
        Self::Sand,
        Self::Wood,
        Self::Stone,
        Self::Tree,
        Self::Leaf,
        Self::Rock,
        Self::Platform,
        Self::Tower,
        Self::Water,
        Self::Lava,
    ];

    /// Display name, also the prefix of the block's atlas sprites.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "Grass",
            Self::Sand => "Sand",
            Self::Wood => "Wood",
            Self::Stone => "Stone",
            Self::Tree => "Tree",
            Self::Leaf => "Leaf",
            Self::Rock => "Rock",
            Self::Platform => "Platform",
            Self::Tower => "Tower",
            Self::Water => "Water",
            Self::Lava => "Lava",
        }
    }

    /// Default walkability of a block of this type.
    #[must_use]
    pub const fn default_walkability(self) -> Walkability {
        match self {
            Self::Grass | Self::Sand | Self::Stone | Self::Platform => Walkability::Walkable,
            Self::Wood
            | Self::Tree
            | Self::Leaf
            | Self::Rock
            | Self::Tower
            | Self::Water
            | Self::Lava => Walkability::NonWalkable,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a block can be stood on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Walkability {
    /// Can be stood on.
    Walkable,
    /// Blocked.
    NonWalkable,
}

/// A single voxel, positioned in chunk-local grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    position: GridPos,
    block_type: BlockType,
    walkable: Walkability,
}

impl Block {
    /// Creates a block with its type's default walkability.
    #[inline]
    #[must_use]
    pub const fn new(position: GridPos, block_type: BlockType) -> Self {
        Self {
            position,
            block_type,
            walkable: block_type.default_walkability(),
        }
    }

    /// Creates a block with explicit walkability.
    #[inline]
    #[must_use]
    pub const fn with_walkability(
        position: GridPos,
        block_type: BlockType,
        walkable: Walkability,
    ) -> Self {
        Self {
            position,
            block_type,
            walkable,
        }
    }

    /// Chunk-local grid position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Block type.
    #[inline]
    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Walkability.
    #[inline]
    #[must_use]
    pub const fn walkable(&self) -> Walkability {
        self.walkable
    }
}

/// Graph vertex mirroring one ground block.
///
/// The block itself is found through [`Node::grid_pos`] in the owning
/// chunk's block map; the node never owns it. `g`, `h`, `f` and
/// `came_from` are scratch space for a path search.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Chunk-local grid position, also the key of the mirrored block.
    pub grid_pos: GridPos,
    /// Whether the node can be entered.
    pub walkable: Walkability,
    /// Cost from the start.
    pub g: f32,
    /// Heuristic cost to the goal.
    pub h: f32,
    /// `g + h`.
    pub f: f32,
    /// Predecessor on the current best path.
    pub came_from: Option<GridPos>,
}

impl Node {
    /// Creates a node with cleared path costs.
    #[must_use]
    pub const fn new(grid_pos: GridPos, walkable: Walkability) -> Self {
        Self {
            grid_pos,
            walkable,
            g: f32::INFINITY,
            h: 0.0,
            f: f32::INFINITY,
            came_from: None,
        }
    }

    /// Recomputes `f` from `g` and `h`.
    #[inline]
    pub fn calculate_f_cost(&mut self) {
        self.f = self.g + self.h;
    }

    /// Clears path scratch state before a new search.
    pub fn reset_costs(&mut self) {
        self.g = f32::INFINITY;
        self.h = 0.0;
        self.f = f32::INFINITY;
        self.came_from = None;
    }

    /// True if the node can be entered.
    #[inline]
    #[must_use]
    pub fn is_walkable(&self) -> bool {
        self.walkable == Walkability::Walkable
    }
}
