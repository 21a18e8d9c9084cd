//! # Structure Placer
//!
//! Stamps trees and rocks onto ground blocks. Every random choice comes
//! from [`position_hash`] of the base block's world grid position, so a
//! structure is reproducible from its position and the seed alone.
//! Structures never overwrite occupied positions.

use crate::block::{Block, BlockType};
use crate::chunk::{BlockRole, Chunk};
use crate::grid::GridPos;
use crate::noise::{position_hash, WorldSeed};

/// Multi-block features placed on terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// Wood trunk under a stepped leaf canopy.
    Tree,
    /// One or two rock blocks.
    Rock,
}

/// Canopy radius of each leaf layer, bottom to top.
const LEAF_LAYERS: [i32; 3] = [2, 1, 0];

/// Places structures into chunks.
#[derive(Clone, Copy, Debug)]
pub struct StructurePlacer {
    seed: i32,
}

impl StructurePlacer {
    /// Creates a placer for the given world seed.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self {
            seed: seed.hash_key(),
        }
    }

    /// Trunk height of a tree rooted at world position `base`.
    #[inline]
    #[must_use]
    pub const fn tree_height(&self, base: GridPos) -> i32 {
        4 + position_hash(base, self.seed) % 3
    }

    /// Height of a rock rooted at world position `base`.
    #[inline]
    #[must_use]
    pub const fn rock_height(&self, base: GridPos) -> i32 {
        if 1 + position_hash(base, self.seed) % 4 == 4 {
            2
        } else {
            1
        }
    }

    /// Places `kind` on the ground block at local position `base`.
    ///
    /// Returns the local positions that were actually added.
    pub fn place<H>(&self, kind: StructureKind, chunk: &mut Chunk<H>, base: GridPos) -> Vec<GridPos> {
        let world_base = chunk.local_to_world(base);
        let mut added = Vec::new();
        let mut put = |chunk: &mut Chunk<H>, pos: GridPos, block_type: BlockType| {
            if chunk.insert_block(BlockRole::Structure, Block::new(pos, block_type)) {
                added.push(pos);
            }
        };

        match kind {
            StructureKind::Tree => {
                let trunk = self.tree_height(world_base);
                // i = 0 is the ground block itself and is skipped as occupied
                for i in 0..=trunk {
                    put(chunk, base.with_y(base.y + i), BlockType::Wood);
                }
                for (layer, radius) in LEAF_LAYERS.iter().enumerate() {
                    let y = base.y + trunk - 1 + layer as i32;
                    for dx in -radius..=*radius {
                        for dz in -radius..=*radius {
                            put(
                                chunk,
                                GridPos::new(base.x + dx, y, base.z + dz),
                                BlockType::Leaf,
                            );
                        }
                    }
                }
            }
            StructureKind::Rock => {
                let height = self.rock_height(world_base);
                for i in 0..=height {
                    put(chunk, base.with_y(base.y + i), BlockType::Rock);
                }
            }
        }

        added
    }
}
