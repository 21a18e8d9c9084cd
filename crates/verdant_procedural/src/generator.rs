//! # Terrain Generator
//!
//! Populates a chunk in four passes:
//!
//! 1. **Surface**: one ground block per column from the biome sampler.
//! 2. **Structures**: trees and rocks where their trigger noise fires.
//! 3. **Filler**: vertical gap fill wherever a horizontal neighbour's
//!    surface sits more than one block lower.
//! 4. **Index**: the `(x, z, depth)` column index.
//!
//! Generation reads only the immutable sampler and placer and writes only
//! into the chunk it is handed, so it runs on any worker thread.

use crate::biome::TerrainSampler;
use crate::block::{Block, BlockType};
use crate::chunk::{BlockRole, Chunk};
use crate::config::{TerrainConfig, WorldConfig};
use crate::grid::{Face, GridPos};
use crate::noise::{NoiseSource, SimplexNoise};
use crate::structure::{StructureKind, StructurePlacer};

/// Produces chunk contents from world position and seed.
pub struct TerrainGenerator<N = SimplexNoise> {
    sampler: TerrainSampler<N>,
    placer: StructurePlacer,
}

impl TerrainGenerator<SimplexNoise> {
    /// Creates a generator over seeded simplex noise.
    #[must_use]
    pub fn new(world: &WorldConfig, terrain: TerrainConfig) -> Self {
        Self::with_noise(SimplexNoise::new(world.world_seed()), world, terrain)
    }
}

impl<N: NoiseSource> TerrainGenerator<N> {
    /// Creates a generator over an arbitrary noise field.
    #[must_use]
    pub fn with_noise(noise: N, world: &WorldConfig, terrain: TerrainConfig) -> Self {
        Self {
            sampler: TerrainSampler::new(noise, world, terrain),
            placer: StructurePlacer::new(world.world_seed()),
        }
    }

    /// The biome sampler.
    #[must_use]
    pub fn sampler(&self) -> &TerrainSampler<N> {
        &self.sampler
    }

    /// Fills `chunk`. A chunk that is already generated is left as is.
    pub fn generate<H>(&self, chunk: &mut Chunk<H>) {
        if chunk.is_generated() {
            tracing::warn!(chunk = %chunk.position(), "chunk already generated, skipping");
            return;
        }

        self.place_surface(chunk);
        let surface = sorted_ground(chunk);
        self.place_structures(chunk, &surface);
        fill_gaps(chunk, &surface);
        chunk.rebuild_column_index();
        chunk.mark_generated();

        debug_assert!(
            chunk.validate().is_ok(),
            "generated chunk failed validation: {:?}",
            chunk.validate()
        );
        tracing::debug!(
            chunk = %chunk.position(),
            blocks = chunk.blocks().len(),
            structures = chunk.structure_blocks().len(),
            fillers = chunk.filler_blocks().len(),
            "chunk generated"
        );
    }

    fn place_surface<H>(&self, chunk: &mut Chunk<H>) {
        let size = chunk.layout().blocks_per_side();
        for x in 0..size {
            for z in 0..size {
                let (wx, wz) = chunk.column_world_center(x, z);
                let column = self.sampler.sample(wx, wz);
                let pos = GridPos::new(x, column.height, z);
                chunk.insert_block(BlockRole::Ground, Block::new(pos, column.block_type));
            }
        }
    }

    fn place_structures<H>(&self, chunk: &mut Chunk<H>, surface: &[Block]) {
        let terrain = self.sampler.terrain();
        for block in surface {
            let world = chunk.local_to_world(block.position());
            let (wx, wz) = (f64::from(world.x), f64::from(world.z));

            let tree = self.sampler.noise_at(wx, wz, terrain.tree.scale);
            if terrain.tree.fires(tree) && block.block_type() == BlockType::Grass {
                self.placer
                    .place(StructureKind::Tree, chunk, block.position());
            }

            let rock = self.sampler.noise_at(wx, wz, terrain.rock.scale);
            if terrain.rock.fires(rock) && block.block_type() != BlockType::Sand {
                self.placer
                    .place(StructureKind::Rock, chunk, block.position());
            }
        }
    }
}

/// Ground blocks in column order, so passes are independent of map order.
fn sorted_ground<H>(chunk: &Chunk<H>) -> Vec<Block> {
    let mut surface: Vec<Block> = chunk.ground_blocks().values().copied().collect();
    surface.sort_unstable_by_key(|b| (b.position().x, b.position().z));
    surface
}

/// Fills from one below each ground block down to its lowest neighbour
/// surface that is more than one block lower.
fn fill_gaps<H>(chunk: &mut Chunk<H>, surface: &[Block]) {
    for block in surface {
        let pos = block.position();
        let lowest = Face::HORIZONTAL
            .iter()
            .filter_map(|face| {
                let n = pos.neighbour(*face);
                chunk.ground_at(n.x, n.z).map(|g| g.position().y)
            })
            .filter(|ny| *ny < pos.y - 1)
            .min();

        if let Some(bottom) = lowest {
            for y in (bottom..pos.y).rev() {
                chunk.insert_block(
                    BlockRole::Filler,
                    Block::new(pos.with_y(y), block.block_type()),
                );
            }
        }
    }
}
