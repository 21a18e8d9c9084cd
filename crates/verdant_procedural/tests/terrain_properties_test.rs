//! # Terrain Property Tests
//!
//! Invariants every generated chunk must satisfy, checked over a grid of
//! chunks and several seeds.

use std::collections::HashSet;

use verdant_procedural::{
    Chunk, ChunkLayout, Face, GridPos, SimplexNoise, TerrainConfig, TerrainGenerator,
    TerrainSampler, WorldConfig,
};

fn generate(seed: u64, key: GridPos) -> Chunk {
    let world = WorldConfig::with_seed(seed);
    let generator = TerrainGenerator::new(&world, TerrainConfig::default());
    let mut chunk = Chunk::new(key, ChunkLayout::default());
    generator.generate(&mut chunk);
    chunk
}

fn sample_keys() -> Vec<GridPos> {
    let mut keys = Vec::new();
    for cx in -3..3 {
        for cz in -3..3 {
            keys.push(GridPos::new(cx * 16, 0, cz * 16));
        }
    }
    keys
}

/// Test: Same seed, same column, same answer.
#[test]
fn test_sample_is_deterministic() {
    let world = WorldConfig::with_seed(42);
    let a = TerrainSampler::new(
        SimplexNoise::new(world.world_seed()),
        &world,
        TerrainConfig::default(),
    );
    let b = TerrainSampler::new(
        SimplexNoise::new(world.world_seed()),
        &world,
        TerrainConfig::default(),
    );
    for x in (-500..500).step_by(7) {
        for z in (-500..500).step_by(11) {
            assert_eq!(a.sample(f64::from(x), f64::from(z)), b.sample(f64::from(x), f64::from(z)));
        }
    }
}

/// Test: Regenerating a chunk yields the same block set.
#[test]
fn test_chunk_generation_is_deterministic() {
    for key in sample_keys().into_iter().take(8) {
        let a = generate(777, key);
        let b = generate(777, key);
        assert_eq!(a.blocks(), b.blocks(), "chunk {key} differs between runs");
        assert_eq!(a.block_positions(), b.block_positions());
    }
}

/// Test: `blocks` is exactly the disjoint union of the role maps.
#[test]
fn test_blocks_are_disjoint_union_of_roles() {
    for seed in [1, 42, 9001] {
        for key in sample_keys() {
            let chunk = generate(seed, key);
            chunk.validate().unwrap();

            let ground: HashSet<_> = chunk.ground_blocks().keys().collect();
            let filler: HashSet<_> = chunk.filler_blocks().keys().collect();
            let structure: HashSet<_> = chunk.structure_blocks().keys().collect();
            assert!(ground.is_disjoint(&filler));
            assert!(ground.is_disjoint(&structure));
            assert!(filler.is_disjoint(&structure));
            assert_eq!(
                ground.len() + filler.len() + structure.len(),
                chunk.blocks().len()
            );
        }
    }
}

/// Test: Every column has exactly one ground block.
#[test]
fn test_one_ground_block_per_column() {
    let chunk = generate(5, GridPos::new(48, 0, -32));
    assert_eq!(chunk.ground_blocks().len(), 16 * 16);
    for x in 0..16 {
        for z in 0..16 {
            assert!(chunk.ground_at(x, z).is_some(), "column ({x}, {z}) has no ground");
        }
    }
}

/// Test: Steps of more than one block are filled down to the neighbour.
#[test]
fn test_filler_closes_height_gaps() {
    for key in sample_keys() {
        let chunk = generate(31337, key);
        for ground in chunk.ground_blocks().values() {
            let pos = ground.position();
            for face in Face::HORIZONTAL {
                let n = pos.neighbour(face);
                let Some(neighbour) = chunk.ground_at(n.x, n.z) else {
                    continue;
                };
                let ny = neighbour.position().y;
                if ny >= pos.y - 1 {
                    continue;
                }
                for y in ny..pos.y {
                    assert!(
                        chunk.is_occupied(pos.with_y(y)),
                        "gap at {} below ground {pos} next to {}",
                        pos.with_y(y),
                        neighbour.position()
                    );
                }
            }
        }
    }
}

/// Test: The column index agrees with the block map.
#[test]
fn test_column_index_covers_every_block() {
    let chunk = generate(2024, GridPos::new(-16, 0, 16));
    let indexed: HashSet<GridPos> = chunk.block_positions().values().copied().collect();
    let all: HashSet<GridPos> = chunk.blocks().keys().copied().collect();
    assert_eq!(indexed, all);

    for x in 0..16 {
        for z in 0..16 {
            let top = chunk.topmost_block(x, z).unwrap();
            let highest = chunk
                .blocks()
                .keys()
                .filter(|p| p.x == x && p.z == z)
                .map(|p| p.y)
                .max()
                .unwrap();
            assert_eq!(top.y, highest);
        }
    }
}

/// Test: Structures grow somewhere in a large enough area.
#[test]
fn test_structures_appear() {
    let world = WorldConfig::with_seed(42);
    let generator = TerrainGenerator::new(&world, TerrainConfig::default());
    let mut structures = 0;
    for cx in -6..6 {
        for cz in -6..6 {
            let mut chunk: Chunk = Chunk::new(GridPos::new(cx * 16, 0, cz * 16), ChunkLayout::default());
            generator.generate(&mut chunk);
            structures += chunk.structure_blocks().len();
        }
    }
    assert!(structures > 0, "no trees or rocks in 144 chunks");
}
