//! # Mesh Property Tests
//!
//! Meshes of real generated chunks: culling, index width, texture lookup.

use std::collections::HashSet;
use std::sync::Arc;

use verdant_procedural::{
    Chunk, ChunkLayout, Face, GridPos, TerrainConfig, TerrainGenerator, WorldConfig,
};
use verdant_rendering::{AtlasConfig, BlockTextures, MeshBuilder, TextureAtlas, UvRect};

fn generated(seed: u64, key: GridPos) -> Chunk {
    let world = WorldConfig::with_seed(seed);
    let generator = TerrainGenerator::new(&world, TerrainConfig::default());
    let mut chunk = Chunk::new(key, ChunkLayout::default());
    generator.generate(&mut chunk);
    chunk
}

fn full_atlas() -> Arc<TextureAtlas> {
    let names = BlockTextures::new().sprite_names().into_iter().map(str::to_owned).collect::<Vec<_>>();
    Arc::new(TextureAtlas::from_config(&AtlasConfig::tiled(names, 16.0, 16)).unwrap())
}

/// Test: Face count equals the number of exposed faces in the block map.
#[test]
fn test_face_count_matches_exposed_faces() {
    let builder = MeshBuilder::new(full_atlas());
    for key in [GridPos::ZERO, GridPos::new(64, 0, -32), GridPos::new(-160, 0, 96)] {
        let chunk = generated(42, key);
        let exposed: usize = chunk
            .blocks()
            .keys()
            .map(|p| {
                Face::ALL
                    .iter()
                    .filter(|f| !chunk.is_occupied(p.neighbour(**f)))
                    .count()
            })
            .sum();

        let mesh = builder.build_mesh(&chunk);
        assert_eq!(mesh.face_count(), exposed);
        assert_eq!(mesh.indices.len(), exposed * 6);
        assert!(mesh.indices.iter().all(|i| (*i as usize) < mesh.vertex_count()));
    }
}

/// Test: No quad lies between two occupied cells.
#[test]
fn test_no_quad_between_occupied_cells() {
    let chunk = generated(7, GridPos::new(16, 0, 16));
    let mesh = MeshBuilder::new(full_atlas()).build_mesh(&chunk);
    let occupied: HashSet<GridPos> = chunk.blocks().keys().copied().collect();

    for quad in mesh.vertices.chunks_exact(4) {
        let n = quad[0].normal;
        let mid: Vec<f32> = (0..3)
            .map(|a| quad.iter().map(|v| v.position[a]).sum::<f32>() / 4.0)
            .collect();
        // Step half a block either side of the quad and map back to grid cells
        let cell = |sign: f32| {
            GridPos::new(
                (mid[0] + sign * 0.5 * n[0] + 8.0 - 0.5).round() as i32,
                (mid[1] + sign * 0.5 * n[1]).round() as i32,
                (mid[2] + sign * 0.5 * n[2] + 8.0 - 0.5).round() as i32,
            )
        };
        assert!(occupied.contains(&cell(-1.0)), "quad not backed by a block");
        assert!(!occupied.contains(&cell(1.0)), "quad between two blocks");
    }
}

/// Test: With a complete atlas no face gets the zero rect.
#[test]
fn test_every_face_is_textured() {
    let chunk = generated(99, GridPos::ZERO);
    let mesh = MeshBuilder::new(full_atlas())
        .with_randomized_sides(true)
        .build_mesh(&chunk);
    for quad in mesh.vertices.chunks_exact(4) {
        let uvs: Vec<[f32; 2]> = quad.iter().map(|v| v.uv).collect();
        assert_ne!(uvs, UvRect::ZERO.corners().to_vec());
    }
}

/// Test: A large slab pushes the vertex count past the 16-bit range.
#[test]
fn test_wide_indices() {
    let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
    // Checkerboard columns maximize exposed faces
    for x in 0..16 {
        for z in 0..16 {
            if (x + z) % 2 == 0 {
                for y in 0..40 {
                    chunk.insert_block(
                        verdant_procedural::BlockRole::Filler,
                        verdant_procedural::Block::new(
                            GridPos::new(x, y, z),
                            verdant_procedural::BlockType::Stone,
                        ),
                    );
                }
            }
        }
    }
    let mesh = MeshBuilder::new(full_atlas()).build_mesh(&chunk);
    assert!(mesh.vertex_count() > usize::from(u16::MAX));
    assert!(mesh.indices.iter().any(|i| *i > u32::from(u16::MAX)));
}
