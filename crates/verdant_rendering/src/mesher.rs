//! # Chunk Mesher
//!
//! Face-culled quad meshing of a chunk's block occupancy.
//!
//! ## Output
//!
//! - One quad per exposed face; a face between two occupied cells is never
//!   emitted.
//! - Four unshared vertices per quad, wound `(0, 1, 2), (2, 3, 0)` so every
//!   triangle faces outward.
//! - `u32` indices: a busy chunk easily passes 65 536 vertices.
//! - Normals and bounds are recomputed from the finished vertex set.
//!
//! Vertex positions are relative to the chunk center, so a visual placed at
//! the chunk key renders in world space.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use verdant_procedural::noise::face_variant_hash;
use verdant_procedural::{BlockType, Chunk, Face, GridPos};

use crate::atlas::{BlockTextures, TextureProvider};

// =============================================================================
// VERTEX FORMAT
// =============================================================================

/// Interleaved mesh vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position relative to the chunk center.
    pub position: [f32; 3],
    /// Unit normal, filled by [`ChunkMesh::recalculate_normals`].
    pub normal: [f32; 3],
    /// Atlas UV.
    pub uv: [f32; 2],
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

// =============================================================================
// MESH OUTPUT
// =============================================================================

/// Complete mesh data for a chunk (vertices + indices).
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    /// Vertex buffer data.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer data (u32 for large meshes).
    pub indices: Vec<u32>,
    bounds: Aabb,
}

impl ChunkMesh {
    /// Check if mesh is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get triangle count.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex count.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of emitted quads.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Bounds as of the last [`ChunkMesh::recalculate_bounds`].
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Sets every vertex normal from the triangles that use it.
    ///
    /// Vertices are never shared between quads, so each gets its face
    /// normal.
    pub fn recalculate_normals(&mut self) {
        let mut sums = vec![[0.0f32; 3]; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = self.vertices[a].position;
            let e1 = sub(self.vertices[b].position, p0);
            let e2 = sub(self.vertices[c].position, p0);
            let n = cross(e1, e2);
            for i in [a, b, c] {
                for axis in 0..3 {
                    sums[i][axis] += n[axis];
                }
            }
        }
        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            vertex.normal = normalize(sum);
        }
    }

    /// Recomputes the bounding box from vertex positions.
    pub fn recalculate_bounds(&mut self) {
        let Some(first) = self.vertices.first() else {
            self.bounds = Aabb::default();
            return;
        };
        let mut bounds = Aabb {
            min: first.position,
            max: first.position,
        };
        for v in &self.vertices {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(v.position[axis]);
                bounds.max[axis] = bounds.max[axis].max(v.position[axis]);
            }
        }
        self.bounds = bounds;
    }
}

#[inline]
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0; 3]
    }
}

// =============================================================================
// FACE TABLE
// =============================================================================

/// Unit-cube corners of each face, in quad order.
const fn face_corners(face: Face) -> [[f32; 3]; 4] {
    match face {
        Face::Top => [
            [-0.5, 0.5, -0.5],
            [-0.5, 0.5, 0.5],
            [0.5, 0.5, 0.5],
            [0.5, 0.5, -0.5],
        ],
        Face::Bottom => [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [-0.5, -0.5, 0.5],
        ],
        Face::Front => [
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ],
        Face::Back => [
            [0.5, -0.5, -0.5],
            [-0.5, -0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [0.5, 0.5, -0.5],
        ],
        Face::Right => [
            [0.5, -0.5, 0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
        ],
        Face::Left => [
            [-0.5, -0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [-0.5, 0.5, 0.5],
            [-0.5, 0.5, -0.5],
        ],
    }
}

/// Quad-local triangle indices.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

// =============================================================================
// MESH BUILDER
// =============================================================================

/// Builds chunk meshes against a shared texture provider.
pub struct MeshBuilder {
    provider: Arc<dyn TextureProvider>,
    textures: BlockTextures,
    randomize_sides: bool,
}

impl MeshBuilder {
    /// Creates a builder with fixed side textures.
    #[must_use]
    pub fn new(provider: Arc<dyn TextureProvider>) -> Self {
        Self {
            provider,
            textures: BlockTextures::new(),
            randomize_sides: false,
        }
    }

    /// Picks one of the four side sprites per face from a position hash.
    #[must_use]
    pub fn with_randomized_sides(mut self, enabled: bool) -> Self {
        self.randomize_sides = enabled;
        self
    }

    /// Sprite table in use.
    #[must_use]
    pub fn textures(&self) -> &BlockTextures {
        &self.textures
    }

    /// Meshes every exposed face of every block in `chunk`.
    #[must_use]
    pub fn build_mesh<H>(&self, chunk: &Chunk<H>) -> ChunkMesh {
        let blocks = chunk.blocks();
        let layout = chunk.layout();
        let size = layout.block_size() as f32;
        let half = layout.half_size() as f32;

        // Sorted for a stable vertex order across rebuilds
        let mut positions: Vec<&GridPos> = blocks.keys().collect();
        positions.sort_unstable();

        let mut mesh = ChunkMesh::default();
        for pos in positions {
            let block_type = blocks[pos].block_type();
            for face in Face::ALL {
                if blocks.contains_key(&pos.neighbour(face)) {
                    continue;
                }
                let sprite = self.sprite_for(chunk, *pos, block_type, face);
                let uvs = self.provider.uv_rect(sprite).corners();

                let base = mesh.vertices.len() as u32;
                for (corner, uv) in face_corners(face).iter().zip(uvs) {
                    mesh.vertices.push(MeshVertex {
                        position: [
                            (pos.x as f32 + 0.5 + corner[0]) * size - half,
                            (pos.y as f32 + corner[1]) * size,
                            (pos.z as f32 + 0.5 + corner[2]) * size - half,
                        ],
                        normal: [0.0; 3],
                        uv,
                    });
                }
                mesh.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
            }
        }

        mesh.recalculate_normals();
        mesh.recalculate_bounds();
        tracing::trace!(
            chunk = %chunk.position(),
            faces = mesh.face_count(),
            "chunk meshed"
        );
        mesh
    }

    fn sprite_for<H>(&self, chunk: &Chunk<H>, pos: GridPos, block_type: BlockType, face: Face) -> &str {
        let textured = match face.random_side_index() {
            Some(slot) if self.randomize_sides => {
                let world = chunk.local_to_world(pos);
                Face::RANDOM_SIDES[face_variant_hash(world, slot)]
            }
            _ => face,
        };
        self.textures.sprite(block_type, textured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{AtlasConfig, TextureAtlas, UvRect};
    use verdant_procedural::{Block, BlockRole, ChunkLayout};

    fn builder() -> MeshBuilder {
        let textures = BlockTextures::new();
        let atlas =
            TextureAtlas::from_config(&AtlasConfig::tiled(textures.sprite_names(), 16.0, 16))
                .unwrap();
        MeshBuilder::new(Arc::new(atlas))
    }

    fn chunk_with(positions: &[(i32, i32, i32)]) -> Chunk {
        let mut chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        for &(x, y, z) in positions {
            chunk.insert_block(
                BlockRole::Ground,
                Block::new(GridPos::new(x, y, z), BlockType::Grass),
            );
        }
        chunk
    }

    #[test]
    fn test_single_block_has_six_faces() {
        let mesh = builder().build_mesh(&chunk_with(&[(4, 4, 4)]));

        // Single voxel should produce 6 quads = 6*4 vertices, 6*6 indices
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_shared_face_is_culled() {
        let mesh = builder().build_mesh(&chunk_with(&[(4, 4, 4), (5, 4, 4)]));
        assert_eq!(mesh.face_count(), 10);

        let column = builder().build_mesh(&chunk_with(&[(1, 1, 1), (1, 2, 1), (1, 3, 1)]));
        assert_eq!(column.face_count(), 14);
    }

    #[test]
    fn test_no_internal_faces_in_solid_cube() {
        let mut cells = Vec::new();
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..3 {
                    cells.push((x, y, z));
                }
            }
        }
        let mesh = builder().build_mesh(&chunk_with(&cells));
        // 6 sides of 3x3 faces
        assert_eq!(mesh.face_count(), 54);
    }

    #[test]
    fn test_normals_point_outward() {
        let mesh = builder().build_mesh(&chunk_with(&[(0, 0, 0)]));
        let center = [0.5 - 8.0, 0.0, 0.5 - 8.0];
        for quad in mesh.vertices.chunks_exact(4) {
            let n = quad[0].normal;
            assert!(quad.iter().all(|v| v.normal == n));
            let mid = [
                quad.iter().map(|v| v.position[0]).sum::<f32>() / 4.0 - center[0],
                quad.iter().map(|v| v.position[1]).sum::<f32>() / 4.0 - center[1],
                quad.iter().map(|v| v.position[2]).sum::<f32>() / 4.0 - center[2],
            ];
            let dot = n[0] * mid[0] + n[1] * mid[1] + n[2] * mid[2];
            assert!(dot > 0.0, "normal {n:?} points inward");
        }
    }

    #[test]
    fn test_bounds_cover_vertices() {
        let mesh = builder().build_mesh(&chunk_with(&[(0, 0, 0), (15, 9, 15)]));
        let bounds = mesh.bounds();
        assert_eq!(bounds.min, [-8.0, -0.5, -8.0]);
        assert_eq!(bounds.max, [8.0, 9.5, 8.0]);
    }

    #[test]
    fn test_uvs_come_from_provider() {
        struct Fixed;
        impl TextureProvider for Fixed {
            fn uv_rect(&self, _sprite: &str) -> UvRect {
                UvRect {
                    x_min: 0.1,
                    y_min: 0.2,
                    x_max: 0.3,
                    y_max: 0.4,
                }
            }
        }
        let mesh = MeshBuilder::new(Arc::new(Fixed)).build_mesh(&chunk_with(&[(2, 2, 2)]));
        let quad: Vec<[f32; 2]> = mesh.vertices[..4].iter().map(|v| v.uv).collect();
        assert_eq!(quad, vec![[0.1, 0.2], [0.3, 0.2], [0.3, 0.4], [0.1, 0.4]]);
    }

    #[test]
    fn test_randomized_sides_are_stable() {
        let chunk = chunk_with(&[(3, 3, 3), (7, 1, 9)]);
        let builder = builder().with_randomized_sides(true);
        let a = builder.build_mesh(&chunk);
        let b = builder.build_mesh(&chunk);
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.face_count(), 12);
    }

    #[test]
    fn test_empty_chunk_gives_empty_mesh() {
        let mesh = builder().build_mesh(&chunk_with(&[]));
        assert!(mesh.is_empty());
        assert_eq!(mesh.bounds(), Aabb::default());
    }
}
