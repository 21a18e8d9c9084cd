//! # VERDANT Rendering
//!
//! CPU-side mesh data for terrain chunks.
//!
//! ## Modules
//!
//! - `atlas`: Texture provider, atlas loading, block sprite table
//! - `mesher`: Face-culled chunk meshing

#![deny(unsafe_code)]

pub mod atlas;
pub mod error;
pub mod mesher;

pub use atlas::{AtlasConfig, BlockTextures, SpriteRect, TextureAtlas, TextureProvider, UvRect};
pub use error::{AtlasError, AtlasResult};
pub use mesher::{Aabb, ChunkMesh, MeshBuilder, MeshVertex};
