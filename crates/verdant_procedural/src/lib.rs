//! # VERDANT Procedural Generation
//!
//! Deterministic terrain generation for an infinite, reproducible world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: World is generated in fixed-size square chunks
//! 3. **Thread-safe**: A generation job owns its chunk outright
//! 4. **Pure sampling**: Height and biome are functions of `(seed, x, z)`
//!
//! ## Core Components
//!
//! - `TerrainSampler`: World XZ to height and surface block
//! - `StructurePlacer`: Seed-hashed trees and rocks
//! - `TerrainGenerator`: Surface, structures, gap filler, column index
//! - `Chunk`: Block maps, column index, walkability nodes
//!
//! ## Example
//!
//! ```rust
//! use verdant_procedural::{Chunk, ChunkLayout, GridPos, TerrainConfig, TerrainGenerator, WorldConfig};
//!
//! let world = WorldConfig::with_seed(12345);
//! let generator = TerrainGenerator::new(&world, TerrainConfig::default());
//!
//! let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
//! generator.generate(&mut chunk);
//!
//! assert!(chunk.is_generated());
//! assert!(chunk.topmost_block(8, 8).is_ok());
//! ```

#![deny(unsafe_code)]

pub mod biome;
pub mod block;
pub mod chunk;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod noise;
pub mod structure;

pub use biome::{Biome, BiomeWeights, ColumnSample, TerrainSampler};
pub use block::{Block, BlockType, Node, Walkability};
pub use chunk::{BlockRole, Chunk, ChunkLayout, ChunkState, ColumnKey, CHUNK_SIZE};
pub use config::{StructureTrigger, TerrainConfig, WorldConfig};
pub use error::{TerrainError, TerrainResult};
pub use generator::TerrainGenerator;
pub use grid::{Face, GridPos};
pub use noise::{ConstantNoise, NoiseSource, SimplexNoise, WorldSeed};
pub use structure::{StructureKind, StructurePlacer};
