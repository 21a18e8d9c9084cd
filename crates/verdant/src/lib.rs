//! # VERDANT
//!
//! Infinite procedural voxel terrain, streamed around a moving viewer.
//!
//! ## Crates
//!
//! - [`procedural`]: noise, biomes, chunk model, terrain generation
//! - [`rendering`]: texture atlas and chunk meshing
//! - this crate: chunk cache, streaming controller, jobs, object factory
//!
//! ## Example
//!
//! ```rust,no_run
//! use verdant::{EngineConfig, StreamingController};
//!
//! let config = EngineConfig::default();
//! let mut controller = StreamingController::with_defaults(&config)?;
//!
//! let spawn = controller.start(0.0, 0.0);
//! println!("spawn on {spawn}");
//!
//! for step in 0..1_000 {
//!     controller.update(f64::from(step) * 0.5, 0.0);
//! }
//! # Ok::<(), verdant::EngineError>(())
//! ```

#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod error;
pub mod factory;
pub mod jobs;
pub mod spiral;
pub mod streaming;

pub use verdant_procedural as procedural;
pub use verdant_rendering as rendering;

pub use cache::ChunkCache;
pub use config::{EngineConfig, StreamingConfig};
pub use error::{EngineError, EngineResult};
pub use factory::{ObjectFactory, ObjectHandle, PooledFactory, PooledObject};
pub use jobs::{DeferredSpawner, InlineSpawner, Job, JobSpawner, RayonSpawner};
pub use spiral::SpiralOffsets;
pub use streaming::{ChunkVisual, StreamingController, StreamingStats, WorldChunk};
