//! # Engine Configuration
//!
//! One TOML file, one section per subsystem. Every section has defaults,
//! so a file only needs the values it changes:
//!
//! ```toml
//! [world]
//! seed = 42
//!
//! [streaming]
//! load_radius = 64.0
//! max_cached_chunks = 200
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use verdant_procedural::{ChunkLayout, TerrainConfig, WorldConfig, CHUNK_SIZE};
use verdant_rendering::{AtlasConfig, BlockTextures, TextureAtlas};

use crate::error::{EngineError, EngineResult};

/// Tile edge of the generated fallback atlas, in pixels.
const FALLBACK_TILE: f32 = 16.0;
/// Tiles per row of the generated fallback atlas.
const FALLBACK_COLUMNS: usize = 16;

/// Chunk streaming tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Blocks along one chunk edge.
    pub chunk_size: i32,
    /// Chunks whose center lies within this many world units of the
    /// viewer's chunk are resident.
    pub load_radius: f64,
    /// Cache size above which unloaded chunks are evicted.
    pub max_cached_chunks: usize,
    /// Chunks loaded per tick.
    pub load_budget: usize,
    /// Chunks unloaded per tick.
    pub unload_budget: usize,
    /// Pick side textures per face from a position hash.
    pub randomize_side_textures: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            load_radius: 100.0,
            max_cached_chunks: 100,
            load_budget: 1,
            unload_budget: 1,
            randomize_side_textures: false,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed and block size.
    pub world: WorldConfig,
    /// Terrain shaping.
    pub terrain: TerrainConfig,
    /// Chunk streaming.
    pub streaming: StreamingConfig,
    /// Sprite layout for the default texture atlas.
    pub atlas: Option<AtlasConfig>,
}

impl EngineConfig {
    /// Parses and validates a TOML config.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] for malformed TOML, otherwise as
    /// [`EngineConfig::validate`].
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// [`EngineError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| EngineError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), seed = config.world.seed, "config loaded");
        Ok(config)
    }

    /// Chunk layout implied by the world and streaming sections.
    ///
    /// # Errors
    ///
    /// [`EngineError::Terrain`] if the chunk size and block size do not
    /// give a whole-unit chunk.
    pub fn layout(&self) -> EngineResult<ChunkLayout> {
        Ok(ChunkLayout::new(
            self.streaming.chunk_size,
            self.world.block_size,
        )?)
    }

    /// Texture atlas from the `[atlas]` section, or a tiled atlas holding
    /// every block sprite name if the section is absent.
    ///
    /// # Errors
    ///
    /// [`EngineError::Atlas`] if the configured atlas is invalid.
    pub fn texture_atlas(&self) -> EngineResult<TextureAtlas> {
        let atlas = match &self.atlas {
            Some(config) => TextureAtlas::from_config(config)?,
            None => {
                let textures = BlockTextures::new();
                let config =
                    AtlasConfig::tiled(textures.sprite_names(), FALLBACK_TILE, FALLBACK_COLUMNS);
                TextureAtlas::from_config(&config)?
            }
        };
        Ok(atlas)
    }

    /// Rejects values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// [`EngineError::Terrain`] for a bad world or chunk layout,
    /// [`EngineError::Config`] for a bad radius or zero budget.
    pub fn validate(&self) -> EngineResult<()> {
        self.world.validate()?;
        self.layout()?;

        let s = &self.streaming;
        if !s.load_radius.is_finite() || s.load_radius < 0.0 {
            return Err(EngineError::Config(format!(
                "load_radius must be a non-negative number, got {}",
                s.load_radius
            )));
        }
        if s.load_budget == 0 || s.unload_budget == 0 {
            return Err(EngineError::Config(
                "load_budget and unload_budget must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
