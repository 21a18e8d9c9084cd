//! # Engine Error Types

use thiserror::Error;
use verdant_procedural::{GridPos, TerrainError};
use verdant_rendering::AtlasError;

/// Errors surfaced by the streaming engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Terrain query or layout failure.
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    /// Texture atlas failure.
    #[error(transparent)]
    Atlas(#[from] AtlasError),

    /// Malformed or out-of-range configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A config file could not be read.
    #[error("cannot read {path}: {message}")]
    Io {
        /// File that failed.
        path: String,
        /// OS error text.
        message: String,
    },

    /// The chunk is not in the cache.
    #[error("chunk {0} is not cached")]
    ChunkNotCached(GridPos),
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
