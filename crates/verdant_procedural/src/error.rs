//! # Terrain Error Types
//!
//! All errors that can occur while generating or querying terrain.

use thiserror::Error;

use crate::grid::GridPos;

/// Errors that can occur in terrain generation and chunk queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    /// A chunk's block maps disagree with each other.
    #[error("chunk {chunk} invariant violated: {detail}")]
    InvariantViolation {
        /// Chunk key.
        chunk: GridPos,
        /// What went wrong.
        detail: String,
    },

    /// The chunk has not been generated yet.
    #[error("chunk {0} is not generated")]
    ChunkNotGenerated(GridPos),

    /// No block was indexed for the requested column.
    #[error("no block in chunk {chunk} at column ({x}, {z}) depth {depth}")]
    ColumnNotFound {
        /// Chunk key.
        chunk: GridPos,
        /// Local column X.
        x: i32,
        /// Local column Z.
        z: i32,
        /// Depth from the top of the column.
        depth: u32,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
