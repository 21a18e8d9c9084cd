//! # Rendering Error Types

use thiserror::Error;

/// Errors raised while building or querying the texture atlas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtlasError {
    /// The atlas description could not be parsed.
    #[error("atlas parse error: {0}")]
    Parse(String),

    /// The atlas has a zero or negative pixel size.
    #[error("invalid atlas size {width}x{height}")]
    InvalidSize {
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
    },

    /// A sprite rect lies outside the atlas.
    #[error("sprite '{0}' lies outside the atlas")]
    SpriteOutOfBounds(String),

    /// No sprite with this name.
    #[error("sprite not found: {0}")]
    SpriteNotFound(String),
}

impl From<toml::de::Error> for AtlasError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;
