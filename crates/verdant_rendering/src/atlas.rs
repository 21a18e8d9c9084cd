//! # Texture Atlas
//!
//! Maps sprite names to normalized UV rectangles, and block faces to
//! sprite names.
//!
//! ## Sprite Naming
//!
//! Every block type owns six sprites named `"{Block} Top"`,
//! `"{Block} Bottom"` and `"{Block} Side N"`:
//!
//! | Sprite   | Face |
//! |----------|------|
//! | `Side 0` | -X   |
//! | `Side 1` | -Z   |
//! | `Side 2` | +X   |
//! | `Side 3` | +Z   |
//!
//! ## Misses
//!
//! A missing sprite is not fatal: [`TextureProvider::uv_rect`] logs it once
//! and returns [`UvRect::ZERO`].

use std::collections::{BTreeMap, HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use verdant_procedural::{BlockType, Face};

use crate::error::{AtlasError, AtlasResult};

/// Normalized texture rectangle.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct UvRect {
    /// Left edge.
    pub x_min: f32,
    /// Bottom edge.
    pub y_min: f32,
    /// Right edge.
    pub x_max: f32,
    /// Top edge.
    pub y_max: f32,
}

impl UvRect {
    /// The empty rect returned for unknown sprites.
    pub const ZERO: Self = Self {
        x_min: 0.0,
        y_min: 0.0,
        x_max: 0.0,
        y_max: 0.0,
    };

    /// UVs for the four quad corners, in mesh vertex order.
    #[inline]
    #[must_use]
    pub const fn corners(&self) -> [[f32; 2]; 4] {
        [
            [self.x_min, self.y_min],
            [self.x_max, self.y_min],
            [self.x_max, self.y_max],
            [self.x_min, self.y_max],
        ]
    }
}

/// Read-only sprite lookup shared by every mesh build.
pub trait TextureProvider: Send + Sync {
    /// UV rect of `sprite`, or [`UvRect::ZERO`] if the atlas has no such sprite.
    fn uv_rect(&self, sprite: &str) -> UvRect;
}

/// Pixel rectangle of one sprite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteRect {
    /// Left edge in pixels.
    pub x: f32,
    /// Bottom edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Atlas description, usually loaded from TOML.
///
/// ```toml
/// width = 256.0
/// height = 256.0
///
/// [sprites."Grass Top"]
/// x = 0.0
/// y = 0.0
/// width = 16.0
/// height = 16.0
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Atlas width in pixels.
    pub width: f32,
    /// Atlas height in pixels.
    pub height: f32,
    /// Named sprite rects.
    #[serde(default)]
    pub sprites: BTreeMap<String, SpriteRect>,
}

impl AtlasConfig {
    /// Lays `names` out row by row on a grid of square tiles.
    #[must_use]
    pub fn tiled<I, S>(names: I, tile: f32, columns: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.max(1);
        let sprites: BTreeMap<String, SpriteRect> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let rect = SpriteRect {
                    x: (i % columns) as f32 * tile,
                    y: (i / columns) as f32 * tile,
                    width: tile,
                    height: tile,
                };
                (name.into(), rect)
            })
            .collect();
        let rows = sprites.len().div_ceil(columns).max(1);
        Self {
            width: columns as f32 * tile,
            height: rows as f32 * tile,
            sprites,
        }
    }
}

/// In-memory atlas: sprite name to normalized rect.
pub struct TextureAtlas {
    rects: HashMap<String, UvRect>,
    /// Names already reported missing, so each miss is logged once.
    reported: Mutex<HashSet<String>>,
}

impl TextureAtlas {
    /// Builds an atlas, normalizing every sprite rect by the atlas size.
    ///
    /// # Errors
    ///
    /// [`AtlasError::InvalidSize`] for a non-positive atlas size,
    /// [`AtlasError::SpriteOutOfBounds`] for a sprite outside the atlas.
    pub fn from_config(config: &AtlasConfig) -> AtlasResult<Self> {
        let (w, h) = (config.width, config.height);
        if !(w > 0.0 && h > 0.0) {
            return Err(AtlasError::InvalidSize {
                width: w,
                height: h,
            });
        }

        let mut rects = HashMap::with_capacity(config.sprites.len());
        for (name, s) in &config.sprites {
            if s.x < 0.0 || s.y < 0.0 || s.x + s.width > w || s.y + s.height > h {
                return Err(AtlasError::SpriteOutOfBounds(name.clone()));
            }
            rects.insert(
                name.clone(),
                UvRect {
                    x_min: s.x / w,
                    y_min: s.y / h,
                    x_max: (s.x + s.width) / w,
                    y_max: (s.y + s.height) / h,
                },
            );
        }

        tracing::info!("Texture atlas ready: {} sprites", rects.len());
        Ok(Self {
            rects,
            reported: Mutex::new(HashSet::new()),
        })
    }

    /// Parses an [`AtlasConfig`] from TOML and builds the atlas.
    ///
    /// # Errors
    ///
    /// [`AtlasError::Parse`] for malformed TOML, otherwise as
    /// [`TextureAtlas::from_config`].
    pub fn from_toml_str(source: &str) -> AtlasResult<Self> {
        let config: AtlasConfig = toml::from_str(source)?;
        Self::from_config(&config)
    }

    /// Number of sprites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// True if the atlas has no sprites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// UV rect of `sprite`.
    ///
    /// # Errors
    ///
    /// [`AtlasError::SpriteNotFound`] if the atlas has no such sprite.
    pub fn try_uv_rect(&self, sprite: &str) -> AtlasResult<UvRect> {
        self.rects
            .get(sprite)
            .copied()
            .ok_or_else(|| AtlasError::SpriteNotFound(sprite.to_owned()))
    }
}

impl TextureProvider for TextureAtlas {
    fn uv_rect(&self, sprite: &str) -> UvRect {
        match self.try_uv_rect(sprite) {
            Ok(rect) => rect,
            Err(err) => {
                if self.reported.lock().insert(sprite.to_owned()) {
                    tracing::error!(sprite, "{err}");
                }
                UvRect::ZERO
            }
        }
    }
}

/// `(block type, face)` to sprite name, built once by naming convention.
#[derive(Clone, Debug)]
pub struct BlockTextures {
    names: HashMap<(BlockType, Face), String>,
}

impl BlockTextures {
    /// Builds the table for every block type and face.
    #[must_use]
    pub fn new() -> Self {
        let mut names = HashMap::with_capacity(BlockType::ALL.len() * Face::ALL.len());
        for block_type in BlockType::ALL {
            for face in Face::ALL {
                names.insert((block_type, face), sprite_name(block_type, face));
            }
        }
        Self { names }
    }

    /// Sprite name for one face of a block type.
    #[must_use]
    pub fn sprite(&self, block_type: BlockType, face: Face) -> &str {
        self.names
            .get(&(block_type, face))
            .map_or("", String::as_str)
    }

    /// Every sprite name in the table, sorted.
    #[must_use]
    pub fn sprite_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for BlockTextures {
    fn default() -> Self {
        Self::new()
    }
}

fn sprite_name(block_type: BlockType, face: Face) -> String {
    let name = block_type.name();
    match (face, face.side_index()) {
        (Face::Top, _) => format!("{name} Top"),
        (Face::Bottom, _) => format!("{name} Bottom"),
        (_, Some(side)) => format!("{name} Side {side}"),
        (_, None) => format!("{name} Top"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_normalization() {
        let mut config = AtlasConfig {
            width: 64.0,
            height: 32.0,
            sprites: BTreeMap::new(),
        };
        config.sprites.insert(
            "Grass Top".into(),
            SpriteRect {
                x: 16.0,
                y: 0.0,
                width: 16.0,
                height: 16.0,
            },
        );
        let atlas = TextureAtlas::from_config(&config).unwrap();
        let rect = atlas.uv_rect("Grass Top");
        assert_eq!(
            rect,
            UvRect {
                x_min: 0.25,
                y_min: 0.0,
                x_max: 0.5,
                y_max: 0.5
            }
        );
    }

    #[test]
    fn test_miss_returns_zero_rect() {
        let atlas = TextureAtlas::from_config(&AtlasConfig::tiled(["A"], 8.0, 4)).unwrap();
        assert_eq!(atlas.uv_rect("Nope"), UvRect::ZERO);
        assert_eq!(atlas.uv_rect("Nope"), UvRect::ZERO);
        assert!(matches!(
            atlas.try_uv_rect("Nope"),
            Err(AtlasError::SpriteNotFound(_))
        ));
    }

    #[test]
    fn test_rejects_bad_atlas() {
        let empty = AtlasConfig::default();
        assert!(matches!(
            TextureAtlas::from_config(&empty),
            Err(AtlasError::InvalidSize { .. })
        ));

        let mut config = AtlasConfig::tiled(["A"], 16.0, 1);
        config.sprites.insert(
            "Outside".into(),
            SpriteRect {
                x: 8.0,
                y: 0.0,
                width: 16.0,
                height: 16.0,
            },
        );
        assert_eq!(
            TextureAtlas::from_config(&config).err(),
            Some(AtlasError::SpriteOutOfBounds("Outside".into()))
        );
    }

    #[test]
    fn test_from_toml() {
        let atlas = TextureAtlas::from_toml_str(
            r#"
            width = 32.0
            height = 32.0

            [sprites."Sand Side 2"]
            x = 16.0
            y = 16.0
            width = 16.0
            height = 16.0
            "#,
        )
        .unwrap();
        assert_eq!(atlas.uv_rect("Sand Side 2").x_min, 0.5);
        assert!(matches!(
            TextureAtlas::from_toml_str("width = \"wide\""),
            Err(AtlasError::Parse(_))
        ));
    }

    #[test]
    fn test_block_texture_convention() {
        let textures = BlockTextures::new();
        assert_eq!(textures.sprite(BlockType::Grass, Face::Top), "Grass Top");
        assert_eq!(textures.sprite(BlockType::Stone, Face::Bottom), "Stone Bottom");
        assert_eq!(textures.sprite(BlockType::Sand, Face::Left), "Sand Side 0");
        assert_eq!(textures.sprite(BlockType::Sand, Face::Back), "Sand Side 1");
        assert_eq!(textures.sprite(BlockType::Sand, Face::Right), "Sand Side 2");
        assert_eq!(textures.sprite(BlockType::Sand, Face::Front), "Sand Side 3");
        assert_eq!(textures.sprite_names().len(), 11 * 6);
    }

    #[test]
    fn test_tiled_layout() {
        let config = AtlasConfig::tiled(["a", "b", "c"], 16.0, 2);
        assert_eq!(config.width, 32.0);
        assert_eq!(config.height, 32.0);
        assert_eq!(config.sprites["c"].y, 16.0);
    }
}
