//! # Biome Sampler
//!
//! Maps a world XZ position to a surface height and block type.
//!
//! Three biomes are blended from one coarse biome field:
//!
//! | Biome    | Center | Half-width | Surface |
//! |----------|--------|------------|---------|
//! | Desert   | 0.4    | 0.4        | Sand    |
//! | Plains   | 0.5    | 0.33       | Grass   |
//! | Mountain | 1.0    | 0.33       | Stone   |
//!
//! Height comes from three base octaves sharpened by an exponent, scaled by
//! a continent field and by the biome blend. The sampler holds no mutable
//! state and is shared by every generation job.

use crate::block::BlockType;
use crate::config::{TerrainConfig, WorldConfig};
use crate::noise::NoiseSource;

/// Biomes blended by the sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    /// Sand dunes.
    Desert,
    /// Grassland.
    Plains,
    /// Stone peaks with amplified relief.
    Mountain,
}

impl Biome {
    /// Surface block of this biome.
    #[must_use]
    pub const fn surface_block(self) -> BlockType {
        match self {
            Self::Desert => BlockType::Sand,
            Self::Plains => BlockType::Grass,
            Self::Mountain => BlockType::Stone,
        }
    }

    /// `(center, half_width)` of this biome on the biome field.
    #[must_use]
    pub const fn band(self) -> (f64, f64) {
        match self {
            Self::Desert => (0.4, 0.4),
            Self::Plains => (0.5, 0.33),
            Self::Mountain => (1.0, 0.33),
        }
    }

    /// Horizontal terrain-scale factor contributed by this biome.
    #[must_use]
    pub const fn relief(self) -> f64 {
        match self {
            Self::Desert | Self::Plains => 0.5,
            Self::Mountain => 3.0,
        }
    }
}

/// Normalized blend weights of the three biomes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeWeights {
    /// Desert weight.
    pub desert: f64,
    /// Plains weight.
    pub plains: f64,
    /// Mountain weight.
    pub mountain: f64,
}

impl BiomeWeights {
    /// Computes normalized weights from a biome field value.
    ///
    /// The field only yields an all-zero blend at exactly 0, where the
    /// column falls back to pure desert.
    #[must_use]
    pub fn from_biome_noise(biome_noise: f64) -> Self {
        let weight = |biome: Biome| {
            let (center, half_width) = biome.band();
            (1.0 - (biome_noise - center).abs() / half_width).clamp(0.0, 1.0)
        };
        let desert = weight(Biome::Desert);
        let plains = weight(Biome::Plains);
        let mountain = weight(Biome::Mountain);

        let total = desert + plains + mountain;
        if total <= 0.0 {
            return Self {
                desert: 1.0,
                plains: 0.0,
                mountain: 0.0,
            };
        }
        Self {
            desert: desert / total,
            plains: plains / total,
            mountain: mountain / total,
        }
    }

    /// Biome with the largest weight; ties go to desert, then plains.
    #[must_use]
    pub fn dominant(&self) -> Biome {
        if self.desert >= self.plains && self.desert >= self.mountain {
            Biome::Desert
        } else if self.plains >= self.mountain {
            Biome::Plains
        } else {
            Biome::Mountain
        }
    }

    /// Terrain-scale multiplier of this blend.
    #[must_use]
    pub fn relief(&self) -> f64 {
        self.desert * Biome::Desert.relief()
            + self.plains * Biome::Plains.relief()
            + self.mountain * Biome::Mountain.relief()
    }

    /// Height-curve multiplier of this blend. Neutral while every biome
    /// weighs 1.0.
    #[must_use]
    pub fn height_factor(&self) -> f64 {
        self.desert + self.plains + self.mountain
    }
}

/// Result of sampling one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    /// Surface height in blocks.
    pub height: i32,
    /// Surface block type.
    pub block_type: BlockType,
    /// Dominant biome.
    pub biome: Biome,
}

/// Pure function of `(seed, x, z)` to height and block type.
///
/// Generic over the noise field so tests can run it on a flat stub.
pub struct TerrainSampler<N> {
    noise: N,
    terrain: TerrainConfig,
    offset_x: f64,
    offset_z: f64,
}

impl<N: NoiseSource> TerrainSampler<N> {
    /// Creates a sampler over `noise` with the world's seed offsets.
    #[must_use]
    pub fn new(noise: N, world: &WorldConfig, terrain: TerrainConfig) -> Self {
        Self {
            noise,
            terrain,
            offset_x: world.seed_offset_x(),
            offset_z: world.seed_offset_z(),
        }
    }

    /// Terrain constants in use.
    #[must_use]
    pub fn terrain(&self) -> &TerrainConfig {
        &self.terrain
    }

    /// Samples the noise field at a seed-offset, scaled coordinate.
    #[inline]
    #[must_use]
    pub fn noise_at(&self, x: f64, z: f64, scale: f64) -> f64 {
        self.noise
            .sample((x + self.offset_x) * scale, (z + self.offset_z) * scale)
    }

    /// Samples the column at world position `(world_x, world_z)`.
    #[must_use]
    pub fn sample(&self, world_x: f64, world_z: f64) -> ColumnSample {
        let t = &self.terrain;
        let x = world_x * t.noise_scale;
        let z = world_z * t.noise_scale;

        let biome_noise = self.noise_at(x, z, t.biome_scale).max(0.0).sqrt();
        let weights = BiomeWeights::from_biome_noise(biome_noise);

        let base: f64 = t
            .octave_scales
            .iter()
            .zip(t.octave_weights.iter())
            .map(|(scale, weight)| self.noise_at(x, z, *scale) * weight)
            .sum();
        let mut height_curve = base.max(0.0).powf(t.sharpness);

        let continent = self.noise_at(x, z, t.continent_scale);
        let mut terrain_scale = lerp(t.continent_min, t.continent_max, continent);

        terrain_scale *= weights.relief();
        height_curve *= weights.height_factor();

        let height = (height_curve * t.max_height * terrain_scale).round() as i32;
        let biome = weights.dominant();

        ColumnSample {
            height,
            block_type: biome.surface_block(),
            biome,
        }
    }
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
