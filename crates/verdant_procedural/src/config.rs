//! # World and Terrain Configuration
//!
//! Immutable records read by every generation job. Built once at world
//! start (usually from a TOML section) and shared behind an `Arc`.

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::noise::WorldSeed;

/// Sub-seed purpose for the X sampling offset.
const OFFSET_X_PURPOSE: u64 = 0x5EED_0FF5_E7A1;
/// Sub-seed purpose for the Z sampling offset.
const OFFSET_Z_PURPOSE: u64 = 0x5EED_0FF5_E7A2;

/// World-wide settings: seed and block size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed.
    pub seed: u64,
    /// Edge length of one block in world units.
    pub block_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default().value(),
            block_size: 1.0,
        }
    }
}

impl WorldConfig {
    /// Creates a config with the given seed and unit blocks.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// The world seed.
    #[inline]
    #[must_use]
    pub const fn world_seed(&self) -> WorldSeed {
        WorldSeed::new(self.seed)
    }

    /// Seed-derived offset added to every X noise coordinate.
    #[inline]
    #[must_use]
    pub fn seed_offset_x(&self) -> f64 {
        self.world_seed().axis_offset(OFFSET_X_PURPOSE)
    }

    /// Seed-derived offset added to every Z noise coordinate.
    #[inline]
    #[must_use]
    pub fn seed_offset_z(&self) -> f64 {
        self.world_seed().axis_offset(OFFSET_Z_PURPOSE)
    }

    /// Checks the config for values generation cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] for a non-positive or
    /// non-finite block size.
    pub fn validate(&self) -> TerrainResult<()> {
        if !self.block_size.is_finite() || self.block_size <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        Ok(())
    }
}

/// Noise trigger for one structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureTrigger {
    /// Noise frequency applied to world grid coordinates.
    pub scale: f64,
    /// Multiplier applied to the sample.
    pub gain: f64,
    /// Placement happens when `sample * gain > threshold`.
    pub threshold: f64,
}

impl StructureTrigger {
    /// Whether a raw noise sample fires this trigger.
    #[inline]
    #[must_use]
    pub fn fires(&self, sample: f64) -> bool {
        sample * self.gain > self.threshold
    }
}

/// Terrain shaping constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World units to noise units.
    pub noise_scale: f64,
    /// Maximum surface height in blocks before the terrain-scale multiplier.
    pub max_height: f64,
    /// Exponent applied to the base noise.
    pub sharpness: f64,
    /// Frequency of the biome field.
    pub biome_scale: f64,
    /// Frequencies of the three base octaves.
    pub octave_scales: [f64; 3],
    /// Weights of the three base octaves.
    pub octave_weights: [f64; 3],
    /// Frequency of the continent field.
    pub continent_scale: f64,
    /// Terrain-scale multiplier at continent noise 0.
    pub continent_min: f64,
    /// Terrain-scale multiplier at continent noise 1.
    pub continent_max: f64,
    /// Tree placement trigger.
    pub tree: StructureTrigger,
    /// Rock placement trigger.
    pub rock: StructureTrigger,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise_scale: 0.02,
            max_height: 64.0,
            sharpness: 2.5,
            biome_scale: 0.5,
            octave_scales: [1.0, 2.0, 4.0],
            octave_weights: [0.6, 0.3, 0.1],
            continent_scale: 0.002,
            continent_min: 0.1,
            continent_max: 1.3,
            tree: StructureTrigger {
                scale: 0.8,
                gain: 0.9,
                threshold: 0.8,
            },
            rock: StructureTrigger {
                scale: 0.2,
                gain: 1.1,
                threshold: 0.95,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_seeded() {
        let a = WorldConfig::with_seed(42);
        let b = WorldConfig::with_seed(43);
        assert_eq!(a.seed_offset_x(), WorldConfig::with_seed(42).seed_offset_x());
        assert_ne!(a.seed_offset_x(), a.seed_offset_z());
        assert_ne!(a.seed_offset_x(), b.seed_offset_x());
    }

    #[test]
    fn test_validate_rejects_bad_block_size() {
        let mut config = WorldConfig::default();
        assert!(config.validate().is_ok());
        config.block_size = 0.0;
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig(_))));
        config.block_size = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TerrainConfig = toml::from_str("max_height = 32.0").unwrap();
        assert_eq!(config.max_height, 32.0);
        assert_eq!(config.sharpness, 2.5);
        assert_eq!(config.tree.threshold, 0.8);
    }

    #[test]
    fn test_trigger_threshold_is_strict() {
        let trigger = StructureTrigger {
            scale: 1.0,
            gain: 1.0,
            threshold: 0.5,
        };
        assert!(!trigger.fires(0.5));
        assert!(trigger.fires(0.51));
    }
}
