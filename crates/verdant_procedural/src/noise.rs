//! # Noise and Position Hashing
//!
//! Deterministic coherent noise and integer mixing functions.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`WorldSeed`], every function here produces exactly the
//! same values on any platform. Hashes use fixed-width wrapping `i32`
//! arithmetic; noise uses a seed-shuffled permutation table.
//!
//! ## Noise Sources
//!
//! Terrain sampling is written against the [`NoiseSource`] trait so tests
//! can substitute a flat field ([`ConstantNoise`]) for [`SimplexNoise`].

use crate::grid::GridPos;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., an axis offset).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Sampling offset in `[-10000, 10000)` used to decorrelate one noise axis.
    #[inline]
    #[must_use]
    pub fn axis_offset(self, purpose: u64) -> f64 {
        (self.derive(purpose).0 % 20_000) as f64 - 10_000.0
    }

    /// Low 32 bits of the seed, mixed into position hashes.
    #[inline]
    #[must_use]
    pub const fn hash_key(self) -> i32 {
        self.0 as u32 as i32
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

/// Hash of a grid position and seed, always non-negative.
///
/// Drives every randomized structure decision.
#[inline]
#[must_use]
pub const fn position_hash(pos: GridPos, seed: i32) -> i32 {
    let mut h = pos.x.wrapping_mul(7_385_693)
        ^ pos.y.wrapping_mul(19_349_663)
        ^ pos.z.wrapping_mul(83_492_791)
        ^ seed;
    h = (h ^ (h >> 16)) & i32::MAX;
    h
}

/// Hash of a grid position and a face slot, folded into `0..4`.
///
/// Picks one of the four side-texture variants for a block face.
#[inline]
#[must_use]
pub const fn face_variant_hash(pos: GridPos, face_slot: i32) -> usize {
    let mut h = pos
        .x
        .wrapping_mul(374_761_393)
        .wrapping_add(pos.y.wrapping_mul(668_265_263))
        .wrapping_add(pos.z.wrapping_mul(2_147_483_647))
        .wrapping_add(face_slot.wrapping_mul(1_274_126_177));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^= h >> 16;
    (h.unsigned_abs() % 4) as usize
}

/// A 2D coherent noise field returning values in `[0, 1]`.
pub trait NoiseSource: Send + Sync {
    /// Samples the field at `(x, z)`.
    fn sample(&self, x: f64, z: f64) -> f64;
}

/// A flat field returning the same value everywhere.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    #[inline]
    fn sample(&self, _x: f64, _z: f64) -> f64 {
        self.0
    }
}

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
    /// Gradient table (12 gradients for 2D simplex).
    grad: [[i8; 2]; 12],
}

impl PermutationTable {
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates with xorshift64
        let mut rng_state = seed.value() | 1;
        for i in (1..256).rev() {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state as usize) % (i + 1);
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        let grad = [
            [1, 0], [1, 1], [0, 1], [-1, 1],
            [-1, 0], [-1, -1], [0, -1], [1, -1],
            [1, 0], [0, 1], [-1, 0], [0, -1],
        ];

        Self { perm, grad }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(&self, hash: u8) -> [i8; 2] {
        self.grad[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// [`SimplexNoise::sample_signed`] yields `[-1, 1]`; the [`NoiseSource`]
/// impl remaps that to `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use verdant_procedural::noise::{NoiseSource, SimplexNoise, WorldSeed};
///
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let value = noise.sample(100.5, 200.3);
/// assert!((0.0..=1.0).contains(&value));
/// ```
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample_signed(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle
        let (i1, j1): (i32, i32) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let i1 = i1 as usize;
        let j1 = j1 as usize;

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self.perm_table.get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = self.contribution(x0, y0, gi0);
        let n1 = self.contribution(x1, y1, gi1);
        let n2 = self.contribution(x2, y2, gi2);

        // 70.0 normalizes the output to [-1, 1]
        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    #[inline]
    fn contribution(&self, x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = self.perm_table.gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }
}

impl NoiseSource for SimplexNoise {
    #[inline]
    fn sample(&self, x: f64, z: f64) -> f64 {
        (self.sample_signed(x, z) + 1.0) * 0.5
    }
}

/// Faster than `f64::floor()` for our use case.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi - 1
    } else {
        xi
    }
}
