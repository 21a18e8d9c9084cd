//! # Spiral Search
//!
//! Chunk offsets around the viewer, walked outward ring by ring so the
//! nearest chunks are queued first.

/// Offsets `(dx, dz)` covering the square `[-radius, radius]^2`, starting at
/// the origin and spiralling outward.
///
/// Every offset is yielded exactly once and its ring (Chebyshev distance
/// from the origin) never decreases.
#[derive(Clone, Debug)]
pub struct SpiralOffsets {
    radius: i32,
    x: i32,
    z: i32,
    dx: i32,
    dz: i32,
    remaining: u64,
}

impl SpiralOffsets {
    /// Spiral over the square of the given radius.
    #[must_use]
    pub fn new(radius: u32) -> Self {
        let side = 2 * u64::from(radius) + 1;
        Self {
            radius: i32::try_from(radius).unwrap_or(i32::MAX / 2),
            x: 0,
            z: 0,
            dx: 0,
            dz: -1,
            remaining: side * side,
        }
    }
}

impl Iterator for SpiralOffsets {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = (self.x, self.z);
        let (x, z) = current;
        if x == z || (x < 0 && x == -z) || (x > 0 && x == 1 - z) {
            (self.dx, self.dz) = (-self.dz, self.dx);
        }
        self.x += self.dx;
        self.z += self.dz;

        debug_assert!(x.abs() <= self.radius && z.abs() <= self.radius);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for SpiralOffsets {}
