//! # Chunk Cache
//!
//! Every chunk the controller knows about, keyed by chunk position. Entries
//! are created before generation finishes and removed only by eviction.
//!
//! ## Eviction
//!
//! Above capacity, the least recently used chunks that are generated, not
//! loaded and not resident are dropped until the cache is back at capacity
//! or no such chunk remains. Loaded chunks are never evicted, so the cache
//! may sit above capacity until more chunks unload.

use std::collections::{HashMap, HashSet};

use verdant_procedural::{Chunk, GridPos};

/// Controller-owned chunk map.
#[derive(Debug)]
pub struct ChunkCache<H = ()> {
    chunks: HashMap<GridPos, Chunk<H>>,
    capacity: usize,
}

impl<H> ChunkCache<H> {
    /// Creates an empty cache that evicts above `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            chunks: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Eviction threshold.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if nothing is cached.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether `key` is cached.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: GridPos) -> bool {
        self.chunks.contains_key(&key)
    }

    /// Cached chunk at `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: GridPos) -> Option<&Chunk<H>> {
        self.chunks.get(&key)
    }

    /// Mutable cached chunk at `key`.
    #[inline]
    pub fn get_mut(&mut self, key: GridPos) -> Option<&mut Chunk<H>> {
        self.chunks.get_mut(&key)
    }

    /// Inserts or replaces the chunk at its own position, returning the old entry.
    pub fn insert(&mut self, chunk: Chunk<H>) -> Option<Chunk<H>> {
        self.chunks.insert(chunk.position(), chunk)
    }

    /// All cached chunks.
    pub fn iter(&self) -> impl Iterator<Item = (&GridPos, &Chunk<H>)> {
        self.chunks.iter()
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.chunks.values().filter(|c| c.is_loaded()).count()
    }

    /// Evicts least recently used chunks above capacity.
    ///
    /// Chunks in `protected`, chunks still generating and loaded chunks are
    /// kept. Ties on the timestamp are broken by position so the choice is
    /// deterministic. Returns the evicted keys, oldest first.
    pub fn evict(&mut self, protected: &HashSet<GridPos>) -> Vec<GridPos> {
        let Some(excess) = self.chunks.len().checked_sub(self.capacity) else {
            return Vec::new();
        };
        if excess == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<(u64, GridPos)> = self
            .chunks
            .iter()
            .filter(|(key, chunk)| {
                chunk.is_generated() && !chunk.is_loaded() && !protected.contains(key)
            })
            .map(|(key, chunk)| (chunk.last_used(), *key))
            .collect();
        candidates.sort_unstable();
        candidates.truncate(excess);

        let evicted: Vec<GridPos> = candidates.into_iter().map(|(_, key)| key).collect();
        for key in &evicted {
            if let Some(mut chunk) = self.chunks.remove(key) {
                chunk.clear_blocks();
            }
        }

        if evicted.len() < excess {
            tracing::debug!(
                cached = self.chunks.len(),
                capacity = self.capacity,
                "cache over capacity, no more evictable chunks"
            );
        }
        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), cached = self.chunks.len(), "evicted chunks");
        }
        evicted
    }
}
