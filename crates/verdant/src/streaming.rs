//! # Streaming Controller
//!
//! Keeps the chunks around the viewer generated, meshed and visible.
//!
//! ## Per-Chunk Lifecycle
//!
//! ```text
//! (absent) -> Generating -> Generated -> Loaded <-> Unloaded -> (evicted)
//! ```
//!
//! ## Tick
//!
//! 1. Drain finished generation jobs into the cache.
//! 2. If the viewer changed chunk, recompute the resident set: spiral out
//!    from the viewer's chunk, admit chunks whose center lies within the
//!    load radius, dispatch generation for uncached ones, queue departures
//!    for unload and arrivals for load.
//! 3. Start the unload and load batches if idle and their queues are
//!    non-empty.
//! 4. Advance each running batch by at most its per-tick budget.
//!
//! The load batch is strict FIFO: a head that is still generating stalls
//! everything behind it until it completes. Both batches re-check chunk
//! state when they reach an entry, so a chunk queued in both directions is
//! handled correctly.
//!
//! ## Threading
//!
//! Only the thread calling [`StreamingController::update`] touches the
//! cache. Generation jobs own a fresh chunk each and hand it back over a
//! crossbeam channel.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use verdant_procedural::{Chunk, ChunkLayout, GridPos, TerrainError, TerrainGenerator};
use verdant_rendering::{ChunkMesh, MeshBuilder, TextureProvider};

use crate::cache::ChunkCache;
use crate::config::{EngineConfig, StreamingConfig};
use crate::error::{EngineError, EngineResult};
use crate::factory::{ObjectFactory, ObjectHandle, PooledFactory};
use crate::jobs::{JobSpawner, RayonSpawner};
use crate::spiral::SpiralOffsets;

/// Host data attached to a loaded chunk.
#[derive(Clone, Debug)]
pub struct ChunkVisual {
    /// The chunk's mesh, relative to the chunk center.
    pub mesh: Arc<ChunkMesh>,
    /// Factory object showing the mesh.
    pub handle: ObjectHandle,
}

/// A chunk as the controller stores it.
pub type WorldChunk = Chunk<ChunkVisual>;

/// Streaming counters since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Generation jobs handed to the spawner.
    pub generation_dispatched: u64,
    /// Generated chunks merged into the cache.
    pub generated: u64,
    /// Chunk loads.
    pub loaded: u64,
    /// Chunk unloads.
    pub unloaded: u64,
    /// Chunks dropped from the cache.
    pub evicted: u64,
    /// Current load queue length.
    pub load_queue: usize,
    /// Current unload queue length.
    pub unload_queue: usize,
    /// Current cache size.
    pub cached: usize,
}

/// Viewer-driven chunk streaming.
pub struct StreamingController<F: ObjectFactory = PooledFactory> {
    config: StreamingConfig,
    layout: ChunkLayout,
    generator: Arc<TerrainGenerator>,
    mesher: MeshBuilder,
    factory: F,
    spawner: Arc<dyn JobSpawner>,

    cache: ChunkCache<ChunkVisual>,
    completed_tx: Sender<WorldChunk>,
    completed_rx: Receiver<WorldChunk>,

    load_queue: VecDeque<GridPos>,
    /// Keys currently in `load_queue`.
    queued_loads: HashSet<GridPos>,
    unload_queue: VecDeque<GridPos>,
    is_loading: bool,
    is_unloading: bool,

    resident: HashSet<GridPos>,
    viewer_chunk: Option<GridPos>,
    /// Logical clock, advanced once per update.
    tick: u64,
    stats: StreamingStats,
}

impl StreamingController<PooledFactory> {
    /// Controller with the config's atlas, a pooled factory and the rayon pool.
    ///
    /// # Errors
    ///
    /// Any config or atlas error.
    pub fn with_defaults(config: &EngineConfig) -> EngineResult<Self> {
        let atlas = Arc::new(config.texture_atlas()?);
        let factory = PooledFactory::new(config.streaming.max_cached_chunks);
        Self::new(config, atlas, factory, Arc::new(RayonSpawner))
    }
}

impl<F: ObjectFactory> StreamingController<F> {
    /// Creates a controller. Nothing is generated until the first
    /// [`update`](Self::update) or [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns the first problem [`EngineConfig::validate`] finds.
    pub fn new(
        config: &EngineConfig,
        provider: Arc<dyn TextureProvider>,
        factory: F,
        spawner: Arc<dyn JobSpawner>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let layout = config.layout()?;
        let (completed_tx, completed_rx) = crossbeam_channel::unbounded();

        tracing::info!(
            seed = config.world.seed,
            chunk_size = layout.blocks_per_side(),
            load_radius = config.streaming.load_radius,
            cache_cap = config.streaming.max_cached_chunks,
            "streaming controller ready"
        );

        Ok(Self {
            config: config.streaming.clone(),
            layout,
            generator: Arc::new(TerrainGenerator::new(&config.world, config.terrain.clone())),
            mesher: MeshBuilder::new(provider)
                .with_randomized_sides(config.streaming.randomize_side_textures),
            factory,
            spawner,
            cache: ChunkCache::new(config.streaming.max_cached_chunks),
            completed_tx,
            completed_rx,
            load_queue: VecDeque::new(),
            queued_loads: HashSet::new(),
            unload_queue: VecDeque::new(),
            is_loading: false,
            is_unloading: false,
            resident: HashSet::new(),
            viewer_chunk: None,
            tick: 0,
            stats: StreamingStats::default(),
        })
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Generates and loads the viewer's chunk on the calling thread, then
    /// computes the resident set around it.
    ///
    /// Returns the world grid position of the topmost block under the
    /// viewer, for spawning.
    pub fn start(&mut self, viewer_x: f64, viewer_z: f64) -> GridPos {
        let key = self.layout.chunk_key(viewer_x, viewer_z);
        self.tick += 1;

        if !self.cache.get(key).is_some_and(Chunk::is_generated) {
            let mut chunk = WorldChunk::new(key, self.layout);
            self.generator.generate(&mut chunk);
            self.cache.insert(chunk);
            self.stats.generated += 1;
        }
        if !self.cache.get(key).is_some_and(Chunk::is_loaded) {
            self.load_chunk(key);
        }

        self.viewer_chunk = Some(key);
        self.refresh_resident(key);
        self.closest_topmost_block(viewer_x, viewer_z)
    }

    /// Advances streaming by one tick for a viewer at world `(x, z)`.
    pub fn update(&mut self, viewer_x: f64, viewer_z: f64) {
        self.tick += 1;
        self.drain_completed();

        let key = self.layout.chunk_key(viewer_x, viewer_z);
        if self.viewer_chunk != Some(key) {
            tracing::debug!(from = ?self.viewer_chunk, to = %key, "viewer changed chunk");
            self.viewer_chunk = Some(key);
            self.refresh_resident(key);
        }

        if !self.is_unloading && !self.unload_queue.is_empty() {
            self.is_unloading = true;
            tracing::debug!(queued = self.unload_queue.len(), "unload batch started");
        }
        if !self.is_loading && !self.load_queue.is_empty() {
            self.is_loading = true;
            tracing::debug!(queued = self.load_queue.len(), "load batch started");
        }

        if self.is_unloading {
            self.step_unload();
        }
        if self.is_loading {
            self.step_load();
        }
    }

    /// Merges finished chunks into the cache. Returns how many arrived.
    fn drain_completed(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(chunk) = self.completed_rx.try_recv() {
            let key = chunk.position();
            if self.cache.get(key).is_some_and(Chunk::is_generated) {
                tracing::warn!(chunk = %key, "chunk generated twice, keeping the first");
                continue;
            }
            self.cache.insert(chunk);
            self.stats.generated += 1;
            drained += 1;
        }
        drained
    }

    /// Recomputes the resident set around `center` and queues the changes.
    fn refresh_resident(&mut self, center: GridPos) {
        let world_size = self.layout.world_size();
        let radius = self.config.load_radius;
        let radius_chunks = (radius / f64::from(world_size)).ceil() as u32;
        let radius_sq = radius * radius;

        let admitted: Vec<GridPos> = SpiralOffsets::new(radius_chunks)
            .map(|(dx, dz)| GridPos::new(center.x + dx * world_size, 0, center.z + dz * world_size))
            .filter(|key| (key.distance_sq_xz(center) as f64) <= radius_sq)
            .collect();

        for key in &admitted {
            if !self.cache.contains(*key) {
                self.dispatch_generation(*key);
            }
        }

        let next: HashSet<GridPos> = admitted.iter().copied().collect();

        let mut leaving: Vec<GridPos> = self
            .resident
            .difference(&next)
            .copied()
            .filter(|key| self.cache.contains(*key))
            .collect();
        leaving.sort_unstable();
        for key in leaving {
            if !self.unload_queue.contains(&key) {
                self.unload_queue.push_back(key);
            }
        }

        for key in &admitted {
            let loaded = self.cache.get(*key).is_some_and(Chunk::is_loaded);
            if !loaded && self.queued_loads.insert(*key) {
                self.load_queue.push_back(*key);
            }
        }

        tracing::debug!(
            center = %center,
            resident = next.len(),
            load_queue = self.load_queue.len(),
            unload_queue = self.unload_queue.len(),
            "resident set updated"
        );
        self.resident = next;
    }

    /// Caches a placeholder for `key` and generates it on the worker pool.
    fn dispatch_generation(&mut self, key: GridPos) {
        self.cache.insert(WorldChunk::new(key, self.layout));

        let generator = Arc::clone(&self.generator);
        let completed = self.completed_tx.clone();
        let layout = self.layout;
        self.spawner.spawn(Box::new(move || {
            let mut chunk = WorldChunk::new(key, layout);
            generator.generate(&mut chunk);
            if completed.send(chunk).is_err() {
                tracing::debug!(chunk = %key, "controller gone, generated chunk dropped");
            }
        }));
        self.stats.generation_dispatched += 1;
    }

    fn pop_load(&mut self) {
        if let Some(key) = self.load_queue.pop_front() {
            self.queued_loads.remove(&key);
        }
    }

    /// Loads up to `load_budget` chunks from the head of the load queue.
    fn step_load(&mut self) {
        let mut budget = self.config.load_budget;
        while budget > 0 {
            let Some(&key) = self.load_queue.front() else {
                break;
            };
            let Some(chunk) = self.cache.get(key) else {
                tracing::warn!(chunk = %key, "queued chunk is not cached, skipping");
                self.pop_load();
                continue;
            };
            if chunk.is_loaded() || !self.resident.contains(&key) {
                self.pop_load();
                continue;
            }
            if !chunk.is_generated() {
                // Head still generating: hold the whole queue
                break;
            }
            self.pop_load();
            self.load_chunk(key);
            budget -= 1;
        }

        if self.load_queue.is_empty() {
            self.is_loading = false;
            tracing::debug!(loaded = self.cache.loaded_count(), "load batch finished");
        }
    }

    /// Unloads up to `unload_budget` chunks, then evicts once the queue is empty.
    fn step_unload(&mut self) {
        let mut budget = self.config.unload_budget;
        while budget > 0 {
            let Some(key) = self.unload_queue.pop_front() else {
                break;
            };
            if self.resident.contains(&key) {
                continue;
            }
            let Some(chunk) = self.cache.get_mut(key) else {
                continue;
            };
            if !chunk.is_loaded() {
                continue;
            }
            if let Some(visual) = chunk.detach() {
                self.factory.release(visual.handle);
            }
            chunk.set_loaded(false);
            self.stats.unloaded += 1;
            budget -= 1;
        }

        if self.unload_queue.is_empty() {
            self.is_unloading = false;
            let evicted = self.cache.evict(&self.resident);
            self.stats.evicted += evicted.len() as u64;
            tracing::debug!(evicted = evicted.len(), cached = self.cache.len(), "unload batch finished");
        }
    }

    /// Meshes a generated chunk and attaches a visual to it.
    fn load_chunk(&mut self, key: GridPos) {
        let tick = self.tick;
        let Some(chunk) = self.cache.get_mut(key) else {
            tracing::warn!(chunk = %key, "cannot load uncached chunk");
            return;
        };

        let mesh = Arc::new(self.mesher.build_mesh(&*chunk));
        let handle = self.factory.acquire();
        self.factory.set_name(handle, &format!("Chunk {key}"));
        self.factory
            .set_position(handle, [key.x as f32, 0.0, key.z as f32]);

        let triangles = mesh.triangle_count();
        if let Some(stale) = chunk.attach(ChunkVisual { mesh, handle }) {
            self.factory.release(stale.handle);
        }
        chunk.touch(tick);
        chunk.set_loaded(true);
        self.stats.loaded += 1;
        tracing::trace!(chunk = %key, triangles, "chunk loaded");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// World grid position of the topmost block at world `(x, z)`.
    ///
    /// # Errors
    ///
    /// [`EngineError::ChunkNotCached`] if the chunk is unknown, otherwise the
    /// chunk's [`TerrainError`] (not yet generated, or no such column).
    pub fn try_closest_topmost_block(&self, world_x: f64, world_z: f64) -> EngineResult<GridPos> {
        let key = self.layout.chunk_key(world_x, world_z);
        let chunk = self.cache.get(key).ok_or(EngineError::ChunkNotCached(key))?;
        let (x, z) = chunk
            .world_to_column(world_x, world_z)
            .ok_or_else(|| TerrainError::ColumnNotFound {
                chunk: key,
                x: world_x.floor() as i32,
                z: world_z.floor() as i32,
                depth: 0,
            })?;
        let local = chunk.topmost_block(x, z)?;
        Ok(chunk.local_to_world(local))
    }

    /// Like [`try_closest_topmost_block`](Self::try_closest_topmost_block),
    /// but logs a miss and returns [`GridPos::ZERO`].
    #[must_use]
    pub fn closest_topmost_block(&self, world_x: f64, world_z: f64) -> GridPos {
        self.try_closest_topmost_block(world_x, world_z)
            .unwrap_or_else(|err| {
                tracing::error!(world_x, world_z, "topmost block lookup failed: {err}");
                GridPos::ZERO
            })
    }

    /// Cached chunk at `key`.
    #[must_use]
    pub fn chunk(&self, key: GridPos) -> Option<&WorldChunk> {
        self.cache.get(key)
    }

    /// The chunk cache.
    #[must_use]
    pub const fn cache(&self) -> &ChunkCache<ChunkVisual> {
        &self.cache
    }

    /// Chunk dimensions.
    #[must_use]
    pub const fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Streaming settings.
    #[must_use]
    pub const fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Chunks currently wanted around the viewer.
    #[must_use]
    pub const fn resident(&self) -> &HashSet<GridPos> {
        &self.resident
    }

    /// Chunk the viewer was last seen in.
    #[must_use]
    pub const fn viewer_chunk(&self) -> Option<GridPos> {
        self.viewer_chunk
    }

    /// Pending loads, head first.
    #[must_use]
    pub const fn load_queue(&self) -> &VecDeque<GridPos> {
        &self.load_queue
    }

    /// Pending unloads, head first.
    #[must_use]
    pub const fn unload_queue(&self) -> &VecDeque<GridPos> {
        &self.unload_queue
    }

    /// Whether a load batch is running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether an unload batch is running.
    #[must_use]
    pub const fn is_unloading(&self) -> bool {
        self.is_unloading
    }

    /// Logical clock.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The object factory.
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Counters plus current queue and cache sizes.
    #[must_use]
    pub fn stats(&self) -> StreamingStats {
        StreamingStats {
            load_queue: self.load_queue.len(),
            unload_queue: self.unload_queue.len(),
            cached: self.cache.len(),
            ..self.stats
        }
    }
}
