//! # Chunk System
//!
//! World data is organized into fixed-size square chunks for:
//! - Streaming (generate, load and unload independently)
//! - Caching (evict whole chunks)
//! - Parallel generation (one job owns one chunk)
//!
//! ## Coordinates
//!
//! A chunk is keyed by the world-space position of its center, snapped to
//! the chunk grid. Blocks inside it use chunk-local grid coordinates
//! `0..blocks_per_side` on X and Z and absolute height on Y.
//!
//! ## Block Maps
//!
//! `blocks` is the authoritative occupancy map and the disjoint union of
//! the three role maps (`ground`, `filler`, `structure`). The column index
//! maps `(x, z, depth-from-top)` to the real block position.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::block::{Block, Node, Walkability};
use crate::error::{TerrainError, TerrainResult};
use crate::grid::{Face, GridPos};

/// Default chunk width/depth in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Chunk dimensions shared by every chunk of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkLayout {
    blocks_per_side: i32,
    block_size: f64,
    world_size: i32,
}

impl ChunkLayout {
    /// Creates a layout.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] if the chunk has no blocks,
    /// the block size is not positive, or the chunk's world extent is not
    /// a whole number of world units.
    pub fn new(blocks_per_side: i32, block_size: f64) -> TerrainResult<Self> {
        if blocks_per_side <= 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk size must be positive, got {blocks_per_side}"
            )));
        }
        if !block_size.is_finite() || block_size <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "block size must be positive, got {block_size}"
            )));
        }
        let extent = f64::from(blocks_per_side) * block_size;
        if (extent - extent.round()).abs() > 1e-9 || extent.round() < 1.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk world size {extent} is not a whole number of units"
            )));
        }
        Ok(Self {
            blocks_per_side,
            block_size,
            world_size: extent.round() as i32,
        })
    }

    /// Blocks along one chunk edge.
    #[inline]
    #[must_use]
    pub const fn blocks_per_side(&self) -> i32 {
        self.blocks_per_side
    }

    /// Edge length of one block in world units.
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> f64 {
        self.block_size
    }

    /// Edge length of one chunk in world units.
    #[inline]
    #[must_use]
    pub const fn world_size(&self) -> i32 {
        self.world_size
    }

    /// Half the chunk edge, rounded down.
    #[inline]
    #[must_use]
    pub const fn half_size(&self) -> i32 {
        self.world_size / 2
    }

    /// Key of the chunk containing world position `(x, z)`.
    #[must_use]
    pub fn chunk_key(&self, world_x: f64, world_z: f64) -> GridPos {
        let size = f64::from(self.world_size);
        let half = f64::from(self.half_size());
        let snap = |v: f64| ((v + half) / size).floor() as i32 * self.world_size;
        GridPos::new(snap(world_x), 0, snap(world_z))
    }

    /// Whether `(x, z)` is a column of a chunk with this layout.
    #[inline]
    #[must_use]
    pub const fn contains_column(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.blocks_per_side && z < self.blocks_per_side
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        Self {
            blocks_per_side: CHUNK_SIZE,
            block_size: 1.0,
            world_size: CHUNK_SIZE,
        }
    }
}

/// Key of the column index: local column plus depth from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    /// Local X.
    pub x: i32,
    /// Local Z.
    pub z: i32,
    /// 0 for the topmost block of the column.
    pub depth: u32,
}

impl ColumnKey {
    /// Creates a column key.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32, depth: u32) -> Self {
        Self { x, z, depth }
    }
}

/// Which role map a block belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockRole {
    /// Top surface of a column.
    Ground,
    /// Gap fill under a height step.
    Filler,
    /// Tree or rock decoration.
    Structure,
}

/// Lifecycle state of a cached chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Created, generation not yet finished.
    Generating,
    /// Generated, never loaded.
    Generated,
    /// Mesh and visual attached.
    Loaded,
    /// Loaded at least once, currently detached.
    Unloaded,
}

/// A chunk of world data.
///
/// `H` is whatever the host attaches while the chunk is loaded (mesh and
/// visual handles). Generation never touches it.
#[derive(Debug)]
pub struct Chunk<H = ()> {
    position: GridPos,
    layout: ChunkLayout,
    is_generated: bool,
    is_loaded: bool,
    ever_loaded: bool,
    last_used: u64,
    blocks: HashMap<GridPos, Block>,
    ground_blocks: HashMap<GridPos, Block>,
    filler_blocks: HashMap<GridPos, Block>,
    structure_blocks: HashMap<GridPos, Block>,
    /// Ground block of each local column.
    surface: HashMap<(i32, i32), GridPos>,
    block_positions: HashMap<ColumnKey, GridPos>,
    nodes: HashMap<GridPos, Node>,
    attachment: Option<H>,
}

impl<H> Chunk<H> {
    /// Creates an empty, not-generated chunk keyed by `position`.
    #[must_use]
    pub fn new(position: GridPos, layout: ChunkLayout) -> Self {
        let columns = (layout.blocks_per_side() * layout.blocks_per_side()) as usize;
        Self {
            position: position.with_y(0),
            layout,
            is_generated: false,
            is_loaded: false,
            ever_loaded: false,
            last_used: 0,
            blocks: HashMap::with_capacity(columns * 2),
            ground_blocks: HashMap::with_capacity(columns),
            filler_blocks: HashMap::new(),
            structure_blocks: HashMap::new(),
            surface: HashMap::with_capacity(columns),
            block_positions: HashMap::with_capacity(columns * 2),
            nodes: HashMap::with_capacity(columns),
            attachment: None,
        }
    }

    // =========================================================================
    // Identity and lifecycle
    // =========================================================================

    /// World-space center key.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Chunk dimensions.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Whether generation has completed. Never reset once set.
    #[inline]
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.is_generated
    }

    pub(crate) fn mark_generated(&mut self) {
        self.is_generated = true;
    }

    /// Whether the chunk currently has a mesh and visual attached.
    #[inline]
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Sets the loaded flag.
    #[inline]
    pub fn set_loaded(&mut self, loaded: bool) {
        self.is_loaded = loaded;
        self.ever_loaded |= loaded;
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ChunkState {
        match (self.is_generated, self.is_loaded, self.ever_loaded) {
            (false, _, _) => ChunkState::Generating,
            (true, true, _) => ChunkState::Loaded,
            (true, false, true) => ChunkState::Unloaded,
            (true, false, false) => ChunkState::Generated,
        }
    }

    /// Logical timestamp of the last load.
    #[inline]
    #[must_use]
    pub const fn last_used(&self) -> u64 {
        self.last_used
    }

    /// Stamps the last-used timestamp.
    #[inline]
    pub fn touch(&mut self, tick: u64) {
        self.last_used = tick;
    }

    /// Host data attached on load.
    #[inline]
    #[must_use]
    pub const fn attachment(&self) -> Option<&H> {
        self.attachment.as_ref()
    }

    /// Attaches host data, returning whatever was attached before.
    pub fn attach(&mut self, attachment: H) -> Option<H> {
        self.attachment.replace(attachment)
    }

    /// Detaches host data.
    pub fn detach(&mut self) -> Option<H> {
        self.attachment.take()
    }

    // =========================================================================
    // Block maps
    // =========================================================================

    /// Authoritative occupancy map.
    #[inline]
    #[must_use]
    pub const fn blocks(&self) -> &HashMap<GridPos, Block> {
        &self.blocks
    }

    /// Top-surface blocks.
    #[inline]
    #[must_use]
    pub const fn ground_blocks(&self) -> &HashMap<GridPos, Block> {
        &self.ground_blocks
    }

    /// Gap-fill blocks.
    #[inline]
    #[must_use]
    pub const fn filler_blocks(&self) -> &HashMap<GridPos, Block> {
        &self.filler_blocks
    }

    /// Tree and rock blocks.
    #[inline]
    #[must_use]
    pub const fn structure_blocks(&self) -> &HashMap<GridPos, Block> {
        &self.structure_blocks
    }

    /// Column index: `(x, z, depth)` to local block position.
    #[inline]
    #[must_use]
    pub const fn block_positions(&self) -> &HashMap<ColumnKey, GridPos> {
        &self.block_positions
    }

    /// Whether a block occupies `pos`.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.blocks.contains_key(&pos)
    }

    /// Inserts a block into `blocks` and the map for `role`.
    ///
    /// Occupied positions are left untouched and `false` is returned, so
    /// role maps stay disjoint.
    pub fn insert_block(&mut self, role: BlockRole, block: Block) -> bool {
        let pos = block.position();
        if self.blocks.contains_key(&pos) {
            return false;
        }
        self.blocks.insert(pos, block);
        match role {
            BlockRole::Ground => {
                self.ground_blocks.insert(pos, block);
                self.surface.insert((pos.x, pos.z), pos);
                self.nodes.insert(pos, Node::new(pos, block.walkable()));
            }
            BlockRole::Filler => {
                self.filler_blocks.insert(pos, block);
            }
            BlockRole::Structure => {
                self.structure_blocks.insert(pos, block);
                // Anything built on a ground block blocks its node
                if let Some(node) = self.nodes.get_mut(&pos.with_y(pos.y - 1)) {
                    node.walkable = Walkability::NonWalkable;
                }
            }
        }
        true
    }

    /// Ground block of local column `(x, z)`.
    #[must_use]
    pub fn ground_at(&self, x: i32, z: i32) -> Option<&Block> {
        self.surface
            .get(&(x, z))
            .and_then(|pos| self.ground_blocks.get(pos))
    }

    /// Rebuilds the column index from `blocks`.
    ///
    /// Each column's blocks are ordered by descending height; the topmost
    /// gets depth 0.
    pub fn rebuild_column_index(&mut self) {
        let mut columns: HashMap<(i32, i32), Vec<i32>> = HashMap::new();
        for pos in self.blocks.keys() {
            columns.entry((pos.x, pos.z)).or_default().push(pos.y);
        }

        self.block_positions.clear();
        for ((x, z), mut heights) in columns {
            heights.sort_unstable_by(|a, b| b.cmp(a));
            for (depth, y) in heights.into_iter().enumerate() {
                self.block_positions
                    .insert(ColumnKey::new(x, z, depth as u32), GridPos::new(x, y, z));
            }
        }
    }

    /// Indexed block of column `(x, z)` at `depth` below its top.
    ///
    /// # Errors
    ///
    /// [`TerrainError::ChunkNotGenerated`] before generation completes,
    /// [`TerrainError::ColumnNotFound`] if the column has no such block.
    pub fn block_at_depth(&self, x: i32, z: i32, depth: u32) -> TerrainResult<GridPos> {
        if !self.is_generated {
            return Err(TerrainError::ChunkNotGenerated(self.position));
        }
        self.block_positions
            .get(&ColumnKey::new(x, z, depth))
            .copied()
            .ok_or(TerrainError::ColumnNotFound {
                chunk: self.position,
                x,
                z,
                depth,
            })
    }

    /// Topmost block of column `(x, z)`.
    ///
    /// # Errors
    ///
    /// Same as [`Chunk::block_at_depth`].
    #[inline]
    pub fn topmost_block(&self, x: i32, z: i32) -> TerrainResult<GridPos> {
        self.block_at_depth(x, z, 0)
    }

    /// Drops every block, node and index entry. Used on eviction.
    pub fn clear_blocks(&mut self) {
        self.blocks.clear();
        self.ground_blocks.clear();
        self.filler_blocks.clear();
        self.structure_blocks.clear();
        self.surface.clear();
        self.block_positions.clear();
        self.nodes.clear();
    }

    /// Checks that the role maps are disjoint and their union is `blocks`.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvariantViolation`] describing the first mismatch.
    pub fn validate(&self) -> TerrainResult<()> {
        let violation = |detail: String| TerrainError::InvariantViolation {
            chunk: self.position,
            detail,
        };

        let role_maps = [
            ("ground", &self.ground_blocks),
            ("filler", &self.filler_blocks),
            ("structure", &self.structure_blocks),
        ];

        let mut seen: HashSet<GridPos> = HashSet::with_capacity(self.blocks.len());
        for (name, map) in role_maps {
            for (pos, block) in map {
                if !seen.insert(*pos) {
                    return Err(violation(format!("{name} block {pos} is in two role maps")));
                }
                if block.position() != *pos {
                    return Err(violation(format!("{name} block keyed {pos} sits at {}", block.position())));
                }
                if self.blocks.get(pos) != Some(block) {
                    return Err(violation(format!("{name} block {pos} missing from blocks")));
                }
            }
        }
        if seen.len() != self.blocks.len() {
            return Err(violation(format!(
                "blocks holds {} entries, role maps hold {}",
                self.blocks.len(),
                seen.len()
            )));
        }
        Ok(())
    }

    // =========================================================================
    // World coordinates
    // =========================================================================

    /// World-space corner of the chunk on the XZ plane.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> (i32, i32) {
        let half = self.layout.half_size();
        (self.position.x - half, self.position.z - half)
    }

    /// World-space center of local column `(x, z)`.
    #[must_use]
    pub fn column_world_center(&self, x: i32, z: i32) -> (f64, f64) {
        let (ox, oz) = self.origin();
        let bs = self.layout.block_size();
        (
            f64::from(ox) + f64::from(x) * bs + bs / 2.0,
            f64::from(oz) + f64::from(z) * bs + bs / 2.0,
        )
    }

    /// World grid position of a local block position.
    #[must_use]
    pub fn local_to_world(&self, local: GridPos) -> GridPos {
        let (ox, oz) = self.origin();
        let bs = self.layout.block_size();
        let grid_x = (f64::from(ox) / bs).floor() as i32;
        let grid_z = (f64::from(oz) / bs).floor() as i32;
        GridPos::new(grid_x + local.x, local.y, grid_z + local.z)
    }

    /// Local column containing world position `(x, z)`, if it is in this chunk.
    #[must_use]
    pub fn world_to_column(&self, world_x: f64, world_z: f64) -> Option<(i32, i32)> {
        let (ox, oz) = self.origin();
        let bs = self.layout.block_size();
        let x = ((world_x - f64::from(ox)) / bs).floor() as i32;
        let z = ((world_z - f64::from(oz)) / bs).floor() as i32;
        self.layout.contains_column(x, z).then_some((x, z))
    }

    // =========================================================================
    // Walkability nodes
    // =========================================================================

    /// Every node, keyed by its ground block position.
    #[inline]
    #[must_use]
    pub const fn nodes(&self) -> &HashMap<GridPos, Node> {
        &self.nodes
    }

    /// Node of the ground block at `pos`.
    #[inline]
    #[must_use]
    pub fn node(&self, pos: GridPos) -> Option<&Node> {
        self.nodes.get(&pos)
    }

    /// Mutable node of the ground block at `pos`.
    #[inline]
    pub fn node_mut(&mut self, pos: GridPos) -> Option<&mut Node> {
        self.nodes.get_mut(&pos)
    }

    /// Block mirrored by `node`.
    #[inline]
    #[must_use]
    pub fn node_block(&self, node: &Node) -> Option<&Block> {
        self.ground_blocks.get(&node.grid_pos)
    }

    /// Node of the ground block in column `(x, z)`.
    fn column_node(&self, x: i32, z: i32) -> Option<&Node> {
        self.surface.get(&(x, z)).and_then(|pos| self.nodes.get(pos))
    }

    /// Nodes of the four horizontally adjacent columns.
    #[must_use]
    pub fn neighbour_nodes(&self, node: &Node) -> Vec<&Node> {
        let p = node.grid_pos;
        Face::HORIZONTAL
            .iter()
            .filter_map(|face| {
                let n = p.neighbour(*face);
                self.column_node(n.x, n.z)
            })
            .collect()
    }

    /// Nodes reachable in at most `depth` horizontal steps, excluding `node`.
    ///
    /// Breadth-first, so nearer nodes come first.
    #[must_use]
    pub fn cross_neighbour_nodes(&self, node: &Node, depth: u32) -> Vec<&Node> {
        let start = (node.grid_pos.x, node.grid_pos.z);
        let mut visited: HashSet<(i32, i32)> = HashSet::from([start]);
        let mut frontier: VecDeque<((i32, i32), u32)> = VecDeque::from([(start, 0)]);
        let mut found = Vec::new();

        while let Some(((x, z), steps)) = frontier.pop_front() {
            if steps == depth {
                continue;
            }
            for face in Face::HORIZONTAL {
                let [dx, _, dz] = face.offset();
                let next = (x + dx, z + dz);
                if !visited.insert(next) {
                    continue;
                }
                if let Some(n) = self.column_node(next.0, next.1) {
                    found.push(n);
                    frontier.push_back((next, steps + 1));
                }
            }
        }
        found
    }

    /// Nodes of every column within a `(2 * depth + 1)` square around
    /// `node`, excluding `node`.
    #[must_use]
    pub fn square_neighbour_nodes(&self, node: &Node, depth: u32) -> Vec<&Node> {
        let d = depth as i32;
        let (cx, cz) = (node.grid_pos.x, node.grid_pos.z);
        let mut found = Vec::new();
        for dz in -d..=d {
            for dx in -d..=d {
                if dx == 0 && dz == 0 {
                    continue;
                }
                if let Some(n) = self.column_node(cx + dx, cz + dz) {
                    found.push(n);
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;

    fn ground(chunk: &mut Chunk, x: i32, y: i32, z: i32) {
        chunk.insert_block(
            BlockRole::Ground,
            Block::new(GridPos::new(x, y, z), BlockType::Grass),
        );
    }

    #[test]
    fn test_layout_chunk_key() {
        let layout = ChunkLayout::default();
        assert_eq!(layout.chunk_key(0.0, 0.0), GridPos::new(0, 0, 0));
        assert_eq!(layout.chunk_key(7.9, -7.9), GridPos::new(0, 0, 0));
        assert_eq!(layout.chunk_key(8.0, -8.1), GridPos::new(16, 0, -16));
        assert_eq!(layout.chunk_key(-24.0, 40.0), GridPos::new(-16, 0, 48));
    }

    #[test]
    fn test_layout_rejects_fractional_extent() {
        assert!(ChunkLayout::new(16, 0.5).is_ok());
        assert!(ChunkLayout::new(16, 0.3).is_err());
        assert!(ChunkLayout::new(0, 1.0).is_err());
        assert!(ChunkLayout::new(16, -1.0).is_err());
    }

    #[test]
    fn test_insert_never_overwrites() {
        let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        let pos = GridPos::new(1, 4, 1);
        assert!(chunk.insert_block(BlockRole::Ground, Block::new(pos, BlockType::Grass)));
        assert!(!chunk.insert_block(BlockRole::Structure, Block::new(pos, BlockType::Rock)));
        assert_eq!(chunk.blocks()[&pos].block_type(), BlockType::Grass);
        assert!(chunk.structure_blocks().is_empty());
        assert!(chunk.validate().is_ok());
    }

    #[test]
    fn test_structure_blocks_ground_node() {
        let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        ground(&mut chunk, 2, 5, 2);
        let base = GridPos::new(2, 5, 2);
        assert!(chunk.node(base).unwrap().is_walkable());

        chunk.insert_block(
            BlockRole::Structure,
            Block::new(GridPos::new(2, 6, 2), BlockType::Wood),
        );
        assert!(!chunk.node(base).unwrap().is_walkable());
    }

    #[test]
    fn test_column_index_orders_top_down() {
        let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        ground(&mut chunk, 3, 5, 3);
        for y in [3, 4] {
            chunk.insert_block(
                BlockRole::Filler,
                Block::new(GridPos::new(3, y, 3), BlockType::Grass),
            );
        }
        chunk.rebuild_column_index();
        chunk.mark_generated();

        assert_eq!(chunk.topmost_block(3, 3).unwrap(), GridPos::new(3, 5, 3));
        assert_eq!(chunk.block_at_depth(3, 3, 2).unwrap(), GridPos::new(3, 3, 3));
        assert!(matches!(
            chunk.block_at_depth(3, 3, 3),
            Err(TerrainError::ColumnNotFound { depth: 3, .. })
        ));
    }

    #[test]
    fn test_lookup_before_generation_fails() {
        let chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        assert_eq!(
            chunk.topmost_block(0, 0),
            Err(TerrainError::ChunkNotGenerated(GridPos::ZERO))
        );
    }

    #[test]
    fn test_validate_detects_stray_block() {
        let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        ground(&mut chunk, 0, 0, 0);
        let stray = GridPos::new(9, 9, 9);
        chunk.blocks.insert(stray, Block::new(stray, BlockType::Lava));
        assert!(matches!(
            chunk.validate(),
            Err(TerrainError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_world_conversions() {
        let chunk: Chunk = Chunk::new(GridPos::new(16, 0, -16), ChunkLayout::default());
        assert_eq!(chunk.origin(), (8, -24));
        assert_eq!(chunk.column_world_center(0, 0), (8.5, -23.5));
        assert_eq!(chunk.local_to_world(GridPos::new(1, 3, 2)), GridPos::new(9, 3, -22));
        assert_eq!(chunk.world_to_column(8.5, -23.5), Some((0, 0)));
        assert_eq!(chunk.world_to_column(7.9, -23.5), None);
    }

    #[test]
    fn test_neighbour_queries() {
        let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        for x in 0..5 {
            for z in 0..5 {
                ground(&mut chunk, x, x + z, z);
            }
        }
        let center = chunk.ground_at(2, 2).map(|b| b.position()).unwrap();
        let node = chunk.node(center).unwrap().clone();

        assert_eq!(chunk.neighbour_nodes(&node).len(), 4);
        // Diamond of radius 2: 4 + 8
        assert_eq!(chunk.cross_neighbour_nodes(&node, 2).len(), 12);
        assert_eq!(chunk.square_neighbour_nodes(&node, 1).len(), 8);
        assert_eq!(chunk.square_neighbour_nodes(&node, 2).len(), 24);

        let corner = chunk.ground_at(0, 0).map(|b| b.position()).unwrap();
        let corner = chunk.node(corner).unwrap().clone();
        assert_eq!(chunk.neighbour_nodes(&corner).len(), 2);
    }

    #[test]
    fn test_state_transitions() {
        let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        assert_eq!(chunk.state(), ChunkState::Generating);
        chunk.mark_generated();
        assert_eq!(chunk.state(), ChunkState::Generated);
        chunk.set_loaded(true);
        assert_eq!(chunk.state(), ChunkState::Loaded);
        chunk.set_loaded(false);
        assert_eq!(chunk.state(), ChunkState::Unloaded);
        chunk.set_loaded(true);
        assert_eq!(chunk.state(), ChunkState::Loaded);
    }

    #[test]
    fn test_clear_blocks() {
        let mut chunk: Chunk = Chunk::new(GridPos::ZERO, ChunkLayout::default());
        ground(&mut chunk, 0, 0, 0);
        chunk.rebuild_column_index();
        chunk.clear_blocks();
        assert!(chunk.blocks().is_empty());
        assert!(chunk.block_positions().is_empty());
        assert!(chunk.nodes().is_empty());
    }
}
