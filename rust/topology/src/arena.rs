// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the planar half-edge topology.
//!
//! The [`TopologyArena`] is the central owner of all topology data. Vertices,
//! edges, loops, faces and regions live inside slot maps with stable,
//! generational keys. Loops and faces store keys rather than references, which
//! keeps the cyclic Edge ↔ Loop ↔ Face relationship free of reference counting.
//!
//! ## Shared edges
//!
//! An edge may be traversed by more than one loop: the wall between two rooms
//! is a single edge used by both floor loops. The set of loops using an edge
//! (its *parents*) is kept in an upward adjacency index. All mutation of an
//! edge's parents and flags happens inside the construction, divide and merge
//! operations of this crate.

use nalgebra::Point2;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::config::KernelConfig;
use crate::content::ContentId;
use crate::divide::LoopPoint;
use crate::keys::*;

/// Data stored for a vertex: a point in 3D space. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Curve geometry of an edge, described in the edge's own start → end direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCurve {
    Straight,
    Arc {
        center: Point2<f64>,
        radius: f64,
        clockwise: bool,
    },
}

/// Data stored for an edge: an undirected segment between two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexKey,
    pub end: VertexKey,
    pub curve: EdgeCurve,
    /// Structural seam between two regions (e.g. a wall between two rooms).
    pub is_split_edge: bool,
    /// Internal to a single region's subdivision.
    pub is_inner_edge: bool,
}

/// Identifies one coedge: position `index` within loop `lp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoEdgeRef {
    pub lp: LoopKey,
    pub index: usize,
}

/// A directed use of an edge within one loop.
#[derive(Debug, Clone, PartialEq)]
pub struct CoEdge {
    pub edge: EdgeKey,
    /// `true` when the loop traverses the edge end → start.
    pub reversed: bool,
    /// The coedge on the other side of the edge, if exactly one exists.
    pub partner: Option<CoEdgeRef>,
}

/// Role of a loop inside its face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    Outer,
    Divide,
}

/// Data stored for a loop: a closed, ordered cycle of coedges.
#[derive(Debug, Clone)]
pub struct LoopData {
    pub coedges: Vec<CoEdge>,
    pub face: Option<FaceKey>,
    pub kind: LoopKind,
}

/// Floor or ceiling, with the fields specific to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    Floor,
    Ceiling { host_floor: Option<FaceKey> },
}

/// Data stored for a face: one outer loop plus its divide loops.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub outer_loop: LoopKey,
    pub divide_loops: Vec<LoopKey>,
    pub kind: FaceKind,
    pub material: Option<String>,
    pub is_split_face: bool,
    pub region: Option<RegionKey>,
}

/// The outline a divide pass operated on, and the faces it produced.
#[derive(Debug, Clone)]
pub struct RegionData {
    pub outline: Vec<LoopPoint>,
    pub kind: FaceKind,
    pub faces: Vec<FaceKey>,
}

/// The central arena that owns all topology entities and their adjacency indices.
///
/// # Example
///
/// ```
/// use floorplan_topology::{FaceKind, LoopPoint, TopologyArena};
///
/// let mut arena = TopologyArena::new();
/// let outline = vec![
///     LoopPoint::new(0.0, 0.0),
///     LoopPoint::new(10.0, 0.0),
///     LoopPoint::new(10.0, 10.0),
///     LoopPoint::new(0.0, 10.0),
/// ];
/// let halves = vec![
///     vec![
///         LoopPoint::new(0.0, 0.0),
///         LoopPoint::new(5.0, 0.0),
///         LoopPoint::new(5.0, 10.0),
///         LoopPoint::new(0.0, 10.0),
///     ],
///     vec![
///         LoopPoint::new(5.0, 0.0),
///         LoopPoint::new(10.0, 0.0),
///         LoopPoint::new(10.0, 10.0),
///         LoopPoint::new(5.0, 10.0),
///     ],
/// ];
///
/// let faces = arena.divide_face(&outline, &halves, FaceKind::Floor);
/// assert_eq!(faces.len(), 2);
/// assert_eq!(arena.edge_count(), 7);
/// ```
#[derive(Debug)]
pub struct TopologyArena {
    // Entity storage
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) loops: SlotMap<LoopKey, LoopData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) regions: SlotMap<RegionKey, RegionData>,

    // Upward adjacency: child → parents
    pub(crate) vertex_to_edges: FxHashMap<VertexKey, FxHashSet<EdgeKey>>,
    pub(crate) edge_to_loops: FxHashMap<EdgeKey, FxHashSet<LoopKey>>,

    // Content hosted by faces (furniture, fixtures, ...)
    pub(crate) contents: FxHashMap<FaceKey, Vec<ContentId>>,

    pub(crate) config: KernelConfig,
}

impl TopologyArena {
    /// Creates a new, empty topology arena with default tolerances.
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    /// Creates a new, empty topology arena with the given configuration.
    pub fn with_config(config: KernelConfig) -> Self {
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            loops: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            regions: SlotMap::with_key(),

            vertex_to_edges: FxHashMap::default(),
            edge_to_loops: FxHashMap::default(),

            contents: FxHashMap::default(),

            config,
        }
    }

    /// Returns the configuration this arena was built with.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    // --- Vertex operations ---

    /// Adds a vertex at the given 3D coordinates.
    ///
    /// No deduplication happens here; construction passes go through a
    /// [`PointRegistry`](crate::registry::PointRegistry).
    pub fn add_vertex(&mut self, x: f64, y: f64, z: f64) -> VertexKey {
        self.vertices.insert(VertexData { x, y, z })
    }

    /// Returns the vertex data for the given key, or `None` if not found.
    pub fn vertex(&self, key: VertexKey) -> Option<&VertexData> {
        self.vertices.get(key)
    }

    /// Returns the number of vertices in the arena.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the coordinates of a vertex as `[x, y, z]`.
    pub fn vertex_coords(&self, key: VertexKey) -> Option<[f64; 3]> {
        self.vertices.get(key).map(|v| [v.x, v.y, v.z])
    }

    // --- Edge operations ---

    /// Returns the edge data for the given key, or `None` if not found.
    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    /// Returns the number of edges in the arena.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Loop operations ---

    /// Returns the loop data for the given key, or `None` if not found.
    pub fn get_loop(&self, key: LoopKey) -> Option<&LoopData> {
        self.loops.get(key)
    }

    /// Returns the number of loops in the arena.
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    // --- Face operations ---

    /// Returns the face data for the given key, or `None` if not found.
    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    /// Returns the number of faces in the arena.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterates over all face keys.
    pub fn face_keys(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.faces.keys()
    }

    // --- Region operations ---

    /// Returns the region data for the given key, or `None` if not found.
    pub fn region(&self, key: RegionKey) -> Option<&RegionData> {
        self.regions.get(key)
    }

    /// Returns the number of regions in the arena.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    // --- Entity existence checks ---

    /// Returns `true` if the given topology key references a valid entity.
    pub fn contains(&self, key: TopologyKey) -> bool {
        match key {
            TopologyKey::Vertex(k) => self.vertices.contains_key(k),
            TopologyKey::Edge(k) => self.edges.contains_key(k),
            TopologyKey::Loop(k) => self.loops.contains_key(k),
            TopologyKey::Face(k) => self.faces.contains_key(k),
            TopologyKey::Region(k) => self.regions.contains_key(k),
        }
    }

    // --- Adjacency index helpers ---

    /// Register that an edge uses a vertex (upward adjacency).
    pub(crate) fn link_vertex_edge(&mut self, vertex: VertexKey, edge: EdgeKey) {
        self.vertex_to_edges.entry(vertex).or_default().insert(edge);
    }

    /// Register that a loop uses an edge (upward adjacency).
    pub(crate) fn link_edge_loop(&mut self, edge: EdgeKey, lp: LoopKey) {
        self.edge_to_loops.entry(edge).or_default().insert(lp);
    }

    /// Remove a loop from an edge's parents. Returns the remaining parent count.
    pub(crate) fn unlink_edge_loop(&mut self, edge: EdgeKey, lp: LoopKey) -> usize {
        match self.edge_to_loops.get_mut(&edge) {
            Some(parents) => {
                parents.remove(&lp);
                let remaining = parents.len();
                if remaining == 0 {
                    self.edge_to_loops.remove(&edge);
                }
                remaining
            }
            None => 0,
        }
    }

    /// Number of loops currently using an edge.
    pub(crate) fn parent_count(&self, edge: EdgeKey) -> usize {
        self.edge_to_loops.get(&edge).map_or(0, |s| s.len())
    }
}

impl Default for TopologyArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_is_empty() {
        let arena = TopologyArena::new();
        assert_eq!(arena.vertex_count(), 0);
        assert_eq!(arena.edge_count(), 0);
        assert_eq!(arena.loop_count(), 0);
        assert_eq!(arena.face_count(), 0);
        assert_eq!(arena.region_count(), 0);
    }

    #[test]
    fn add_and_retrieve_vertex() {
        let mut arena = TopologyArena::new();
        let key = arena.add_vertex(1.0, 2.0, 3.0);

        let v = arena.vertex(key).unwrap();
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
        assert_eq!(arena.vertex_coords(key), Some([1.0, 2.0, 3.0]));
        assert!(arena.contains(TopologyKey::Vertex(key)));
    }

    #[test]
    fn with_config_keeps_tolerance() {
        let config = KernelConfig {
            tolerance: 0.5,
            ..KernelConfig::default()
        };
        let arena = TopologyArena::with_config(config);
        assert_eq!(arena.config().tolerance, 0.5);
    }

    #[test]
    fn unlink_reports_remaining_parents() {
        let mut arena = TopologyArena::new();
        let mut loops: SlotMap<LoopKey, ()> = SlotMap::with_key();
        let (l0, l1) = (loops.insert(()), loops.insert(()));
        let v0 = arena.add_vertex(0.0, 0.0, 0.0);
        let v1 = arena.add_vertex(1.0, 0.0, 0.0);
        let edge = arena.add_edge(v0, v1).unwrap();

        arena.link_edge_loop(edge, l0);
        arena.link_edge_loop(edge, l1);
        assert_eq!(arena.parent_count(edge), 2);
        assert_eq!(arena.unlink_edge_loop(edge, l0), 1);
        assert_eq!(arena.unlink_edge_loop(edge, l1), 0);
        assert_eq!(arena.parent_count(edge), 0);
    }
}
