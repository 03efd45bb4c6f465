// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traversal methods for navigating the topology hierarchy.
//!
//! Supports both downward traversal (face → loops → coedges → edges →
//! vertices) and upward traversal (vertex → edges → loops → faces) via the
//! adjacency index.

use rustc_hash::FxHashSet;

use crate::arena::*;
use crate::keys::*;

// =============================================================================
// CoEdge navigation
// =============================================================================

impl TopologyArena {
    /// Returns the coedge at a position in a loop.
    pub fn coedge(&self, r: CoEdgeRef) -> Option<&CoEdge> {
        self.loops.get(r.lp)?.coedges.get(r.index)
    }

    /// Returns the vertex a coedge starts at, honouring its direction.
    pub fn coedge_start(&self, r: CoEdgeRef) -> Option<VertexKey> {
        let coedge = self.coedge(r)?;
        let edge = self.edges.get(coedge.edge)?;
        Some(if coedge.reversed { edge.end } else { edge.start })
    }

    /// Returns the vertex a coedge ends at, honouring its direction.
    pub fn coedge_end(&self, r: CoEdgeRef) -> Option<VertexKey> {
        let coedge = self.coedge(r)?;
        let edge = self.edges.get(coedge.edge)?;
        Some(if coedge.reversed { edge.start } else { edge.end })
    }

    /// Returns the clockwise sense of an arc as seen along this coedge.
    ///
    /// `None` for straight edges. Two partner coedges over the same arc
    /// always report opposite senses.
    pub fn coedge_clockwise(&self, r: CoEdgeRef) -> Option<bool> {
        let coedge = self.coedge(r)?;
        match self.edges.get(coedge.edge)?.curve {
            EdgeCurve::Arc { clockwise, .. } => Some(clockwise ^ coedge.reversed),
            EdgeCurve::Straight => None,
        }
    }

    /// Returns whether the edge under a coedge is a split edge.
    pub fn coedge_is_split_edge(&self, r: CoEdgeRef) -> Option<bool> {
        let coedge = self.coedge(r)?;
        self.edges.get(coedge.edge).map(|e| e.is_split_edge)
    }

    /// Returns whether the edge under a coedge is an inner edge.
    pub fn coedge_is_inner_edge(&self, r: CoEdgeRef) -> Option<bool> {
        let coedge = self.coedge(r)?;
        self.edges.get(coedge.edge).map(|e| e.is_inner_edge)
    }

    /// Returns the following coedge in the same loop, wrapping around.
    pub fn next_coedge(&self, r: CoEdgeRef) -> Option<CoEdgeRef> {
        let n = self.loops.get(r.lp)?.coedges.len();
        if r.index >= n {
            return None;
        }
        Some(CoEdgeRef {
            lp: r.lp,
            index: (r.index + 1) % n,
        })
    }

    /// Returns the preceding coedge in the same loop, wrapping around.
    pub fn prev_coedge(&self, r: CoEdgeRef) -> Option<CoEdgeRef> {
        let n = self.loops.get(r.lp)?.coedges.len();
        if r.index >= n {
            return None;
        }
        Some(CoEdgeRef {
            lp: r.lp,
            index: (r.index + n - 1) % n,
        })
    }

    /// Returns the coedge on the other side of the same edge, if any.
    pub fn coedge_partner(&self, r: CoEdgeRef) -> Option<CoEdgeRef> {
        self.coedge(r)?.partner
    }

    // =========================================================================
    // Downward traversal
    // =========================================================================

    /// Returns references to every coedge of a loop, in order.
    pub fn loop_coedges(&self, lp: LoopKey) -> Option<Vec<CoEdgeRef>> {
        let n = self.loops.get(lp)?.coedges.len();
        Some((0..n).map(|index| CoEdgeRef { lp, index }).collect())
    }

    /// Returns the start vertex of every coedge of a loop, in traversal order.
    pub fn loop_vertices_ordered(&self, lp: LoopKey) -> Option<Vec<VertexKey>> {
        let data = self.loops.get(lp)?;
        let mut vertices = Vec::with_capacity(data.coedges.len());

        for coedge in &data.coedges {
            let edge = self.edges.get(coedge.edge)?;
            vertices.push(if coedge.reversed { edge.end } else { edge.start });
        }

        Some(vertices)
    }

    /// Returns `true` if every coedge ends where the next one starts.
    ///
    /// Loops with fewer than 3 coedges are never closed.
    pub fn loop_is_closed(&self, lp: LoopKey) -> bool {
        let n = match self.loops.get(lp) {
            Some(data) => data.coedges.len(),
            None => return false,
        };
        if n < 3 {
            return false;
        }

        (0..n).all(|index| {
            let here = CoEdgeRef { lp, index };
            let next = CoEdgeRef {
                lp,
                index: (index + 1) % n,
            };
            match (self.coedge_end(here), self.coedge_start(next)) {
                (Some(end), Some(start)) => end == start,
                _ => false,
            }
        })
    }

    /// Returns the face owning a loop.
    pub fn loop_face(&self, lp: LoopKey) -> Option<FaceKey> {
        self.loops.get(lp)?.face
    }

    /// Returns the start and end vertex keys of an edge.
    pub fn edge_vertices(&self, key: EdgeKey) -> Option<(VertexKey, VertexKey)> {
        self.edges.get(key).map(|e| (e.start, e.end))
    }

    /// Returns the outer loop of a face.
    pub fn face_outer_loop(&self, key: FaceKey) -> Option<LoopKey> {
        self.faces.get(key).map(|f| f.outer_loop)
    }

    /// Returns the divide loops of a face.
    pub fn face_divide_loops(&self, key: FaceKey) -> Option<&[LoopKey]> {
        self.faces.get(key).map(|f| f.divide_loops.as_slice())
    }

    /// Returns all loops of a face, outer loop first.
    pub fn face_loops(&self, key: FaceKey) -> Option<Vec<LoopKey>> {
        let face = self.faces.get(key)?;
        let mut loops = Vec::with_capacity(1 + face.divide_loops.len());
        loops.push(face.outer_loop);
        loops.extend_from_slice(&face.divide_loops);
        Some(loops)
    }

    /// Returns all unique edge keys in a face.
    pub fn face_edges(&self, key: FaceKey) -> Option<FxHashSet<EdgeKey>> {
        let mut set = FxHashSet::default();
        for lp in self.face_loops(key)? {
            if let Some(data) = self.loops.get(lp) {
                set.extend(data.coedges.iter().map(|c| c.edge));
            }
        }
        Some(set)
    }

    /// Returns the edges of a face's outer loop, in traversal order.
    pub fn face_outer_edges(&self, key: FaceKey) -> Option<Vec<EdgeKey>> {
        let face = self.faces.get(key)?;
        let data = self.loops.get(face.outer_loop)?;
        Some(data.coedges.iter().map(|c| c.edge).collect())
    }

    // =========================================================================
    // Upward traversal
    // =========================================================================

    /// Returns the loops currently using an edge (its parents).
    pub fn edge_parents(&self, key: EdgeKey) -> Vec<LoopKey> {
        self.edge_to_loops
            .get(&key)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns all edges incident to a vertex.
    pub fn vertex_edges(&self, key: VertexKey) -> Vec<EdgeKey> {
        self.vertex_to_edges
            .get(&key)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the faces using an edge through any of their loops.
    pub fn edge_faces(&self, key: EdgeKey) -> FxHashSet<FaceKey> {
        self.edge_to_loops
            .get(&key)
            .map(|parents| parents.iter().filter_map(|&lp| self.loop_face(lp)).collect())
            .unwrap_or_default()
    }

    /// Returns the entities one level up from `key`, all of kind
    /// `key.topology_type().parent_type()`.
    pub fn parents(&self, key: TopologyKey) -> Vec<TopologyKey> {
        match key {
            TopologyKey::Vertex(v) => self.vertex_edges(v).into_iter().map(TopologyKey::from).collect(),
            TopologyKey::Edge(e) => self.edge_parents(e).into_iter().map(TopologyKey::from).collect(),
            TopologyKey::Loop(lp) => self.loop_face(lp).into_iter().map(TopologyKey::from).collect(),
            TopologyKey::Face(f) => self
                .faces
                .get(f)
                .and_then(|data| data.region)
                .into_iter()
                .map(TopologyKey::from)
                .collect(),
            TopologyKey::Region(_) => Vec::new(),
        }
    }
}
