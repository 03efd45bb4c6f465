// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction and destruction of topology entities.
//!
//! Each entity is created through the arena, which ensures referential
//! integrity (all referenced sub-entities must exist) and maintains the
//! bidirectional adjacency index. Loops are built from annotated point lists;
//! edges are shared automatically when two loops walk the same vertex pair.

use nalgebra::Point2;

use crate::arena::*;
use crate::debug_checks;
use crate::divide::{ArcInfo, LoopPoint, SplitEdgeInfo};
use crate::error::{Error, Result};
use crate::keys::*;
use crate::registry::PointRegistry;

/// Arc and split annotations collected for the edge leaving one vertex.
#[derive(Debug, Clone, Copy, Default)]
struct EdgeAnnotation {
    arc: Option<ArcInfo>,
    split: Option<SplitEdgeInfo>,
}

impl EdgeAnnotation {
    fn of(point: &LoopPoint) -> Self {
        Self {
            arc: point.arc_info,
            split: point.split_edge_info,
        }
    }

    /// Fill missing annotations from `other`, keeping our own where present.
    fn fill_from(&mut self, other: EdgeAnnotation) {
        self.arc = self.arc.or(other.arc);
        self.split = self.split.or(other.split);
    }
}

impl TopologyArena {
    /// Creates a straight edge between two existing vertices.
    ///
    /// Returns an error if either vertex does not exist in the arena.
    pub fn add_edge(&mut self, start: VertexKey, end: VertexKey) -> Result<EdgeKey> {
        if !self.vertices.contains_key(start) {
            return Err(Error::VertexNotFound(start));
        }
        if !self.vertices.contains_key(end) {
            return Err(Error::VertexNotFound(end));
        }

        Ok(self.insert_edge(start, end))
    }

    pub(crate) fn insert_edge(&mut self, start: VertexKey, end: VertexKey) -> EdgeKey {
        let key = self.edges.insert(EdgeData {
            start,
            end,
            curve: EdgeCurve::Straight,
            is_split_edge: false,
            is_inner_edge: false,
        });
        self.link_vertex_edge(start, key);
        self.link_vertex_edge(end, key);
        key
    }

    /// Finds an existing edge joining `a` and `b`, in either direction.
    pub fn find_edge(&self, a: VertexKey, b: VertexKey) -> Option<EdgeKey> {
        let incident = self.vertex_to_edges.get(&a)?;
        incident.iter().copied().find(|&ek| {
            self.edges
                .get(ek)
                .map_or(false, |e| (e.start == a && e.end == b) || (e.start == b && e.end == a))
        })
    }

    /// Builds a closed loop from an ordered, annotated point list.
    ///
    /// Points are deduplicated through `registry`; consecutive duplicates and
    /// an explicit closing point are collapsed. The annotation on point *i*
    /// describes the edge from point *i* to point *i + 1*.
    ///
    /// Edge flags follow these rules, in order:
    /// 1. without any explicit split annotation in `points`, an edge that now
    ///    has more than one parent loop becomes a split edge;
    /// 2. an arc annotation turns the edge into an arc whose stored sense is
    ///    `clockwise XOR reversed`, so the curve is the same from either side;
    /// 3. an explicit split annotation overrides rule 1.
    ///
    /// Closure is a caller precondition: fewer than 3 distinct vertices trips
    /// a debug assertion.
    pub fn build_loop(&mut self, points: &[LoopPoint], registry: &mut PointRegistry) -> LoopKey {
        let mut vertices: Vec<VertexKey> = Vec::with_capacity(points.len());
        let mut annotations: Vec<EdgeAnnotation> = Vec::with_capacity(points.len());

        for point in points {
            let vk = registry.register(self, point.position());
            let annotation = EdgeAnnotation::of(point);

            if vertices.last() == Some(&vk) {
                // The later duplicate starts the edge that actually survives.
                if let Some(prev) = annotations.last_mut() {
                    let mut merged = annotation;
                    merged.fill_from(*prev);
                    *prev = merged;
                }
                continue;
            }

            vertices.push(vk);
            annotations.push(annotation);
        }

        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
            if let Some(closing) = annotations.pop() {
                annotations[0].fill_from(closing);
            }
        }

        debug_assert!(
            vertices.len() >= 3,
            "loop needs at least 3 distinct vertices, got {}",
            vertices.len()
        );

        let n = vertices.len();
        let explicit_split = annotations.iter().any(|a| a.split.is_some());

        let mut coedges = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            let edge = match self.find_edge(a, b) {
                Some(existing) => existing,
                None => self.insert_edge(a, b),
            };
            let reversed = self.edges[edge].start != a;
            coedges.push(CoEdge {
                edge,
                reversed,
                partner: None,
            });
        }

        let key = self.loops.insert(LoopData {
            coedges: coedges.clone(),
            face: None,
            kind: LoopKind::Outer,
        });

        for (coedge, annotation) in coedges.iter().zip(&annotations) {
            self.link_edge_loop(coedge.edge, key);
            let parents = self.parent_count(coedge.edge);
            let edge = &mut self.edges[coedge.edge];

            if !explicit_split && parents > 1 {
                edge.is_split_edge = true;
            }

            if let Some(arc) = annotation.arc {
                edge.curve = EdgeCurve::Arc {
                    center: Point2::new(arc.center.x, arc.center.y),
                    radius: arc.radius,
                    clockwise: arc.clockwise ^ coedge.reversed,
                };
            }

            if let Some(split) = annotation.split {
                edge.is_split_edge = split.is_split_edge;
                edge.is_inner_edge = split.is_inner_edge;
            }
        }

        for coedge in &coedges {
            self.refresh_partners(coedge.edge);
        }

        tracing::debug!(
            points = points.len(),
            coedges = n,
            explicit_split,
            "Built loop"
        );
        debug_checks::check_loop_closed(self, key);

        key
    }

    /// Creates a face owning `outer_loop`.
    ///
    /// Returns an error if the loop does not exist or has fewer than 3 coedges.
    pub fn add_face(&mut self, outer_loop: LoopKey, kind: FaceKind) -> Result<FaceKey> {
        let lp = self
            .loops
            .get(outer_loop)
            .ok_or(Error::LoopNotFound(outer_loop))?;

        if lp.coedges.len() < 3 {
            return Err(Error::DegenerateLoop(lp.coedges.len()));
        }

        Ok(self.insert_face(outer_loop, kind, false))
    }

    pub(crate) fn insert_face(&mut self, outer_loop: LoopKey, kind: FaceKind, is_split_face: bool) -> FaceKey {
        let key = self.faces.insert(FaceData {
            outer_loop,
            divide_loops: Vec::new(),
            kind,
            material: None,
            is_split_face,
            region: None,
        });

        if let Some(lp) = self.loops.get_mut(outer_loop) {
            debug_assert!(lp.face.is_none(), "loop already belongs to a face");
            lp.face = Some(key);
            lp.kind = LoopKind::Outer;
        }

        debug_checks::check_face(self, key);
        key
    }

    /// Attaches an additional divide loop to a face.
    pub fn add_divide_loop(&mut self, face: FaceKey, lp: LoopKey) -> Result<()> {
        if !self.faces.contains_key(face) {
            return Err(Error::FaceNotFound(face));
        }
        let data = self.loops.get_mut(lp).ok_or(Error::LoopNotFound(lp))?;
        data.face = Some(face);
        data.kind = LoopKind::Divide;
        self.faces[face].divide_loops.push(lp);
        Ok(())
    }

    /// Destroys a face together with its loops.
    ///
    /// Edges left without a parent loop and vertices left without an edge are
    /// removed as well. Content hosted by the face is dropped.
    pub fn remove_face(&mut self, face: FaceKey) -> Result<()> {
        let data = self.faces.remove(face).ok_or(Error::FaceNotFound(face))?;

        self.remove_loop(data.outer_loop);
        for lp in data.divide_loops {
            self.remove_loop(lp);
        }

        self.contents.remove(&face);
        if let Some(region) = data.region {
            self.detach_from_region(region, face);
        }

        tracing::debug!(?face, "Removed face");
        Ok(())
    }

    /// Removes a loop and releases its edges.
    pub(crate) fn remove_loop(&mut self, lp: LoopKey) {
        let data = match self.loops.remove(lp) {
            Some(d) => d,
            None => return,
        };

        for coedge in &data.coedges {
            if self.unlink_edge_loop(coedge.edge, lp) == 0 {
                self.remove_edge(coedge.edge);
            } else {
                self.refresh_partners(coedge.edge);
            }
        }
    }

    /// Removes an edge and any vertex it leaves unreferenced.
    pub(crate) fn remove_edge(&mut self, edge: EdgeKey) {
        let data = match self.edges.remove(edge) {
            Some(d) => d,
            None => return,
        };
        self.edge_to_loops.remove(&edge);

        for vertex in [data.start, data.end] {
            let orphaned = match self.vertex_to_edges.get_mut(&vertex) {
                Some(incident) => {
                    incident.remove(&edge);
                    incident.is_empty()
                }
                None => true,
            };
            if orphaned {
                self.vertex_to_edges.remove(&vertex);
                self.vertices.remove(vertex);
            }
        }
    }

    /// Removes `face` from its region, dropping the region once empty.
    pub(crate) fn detach_from_region(&mut self, region: RegionKey, face: FaceKey) {
        let now_empty = match self.regions.get_mut(region) {
            Some(r) => {
                r.faces.retain(|&f| f != face);
                r.faces.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.regions.remove(region);
        }
    }

    /// Recomputes the partner links of every coedge using `edge`.
    ///
    /// Exactly two uses make partners; any other count leaves them unpaired.
    pub(crate) fn refresh_partners(&mut self, edge: EdgeKey) {
        let mut uses: Vec<CoEdgeRef> = Vec::new();
        if let Some(parents) = self.edge_to_loops.get(&edge) {
            for &lp in parents {
                if let Some(data) = self.loops.get(lp) {
                    for (index, coedge) in data.coedges.iter().enumerate() {
                        if coedge.edge == edge {
                            uses.push(CoEdgeRef { lp, index });
                        }
                    }
                }
            }
        }

        let pair = if uses.len() == 2 {
            Some((uses[0], uses[1]))
        } else {
            None
        };

        for r in &uses {
            let partner = pair.map(|(a, b)| if *r == a { b } else { a });
            if let Some(data) = self.loops.get_mut(r.lp) {
                data.coedges[r.index].partner = partner;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divide::PlanePoint;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<LoopPoint> {
        vec![
            LoopPoint::new(x0, y0),
            LoopPoint::new(x0 + size, y0),
            LoopPoint::new(x0 + size, y0 + size),
            LoopPoint::new(x0, y0 + size),
        ]
    }

    // --- Edge tests ---

    #[test]
    fn add_edge_valid() {
        let mut arena = TopologyArena::new();
        let v0 = arena.add_vertex(0.0, 0.0, 0.0);
        let v1 = arena.add_vertex(1.0, 0.0, 0.0);
        let edge = arena.add_edge(v0, v1).unwrap();

        let data = arena.edge(edge).unwrap();
        assert_eq!(data.start, v0);
        assert_eq!(data.end, v1);
        assert_eq!(data.curve, EdgeCurve::Straight);
        assert!(!data.is_split_edge);
    }

    #[test]
    fn add_edge_invalid_vertex() {
        let mut arena = TopologyArena::new();
        let v0 = arena.add_vertex(0.0, 0.0, 0.0);

        // Stale key: the generation counter ensures it is invalid.
        let v_temp = arena.add_vertex(99.0, 99.0, 99.0);
        arena.vertices.remove(v_temp);

        assert!(matches!(arena.add_edge(v0, v_temp), Err(Error::VertexNotFound(_))));
    }

    #[test]
    fn find_edge_either_direction() {
        let mut arena = TopologyArena::new();
        let v0 = arena.add_vertex(0.0, 0.0, 0.0);
        let v1 = arena.add_vertex(1.0, 0.0, 0.0);
        let v2 = arena.add_vertex(2.0, 0.0, 0.0);
        let edge = arena.add_edge(v0, v1).unwrap();

        assert_eq!(arena.find_edge(v0, v1), Some(edge));
        assert_eq!(arena.find_edge(v1, v0), Some(edge));
        assert_eq!(arena.find_edge(v0, v2), None);
    }

    // --- Loop tests ---

    #[test]
    fn build_loop_square() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        let lp = arena.build_loop(&square(0.0, 0.0, 1.0), &mut registry);

        let data = arena.get_loop(lp).unwrap();
        assert_eq!(data.coedges.len(), 4);
        assert!(data.coedges.iter().all(|c| !c.reversed));
        assert!(data.coedges.iter().all(|c| c.partner.is_none()));
        assert_eq!(arena.vertex_count(), 4);
        assert_eq!(arena.edge_count(), 4);
        assert!(arena.loop_is_closed(lp));
    }

    #[test]
    fn build_loop_collapses_duplicates_and_closing_point() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        let points = vec![
            LoopPoint::new(0.0, 0.0),
            LoopPoint::new(4.0, 0.0),
            LoopPoint::new(4.0, 0.0),
            LoopPoint::new(4.0, 3.0),
            LoopPoint::new(0.0, 0.0),
        ];
        let lp = arena.build_loop(&points, &mut registry);

        assert_eq!(arena.get_loop(lp).unwrap().coedges.len(), 3);
        assert_eq!(arena.vertex_count(), 3);
    }

    #[test]
    fn shared_edge_between_two_loops_is_split() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        let left = arena.build_loop(&square(0.0, 0.0, 1.0), &mut registry);
        let right = arena.build_loop(&square(1.0, 0.0, 1.0), &mut registry);

        assert_eq!(arena.edge_count(), 7);

        let shared = arena.get_loop(left).unwrap().coedges[1].edge;
        assert!(arena.edge(shared).unwrap().is_split_edge);

        // The right square walks the shared edge backwards.
        let right_use = arena
            .get_loop(right)
            .unwrap()
            .coedges
            .iter()
            .find(|c| c.edge == shared)
            .unwrap();
        assert!(right_use.reversed);

        // Partners point at each other.
        let left_ref = CoEdgeRef { lp: left, index: 1 };
        let right_ref = CoEdgeRef { lp: right, index: 3 };
        assert_eq!(arena.coedge_partner(left_ref), Some(right_ref));
        assert_eq!(arena.coedge_partner(right_ref), Some(left_ref));
    }

    #[test]
    fn explicit_split_annotation_disables_inference() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        arena.build_loop(&square(0.0, 0.0, 1.0), &mut registry);

        let mut right = square(1.0, 0.0, 1.0);
        right[3] = right[3].clone().with_split_edge_info(SplitEdgeInfo {
            is_split_edge: false,
            is_inner_edge: true,
        });
        let lp = arena.build_loop(&right, &mut registry);

        let shared = arena.get_loop(lp).unwrap().coedges[3].edge;
        let edge = arena.edge(shared).unwrap();
        assert!(!edge.is_split_edge);
        assert!(edge.is_inner_edge);
    }

    #[test]
    fn arc_annotation_is_stored_in_edge_direction() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        let arc = ArcInfo {
            center: PlanePoint { x: 0.5, y: 0.0 },
            radius: 0.5,
            clockwise: true,
        };
        let mut points = square(0.0, 0.0, 1.0);
        points[0] = points[0].clone().with_arc_info(arc);
        let lp = arena.build_loop(&points, &mut registry);

        let edge = arena.get_loop(lp).unwrap().coedges[0].edge;
        match arena.edge(edge).unwrap().curve {
            EdgeCurve::Arc { radius, clockwise, .. } => {
                assert_eq!(radius, 0.5);
                assert!(clockwise);
            }
            EdgeCurve::Straight => panic!("expected arc"),
        }
    }

    // --- Face tests ---

    #[test]
    fn add_face_links_loop() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        let lp = arena.build_loop(&square(0.0, 0.0, 2.0), &mut registry);
        let face = arena.add_face(lp, FaceKind::Floor).unwrap();

        assert_eq!(arena.face(face).unwrap().outer_loop, lp);
        assert_eq!(arena.loop_face(lp), Some(face));
        assert!(!arena.face(face).unwrap().is_split_face);
    }

    #[test]
    fn add_divide_loop_marks_kind() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        let outer = arena.build_loop(&square(0.0, 0.0, 10.0), &mut registry);
        let inner = arena.build_loop(&square(2.0, 2.0, 2.0), &mut registry);
        let face = arena.add_face(outer, FaceKind::Floor).unwrap();

        arena.add_divide_loop(face, inner).unwrap();
        assert_eq!(arena.face(face).unwrap().divide_loops, vec![inner]);
        assert_eq!(arena.get_loop(inner).unwrap().kind, LoopKind::Divide);
        assert_eq!(arena.loop_face(inner), Some(face));
    }

    #[test]
    fn remove_face_releases_unshared_topology() {
        let mut arena = TopologyArena::new();
        let mut registry = PointRegistry::for_arena(&arena);
        let left = arena.build_loop(&square(0.0, 0.0, 1.0), &mut registry);
        let right = arena.build_loop(&square(1.0, 0.0, 1.0), &mut registry);
        let left_face = arena.add_face(left, FaceKind::Floor).unwrap();
        arena.add_face(right, FaceKind::Floor).unwrap();

        arena.remove_face(left_face).unwrap();

        // Only the right square survives, including the formerly shared edge.
        assert_eq!(arena.face_count(), 1);
        assert_eq!(arena.loop_count(), 1);
        assert_eq!(arena.edge_count(), 4);
        assert_eq!(arena.vertex_count(), 4);
        let shared = &arena.get_loop(right).unwrap().coedges[3];
        assert!(shared.partner.is_none());
        assert!(arena.remove_face(left_face).is_err());
    }
}
