// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric queries on topology entities.
//!
//! Lengths, areas and normals. Arcs are measured exactly where a closed form
//! exists (length) and discretized with the configured segment count where
//! a polygon is needed (area, boolean checks).

use floorplan_geometry::{arc_length, compute_signed_area, sample_arc, ArcSpec, Polygon};
use nalgebra::{Point2, Point3, Vector3};

use crate::arena::*;
use crate::keys::*;

impl TopologyArena {
    /// Returns the 3D position of a vertex as a nalgebra Point3.
    pub fn vertex_point(&self, key: VertexKey) -> Option<Point3<f64>> {
        self.vertices.get(key).map(|v| Point3::new(v.x, v.y, v.z))
    }

    fn vertex_xy(&self, key: VertexKey) -> Option<Point2<f64>> {
        self.vertices.get(key).map(|v| Point2::new(v.x, v.y))
    }

    /// Returns the arc of an edge in its own start → end direction.
    pub fn edge_arc(&self, key: EdgeKey) -> Option<ArcSpec> {
        match self.edges.get(key)?.curve {
            EdgeCurve::Arc {
                center,
                radius,
                clockwise,
            } => Some(ArcSpec::new(center, radius, clockwise)),
            EdgeCurve::Straight => None,
        }
    }

    /// Returns the arc under a coedge in the coedge's traversal direction.
    pub fn coedge_arc(&self, r: CoEdgeRef) -> Option<ArcSpec> {
        let coedge = self.coedge(r)?;
        let arc = self.edge_arc(coedge.edge)?;
        Some(if coedge.reversed { arc.reversed() } else { arc })
    }

    /// Computes the length of an edge: chord for straight, arc length for arcs.
    pub fn edge_length(&self, key: EdgeKey) -> Option<f64> {
        let edge = self.edges.get(key)?;
        match self.edge_arc(key) {
            Some(arc) => {
                let p0 = self.vertex_xy(edge.start)?;
                let p1 = self.vertex_xy(edge.end)?;
                Some(arc_length(&p0, &p1, &arc))
            }
            None => {
                let p0 = self.vertex_point(edge.start)?;
                let p1 = self.vertex_point(edge.end)?;
                Some((p1 - p0).norm())
            }
        }
    }

    /// Returns the XY contour of a loop with arcs discretized.
    ///
    /// Malformed arcs (non-positive radius) are emitted as straight chords.
    pub fn loop_polygon(&self, lp: LoopKey) -> Option<Polygon> {
        let segments = self.config.arc_segments;
        let mut polygon = Vec::new();

        for r in self.loop_coedges(lp)? {
            let start = self.vertex_xy(self.coedge_start(r)?)?;
            polygon.push(start);

            if let Some(arc) = self.coedge_arc(r) {
                let end = self.vertex_xy(self.coedge_end(r)?)?;
                if let Ok(interior) = sample_arc(&start, &end, &arc, segments) {
                    polygon.extend(interior);
                }
            }
        }

        Some(polygon)
    }

    /// Signed XY area of a loop: positive for counter-clockwise winding.
    pub fn loop_area(&self, lp: LoopKey) -> Option<f64> {
        self.loop_polygon(lp).map(|p| compute_signed_area(&p))
    }

    /// Area of a face's outer loop.
    pub fn face_area(&self, key: FaceKey) -> Option<f64> {
        let face = self.faces.get(key)?;
        self.loop_area(face.outer_loop).map(f64::abs)
    }

    /// Computes a loop's normal using Newell's method.
    ///
    /// Works for any planar polygon (convex or concave). The normal direction
    /// follows the right-hand rule relative to the vertex winding order.
    pub fn loop_normal(&self, lp: LoopKey) -> Option<Vector3<f64>> {
        let verts = self.loop_vertices_ordered(lp)?;

        if verts.len() < 3 {
            return None;
        }

        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        let n = verts.len();

        for i in 0..n {
            let curr = self.vertex_point(verts[i])?;
            let next = self.vertex_point(verts[(i + 1) % n])?;

            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }

        let len = normal.norm();
        if len < 1e-15 {
            return None; // degenerate loop
        }

        Some(normal / len)
    }

    /// Computes the normal of a face's outer loop.
    pub fn face_normal(&self, key: FaceKey) -> Option<Vector3<f64>> {
        let face = self.faces.get(key)?;
        self.loop_normal(face.outer_loop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divide::{ArcInfo, LoopPoint, PlanePoint};
    use crate::registry::PointRegistry;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn build(arena: &mut TopologyArena, points: &[LoopPoint]) -> LoopKey {
        let mut registry = PointRegistry::for_arena(arena);
        arena.build_loop(points, &mut registry)
    }

    #[test]
    fn straight_edge_length() {
        let mut arena = TopologyArena::new();
        let lp = build(
            &mut arena,
            &[
                LoopPoint::new(0.0, 0.0),
                LoopPoint::new(3.0, 0.0),
                LoopPoint::new(3.0, 4.0),
            ],
        );
        let edges = arena.get_loop(lp).unwrap().coedges.clone();
        assert_relative_eq!(arena.edge_length(edges[0].edge).unwrap(), 3.0);
        assert_relative_eq!(arena.edge_length(edges[2].edge).unwrap(), 5.0);
    }

    #[test]
    fn arc_edge_length_is_half_circumference() {
        let mut arena = TopologyArena::new();
        let lp = build(
            &mut arena,
            &[
                LoopPoint::new(-1.0, 0.0).with_arc_info(ArcInfo {
                    center: PlanePoint { x: 0.0, y: 0.0 },
                    radius: 1.0,
                    clockwise: false,
                }),
                LoopPoint::new(1.0, 0.0),
                LoopPoint::new(0.0, 2.0),
            ],
        );
        let coedges = arena.get_loop(lp).unwrap().coedges.clone();
        assert!(arena.edge_arc(coedges[0].edge).is_some());
        assert_relative_eq!(arena.edge_length(coedges[0].edge).unwrap(), PI, epsilon = 1e-12);
        assert_relative_eq!(arena.edge_length(coedges[1].edge).unwrap(), 5f64.sqrt());
    }

    #[test]
    fn square_area_and_normal() {
        let mut arena = TopologyArena::new();
        let lp = build(
            &mut arena,
            &[
                LoopPoint::new(0.0, 0.0),
                LoopPoint::new(2.0, 0.0),
                LoopPoint::new(2.0, 2.0),
                LoopPoint::new(0.0, 2.0),
            ],
        );
        let face = arena.add_face(lp, FaceKind::Floor).unwrap();

        assert_relative_eq!(arena.loop_area(lp).unwrap(), 4.0);
        assert_relative_eq!(arena.face_area(face).unwrap(), 4.0);

        let n = arena.face_normal(face).unwrap();
        assert_relative_eq!(n.z, 1.0);
    }

    #[test]
    fn clockwise_loop_has_negative_area() {
        let mut arena = TopologyArena::new();
        let lp = build(
            &mut arena,
            &[
                LoopPoint::new(0.0, 0.0),
                LoopPoint::new(0.0, 1.0),
                LoopPoint::new(1.0, 1.0),
                LoopPoint::new(1.0, 0.0),
            ],
        );
        assert_relative_eq!(arena.loop_area(lp).unwrap(), -1.0);
        assert_relative_eq!(arena.loop_normal(lp).unwrap().z, -1.0);
    }

    #[test]
    fn half_disc_area_approaches_exact_value() {
        let mut arena = TopologyArena::new();
        let lp = build(
            &mut arena,
            &[
                LoopPoint::new(-1.0, 0.0),
                LoopPoint::new(1.0, 0.0).with_arc_info(ArcInfo {
                    center: PlanePoint { x: 0.0, y: 0.0 },
                    radius: 1.0,
                    clockwise: false,
                }),
                LoopPoint::new(0.0, 1.0).with_arc_info(ArcInfo {
                    center: PlanePoint { x: 0.0, y: 0.0 },
                    radius: 1.0,
                    clockwise: false,
                }),
            ],
        );

        // Two quarter arcs discretized with 16 segments each.
        let polygon = arena.loop_polygon(lp).unwrap();
        assert_eq!(polygon.len(), 3 + 2 * 15);
        let area = arena.loop_area(lp).unwrap();
        assert!(area > 1.5 && area < PI / 2.0);
    }
}
