// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debug-only integrity checks for detecting corrupted topology early.
//! All functions are no-ops in release builds.

use crate::arena::*;
use crate::keys::*;

/// Check that a loop forms a closed cycle.
#[allow(unused_variables)]
pub fn check_loop_closed(arena: &TopologyArena, lp: LoopKey) {
    #[cfg(debug_assertions)]
    {
        let data = arena.get_loop(lp);
        debug_assert!(data.is_some(), "Loop {:?} does not exist", lp);
        debug_assert!(
            arena.loop_is_closed(lp),
            "Loop {:?} is not closed ({} coedges)",
            lp,
            data.map_or(0, |d| d.coedges.len())
        );
    }
}

/// Check that a face has an outer loop that points back at it.
#[allow(unused_variables)]
pub fn check_face(arena: &TopologyArena, face: FaceKey) {
    #[cfg(debug_assertions)]
    {
        let data = arena.face(face);
        debug_assert!(data.is_some(), "Face {:?} does not exist", face);
        if let Some(data) = data {
            debug_assert!(
                arena.get_loop(data.outer_loop).is_some(),
                "Face {:?} has undefined outer loop {:?}",
                face,
                data.outer_loop
            );
            for lp in std::iter::once(data.outer_loop).chain(data.divide_loops.iter().copied()) {
                debug_assert_eq!(
                    arena.loop_face(lp),
                    Some(face),
                    "Loop {:?} does not point back at face {:?}",
                    lp,
                    face
                );
            }
        }
    }
}

/// Check the whole arena: coordinates, adjacency indices, closure, partners
/// and face/region back-references.
#[allow(unused_variables)]
pub fn check_arena(arena: &TopologyArena) {
    #[cfg(debug_assertions)]
    {
        // Check 1: All vertex coordinates are finite
        for (vk, v) in &arena.vertices {
            debug_assert!(
                v.x.is_finite() && v.y.is_finite() && v.z.is_finite(),
                "Vertex {:?} has non-finite coordinates: ({}, {}, {})",
                vk,
                v.x,
                v.y,
                v.z
            );
        }

        // Check 2: Edge endpoints exist and are indexed
        for (ek, e) in &arena.edges {
            for v in [e.start, e.end] {
                debug_assert!(
                    arena.vertices.contains_key(v),
                    "Edge {:?} references missing vertex {:?}",
                    ek,
                    v
                );
                debug_assert!(
                    arena.vertex_to_edges.get(&v).map_or(false, |s| s.contains(&ek)),
                    "Edge {:?} missing from the index of vertex {:?}",
                    ek,
                    v
                );
            }
        }

        // Check 3: Loops are closed, their edges list them as parents, and
        // partners are mutual
        for (lp, data) in &arena.loops {
            check_loop_closed(arena, lp);
            for (index, coedge) in data.coedges.iter().enumerate() {
                debug_assert!(
                    arena.edge_to_loops.get(&coedge.edge).map_or(false, |s| s.contains(&lp)),
                    "Loop {:?} missing from the parents of edge {:?}",
                    lp,
                    coedge.edge
                );
                if let Some(partner) = coedge.partner {
                    let here = CoEdgeRef { lp, index };
                    let back = arena.coedge(partner);
                    debug_assert!(
                        back.map_or(false, |b| b.edge == coedge.edge && b.partner == Some(here)),
                        "CoEdge {:?} has non-mutual partner {:?}",
                        here,
                        partner
                    );
                }
            }
        }

        // Check 4: Faces and regions reference each other
        for (fk, face) in &arena.faces {
            check_face(arena, fk);
            if let Some(region) = face.region {
                debug_assert!(
                    arena.regions.get(region).map_or(false, |r| r.faces.contains(&fk)),
                    "Face {:?} not listed by its region {:?}",
                    fk,
                    region
                );
            }
        }
        for (rk, region) in &arena.regions {
            for &fk in &region.faces {
                debug_assert_eq!(
                    arena.face_region(fk),
                    Some(rk),
                    "Region {:?} lists face {:?} that belongs elsewhere",
                    rk,
                    fk
                );
            }
        }
    }
}
