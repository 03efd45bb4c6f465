// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face adjacency and merging across shared edges.
//!
//! Two faces are adjacent when an edge of one's outer loop has exactly two
//! parent loops and the other parent belongs to the second face. Merging
//! removes the shared edges and splices what is left of both outer loops
//! into a single closed cycle owned by the surviving face.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::*;
use crate::debug_checks;
use crate::error::{Error, Result};
use crate::keys::*;

/// Returns the coedges outside the shared run, starting right after it.
///
/// `None` unless the shared coedges form exactly one contiguous (cyclic) run
/// that leaves at least one coedge over.
fn open_chain(coedges: &[CoEdge], shared: &FxHashSet<EdgeKey>) -> Option<Vec<CoEdge>> {
    let n = coedges.len();
    let flags: Vec<bool> = coedges.iter().map(|c| shared.contains(&c.edge)).collect();
    let k = flags.iter().filter(|&&f| f).count();
    if k == 0 || k == n {
        return None;
    }

    // Each run of shared coedges ends exactly once.
    let run_ends: Vec<usize> = (0..n)
        .filter(|&i| flags[i] && !flags[(i + 1) % n])
        .collect();
    if run_ends.len() != 1 {
        return None;
    }

    let start = (run_ends[0] + 1) % n;
    Some(
        (0..n - k)
            .map(|offset| {
                let mut c = coedges[(start + offset) % n].clone();
                c.partner = None;
                c
            })
            .collect(),
    )
}

/// Walks a chain backwards, flipping each coedge's direction.
fn reverse_chain(chain: Vec<CoEdge>) -> Vec<CoEdge> {
    chain
        .into_iter()
        .rev()
        .map(|mut c| {
            c.reversed = !c.reversed;
            c
        })
        .collect()
}

impl TopologyArena {
    /// Returns the faces sharing an outer-loop edge with `face`, together
    /// with the shared edges in the order `face` walks them.
    ///
    /// Only edges with exactly two parents count.
    pub fn adjacent_faces(&self, face: FaceKey) -> FxHashMap<FaceKey, Vec<EdgeKey>> {
        let mut result: FxHashMap<FaceKey, Vec<EdgeKey>> = FxHashMap::default();

        let outer = match self.faces.get(face) {
            Some(f) => f.outer_loop,
            None => return result,
        };
        let coedges = match self.loops.get(outer) {
            Some(l) => &l.coedges,
            None => return result,
        };

        for coedge in coedges {
            let parents = match self.edge_to_loops.get(&coedge.edge) {
                Some(p) if p.len() == 2 => p,
                _ => continue,
            };
            for &lp in parents {
                if lp == outer {
                    continue;
                }
                if let Some(neighbor) = self.loop_face(lp) {
                    if neighbor != face {
                        result.entry(neighbor).or_default().push(coedge.edge);
                    }
                }
            }
        }

        result
    }

    /// Total length of the edges `face` shares with `neighbor`.
    pub fn shared_length(&self, face: FaceKey, neighbor: FaceKey) -> f64 {
        self.adjacent_faces(face)
            .get(&neighbor)
            .map(|edges| edges.iter().filter_map(|&e| self.edge_length(e)).sum())
            .unwrap_or(0.0)
    }

    /// Merges `absorbed` into `survivor` across their shared edges.
    ///
    /// Returns `Ok(None)` and changes nothing when the outer loops share no
    /// edge, when the shared edges are not one contiguous chain in both
    /// loops, or when a shared edge is also used by a third loop. On success
    /// the survivor keeps its orientation, gains the absorbed face's divide
    /// loops and content, and the absorbed face is destroyed.
    pub fn merge_faces(&mut self, absorbed: FaceKey, survivor: FaceKey) -> Result<Option<FaceKey>> {
        let la = self
            .faces
            .get(absorbed)
            .ok_or(Error::FaceNotFound(absorbed))?
            .outer_loop;
        let lb = self
            .faces
            .get(survivor)
            .ok_or(Error::FaceNotFound(survivor))?
            .outer_loop;
        if absorbed == survivor {
            return Ok(None);
        }

        let a_coedges = self.loops.get(la).ok_or(Error::LoopNotFound(la))?.coedges.clone();
        let b_coedges = self.loops.get(lb).ok_or(Error::LoopNotFound(lb))?.coedges.clone();

        let b_edges: FxHashSet<EdgeKey> = b_coedges.iter().map(|c| c.edge).collect();
        let shared: FxHashSet<EdgeKey> = a_coedges
            .iter()
            .map(|c| c.edge)
            .filter(|e| b_edges.contains(e))
            .collect();

        if shared.is_empty() {
            return Ok(None);
        }
        if shared.iter().any(|&e| self.parent_count(e) != 2) {
            tracing::debug!(?absorbed, ?survivor, "Shared edge has a third parent, not merging");
            return Ok(None);
        }

        let (a_rest, b_rest) = match (open_chain(&a_coedges, &shared), open_chain(&b_coedges, &shared)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                tracing::debug!(?absorbed, ?survivor, "Shared edges are not one chain, not merging");
                return Ok(None);
            }
        };

        // Consistently oriented neighbours walk the shared chain in opposite
        // directions; otherwise the absorbed side has to be turned around.
        let same_direction = a_coedges
            .iter()
            .find(|c| shared.contains(&c.edge))
            .and_then(|a| {
                b_coedges
                    .iter()
                    .find(|b| b.edge == a.edge)
                    .map(|b| b.reversed == a.reversed)
            })
            .unwrap_or(false);
        let a_rest = if same_direction { reverse_chain(a_rest) } else { a_rest };

        for &edge in &shared {
            self.unlink_edge_loop(edge, la);
            self.unlink_edge_loop(edge, lb);
            self.remove_edge(edge);
        }

        for coedge in &a_rest {
            self.unlink_edge_loop(coedge.edge, la);
            self.link_edge_loop(coedge.edge, lb);
        }
        self.loops.remove(la);

        let mut merged = b_rest;
        merged.extend(a_rest);
        let touched: Vec<EdgeKey> = merged.iter().map(|c| c.edge).collect();
        if let Some(data) = self.loops.get_mut(lb) {
            data.coedges = merged;
        }
        for edge in touched {
            self.refresh_partners(edge);
        }

        let absorbed_data = self.faces.remove(absorbed).ok_or(Error::FaceNotFound(absorbed))?;
        for &lp in &absorbed_data.divide_loops {
            if let Some(data) = self.loops.get_mut(lp) {
                data.face = Some(survivor);
            }
        }
        self.faces[survivor]
            .divide_loops
            .extend(absorbed_data.divide_loops.iter().copied());
        self.retarget_contents(absorbed, survivor);

        if let Some(region) = absorbed_data.region {
            self.detach_from_region(region, absorbed);
        }
        if let Some(region) = self.faces[survivor].region {
            if self.regions.get(region).map_or(false, |r| r.faces.len() == 1) {
                self.faces[survivor].is_split_face = false;
            }
        }

        tracing::debug!(
            ?absorbed,
            ?survivor,
            removed_edges = shared.len(),
            "Merged faces"
        );
        debug_checks::check_loop_closed(self, lb);
        debug_checks::check_face(self, survivor);

        Ok(Some(survivor))
    }

    /// Merges `face` into one of its neighbours and returns the survivor.
    ///
    /// Candidates are tried longest shared boundary first, ties broken by key
    /// order. `Ok(None)` when no neighbour can absorb the face.
    pub fn merge_into_adjacent(&mut self, face: FaceKey) -> Result<Option<FaceKey>> {
        if !self.faces.contains_key(face) {
            return Err(Error::FaceNotFound(face));
        }

        let mut candidates: Vec<(FaceKey, f64)> = self
            .adjacent_faces(face)
            .into_iter()
            .map(|(neighbor, edges)| {
                let length: f64 = edges.iter().filter_map(|&e| self.edge_length(e)).sum();
                (neighbor, length)
            })
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        for (neighbor, _) in candidates {
            if let Some(survivor) = self.merge_faces(face, neighbor)? {
                return Ok(Some(survivor));
            }
        }

        tracing::debug!(?face, "No adjacent face to merge into");
        Ok(None)
    }

    /// Returns every face reachable from `face` through shared edges whose
    /// normal is exactly equal to the normal of the face it was reached from.
    ///
    /// The start face is always included.
    pub fn connected_coplanar_faces(&self, face: FaceKey) -> FxHashSet<FaceKey> {
        let mut visited = FxHashSet::default();
        if !self.faces.contains_key(face) {
            return visited;
        }

        let mut stack = vec![face];
        visited.insert(face);

        while let Some(current) = stack.pop() {
            let normal = match self.face_normal(current) {
                Some(n) => n,
                None => continue,
            };
            let edges = match self.face_outer_edges(current) {
                Some(e) => e,
                None => continue,
            };

            for edge in edges {
                for neighbor in self.edge_faces(edge) {
                    if visited.contains(&neighbor) {
                        continue;
                    }
                    if self.face_normal(neighbor) == Some(normal) {
                        visited.insert(neighbor);
                        stack.push(neighbor);
                    }
                }
            }
        }

        visited
    }
}
