// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point registry: tolerance-based vertex deduplication for one construction pass.
//!
//! Every loop built during a pass registers its points here, so two loops
//! that touch the same corner end up referencing the same [`VertexKey`] and,
//! through it, the same edges. Registries are not global: each divide
//! operation starts with a fresh one.
//!
//! Lookups go through a grid-based spatial hash whose cell size equals the
//! tolerance, so only the 3x3x3 neighborhood of a point is ever scanned.
//! Cell coordinates saturate at the `i64` range; coordinates that far out
//! share the boundary cell and are still compared exactly.

use rustc_hash::FxHashMap;

use crate::arena::TopologyArena;
use crate::keys::VertexKey;

/// Smallest cell size used by the grid. Host coordinates up to about 1e9
/// still map to distinct cells at this size.
const MIN_CELL_SIZE: f64 = 1e-9;

/// Deduplicates coordinates into a canonical vertex set.
#[derive(Debug)]
pub struct PointRegistry {
    tolerance: f64,
    cell_size: f64,
    grid: FxHashMap<(i64, i64, i64), Vec<VertexKey>>,
    len: usize,
}

impl PointRegistry {
    /// Creates an empty registry. Two points are the same vertex when every
    /// coordinate differs by at most `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cell_size: tolerance.max(MIN_CELL_SIZE),
            grid: FxHashMap::default(),
            len: 0,
        }
    }

    /// Creates an empty registry using the arena's configured tolerance.
    pub fn for_arena(arena: &TopologyArena) -> Self {
        Self::new(arena.config().tolerance)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of distinct vertices registered so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds a registered vertex within tolerance of `point`.
    ///
    /// Vertices that have since been removed from the arena are skipped.
    pub fn find(&self, arena: &TopologyArena, point: [f64; 3]) -> Option<VertexKey> {
        let [x, y, z] = point;
        let (cx, cy, cz) = self.cell_coords(x, y, z);

        // Search 3x3x3 neighborhood
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let cell = (cx.saturating_add(dx), cy.saturating_add(dy), cz.saturating_add(dz));
                    if let Some(keys) = self.grid.get(&cell) {
                        for &vk in keys {
                            if let Some(v) = arena.vertex(vk) {
                                if (v.x - x).abs() <= self.tolerance
                                    && (v.y - y).abs() <= self.tolerance
                                    && (v.z - z).abs() <= self.tolerance
                                {
                                    return Some(vk);
                                }
                            }
                        }
                    }
                }
            }
        }

        None
    }

    /// Returns the vertex for `point`, creating it in the arena on first use.
    pub fn register(&mut self, arena: &mut TopologyArena, point: [f64; 3]) -> VertexKey {
        if let Some(existing) = self.find(arena, point) {
            return existing;
        }

        let [x, y, z] = point;
        let key = arena.add_vertex(x, y, z);
        let cell = self.cell_coords(x, y, z);
        self.grid.entry(cell).or_default().push(key);
        self.len += 1;
        key
    }

    // `as` saturates out-of-range floats and maps NaN to 0.
    fn cell_coords(&self, x: f64, y: f64, z: f64) -> (i64, i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
            (z / self.cell_size).floor() as i64,
        )
    }
}
