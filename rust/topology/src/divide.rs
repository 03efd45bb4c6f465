// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dividing a face into sub-regions.
//!
//! Divide information arrives as raw annotated point lists, possibly stale or
//! edited outside the kernel. It is checked geometrically every time: the
//! regions must tile the outline exactly. When they do, each region becomes
//! its own split face; when they do not, the information is discarded and a
//! single undivided face is built from the outline.

use floorplan_geometry::{covers_exactly, sample_arc, ArcSpec, Point2, Polygon};
use serde::{Deserialize, Serialize};

use crate::arena::*;
use crate::debug_checks;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::registry::PointRegistry;

/// A 2D point in the persisted wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
}

/// Arc annotation: the edge leaving this point is a circular arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcInfo {
    pub center: PlanePoint,
    pub radius: f64,
    pub clockwise: bool,
}

/// Explicit split/inner flags for the edge leaving this point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitEdgeInfo {
    #[serde(default)]
    pub is_split_edge: bool,
    #[serde(default)]
    pub is_inner_edge: bool,
}

/// One point of a loop before it becomes topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_info: Option<ArcInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_edge_info: Option<SplitEdgeInfo>,
}

impl LoopPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            arc_info: None,
            split_edge_info: None,
        }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_arc_info(mut self, arc: ArcInfo) -> Self {
        self.arc_info = Some(arc);
        self
    }

    pub fn with_split_edge_info(mut self, info: SplitEdgeInfo) -> Self {
        self.split_edge_info = Some(info);
        self
    }

    /// Position as `[x, y, z]`, with a missing `z` read as 0.
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z.unwrap_or(0.0)]
    }

    pub fn xy(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// One candidate sub-loop of a face's interior partition.
pub type DivideRegion = Vec<LoopPoint>;

/// Convert an annotated point list into a 2D contour, discretizing arcs.
///
/// A trailing point equal to the first within `tolerance` is dropped.
pub fn points_to_polygon(points: &[LoopPoint], arc_segments: usize, tolerance: f64) -> Polygon {
    let mut pts = points;
    if pts.len() > 1 {
        let (first, last) = (&pts[0], &pts[pts.len() - 1]);
        if (first.x - last.x).abs() <= tolerance && (first.y - last.y).abs() <= tolerance {
            pts = &pts[..pts.len() - 1];
        }
    }

    let n = pts.len();
    let mut polygon = Vec::with_capacity(n);
    for (i, point) in pts.iter().enumerate() {
        let start = point.xy();
        polygon.push(start);

        if let Some(arc) = point.arc_info {
            let end = pts[(i + 1) % n].xy();
            let curve = ArcSpec::new(Point2::new(arc.center.x, arc.center.y), arc.radius, arc.clockwise);
            match sample_arc(&start, &end, &curve, arc_segments) {
                Ok(interior) => polygon.extend(interior),
                Err(e) => tracing::warn!(error = %e, "Treating malformed arc as a straight segment"),
            }
        }
    }
    polygon
}

impl TopologyArena {
    /// Divides an outline into faces.
    ///
    /// With two or more `regions` that tile `outline` exactly, one split face
    /// is created per region, all built through a single point registry so
    /// that neighboring regions share vertices and edges. Otherwise a single
    /// undivided face is built from `outline`. Never fails: invalid divide
    /// information is logged and discarded.
    ///
    /// The faces are recorded as one region, which is what persistence writes.
    pub fn divide_face(&mut self, outline: &[LoopPoint], regions: &[DivideRegion], kind: FaceKind) -> Vec<FaceKey> {
        let divided = match regions.len() {
            0 => false,
            1 => {
                tracing::debug!("Single divide region, keeping face undivided");
                false
            }
            _ => {
                let tiles = self.regions_tile_outline(outline, regions);
                if !tiles {
                    tracing::warn!(
                        regions = regions.len(),
                        "Divide regions do not tile the outline, discarding divide info"
                    );
                }
                tiles
            }
        };

        let mut registry = PointRegistry::for_arena(self);
        let faces: Vec<FaceKey> = if divided {
            regions
                .iter()
                .map(|region| {
                    let lp = self.build_loop(region, &mut registry);
                    self.insert_face(lp, kind, true)
                })
                .collect()
        } else {
            let lp = self.build_loop(outline, &mut registry);
            vec![self.insert_face(lp, kind, false)]
        };

        let region = self.regions.insert(RegionData {
            outline: outline.to_vec(),
            kind,
            faces: faces.clone(),
        });
        for &face in &faces {
            self.faces[face].region = Some(region);
        }

        tracing::debug!(
            faces = faces.len(),
            divided,
            vertices = registry.len(),
            "Divided face"
        );
        debug_checks::check_arena(self);

        faces
    }

    /// Checks whether `regions` tile `outline` with no gaps or overlaps.
    ///
    /// Errors from the boolean layer (e.g. a contour with fewer than three
    /// points) are propagated.
    pub fn check_tiling(&self, outline: &[LoopPoint], regions: &[DivideRegion]) -> Result<bool> {
        let segments = self.config.arc_segments;
        let tolerance = self.config.tolerance;

        let outline_polygon = points_to_polygon(outline, segments, tolerance);
        let parts: Vec<Polygon> = regions
            .iter()
            .map(|r| points_to_polygon(r, segments, tolerance))
            .collect();

        Ok(covers_exactly(&outline_polygon, &parts, self.config.area_tolerance)?)
    }

    /// Like [`check_tiling`](Self::check_tiling), treating any error as "does not tile".
    pub fn regions_tile_outline(&self, outline: &[LoopPoint], regions: &[DivideRegion]) -> bool {
        match self.check_tiling(outline, regions) {
            Ok(tiles) => tiles,
            Err(e) => {
                tracing::warn!(error = %e, "Tiling check failed");
                false
            }
        }
    }

    /// Returns the region a face was produced by, if any.
    pub fn face_region(&self, face: FaceKey) -> Option<RegionKey> {
        self.faces.get(face).and_then(|f| f.region)
    }

    /// Returns the faces currently belonging to a region.
    pub fn region_faces(&self, region: RegionKey) -> Option<&[FaceKey]> {
        self.regions.get(region).map(|r| r.faces.as_slice())
    }

    /// Discards a region's division and rebuilds the single undivided face.
    ///
    /// Content hosted by the removed faces moves to the rebuilt face. Hosts
    /// call this when an outline change (e.g. a moved wall) makes the stored
    /// division meaningless.
    pub fn clear_divide_info(&mut self, region: RegionKey) -> Result<FaceKey> {
        let data = self
            .regions
            .get(region)
            .cloned()
            .ok_or(Error::RegionNotFound(region))?;

        let mut orphaned = Vec::new();
        for &face in &data.faces {
            if let Some(f) = self.faces.get_mut(face) {
                // Detach first so removing the last face keeps the region alive.
                f.region = None;
            }
            if let Some(content) = self.contents.remove(&face) {
                orphaned.extend(content);
            }
            self.remove_face(face)?;
        }

        let mut registry = PointRegistry::for_arena(self);
        let lp = self.build_loop(&data.outline, &mut registry);
        let face = self.insert_face(lp, data.kind, false);
        self.faces[face].region = Some(region);
        self.regions[region].faces = vec![face];

        if !orphaned.is_empty() {
            self.contents.insert(face, orphaned);
        }

        tracing::debug!(removed = data.faces.len(), "Cleared divide info");
        debug_checks::check_arena(self);
        Ok(face)
    }
}
