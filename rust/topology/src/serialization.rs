// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON persistence of divided faces.
//!
//! A record is the *input* to reconstruction, not a memory image: loading
//! replays [`TopologyArena::divide_face`], so divide information is checked
//! again on every load. The shape matches what hosts already store:
//!
//! ```json
//! { "Class": "Floor", "outerLoop": [ { "x": 0, "y": 0 } ],
//!   "divideInfo": [ [ { "x": 0, "y": 0, "splitEdgeInfo": { "isSplitEdge": true } } ] ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::arena::*;
use crate::divide::{ArcInfo, DivideRegion, LoopPoint, PlanePoint, SplitEdgeInfo};
use crate::error::{Error, Result};
use crate::keys::*;

/// Persisted form of one region: its outline plus optional divide regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceRecord {
    #[serde(rename = "Class")]
    pub class: String,
    pub outer_loop: Vec<LoopPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divide_info: Option<Vec<DivideRegion>>,
}

impl FaceRecord {
    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl FaceKind {
    /// Class name used in persisted records.
    pub fn class_name(&self) -> &'static str {
        match self {
            FaceKind::Floor => "Floor",
            FaceKind::Ceiling { .. } => "Ceiling",
        }
    }

    /// Parses a persisted class name. Ceilings come back without a host floor.
    pub fn from_class(class: &str) -> Result<Self> {
        match class {
            "Floor" => Ok(FaceKind::Floor),
            "Ceiling" => Ok(FaceKind::Ceiling { host_floor: None }),
            other => Err(Error::UnknownFaceClass(other.to_string())),
        }
    }
}

impl TopologyArena {
    /// Writes a loop back out as annotated points, one per coedge.
    ///
    /// Arcs are described in traversal sense. Split and inner flags are
    /// written only for edges carrying one of them.
    pub fn loop_points(&self, lp: LoopKey) -> Option<Vec<LoopPoint>> {
        let refs = self.loop_coedges(lp)?;
        let mut points = Vec::with_capacity(refs.len());

        for r in refs {
            let v = self.vertices.get(self.coedge_start(r)?)?;
            let edge = self.edges.get(self.coedge(r)?.edge)?;

            let mut point = LoopPoint::new(v.x, v.y);
            if v.z != 0.0 {
                point = point.with_z(v.z);
            }
            if let Some(arc) = self.coedge_arc(r) {
                point = point.with_arc_info(ArcInfo {
                    center: PlanePoint {
                        x: arc.center.x,
                        y: arc.center.y,
                    },
                    radius: arc.radius,
                    clockwise: arc.clockwise,
                });
            }
            if edge.is_split_edge || edge.is_inner_edge {
                point = point.with_split_edge_info(SplitEdgeInfo {
                    is_split_edge: edge.is_split_edge,
                    is_inner_edge: edge.is_inner_edge,
                });
            }
            points.push(point);
        }

        Some(points)
    }

    /// Builds the persisted record of a region.
    ///
    /// `divideInfo` is written only while the region holds more than one face.
    pub fn region_record(&self, region: RegionKey) -> Result<FaceRecord> {
        let data = self.regions.get(region).ok_or(Error::RegionNotFound(region))?;

        let divide_info = if data.faces.len() > 1 {
            let mut regions = Vec::with_capacity(data.faces.len());
            for &face in &data.faces {
                let outer = self.faces.get(face).ok_or(Error::FaceNotFound(face))?.outer_loop;
                regions.push(self.loop_points(outer).ok_or(Error::LoopNotFound(outer))?);
            }
            Some(regions)
        } else {
            None
        };

        Ok(FaceRecord {
            class: data.kind.class_name().to_string(),
            outer_loop: data.outline.clone(),
            divide_info,
        })
    }

    /// Rebuilds faces from a persisted record.
    ///
    /// Fails only on an unknown class; invalid divide information falls back
    /// to the undivided outline like any other divide.
    pub fn load_record(&mut self, record: &FaceRecord) -> Result<Vec<FaceKey>> {
        let kind = FaceKind::from_class(&record.class)?;
        let regions = record.divide_info.as_deref().unwrap_or(&[]);
        tracing::debug!(class = %record.class, regions = regions.len(), "Loading face record");
        Ok(self.divide_face(&record.outer_loop, regions, kind))
    }
}
