// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena keys for the planar topology.
//!
//! A floor plan is stored bottom-up: vertices are shared corners, edges are
//! walls between two corners, loops are closed outlines, faces are floors or
//! ceilings, and a region is the outline one divide pass split into faces.
//! Keys are generational, so a face destroyed by a merge is never confused
//! with a face created afterwards in the same slot.

use slotmap::new_key_type;

new_key_type! {
    /// A deduplicated corner point.
    pub struct VertexKey;

    /// A straight or arc wall between two vertices.
    pub struct EdgeKey;

    /// A closed cycle of coedges.
    pub struct LoopKey;

    /// A floor or ceiling face.
    pub struct FaceKey;

    /// The outline a divide pass split into faces.
    pub struct RegionKey;
}

/// Any entity of the planar topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKey {
    Vertex(VertexKey),
    Edge(EdgeKey),
    Loop(LoopKey),
    Face(FaceKey),
    Region(RegionKey),
}

impl TopologyKey {
    pub fn topology_type(&self) -> TopologyType {
        match self {
            TopologyKey::Vertex(_) => TopologyType::Vertex,
            TopologyKey::Edge(_) => TopologyType::Edge,
            TopologyKey::Loop(_) => TopologyType::Loop,
            TopologyKey::Face(_) => TopologyType::Face,
            TopologyKey::Region(_) => TopologyType::Region,
        }
    }
}

/// Entity kinds, ordered from corner up to region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TopologyType {
    Vertex,
    Edge,
    Loop,
    Face,
    Region,
}

impl TopologyType {
    /// The kind that references this one from above: a vertex is used by
    /// edges, an edge by loops, a loop by one face and a face by one region.
    pub fn parent_type(&self) -> Option<TopologyType> {
        match self {
            TopologyType::Vertex => Some(TopologyType::Edge),
            TopologyType::Edge => Some(TopologyType::Loop),
            TopologyType::Loop => Some(TopologyType::Face),
            TopologyType::Face => Some(TopologyType::Region),
            TopologyType::Region => None,
        }
    }

    /// Whether an entity of this kind can have more than one parent.
    ///
    /// Corners are shared by walls and split edges by two loops; loops and
    /// faces always belong to exactly one owner.
    pub fn is_shared(&self) -> bool {
        matches!(self, TopologyType::Vertex | TopologyType::Edge)
    }
}

impl std::fmt::Display for TopologyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TopologyType::Vertex => "vertex",
            TopologyType::Edge => "edge",
            TopologyType::Loop => "loop",
            TopologyType::Face => "face",
            TopologyType::Region => "region",
        };
        f.write_str(name)
    }
}

impl From<VertexKey> for TopologyKey {
    fn from(k: VertexKey) -> Self {
        TopologyKey::Vertex(k)
    }
}

impl From<EdgeKey> for TopologyKey {
    fn from(k: EdgeKey) -> Self {
        TopologyKey::Edge(k)
    }
}

impl From<LoopKey> for TopologyKey {
    fn from(k: LoopKey) -> Self {
        TopologyKey::Loop(k)
    }
}

impl From<FaceKey> for TopologyKey {
    fn from(k: FaceKey) -> Self {
        TopologyKey::Face(k)
    }
}

impl From<RegionKey> for TopologyKey {
    fn from(k: RegionKey) -> Self {
        TopologyKey::Region(k)
    }
}
