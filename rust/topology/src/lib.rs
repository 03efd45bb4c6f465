// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan Topology
//!
//! Planar half-edge topology for floor and ceiling faces.
//!
//! This crate provides an arena-based topology data structure where entities
//! (vertices, edges, loops, faces, regions) are stored in slot maps with
//! upward adjacency indices. An edge can be used by two loops at once (the
//! wall between two rooms), and each use is a directed coedge that knows its
//! partner on the other side.
//!
//! ## Workflow
//!
//! - [`TopologyArena::divide_face`] turns an outline plus optional divide
//!   regions into faces, validating the division geometrically first.
//! - [`TopologyArena::adjacent_faces`] and [`TopologyArena::merge_into_adjacent`]
//!   discover neighbours and merge them across shared edges.
//! - [`FaceRecord`] is the persisted form; loading replays the divide.

pub mod adjacency;
pub mod arena;
pub mod config;
pub mod construction;
pub mod content;
pub mod debug_checks;
pub mod divide;
pub mod document;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod registry;
pub mod serialization;
pub mod traversal;

pub use arena::{
    CoEdge, CoEdgeRef, EdgeCurve, EdgeData, FaceData, FaceKind, LoopData, LoopKind, RegionData,
    TopologyArena, VertexData,
};
pub use config::KernelConfig;
pub use content::ContentId;
pub use divide::{ArcInfo, DivideRegion, LoopPoint, PlanePoint, SplitEdgeInfo};
pub use document::{DocumentContext, LayerId, RoomInfo};
pub use error::{Error, Result};
pub use keys::{EdgeKey, FaceKey, LoopKey, RegionKey, TopologyKey, TopologyType, VertexKey};
pub use registry::PointRegistry;
pub use serialization::FaceRecord;
