// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for topology operations.
//!
//! Only caller mistakes surface here (stale keys, malformed records).
//! Invalid divide information is never an error: it is logged and the
//! undivided face is used instead.

use crate::keys::{FaceKey, LoopKey, RegionKey, VertexKey};

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during topology operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Vertex key not found in the arena.
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexKey),

    /// Loop key not found in the arena.
    #[error("loop not found: {0:?}")]
    LoopNotFound(LoopKey),

    /// Face key not found in the arena.
    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    /// Region key not found in the arena.
    #[error("region not found: {0:?}")]
    RegionNotFound(RegionKey),

    /// A face boundary needs at least 3 distinct vertices.
    #[error("loop has {0} coedges, a face boundary needs at least 3")]
    DegenerateLoop(usize),

    /// A persisted record names a face class the kernel does not know.
    #[error("unknown face class: {0}")]
    UnknownFaceClass(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Error bubbled up from the 2D geometry layer.
    #[error(transparent)]
    Geometry(#[from] floorplan_geometry::Error),
}
