// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan Geometry
//!
//! 2D polygon booleans (via i_overlay) and arc discretization used by the
//! floorplan topology kernel to validate face divisions.

pub mod arc;
pub mod bool2d;
pub mod error;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

// Re-export the fill rule so callers need not depend on i_overlay directly
pub use i_overlay::core::fill_rule::FillRule;

pub use arc::{arc_length, arc_sweep, sample_arc, ArcSpec};
pub use bool2d::{
    compute_signed_area, covers_exactly, difference, ensure_ccw, is_ccw, union, Polygon,
};
pub use error::{Error, Result};
