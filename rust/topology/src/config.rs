// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kernel configuration, optionally loaded from environment variables.

/// Tolerances and sampling density used by the kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    /// Coordinate-wise epsilon under which two points are the same vertex.
    pub tolerance: f64,
    /// Segments used to discretize an arc for boolean checks and areas.
    pub arc_segments: usize,
    /// Residual area below which a tiling check treats a result as empty.
    pub area_tolerance: f64,
}

impl KernelConfig {
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;
    pub const DEFAULT_ARC_SEGMENTS: usize = 16;
    pub const DEFAULT_AREA_TOLERANCE: f64 = 1e-6;

    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from a `FLOORPLAN_*` name → value lookup.
    ///
    /// Tolerances must be finite and non-negative; arc segments are raised
    /// to at least 2. Anything else falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_negative = |name: &str, default: f64| {
            lookup(name)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|t| t.is_finite() && *t >= 0.0)
                .unwrap_or(default)
        };

        Self {
            tolerance: non_negative("FLOORPLAN_TOLERANCE", Self::DEFAULT_TOLERANCE),
            arc_segments: lookup("FLOORPLAN_ARC_SEGMENTS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(Self::DEFAULT_ARC_SEGMENTS)
                .max(2),
            area_tolerance: non_negative("FLOORPLAN_AREA_TOLERANCE", Self::DEFAULT_AREA_TOLERANCE),
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            arc_segments: Self::DEFAULT_ARC_SEGMENTS,
            area_tolerance: Self::DEFAULT_AREA_TOLERANCE,
        }
    }
}
