// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Circular arc segments between two boundary points.
//!
//! Arcs are stored parametrically on edges; boolean checks and area
//! computations need them as polylines, which is what [`sample_arc`] produces.

use std::f64::consts::TAU;

use nalgebra::Point2;

use crate::error::{Error, Result};

/// A circular arc running from a start point to an end point around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpec {
    pub center: Point2<f64>,
    pub radius: f64,
    pub clockwise: bool,
}

impl ArcSpec {
    pub fn new(center: Point2<f64>, radius: f64, clockwise: bool) -> Self {
        Self {
            center,
            radius,
            clockwise,
        }
    }

    /// The same physical curve described in the opposite travel direction.
    pub fn reversed(&self) -> Self {
        Self {
            clockwise: !self.clockwise,
            ..*self
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidArc(format!("radius {} is not positive", self.radius)));
        }
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(Error::InvalidArc("center is not finite".to_string()));
        }
        Ok(())
    }
}

/// Angle swept when travelling from `start` to `end` in the arc's direction.
///
/// Always in `(0, 2π]`; coincident endpoints describe a full circle.
pub fn arc_sweep(start: &Point2<f64>, end: &Point2<f64>, arc: &ArcSpec) -> f64 {
    let a0 = (start.y - arc.center.y).atan2(start.x - arc.center.x);
    let a1 = (end.y - arc.center.y).atan2(end.x - arc.center.x);

    let raw = if arc.clockwise { a0 - a1 } else { a1 - a0 };
    let sweep = raw.rem_euclid(TAU);
    if sweep <= f64::EPSILON {
        TAU
    } else {
        sweep
    }
}

/// Length of the arc from `start` to `end`.
pub fn arc_length(start: &Point2<f64>, end: &Point2<f64>, arc: &ArcSpec) -> f64 {
    arc.radius * arc_sweep(start, end, arc)
}

/// Discretize an arc into `segments` pieces.
///
/// Returns only the interior points, strictly between `start` and `end`, so
/// that consecutive arcs and straight segments can be concatenated without
/// duplicating shared endpoints.
pub fn sample_arc(
    start: &Point2<f64>,
    end: &Point2<f64>,
    arc: &ArcSpec,
    segments: usize,
) -> Result<Vec<Point2<f64>>> {
    arc.validate()?;

    let segments = segments.max(2);
    let a0 = (start.y - arc.center.y).atan2(start.x - arc.center.x);
    let sweep = arc_sweep(start, end, arc);
    let direction = if arc.clockwise { -1.0 } else { 1.0 };

    let mut points = Vec::with_capacity(segments - 1);
    for i in 1..segments {
        let t = i as f64 / segments as f64;
        let angle = a0 + direction * sweep * t;
        points.push(Point2::new(
            arc.center.x + arc.radius * angle.cos(),
            arc.center.y + arc.radius * angle.sin(),
        ));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn quarter_circle_ccw() {
        let arc = ArcSpec::new(Point2::new(0.0, 0.0), 1.0, false);
        let start = Point2::new(1.0, 0.0);
        let end = Point2::new(0.0, 1.0);

        assert_relative_eq!(arc_sweep(&start, &end, &arc), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(arc_length(&start, &end, &arc), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn quarter_start_end_clockwise_is_three_quarters() {
        let arc = ArcSpec::new(Point2::new(0.0, 0.0), 1.0, true);
        let start = Point2::new(1.0, 0.0);
        let end = Point2::new(0.0, 1.0);

        assert_relative_eq!(arc_sweep(&start, &end, &arc), 1.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn reversed_arc_sweeps_the_same_curve_backwards() {
        let arc = ArcSpec::new(Point2::new(0.0, 0.0), 2.0, false);
        let start = Point2::new(2.0, 0.0);
        let end = Point2::new(-2.0, 0.0);

        let forward = arc_sweep(&start, &end, &arc);
        let backward = arc_sweep(&end, &start, &arc.reversed());
        assert_relative_eq!(forward, backward, epsilon = 1e-12);
    }

    #[test]
    fn sample_arc_interior_points_lie_on_circle() {
        let arc = ArcSpec::new(Point2::new(1.0, 1.0), 1.0, false);
        let start = Point2::new(2.0, 1.0);
        let end = Point2::new(0.0, 1.0);

        let points = sample_arc(&start, &end, &arc, 8).unwrap();
        assert_eq!(points.len(), 7);
        for p in &points {
            let r = ((p.x - 1.0).powi(2) + (p.y - 1.0).powi(2)).sqrt();
            assert_relative_eq!(r, 1.0, epsilon = 1e-12);
            // Counter-clockwise from (2,1) to (0,1) passes over the top.
            assert!(p.y > 1.0);
        }
    }

    #[test]
    fn sample_arc_rejects_zero_radius() {
        let arc = ArcSpec::new(Point2::new(0.0, 0.0), 0.0, false);
        let result = sample_arc(&Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0), &arc, 4);
        assert!(result.is_err());
    }
}
