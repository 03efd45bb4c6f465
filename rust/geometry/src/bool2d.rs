// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Region Tiling Checks
//!
//! Thin wrapper over the i_overlay crate. The topology kernel treats these
//! functions as pure: they never mutate their inputs and always return a
//! fresh set of contours.

use crate::error::{Error, Result};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// A closed 2D contour. The closing segment (last → first) is implicit.
pub type Polygon = Vec<Point2<f64>>;

/// Epsilon for floating point comparisons in 2D operations
pub const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - polygons smaller than this are considered degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Perform 2D boolean difference: subject - union(clips)
///
/// Every result contour (outer boundaries and holes alike) is returned in a
/// flat list. Contours whose absolute area does not exceed
/// [`MIN_AREA_THRESHOLD`] are dropped, so an exact tiling yields an empty
/// vector even when the overlay leaves slivers behind.
///
/// # Arguments
/// * `subject` - The polygon to subtract from
/// * `clips` - Polygons to subtract
/// * `fill_rule` - Fill rule applied to both subject and clip paths
pub fn difference(subject: &[Point2<f64>], clips: &[Polygon], fill_rule: FillRule) -> Result<Vec<Polygon>> {
    if subject.len() < 3 {
        return Err(Error::InvalidPolygon(
            "Subject must have at least 3 vertices".to_string(),
        ));
    }

    let subject_paths = vec![contour_to_path(&ensure_ccw(subject))];

    let clip_paths: Vec<Vec<[f64; 2]>> = clips
        .iter()
        .filter(|c| c.len() >= 3)
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    if clip_paths.is_empty() {
        return Ok(vec![subject.to_vec()]);
    }

    // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
    let result = subject_paths.overlay(&clip_paths, OverlayRule::Difference, fill_rule);

    Ok(flatten_shapes(result))
}

/// Union a set of polygons into their combined outline(s)
pub fn union(polygons: &[Polygon], fill_rule: FillRule) -> Result<Vec<Polygon>> {
    let valid: Vec<&Polygon> = polygons.iter().filter(|c| c.len() >= 3).collect();

    match valid.len() {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![valid[0].clone()]),
        _ => {}
    }

    let subject: Vec<Vec<[f64; 2]>> = vec![contour_to_path(&ensure_ccw(valid[0]))];
    let clip: Vec<Vec<[f64; 2]>> = valid
        .iter()
        .skip(1)
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    let result = subject.overlay(&clip, OverlayRule::Union, fill_rule);

    Ok(flatten_shapes(result))
}

/// Check whether `parts` tile `outline` with no gaps and no overlaps.
///
/// Gaps show up as a non-empty `outline - parts` difference. Overlaps (and
/// parts leaking outside the outline) do not, so the summed part area must
/// also match the outline area within `area_tolerance`.
pub fn covers_exactly(outline: &[Point2<f64>], parts: &[Polygon], area_tolerance: f64) -> Result<bool> {
    let residue = difference(outline, parts, FillRule::NonZero)?;
    let residue_area: f64 = residue.iter().map(|c| compute_signed_area(c).abs()).sum();
    if residue_area > area_tolerance {
        return Ok(false);
    }

    let outline_area = compute_signed_area(outline).abs();
    let parts_area: f64 = parts.iter().map(|c| compute_signed_area(c).abs()).sum();

    Ok((parts_area - outline_area).abs() <= area_tolerance)
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Returns `true` for counter-clockwise (positive area) contours.
pub fn is_ccw(contour: &[Point2<f64>]) -> bool {
    compute_signed_area(contour) > 0.0
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    compute_signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Flatten i_overlay shapes into a list of contours, dropping degenerate ones.
fn flatten_shapes(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<Polygon> {
    let mut all_contours = Vec::new();
    for shape in shapes {
        for contour in shape {
            let points: Polygon = contour
                .into_iter()
                .map(|p| Point2::new(p[0], p[1]))
                .collect();
            if is_valid_contour(&points) {
                all_contours.push(points);
            }
        }
    }
    all_contours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn test_compute_signed_area_ccw() {
        let area = compute_signed_area(&rect(0.0, 0.0, 1.0, 1.0));
        assert!((area - 1.0).abs() < EPSILON_2D);
    }

    #[test]
    fn test_compute_signed_area_cw() {
        let mut contour = rect(0.0, 0.0, 1.0, 1.0);
        contour.reverse();
        assert!((compute_signed_area(&contour) + 1.0).abs() < EPSILON_2D);
        assert!(!is_ccw(&contour));
    }

    #[test]
    fn test_ensure_ccw() {
        let mut cw = rect(0.0, 0.0, 1.0, 1.0);
        cw.reverse();
        assert!(compute_signed_area(&ensure_ccw(&cw)) > 0.0);
    }

    #[test]
    fn test_difference_exact_tiling_is_empty() {
        let outline = rect(0.0, 0.0, 10.0, 10.0);
        let parts = vec![rect(0.0, 0.0, 5.0, 10.0), rect(5.0, 0.0, 10.0, 10.0)];

        let residue = difference(&outline, &parts, FillRule::NonZero).unwrap();
        assert!(residue.is_empty());
    }

    #[test]
    fn test_difference_with_gap() {
        let outline = rect(0.0, 0.0, 10.0, 10.0);
        let parts = vec![rect(0.0, 0.0, 4.0, 10.0), rect(5.0, 0.0, 10.0, 10.0)];

        let residue = difference(&outline, &parts, FillRule::NonZero).unwrap();
        assert_eq!(residue.len(), 1);
        let area: f64 = residue.iter().map(|c| compute_signed_area(c).abs()).sum();
        assert!((area - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_difference_rejects_degenerate_subject() {
        let subject = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(difference(&subject, &[], FillRule::NonZero).is_err());
    }

    #[test]
    fn test_union_two_halves() {
        let parts = vec![rect(0.0, 0.0, 5.0, 10.0), rect(5.0, 0.0, 10.0, 10.0)];
        let merged = union(&parts, FillRule::NonZero).unwrap();
        assert_eq!(merged.len(), 1);
        assert!((compute_signed_area(&merged[0]).abs() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_covers_exactly() {
        let outline = rect(0.0, 0.0, 10.0, 10.0);

        let tiled = vec![rect(0.0, 0.0, 5.0, 10.0), rect(5.0, 0.0, 10.0, 10.0)];
        assert!(covers_exactly(&outline, &tiled, 1e-6).unwrap());

        let gap = vec![rect(0.0, 0.0, 4.0, 10.0), rect(5.0, 0.0, 10.0, 10.0)];
        assert!(!covers_exactly(&outline, &gap, 1e-6).unwrap());

        let overlap = vec![rect(0.0, 0.0, 6.0, 10.0), rect(4.0, 0.0, 10.0, 10.0)];
        assert!(!covers_exactly(&outline, &overlap, 1e-6).unwrap());
    }

    #[test]
    fn test_is_valid_contour() {
        assert!(is_valid_contour(&rect(0.0, 0.0, 1.0, 1.0)));
        let collinear = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(!is_valid_contour(&collinear));
    }
}
