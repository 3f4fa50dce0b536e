//! Winding normalization
//!
//! Output polygons are wound clockwise. Counterclockwise rings are reversed.

use crate::path::{ClosedPolygon, Point};

/// Shoelace signed area of a vertex ring
///
/// The ring must not repeat its first vertex at the end. Positive means
/// counterclockwise in a Y-up coordinate system.
pub fn signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area / 2.0
}

/// Signed area of a closed polygon
pub fn polygon_area(polygon: &ClosedPolygon) -> f64 {
    signed_area(polygon.ring())
}

/// Reverse the polygon if it is wound counterclockwise.
///
/// Returns whether it was reversed.
pub fn normalize(polygon: &mut ClosedPolygon) -> bool {
    if polygon_area(polygon) > 0.0 {
        polygon.reverse();
        true
    } else {
        false
    }
}

/// Normalize every polygon to clockwise winding.
pub fn normalize_all(polygons: &mut [ClosedPolygon]) -> usize {
    let reversed = polygons.iter_mut().map(normalize).filter(|r| *r).count();
    tracing::debug!(
        "Reversed {} of {} polygons to clockwise winding",
        reversed,
        polygons.len()
    );
    reversed
}
