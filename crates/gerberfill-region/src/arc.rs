//! Arc flattener
//!
//! Converts G02/G03 circular interpolation into line segments. The segment
//! count satisfies both the chord length and the angular step limit,
//! whichever needs more subdivisions.

use crate::path::Point;
use gerberfill_settings::ConversionConfig;
use std::f64::consts::TAU;

/// Upper bound on segments for a single arc
const MAX_ARC_SEGMENTS: usize = 1 << 16;

/// Sweep direction of an arc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    Clockwise,
    CounterClockwise,
}

/// Converts arcs to polyline points
#[derive(Debug, Clone, Copy)]
pub struct ArcFlattener {
    max_chord_mm: f64,
    max_angle_rad: f64,
}

impl ArcFlattener {
    /// Create a new arc flattener
    pub fn new(max_chord_mm: f64, max_angle_deg: f64) -> Self {
        Self {
            max_chord_mm,
            max_angle_rad: max_angle_deg.to_radians(),
        }
    }

    /// Create a flattener from conversion parameters
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            max_chord_mm: config.max_chord_mm,
            max_angle_rad: config.max_angle_rad(),
        }
    }

    /// Flatten an arc into points, excluding `start` and ending exactly at `end`.
    ///
    /// Coincident start and end describe a full circle.
    pub fn flatten(
        &self,
        start: Point,
        end: Point,
        center: Point,
        direction: ArcDirection,
    ) -> Vec<Point> {
        let r0 = start.distance_to(&center);
        let r1 = end.distance_to(&center);
        let radius = (r0 + r1) / 2.0;
        if radius <= f64::EPSILON {
            return vec![end];
        }

        let start_angle = (start.y - center.y).atan2(start.x - center.x);
        let sweep = sweep_angle(start, end, center, direction);
        let segments = self.segment_count(sweep, radius);

        let mut points = Vec::with_capacity(segments);
        for k in 1..segments {
            let angle = start_angle + sweep * (k as f64 / segments as f64);
            points.push(Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        points.push(end);
        points
    }

    /// Number of segments for a sweep (radians, any sign) at a radius
    pub fn segment_count(&self, sweep: f64, radius: f64) -> usize {
        let sweep = sweep.abs();
        let by_angle = (sweep / self.max_angle_rad).ceil();
        let by_chord = (sweep * radius / self.max_chord_mm).ceil();
        let count = by_angle.max(by_chord);
        if !count.is_finite() || count > MAX_ARC_SEGMENTS as f64 {
            tracing::warn!(
                "Arc needs {} segments, capping at {}",
                count,
                MAX_ARC_SEGMENTS
            );
            return MAX_ARC_SEGMENTS;
        }
        (count as usize).max(1)
    }
}

/// Signed sweep from start to end around center
///
/// Negative for clockwise, positive for counterclockwise. Coincident start
/// and end angles give a full turn in the requested direction.
pub fn sweep_angle(start: Point, end: Point, center: Point, direction: ArcDirection) -> f64 {
    let a0 = (start.y - center.y).atan2(start.x - center.x);
    let a1 = (end.y - center.y).atan2(end.x - center.x);
    let mut sweep = a1 - a0;
    match direction {
        ArcDirection::Clockwise => {
            while sweep >= 0.0 {
                sweep -= TAU;
            }
        }
        ArcDirection::CounterClockwise => {
            while sweep <= 0.0 {
                sweep += TAU;
            }
        }
    }
    sweep
}
