//! Polyline geometry in millimeters
//!
//! A [`Path`] is what the plotter draws between two pen-up commands. A
//! [`ClosedPolygon`] is a path that has been closed and has enough distinct
//! vertices to enclose an area.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// An open or closed polyline
///
/// No two consecutive points are equal; [`Path::push`] drops exact repeats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Create a new empty path.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a path seeded with a single point.
    pub fn starting_at(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    /// Create a path from points, dropping consecutive repeats.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut path = Self::new();
        path.extend(points);
        path
    }

    /// Append a point unless it equals the current last point.
    pub fn push(&mut self, point: Point) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    /// Append points one by one.
    pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
        for point in points {
            self.push(point);
        }
    }

    /// Get the points of this path.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the path and return its points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the path has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point, if any.
    #[inline]
    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Last point, if any.
    #[inline]
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Reverse the point order in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Distance between first and last point.
    pub fn end_gap(&self) -> Option<f64> {
        Some(self.first()?.distance_to(&self.last()?))
    }

    /// Whether first and last point are identical and the path has a segment.
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 2 && self.points.first() == self.points.last()
    }

    /// Move the last point onto the first one.
    ///
    /// If that makes the last two points equal, the duplicate is dropped.
    pub fn snap_end_to_start(&mut self) {
        let Some(start) = self.first() else {
            return;
        };
        if self.points.len() < 2 {
            return;
        }
        let last = self.points.len() - 1;
        self.points[last] = start;
        if self.points.len() >= 3 && self.points[last - 1] == start {
            self.points.pop();
        }
    }

    /// Append the first point as an explicit closing vertex.
    pub fn append_start(&mut self) {
        if let Some(start) = self.first() {
            self.push(start);
        }
    }
}

/// A closed ring with at least three distinct vertices
///
/// The first point is repeated as the last point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPolygon {
    points: Vec<Point>,
}

impl ClosedPolygon {
    /// Build a polygon from a closed path.
    ///
    /// Returns `None` when the path is not closed or encloses fewer than
    /// three distinct vertices.
    pub fn from_path(path: Path) -> Option<Self> {
        if !path.is_closed() {
            return None;
        }
        let points = path.into_points();
        if !has_three_distinct(&points[..points.len() - 1]) {
            return None;
        }
        Some(Self { points })
    }

    /// All points, including the repeated closing vertex.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The vertex ring without the repeated closing vertex.
    #[inline]
    pub fn ring(&self) -> &[Point] {
        &self.points[..self.points.len() - 1]
    }

    /// Number of distinct ring vertices.
    pub fn vertex_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Reverse the winding. The ring keeps starting at the same vertex.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Convert back to a path.
    pub fn into_path(self) -> Path {
        Path {
            points: self.points,
        }
    }
}

fn has_three_distinct(ring: &[Point]) -> bool {
    let Some(first) = ring.first() else {
        return false;
    };
    let Some(second) = ring.iter().find(|p| *p != first) else {
        return false;
    };
    ring.iter().any(|p| p != first && p != second)
}
