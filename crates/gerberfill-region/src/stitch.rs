//! Path stitching
//!
//! Outline layers are usually drawn as many separate strokes whose endpoints
//! are meant to meet but are off by rounding noise or small gaps. The
//! stitcher closes self-closing strokes, merges the rest by repeatedly
//! joining the globally nearest pair of endpoints, and force-closes whatever
//! is left.
//!
//! Merging scans all pairs on every round, so it is quadratic in the number
//! of open strokes per round. Typical outline layers have tens to a few
//! hundred strokes.

use crate::path::{ClosedPolygon, Path};

/// Factor applied to the snap tolerance when pairing endpoints of different
/// strokes and when force-closing.
pub const MERGE_TOLERANCE_FACTOR: f64 = 1.5;

/// Closes and merges open paths into polygons
#[derive(Debug, Clone, Copy)]
pub struct PathStitcher {
    snap_tol: f64,
}

/// Which ends of two paths meet
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pairing {
    first: usize,
    second: usize,
    /// Reverse `first` so its joining end is last
    reverse_first: bool,
    /// Reverse `second` so its joining end is first
    reverse_second: bool,
    distance: f64,
}

impl PathStitcher {
    /// Create a stitcher with the given snap tolerance in millimeters
    pub fn new(snap_tol_mm: f64) -> Self {
        Self {
            snap_tol: snap_tol_mm,
        }
    }

    /// Tolerance used for pairing and force-closing
    pub fn merge_tol(&self) -> f64 {
        self.snap_tol * MERGE_TOLERANCE_FACTOR
    }

    /// Stitch raw paths into closed polygons.
    ///
    /// Paths with fewer than two points are ignored. Closed results with
    /// fewer than three distinct vertices are dropped.
    pub fn stitch(&self, paths: Vec<Path>) -> Vec<ClosedPolygon> {
        let input_count = paths.len();
        let mut closed = Vec::new();
        let mut open = Vec::new();

        for mut path in paths {
            if path.len() < 2 {
                continue;
            }
            if path.end_gap().is_some_and(|gap| gap <= self.snap_tol) {
                path.snap_end_to_start();
                closed.push(path);
            } else {
                open.push(path);
            }
        }
        tracing::debug!(
            "Stitching {} paths: {} closed, {} open",
            input_count,
            closed.len(),
            open.len()
        );

        self.merge_open(&mut open);

        for mut path in open {
            if path.end_gap().is_some_and(|gap| gap <= self.merge_tol()) {
                path.snap_end_to_start();
            } else {
                path.append_start();
            }
            closed.push(path);
        }

        let candidates = closed.len();
        let polygons: Vec<ClosedPolygon> =
            closed.into_iter().filter_map(ClosedPolygon::from_path).collect();
        if polygons.len() < candidates {
            tracing::debug!(
                "Discarded {} degenerate loops",
                candidates - polygons.len()
            );
        }
        polygons
    }

    /// Greedily merge the globally nearest endpoint pair until none is
    /// within the merge tolerance or a single path is left.
    ///
    /// Merged paths go back into the open set and stay candidates for
    /// further merges.
    fn merge_open(&self, open: &mut Vec<Path>) {
        let mut merges = 0usize;
        while open.len() > 1 {
            let Some(pairing) = self.best_pairing(open) else {
                break;
            };

            let mut second = open.swap_remove(pairing.second);
            let mut first = open.swap_remove(pairing.first);
            if pairing.reverse_first {
                first.reverse();
            }
            if pairing.reverse_second {
                second.reverse();
            }

            let joined_within_snap = match (first.last(), second.first()) {
                (Some(a), Some(b)) => a.distance_to(&b) <= self.snap_tol,
                _ => false,
            };
            let mut merged = first;
            let mut rest = second.into_points().into_iter();
            if joined_within_snap {
                rest.next();
            }
            merged.extend(rest);
            merges += 1;
            open.push(merged);
        }
        tracing::debug!("Merged {} stroke pairs, {} left open", merges, open.len());
    }

    /// Find the closest endpoint pairing across all open paths.
    fn best_pairing(&self, open: &[Path]) -> Option<Pairing> {
        let limit = self.merge_tol();
        let mut best: Option<Pairing> = None;

        for i in 0..open.len() {
            let (Some(si), Some(ei)) = (open[i].first(), open[i].last()) else {
                continue;
            };
            for j in (i + 1)..open.len() {
                let (Some(sj), Some(ej)) = (open[j].first(), open[j].last()) else {
                    continue;
                };
                let candidates = [
                    (false, false, ei.distance_to(&sj)),
                    (false, true, ei.distance_to(&ej)),
                    (true, false, si.distance_to(&sj)),
                    (true, true, si.distance_to(&ej)),
                ];
                for (reverse_first, reverse_second, distance) in candidates {
                    if distance <= limit && best.is_none_or(|b| distance < b.distance) {
                        best = Some(Pairing {
                            first: i,
                            second: j,
                            reverse_first,
                            reverse_second,
                            distance,
                        });
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Point;

    fn path(coords: &[(f64, f64)]) -> Path {
        Path::from_points(coords.iter().map(|&(x, y)| Point::new(x, y)))
    }

    #[test]
    fn test_l_shape_with_gap_becomes_one_polygon() {
        let stitcher = PathStitcher::new(0.05);
        let polygons = stitcher.stitch(vec![
            path(&[(0.0, 10.0), (0.0, 0.0)]),
            path(&[(0.01, 0.0), (10.0, 0.0)]),
        ]);

        assert_eq!(polygons.len(), 1);
        let polygon = &polygons[0];
        assert_eq!(polygon.vertex_count(), 3);
        assert_eq!(polygon.points().first(), polygon.points().last());
    }

    #[test]
    fn test_square_from_shuffled_reversed_sides() {
        let stitcher = PathStitcher::new(0.02);
        let polygons = stitcher.stitch(vec![
            path(&[(10.0, 0.0), (10.0, 10.0)]),
            path(&[(0.0, 10.0), (0.0, 0.005)]),
            path(&[(0.0, 10.0), (10.0, 10.0)]),
            path(&[(0.0, 0.0), (10.0, 0.0)]),
        ]);

        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].vertex_count(), 4);
    }

    #[test]
    fn test_self_closing_stroke_closed_in_place() {
        let stitcher = PathStitcher::new(0.02);
        let polygons = stitcher.stitch(vec![path(&[
            (0.0, 0.0),
            (5.0, 0.0),
            (5.0, 5.0),
            (0.0, 5.0),
            (0.0, 0.01),
        ])]);

        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].vertex_count(), 4);
        assert_eq!(polygons[0].points()[4], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_far_gap_gets_explicit_closing_vertex() {
        let stitcher = PathStitcher::new(0.02);
        let polygons = stitcher.stitch(vec![path(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)])]);

        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].points().len(), 4);
    }

    #[test]
    fn test_degenerate_paths_dropped() {
        let stitcher = PathStitcher::new(0.02);
        let polygons = stitcher.stitch(vec![
            path(&[(0.0, 0.0)]),
            path(&[(0.0, 0.0), (3.0, 0.0)]),
            path(&[(10.0, 10.0), (10.005, 10.0)]),
        ]);
        assert!(polygons.is_empty());
    }

    #[test]
    fn test_nearest_pair_wins_over_first_fit() {
        let stitcher = PathStitcher::new(0.1);
        // Stroke A ends at (10, 0). B starts 0.12 away, C starts 0.01 away.
        let polygons = stitcher.stitch(vec![
            path(&[(0.0, 0.0), (10.0, 0.0)]),
            path(&[(10.12, 0.0), (10.12, -5.0), (0.0, -5.0)]),
            path(&[(10.0, 0.01), (10.0, 5.0), (0.0, 5.0)]),
        ]);

        assert_eq!(polygons.len(), 2);
        let merged = polygons
            .iter()
            .find(|p| p.points().contains(&Point::new(10.0, 5.0)))
            .unwrap();
        assert!(merged.points().contains(&Point::new(10.0, 0.0)));
        assert!(!merged.points().contains(&Point::new(10.12, -5.0)));
    }

    #[test]
    fn test_merged_loop_keeps_absorbing_nearby_stroke() {
        let stitcher = PathStitcher::new(0.02);
        // A and B join into a loop whose ends are 0.015 apart; C starts
        // 0.005 from that loop's end and must still be joined to it.
        let polygons = stitcher.stitch(vec![
            path(&[(0.0, 0.0), (10.0, 0.0)]),
            path(&[(10.0, 0.001), (10.0, 10.0), (0.0, 0.015)]),
            path(&[(0.0, 0.02), (-5.0, 5.0), (-5.0, 0.5)]),
        ]);

        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].vertex_count(), 6);
        assert!(polygons[0].points().contains(&Point::new(-5.0, 5.0)));
    }

    #[test]
    fn test_stitching_closed_output_is_idempotent() {
        let stitcher = PathStitcher::new(0.05);
        let first = stitcher.stitch(vec![
            path(&[(0.0, 10.0), (0.0, 0.0)]),
            path(&[(0.01, 0.0), (10.0, 0.0)]),
            path(&[(20.0, 0.0), (30.0, 0.0), (30.0, 10.0), (20.0, 0.02)]),
        ]);
        let second = stitcher.stitch(first.iter().cloned().map(ClosedPolygon::into_path).collect());
        assert_eq!(first, second);
    }
}
