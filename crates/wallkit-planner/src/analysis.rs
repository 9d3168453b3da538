//! Trajectory analysis.
//!
//! Derived measurements of a planned trajectory: path length, sweep versus
//! transition distance, playback duration estimates and the sweep rows that
//! cross obstacles. None of these values are stored on the trajectory; they
//! are recomputed on demand.

use std::time::Duration;

use serde::Serialize;
use wallkit_core::constants::OBSTACLE_MARGIN;
use wallkit_core::{Obstacle, Rect, Trajectory, Waypoint};

/// Sum of Euclidean distances between consecutive points (0 for fewer than two).
pub fn path_length(points: &[Waypoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

/// Checks if a point lies inside `rect` grown by `margin` (edges inclusive).
pub fn point_in_rect(point: &Waypoint, rect: &Rect, margin: f64) -> bool {
    rect.inflate(margin).contains(point)
}

/// Checks if the segment `a`-`b` touches `rect` grown by `margin`.
///
/// Liang-Barsky clipping of the segment against the inflated rectangle.
pub fn segment_intersects_rect(a: &Waypoint, b: &Waypoint, rect: &Rect, margin: f64) -> bool {
    let r = rect.inflate(margin);
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, a.x - r.x),
        (dx, r.max_x() - a.x),
        (-dy, a.y - r.y),
        (dy, r.max_y() - a.y),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: reject when outside it.
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return false;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return false;
            }
            t1 = t1.min(t);
        }
    }

    t0 <= t1
}

/// A sweep row that passes over one or more obstacles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowCrossing {
    /// 1-based row number.
    pub row: usize,
    pub y: f64,
    /// Names of the crossed obstacles, in obstacle order.
    pub obstacles: Vec<String>,
}

/// Summary figures for a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryStats {
    pub points: usize,
    pub rows: usize,
    pub total_length: f64,
    pub sweep_length: f64,
    pub transition_length: f64,
}

/// Analyzes a planned trajectory.
pub struct TrajectoryAnalyzer<'a> {
    trajectory: &'a Trajectory,
}

impl<'a> TrajectoryAnalyzer<'a> {
    pub fn new(trajectory: &'a Trajectory) -> Self {
        Self { trajectory }
    }

    /// Number of sweep rows (each row contributes two waypoints).
    pub fn row_count(&self) -> usize {
        self.trajectory.len() / 2
    }

    pub fn total_length(&self) -> f64 {
        path_length(self.trajectory.points())
    }

    /// Length travelled along the rows.
    pub fn sweep_length(&self) -> f64 {
        self.rows()
            .map(|(_, start, end)| start.distance_to(&end))
            .sum()
    }

    /// Length travelled between rows.
    pub fn transition_length(&self) -> f64 {
        self.total_length() - self.sweep_length()
    }

    /// Time playback needs to reach the final waypoint at the nominal rate.
    pub fn estimated_playback(&self, points_per_second: f64, speed: f64) -> Duration {
        let steps = self.trajectory.len().saturating_sub(1) as f64;
        let rate = points_per_second * speed;
        if steps == 0.0 || rate <= 0.0 || !rate.is_finite() {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(steps / rate)
    }

    /// Rows whose sweep segment passes within `margin` of an obstacle.
    pub fn obstacle_crossings(&self, obstacles: &[Obstacle], margin: f64) -> Vec<RowCrossing> {
        self.rows()
            .filter_map(|(row, start, end)| {
                let hits: Vec<String> = obstacles
                    .iter()
                    .filter(|obstacle| {
                        segment_intersects_rect(&start, &end, &obstacle.rect(), margin)
                    })
                    .map(|obstacle| obstacle.label().to_string())
                    .collect();
                if hits.is_empty() {
                    None
                } else {
                    Some(RowCrossing {
                        row,
                        y: start.y,
                        obstacles: hits,
                    })
                }
            })
            .collect()
    }

    /// Crossings using the default clearance.
    pub fn default_obstacle_crossings(&self, obstacles: &[Obstacle]) -> Vec<RowCrossing> {
        self.obstacle_crossings(obstacles, OBSTACLE_MARGIN)
    }

    pub fn stats(&self) -> TrajectoryStats {
        let total_length = self.total_length();
        let sweep_length = self.sweep_length();
        TrajectoryStats {
            points: self.trajectory.len(),
            rows: self.row_count(),
            total_length,
            sweep_length,
            transition_length: total_length - sweep_length,
        }
    }

    fn rows(&self) -> impl Iterator<Item = (usize, Waypoint, Waypoint)> + '_ {
        self.trajectory
            .points()
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| (i + 1, pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::plan_coverage;
    use wallkit_core::{ObstacleKind, Wall};

    #[test]
    fn test_path_length() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[Waypoint::new(1.0, 1.0)]), 0.0);
        let points = [
            Waypoint::new(0.0, 0.0),
            Waypoint::new(3.0, 0.0),
            Waypoint::new(3.0, 4.0),
        ];
        assert_eq!(path_length(&points), 7.0);
    }

    #[test]
    fn test_point_in_rect_with_margin() {
        let rect = Rect::new(1.0, 1.0, 1.0, 1.0);
        assert!(point_in_rect(&Waypoint::new(1.5, 1.5), &rect, 0.0));
        assert!(!point_in_rect(&Waypoint::new(2.05, 1.5), &rect, 0.0));
        assert!(point_in_rect(&Waypoint::new(2.05, 1.5), &rect, 0.1));
    }

    #[test]
    fn test_segment_intersection() {
        let rect = Rect::new(1.0, 1.0, 1.0, 1.0);
        let crossing = segment_intersects_rect(
            &Waypoint::new(0.0, 1.5),
            &Waypoint::new(3.0, 1.5),
            &rect,
            0.0,
        );
        assert!(crossing);

        let above = segment_intersects_rect(
            &Waypoint::new(0.0, 2.5),
            &Waypoint::new(3.0, 2.5),
            &rect,
            0.0,
        );
        assert!(!above);

        let grazing = segment_intersects_rect(
            &Waypoint::new(0.0, 2.05),
            &Waypoint::new(3.0, 2.05),
            &rect,
            0.1,
        );
        assert!(grazing);

        let short = segment_intersects_rect(
            &Waypoint::new(0.0, 1.5),
            &Waypoint::new(0.5, 1.5),
            &rect,
            0.0,
        );
        assert!(!short);
    }

    #[test]
    fn test_stats_for_reference_wall() {
        let wall = Wall::new(4.0, 3.0).unwrap();
        let trajectory = plan_coverage(&wall, &[], 0.5, 0.0).unwrap();
        let stats = TrajectoryAnalyzer::new(&trajectory).stats();
        assert_eq!(stats.points, 12);
        assert_eq!(stats.rows, 6);
        assert!((stats.sweep_length - 21.0).abs() < 1e-9);
        assert!((stats.transition_length - 2.5).abs() < 1e-9);
        assert!((stats.total_length - 23.5).abs() < 1e-9);
    }

    #[test]
    fn test_obstacle_crossings_report_rows() {
        let wall = Wall::new(4.0, 3.0).unwrap();
        let trajectory = plan_coverage(&wall, &[], 0.5, 0.0).unwrap();
        let window = Obstacle::new(1.5, 1.0, 1.0, 1.0, ObstacleKind::Window, "Window 1").unwrap();
        let crossings = TrajectoryAnalyzer::new(&trajectory).obstacle_crossings(&[window], 0.0);
        let rows: Vec<usize> = crossings.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![3, 4]);
        assert_eq!(crossings[0].obstacles, vec!["Window 1".to_string()]);
    }

    #[test]
    fn test_estimated_playback() {
        let trajectory = Trajectory::new(vec![Waypoint::default(); 31]);
        let analyzer = TrajectoryAnalyzer::new(&trajectory);
        assert_eq!(analyzer.estimated_playback(30.0, 1.0), Duration::from_secs(1));
        assert_eq!(analyzer.estimated_playback(30.0, 2.0), Duration::from_millis(500));
        assert_eq!(
            TrajectoryAnalyzer::new(&Trajectory::empty()).estimated_playback(30.0, 1.0),
            Duration::ZERO
        );
    }
}
