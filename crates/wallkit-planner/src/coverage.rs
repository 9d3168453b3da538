//! Boustrophedon coverage planning.
//!
//! Sweeps horizontal rows across the wall, alternating direction each row,
//! and emits only the row endpoints. Row spacing is the robot width reduced
//! by the overlap fraction; a half-width margin keeps the robot body on the
//! wall.
//!
//! Obstacles are accepted but do not alter the emitted waypoints. They are
//! rendered and analysed (see [`crate::analysis`]) but not routed around.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wallkit_core::constants::{GEOMETRY_EPSILON, MAX_SWEEP_ROWS};
use wallkit_core::input::validate_overlap;
use wallkit_core::{Obstacle, Trajectory, ValidationError, Wall, Waypoint};

/// Corner of the wall where the sweep starts.
///
/// Corners are named in wall coordinates (y measured up from the bottom edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartCorner {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl StartCorner {
    fn mirrors_x(&self) -> bool {
        matches!(self, StartCorner::BottomRight | StartCorner::TopRight)
    }

    fn mirrors_y(&self) -> bool {
        matches!(self, StartCorner::TopLeft | StartCorner::TopRight)
    }
}

impl std::str::FromStr for StartCorner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom-left" => Ok(StartCorner::BottomLeft),
            "bottom-right" => Ok(StartCorner::BottomRight),
            "top-left" => Ok(StartCorner::TopLeft),
            "top-right" => Ok(StartCorner::TopRight),
            other => Err(format!("unknown start corner '{}'", other)),
        }
    }
}

/// Validated planner parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerParams {
    robot_width: f64,
    overlap: f64,
    start_corner: StartCorner,
}

impl PlannerParams {
    /// Creates parameters for a robot of `robot_width` metres and an overlap
    /// fraction in `[0, 0.5]`.
    pub fn new(robot_width: f64, overlap: f64) -> Result<Self, ValidationError> {
        if !robot_width.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "Robot width".to_string(),
            });
        }
        if robot_width <= 0.0 {
            return Err(ValidationError::non_positive("Robot width", robot_width));
        }
        Ok(Self {
            robot_width,
            overlap: validate_overlap(overlap)?,
            start_corner: StartCorner::default(),
        })
    }

    pub fn with_start_corner(mut self, start_corner: StartCorner) -> Self {
        self.start_corner = start_corner;
        self
    }

    pub fn robot_width(&self) -> f64 {
        self.robot_width
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    pub fn start_corner(&self) -> StartCorner {
        self.start_corner
    }

    /// Distance between consecutive sweep rows.
    pub fn step(&self) -> f64 {
        self.robot_width * (1.0 - self.overlap)
    }

    /// Distance kept between the sweep and the wall edges.
    pub fn margin(&self) -> f64 {
        self.robot_width / 2.0
    }
}

/// Generates coverage trajectories for a wall.
#[derive(Debug, Clone)]
pub struct CoveragePlanner {
    params: PlannerParams,
}

impl CoveragePlanner {
    pub fn new(params: PlannerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PlannerParams {
        &self.params
    }

    /// Number of sweep rows that fit on the wall.
    ///
    /// Fails with [`ValidationError::TooManyRows`] when the count exceeds
    /// [`MAX_SWEEP_ROWS`].
    pub fn row_count(&self, wall: &Wall) -> Result<usize, ValidationError> {
        let margin = self.params.margin();
        let step = self.params.step();
        let top = wall.height - margin;
        if margin > top + GEOMETRY_EPSILON {
            return Ok(0);
        }
        let rows = ((top - margin + GEOMETRY_EPSILON) / step).floor() + 1.0;
        if !rows.is_finite() || rows > MAX_SWEEP_ROWS as f64 {
            return Err(ValidationError::TooManyRows {
                robot_width: self.params.robot_width,
                limit: MAX_SWEEP_ROWS,
            });
        }
        Ok(rows as usize)
    }

    /// Plans the sweep. Deterministic and free of side effects.
    ///
    /// Returns an empty trajectory when the robot is wider than the
    /// paintable vertical span.
    pub fn plan(
        &self,
        wall: &Wall,
        obstacles: &[Obstacle],
    ) -> Result<Trajectory, ValidationError> {
        let margin = self.params.margin();
        let step = self.params.step();
        let left = margin;
        let right = wall.width - margin;
        let rows = self.row_count(wall)?;

        let mut points = Vec::with_capacity(rows * 2);
        for row in 0..rows {
            // Row positions are computed from the index so error does not accumulate.
            let y = margin + row as f64 * step;
            if row % 2 == 0 {
                points.push(Waypoint::new(left, y));
                points.push(Waypoint::new(right, y));
            } else {
                points.push(Waypoint::new(right, y));
                points.push(Waypoint::new(left, y));
            }
        }

        let corner = self.params.start_corner;
        if corner.mirrors_x() || corner.mirrors_y() {
            for point in &mut points {
                if corner.mirrors_x() {
                    point.x = wall.width - point.x;
                }
                if corner.mirrors_y() {
                    point.y = wall.height - point.y;
                }
            }
        }

        debug!(
            wall = %wall,
            robot_width = self.params.robot_width,
            overlap = self.params.overlap,
            rows,
            obstacles = obstacles.len(),
            "planned coverage sweep"
        );

        Ok(Trajectory::new(points))
    }
}

/// Plans a coverage trajectory starting at the bottom-left corner.
///
/// `robot_width` must be positive and `overlap` a fraction in `[0, 0.5]`.
pub fn plan_coverage(
    wall: &Wall,
    obstacles: &[Obstacle],
    robot_width: f64,
    overlap: f64,
) -> Result<Trajectory, ValidationError> {
    let params = PlannerParams::new(robot_width, overlap)?;
    CoveragePlanner::new(params).plan(wall, obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallkit_core::ObstacleKind;

    fn wall(width: f64, height: f64) -> Wall {
        Wall::new(width, height).unwrap()
    }

    #[test]
    fn test_four_by_three_wall() {
        let trajectory = plan_coverage(&wall(4.0, 3.0), &[], 0.5, 0.0).unwrap();
        assert_eq!(trajectory.len(), 12);

        let ys: Vec<f64> = trajectory.points().iter().step_by(2).map(|p| p.y).collect();
        assert_eq!(ys, vec![0.25, 0.75, 1.25, 1.75, 2.25, 2.75]);

        assert_eq!(trajectory.first(), Some(Waypoint::new(0.25, 0.25)));
        assert_eq!(trajectory.get(1), Some(Waypoint::new(3.75, 0.25)));
        assert_eq!(trajectory.get(2), Some(Waypoint::new(3.75, 0.75)));
        assert_eq!(trajectory.get(3), Some(Waypoint::new(0.25, 0.75)));
        assert!((trajectory.total_length() - 23.5).abs() < 1e-9);
    }

    #[test]
    fn test_robot_wider_than_wall_height() {
        let trajectory = plan_coverage(&wall(4.0, 0.4), &[], 0.5, 0.0).unwrap();
        assert!(trajectory.is_empty());
    }

    #[test]
    fn test_robot_exactly_wall_height_gives_single_row() {
        let trajectory = plan_coverage(&wall(2.0, 0.5), &[], 0.5, 0.2).unwrap();
        assert_eq!(
            trajectory.points(),
            &[Waypoint::new(0.25, 0.25), Waypoint::new(1.75, 0.25)]
        );
    }

    #[test]
    fn test_obstacles_do_not_change_the_sweep() {
        let w = wall(4.0, 3.0);
        let obstacles = vec![
            Obstacle::new(1.0, 1.0, 1.0, 1.0, ObstacleKind::Window, "Window 1").unwrap(),
            Obstacle::new(3.0, 0.0, 0.8, 2.0, ObstacleKind::Door, "Door 2").unwrap(),
        ];
        let with = plan_coverage(&w, &obstacles, 0.3, 0.1).unwrap();
        let without = plan_coverage(&w, &[], 0.3, 0.1).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let w = wall(4.0, 3.0);
        assert!(matches!(
            plan_coverage(&w, &[], 0.0, 0.1),
            Err(ValidationError::NonPositive { .. })
        ));
        assert!(matches!(
            plan_coverage(&w, &[], 0.5, 0.6),
            Err(ValidationError::OverlapOutOfRange { .. })
        ));
        assert!(matches!(
            plan_coverage(&w, &[], 0.5, -0.1),
            Err(ValidationError::OverlapOutOfRange { .. })
        ));
    }

    #[test]
    fn test_start_corner_mirrors_the_sweep() {
        let w = wall(4.0, 3.0);
        let params = PlannerParams::new(0.5, 0.0)
            .unwrap()
            .with_start_corner(StartCorner::TopRight);
        let trajectory = CoveragePlanner::new(params).plan(&w, &[]).unwrap();
        assert_eq!(trajectory.first(), Some(Waypoint::new(3.75, 2.75)));
        assert_eq!(trajectory.get(1), Some(Waypoint::new(0.25, 2.75)));
        assert_eq!(trajectory.last(), Some(Waypoint::new(3.75, 0.25)));
    }

    #[test]
    fn test_row_count_matches_plan() {
        let w = wall(5.0, 2.95);
        let planner = CoveragePlanner::new(PlannerParams::new(0.3, 0.25).unwrap());
        assert_eq!(
            planner.plan(&w, &[]).unwrap().len(),
            planner.row_count(&w).unwrap() * 2
        );
    }

    #[test]
    fn test_tiny_robot_width_is_rejected() {
        let w = wall(4.0, 3.0);
        for robot_width in [1e-300, 1e-8] {
            assert!(matches!(
                plan_coverage(&w, &[], robot_width, 0.0),
                Err(ValidationError::TooManyRows {
                    limit: MAX_SWEEP_ROWS,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_row_limit_is_inclusive() {
        let w = wall(1.0, 1.0);
        // Rows at margin, margin + step, ... up to 1 - margin.
        let robot_width = 1.0 / MAX_SWEEP_ROWS as f64;
        let planner = CoveragePlanner::new(PlannerParams::new(robot_width, 0.0).unwrap());
        assert_eq!(planner.row_count(&w).unwrap(), MAX_SWEEP_ROWS);
    }

    #[test]
    fn test_start_corner_parsing() {
        assert_eq!("top-left".parse::<StartCorner>(), Ok(StartCorner::TopLeft));
        assert!("middle".parse::<StartCorner>().is_err());
    }
}
