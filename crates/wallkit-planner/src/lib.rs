//! # WallKit Planner
//!
//! Coverage path generation for the wall-painting robot.
//!
//! ## Core Components
//!
//! - **Coverage**: boustrophedon sweep of the wall ([`CoveragePlanner`])
//! - **Analysis**: path length, sweep/transition split and obstacle
//!   crossings of a planned trajectory ([`TrajectoryAnalyzer`])
//!
//! ```text
//! y ^   ← ← ← ← ← ←   row 2
//!   |   → → → → → →   row 1
//!   +-----------------> x
//! ```

pub mod analysis;
pub mod coverage;

pub use analysis::{
    path_length, point_in_rect, segment_intersects_rect, RowCrossing, TrajectoryAnalyzer,
    TrajectoryStats,
};
pub use coverage::{plan_coverage, CoveragePlanner, PlannerParams, StartCorner};
