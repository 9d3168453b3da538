//! Shared constants.

/// Smallest playback speed multiplier.
pub const MIN_SPEED: f64 = 0.1;

/// Largest playback speed multiplier.
pub const MAX_SPEED: f64 = 5.0;

/// Largest accepted overlap fraction between neighbouring sweep rows.
pub const MAX_OVERLAP: f64 = 0.5;

/// Nominal playback rate in waypoints per second at 1x speed.
pub const DEFAULT_POINTS_PER_SECOND: f64 = 30.0;

/// Pixel padding kept around the wall when fitting it to the viewport.
pub const VIEW_PADDING_PX: f64 = 40.0;

/// Width in pixels of the scale legend ruler.
pub const LEGEND_WIDTH_PX: f64 = 50.0;

/// Clearance used when checking sweep rows against obstacles (metres).
pub const OBSTACLE_MARGIN: f64 = 0.1;

/// Pointer drags narrower or shorter than this (metres) do not create an obstacle.
pub const MIN_DRAG_EXTENT: f64 = 0.1;

/// Default robot width in metres.
pub const DEFAULT_ROBOT_WIDTH: f64 = 0.2;

/// Default overlap fraction.
pub const DEFAULT_OVERLAP: f64 = 0.1;

/// Name given to a planned trajectory when the user leaves it blank.
pub const DEFAULT_TRAJECTORY_NAME: &str = "Coverage Path";

/// Tolerance used when comparing accumulated sweep positions with wall bounds.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Largest number of sweep rows a single plan may contain.
pub const MAX_SWEEP_ROWS: usize = 1_000_000;
