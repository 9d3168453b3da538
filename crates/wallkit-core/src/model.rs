//! Wall, obstacle and trajectory data model.
//!
//! All coordinates are wall-local metres with the origin at the wall's
//! bottom-left corner. Constructors validate the invariants so that the
//! planner, player and renderer can assume well-formed input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

fn check_positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::non_positive(field, value));
    }
    Ok(value)
}

fn check_finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
        })
    }
}

/// A single 2D target point the robot passes through.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another waypoint.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Axis-aligned rectangle in wall coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanned by two corner points.
    pub fn from_corners(a: Waypoint, b: Waypoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Waypoint {
        Waypoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: &Waypoint) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }
}

/// The paintable wall. Defines the coordinate bounds `[0,width]×[0,height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub width: f64,
    pub height: f64,
}

impl Wall {
    /// Creates a wall, rejecting non-finite or non-positive dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            width: check_positive("Wall width", width)?,
            height: check_positive("Wall height", height)?,
        })
    }

    /// The wall as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m x {}m", self.width, self.height)
    }
}

/// Kind of obstacle mounted on the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Socket,
    #[default]
    Window,
    Door,
    Other,
}

impl ObstacleKind {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Socket => "socket",
            ObstacleKind::Window => "window",
            ObstacleKind::Door => "door",
            ObstacleKind::Other => "other",
        }
    }

    /// Returns the capitalized display label.
    pub fn label(&self) -> &'static str {
        match self {
            ObstacleKind::Socket => "Socket",
            ObstacleKind::Window => "Window",
            ObstacleKind::Door => "Door",
            ObstacleKind::Other => "Other",
        }
    }

    /// Default name for the `index`-th obstacle (1-based), e.g. `Window 2`.
    pub fn default_name(&self, index: usize) -> String {
        format!("{} {}", self.label(), index)
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObstacleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "socket" => Ok(ObstacleKind::Socket),
            "window" => Ok(ObstacleKind::Window),
            "door" => Ok(ObstacleKind::Door),
            "other" => Ok(ObstacleKind::Other),
            other => Err(format!("unknown obstacle type '{}'", other)),
        }
    }
}

/// Axis-aligned obstacle on the wall (socket, window, door...).
///
/// Containment within the wall is not enforced here; the persistence
/// service applies that rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
    pub name: String,
}

impl Obstacle {
    /// Creates an obstacle with validated dimensions.
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        kind: ObstacleKind,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            x: check_finite("Obstacle x", x)?,
            y: check_finite("Obstacle y", y)?,
            width: check_positive("Obstacle width", width)?,
            height: check_positive("Obstacle height", height)?,
            kind,
            name: name.into(),
        })
    }

    /// Creates an obstacle centered on the wall.
    pub fn centered_on(
        wall: &Wall,
        width: f64,
        height: f64,
        kind: ObstacleKind,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let width = check_positive("Obstacle width", width)?;
        let height = check_positive("Obstacle height", height)?;
        Self::new(
            (wall.width - width) / 2.0,
            (wall.height - height) / 2.0,
            width,
            height,
            kind,
            name,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Label drawn on the obstacle: its name, or its kind when unnamed.
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            self.kind.as_str()
        } else {
            &self.name
        }
    }
}

/// Ordered waypoint sequence produced by one planning call.
///
/// Replaced wholesale on re-plan, never mutated in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<Waypoint>,
}

impl Trajectory {
    pub fn new(points: Vec<Waypoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Waypoint> {
        self.points.get(index).copied()
    }

    pub fn first(&self) -> Option<Waypoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Waypoint> {
        self.points.last().copied()
    }

    /// Index of the final waypoint, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    /// Sum of Euclidean distances between consecutive waypoints.
    pub fn total_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    pub fn into_points(self) -> Vec<Waypoint> {
        self.points
    }
}

impl From<Vec<Waypoint>> for Trajectory {
    fn from(points: Vec<Waypoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Waypoint> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
