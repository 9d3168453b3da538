//! Request and response bodies exchanged with the persistence service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wallkit_core::constants::DEFAULT_TRAJECTORY_NAME;
use wallkit_core::{Obstacle, Trajectory, ValidationError, Wall, Waypoint};

/// Pagination window for list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}

/// A stored wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallRecord {
    pub id: u64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl WallRecord {
    /// Validated wall geometry of this record.
    pub fn wall(&self) -> Result<Wall, ValidationError> {
        Wall::new(self.width, self.height)
    }
}

/// A stored obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub id: u64,
    pub wall_id: u64,
    #[serde(flatten)]
    pub obstacle: Obstacle,
}

/// Wall geometry sent with a plan request. `id` links the stored result to a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub width: f64,
    pub height: f64,
}

/// Body of a plan call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub wall: PlanWall,
    pub obstacles: Vec<Obstacle>,
    pub robot_width: f64,
    pub overlap: f64,
}

impl PlanRequest {
    pub fn new(
        wall_id: Option<u64>,
        wall: &Wall,
        obstacles: Vec<Obstacle>,
        robot_width: f64,
        overlap: f64,
    ) -> Self {
        Self {
            wall: PlanWall {
                id: wall_id,
                width: wall.width,
                height: wall.height,
            },
            obstacles,
            robot_width,
            overlap,
        }
    }
}

/// Result of a plan call. Only `points` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub points: Vec<Waypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl PlanResponse {
    pub fn trajectory(&self) -> Trajectory {
        Trajectory::new(self.points.clone())
    }
}

/// A stored trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub id: u64,
    pub wall_id: u64,
    #[serde(default = "default_name")]
    pub name: String,
    pub points: Vec<Waypoint>,
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_name() -> String {
    DEFAULT_TRAJECTORY_NAME.to_string()
}

/// Health check payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
