//! In-process persistence service.
//!
//! Keeps everything in memory behind a single lock. Ids are sequential per
//! record kind and never reused. Planning runs the local coverage planner
//! and stores the result when the request names a wall.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};
use wallkit_core::constants::GEOMETRY_EPSILON;
use wallkit_core::{Obstacle, RemoteError, Wall};
use wallkit_planner::{path_length, plan_coverage};

use crate::records::{
    HealthStatus, ObstacleRecord, Page, PlanRequest, PlanResponse, TrajectoryRecord, WallRecord,
};
use crate::service::PersistenceService;

#[derive(Debug, Default)]
struct Store {
    next_wall: u64,
    next_obstacle: u64,
    next_trajectory: u64,
    walls: BTreeMap<u64, WallRecord>,
    obstacles: BTreeMap<u64, ObstacleRecord>,
    trajectories: BTreeMap<u64, TrajectoryRecord>,
}

impl Store {
    fn wall(&self, id: u64) -> Result<&WallRecord, RemoteError> {
        self.walls.get(&id).ok_or(RemoteError::NotFound { entity: "Wall", id })
    }
}

fn bad_request(message: impl Into<String>) -> RemoteError {
    RemoteError::Status {
        status: 400,
        message: message.into(),
    }
}

fn checked_wall(wall: &Wall) -> Result<Wall, RemoteError> {
    Wall::new(wall.width, wall.height).map_err(|e| RemoteError::Status {
        status: 422,
        message: e.to_string(),
    })
}

/// [`PersistenceService`] backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryService {
    store: Mutex<Store>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wall_count(&self) -> usize {
        self.store.lock().walls.len()
    }

    pub fn obstacle_count(&self) -> usize {
        self.store.lock().obstacles.len()
    }

    pub fn trajectory_count(&self) -> usize {
        self.store.lock().trajectories.len()
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items.skip(page.skip).take(page.limit).collect()
}

#[async_trait]
impl PersistenceService for InMemoryService {
    async fn create_wall(&self, wall: &Wall) -> Result<WallRecord, RemoteError> {
        let wall = checked_wall(wall)?;
        let mut store = self.store.lock();
        store.next_wall += 1;
        let record = WallRecord {
            id: store.next_wall,
            width: wall.width,
            height: wall.height,
            created_at: Some(Utc::now()),
        };
        store.walls.insert(record.id, record.clone());
        debug!(id = record.id, "wall stored");
        Ok(record)
    }

    async fn list_walls(&self, p: Page) -> Result<Vec<WallRecord>, RemoteError> {
        let store = self.store.lock();
        Ok(page(store.walls.values().cloned(), p))
    }

    async fn get_wall(&self, id: u64) -> Result<WallRecord, RemoteError> {
        self.store.lock().wall(id).cloned()
    }

    async fn update_wall(&self, id: u64, wall: &Wall) -> Result<WallRecord, RemoteError> {
        let wall = checked_wall(wall)?;
        let mut store = self.store.lock();
        let record = store
            .walls
            .get_mut(&id)
            .ok_or(RemoteError::NotFound { entity: "Wall", id })?;
        record.width = wall.width;
        record.height = wall.height;
        Ok(record.clone())
    }

    async fn delete_wall(&self, id: u64) -> Result<(), RemoteError> {
        let mut store = self.store.lock();
        store
            .walls
            .remove(&id)
            .ok_or(RemoteError::NotFound { entity: "Wall", id })?;
        store.obstacles.retain(|_, o| o.wall_id != id);
        store.trajectories.retain(|_, t| t.wall_id != id);
        info!(id, "wall deleted with its obstacles and trajectories");
        Ok(())
    }

    async fn create_obstacle(
        &self,
        wall_id: u64,
        obstacle: &Obstacle,
    ) -> Result<ObstacleRecord, RemoteError> {
        let mut store = self.store.lock();
        let wall = store.wall(wall_id)?;

        let rect = obstacle.rect();
        let inside = rect.x >= -GEOMETRY_EPSILON
            && rect.y >= -GEOMETRY_EPSILON
            && rect.max_x() <= wall.width + GEOMETRY_EPSILON
            && rect.max_y() <= wall.height + GEOMETRY_EPSILON;
        if !inside {
            return Err(bad_request("Obstacle must be within wall boundaries"));
        }

        store.next_obstacle += 1;
        let record = ObstacleRecord {
            id: store.next_obstacle,
            wall_id,
            obstacle: obstacle.clone(),
        };
        store.obstacles.insert(record.id, record.clone());
        debug!(id = record.id, wall_id, "obstacle stored");
        Ok(record)
    }

    async fn list_obstacles(&self, wall_id: u64) -> Result<Vec<ObstacleRecord>, RemoteError> {
        let store = self.store.lock();
        store.wall(wall_id)?;
        Ok(store
            .obstacles
            .values()
            .filter(|o| o.wall_id == wall_id)
            .cloned()
            .collect())
    }

    async fn get_obstacle(&self, id: u64) -> Result<ObstacleRecord, RemoteError> {
        self.store
            .lock()
            .obstacles
            .get(&id)
            .cloned()
            .ok_or(RemoteError::NotFound {
                entity: "Obstacle",
                id,
            })
    }

    async fn delete_obstacle(&self, id: u64) -> Result<(), RemoteError> {
        self.store
            .lock()
            .obstacles
            .remove(&id)
            .map(|_| ())
            .ok_or(RemoteError::NotFound {
                entity: "Obstacle",
                id,
            })
    }

    async fn plan_trajectory(
        &self,
        request: &PlanRequest,
        name: &str,
    ) -> Result<PlanResponse, RemoteError> {
        let wall = Wall::new(request.wall.width, request.wall.height)
            .map_err(|e| bad_request(e.to_string()))?;
        let trajectory = plan_coverage(
            &wall,
            &request.obstacles,
            request.robot_width,
            request.overlap,
        )
        .map_err(|e| bad_request(e.to_string()))?;
        let distance = path_length(trajectory.points());

        let mut store = self.store.lock();
        let id = match request.wall.id {
            Some(wall_id) => {
                store.wall(wall_id)?;
                store.next_trajectory += 1;
                let record = TrajectoryRecord {
                    id: store.next_trajectory,
                    wall_id,
                    name: name.to_string(),
                    points: trajectory.points().to_vec(),
                    distance,
                    created_at: Some(Utc::now()),
                };
                let id = record.id;
                store.trajectories.insert(id, record);
                Some(id)
            }
            None => None,
        };

        debug!(points = trajectory.len(), distance, stored = ?id, "trajectory planned");
        Ok(PlanResponse {
            id,
            name: Some(name.to_string()),
            points: trajectory.into_points(),
            distance: Some(distance),
        })
    }

    async fn list_trajectories(
        &self,
        wall_id: u64,
        p: Page,
    ) -> Result<Vec<TrajectoryRecord>, RemoteError> {
        let store = self.store.lock();
        store.wall(wall_id)?;
        Ok(page(
            store
                .trajectories
                .values()
                .filter(|t| t.wall_id == wall_id)
                .cloned(),
            p,
        ))
    }

    async fn get_trajectory(&self, id: u64) -> Result<TrajectoryRecord, RemoteError> {
        self.store
            .lock()
            .trajectories
            .get(&id)
            .cloned()
            .ok_or(RemoteError::NotFound {
                entity: "Trajectory",
                id,
            })
    }

    async fn delete_trajectory(&self, id: u64) -> Result<(), RemoteError> {
        self.store
            .lock()
            .trajectories
            .remove(&id)
            .map(|_| ())
            .ok_or(RemoteError::NotFound {
                entity: "Trajectory",
                id,
            })
    }

    async fn health(&self) -> Result<HealthStatus, RemoteError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
