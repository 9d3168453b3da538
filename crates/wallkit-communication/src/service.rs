//! The persistence service contract.

use async_trait::async_trait;
use wallkit_core::{Obstacle, RemoteError, Wall};

use crate::records::{
    HealthStatus, ObstacleRecord, Page, PlanRequest, PlanResponse, TrajectoryRecord, WallRecord,
};

/// Remote store for walls, obstacles and trajectories.
///
/// Every call either succeeds or yields exactly one [`RemoteError`].
/// Implementations never retry.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn create_wall(&self, wall: &Wall) -> Result<WallRecord, RemoteError>;

    async fn list_walls(&self, page: Page) -> Result<Vec<WallRecord>, RemoteError>;

    async fn get_wall(&self, id: u64) -> Result<WallRecord, RemoteError>;

    async fn update_wall(&self, id: u64, wall: &Wall) -> Result<WallRecord, RemoteError>;

    /// Deletes the wall together with its obstacles and trajectories.
    async fn delete_wall(&self, id: u64) -> Result<(), RemoteError>;

    async fn create_obstacle(
        &self,
        wall_id: u64,
        obstacle: &Obstacle,
    ) -> Result<ObstacleRecord, RemoteError>;

    /// Obstacles of a wall in creation order.
    async fn list_obstacles(&self, wall_id: u64) -> Result<Vec<ObstacleRecord>, RemoteError>;

    async fn get_obstacle(&self, id: u64) -> Result<ObstacleRecord, RemoteError>;

    async fn delete_obstacle(&self, id: u64) -> Result<(), RemoteError>;

    /// Plans a coverage path and stores it under `name`.
    async fn plan_trajectory(
        &self,
        request: &PlanRequest,
        name: &str,
    ) -> Result<PlanResponse, RemoteError>;

    async fn list_trajectories(
        &self,
        wall_id: u64,
        page: Page,
    ) -> Result<Vec<TrajectoryRecord>, RemoteError>;

    async fn get_trajectory(&self, id: u64) -> Result<TrajectoryRecord, RemoteError>;

    async fn delete_trajectory(&self, id: u64) -> Result<(), RemoteError>;

    async fn health(&self) -> Result<HealthStatus, RemoteError>;
}
