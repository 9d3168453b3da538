//! # WallKit Communication
//!
//! Client side of the persistence service that stores walls, obstacles
//! and planned trajectories.
//!
//! - [`PersistenceService`]: the async contract
//! - [`HttpPersistenceClient`]: JSON over HTTP via `reqwest`
//! - [`InMemoryService`]: in-process store used offline and in tests

pub mod http;
pub mod memory;
pub mod records;
pub mod service;

pub use http::{HttpClientConfig, HttpPersistenceClient};
pub use memory::InMemoryService;
pub use records::{
    HealthStatus, ObstacleRecord, Page, PlanRequest, PlanResponse, PlanWall, TrajectoryRecord,
    WallRecord,
};
pub use service::PersistenceService;
