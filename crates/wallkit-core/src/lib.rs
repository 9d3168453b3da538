//! # WallKit Core
//!
//! Core types, validation, and error handling for WallKit.
//! Provides the wall/obstacle/trajectory data model shared by the planner,
//! the playback engine, the renderer and the persistence client.

pub mod constants;
pub mod error;
pub mod input;
pub mod model;

pub use error::{Error, RemoteError, Result, SessionError, ValidationError};
pub use input::{parse_dimension, parse_overlap_percent, validate_overlap};
pub use model::{Obstacle, ObstacleKind, Rect, Trajectory, Wall, Waypoint};
