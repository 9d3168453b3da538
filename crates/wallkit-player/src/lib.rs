//! # WallKit Player
//!
//! Playback engine for planned trajectories.
//!
//! - [`TrajectoryPlayer`]: Idle / Playing / Paused / Stopped state machine
//!   with seek and speed control
//! - [`FrameScheduler`]: cancellable frame requests; [`FrameQueue`] is the
//!   in-process implementation
//! - [`Clock`]: injectable time source
//! - [`PlaybackDriver`]: delivers frames from a tokio interval

pub mod clock;
pub mod driver;
pub mod player;
pub mod scheduler;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use driver::PlaybackDriver;
pub use player::{
    MarkerSink, PlaybackStatus, PlayerConfig, PlayerState, TickOutcome, TrajectoryPlayer,
};
pub use scheduler::{FrameQueue, FrameScheduler, FrameTicket};
