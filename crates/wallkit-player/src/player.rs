//! Trajectory playback.
//!
//! A time-driven cursor over a [`Trajectory`]. Each delivered frame converts
//! the wall-clock time since the previous frame into a number of waypoints
//! to advance, scaled by the speed multiplier and a nominal
//! points-per-second rate. The current position is pushed to a
//! [`MarkerSink`] whenever it changes.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};
use wallkit_core::constants::{DEFAULT_POINTS_PER_SECOND, MAX_SPEED, MIN_SPEED};
use wallkit_core::{Trajectory, ValidationError, Waypoint};

use crate::clock::{Clock, MonotonicClock};
use crate::scheduler::{FrameScheduler, FrameTicket};

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerState {
    /// Nothing loaded, or cursor at rest after a load.
    Idle,
    Playing,
    Paused,
    /// Explicitly stopped: cursor at 0, marker hidden.
    Stopped,
}

impl PlayerState {
    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
            PlayerState::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single playback step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Request another frame.
    Continue,
    /// Playback is no longer running; no frame is requested.
    Halt,
}

/// Playback tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    points_per_second: f64,
}

impl PlayerConfig {
    pub fn new(points_per_second: f64) -> Result<Self, ValidationError> {
        if !points_per_second.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "Points per second".to_string(),
            });
        }
        if points_per_second <= 0.0 {
            return Err(ValidationError::non_positive(
                "Points per second",
                points_per_second,
            ));
        }
        Ok(Self { points_per_second })
    }

    /// Nominal waypoints advanced per second at 1x speed.
    pub fn points_per_second(&self) -> f64 {
        self.points_per_second
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            points_per_second: DEFAULT_POINTS_PER_SECOND,
        }
    }
}

/// Receives the marker position; `None` hides the marker.
pub trait MarkerSink {
    fn show_marker(&mut self, position: Option<Waypoint>);
}

impl<F> MarkerSink for F
where
    F: FnMut(Option<Waypoint>),
{
    fn show_marker(&mut self, position: Option<Waypoint>) {
        self(position)
    }
}

/// Read-only view of the playback state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackStatus {
    pub state: PlayerState,
    pub cursor: usize,
    pub len: usize,
    pub speed: f64,
    pub progress: f64,
}

/// Plays a trajectory back as a moving marker.
pub struct TrajectoryPlayer {
    trajectory: Trajectory,
    cursor: usize,
    state: PlayerState,
    speed: f64,
    last_tick: Option<Instant>,
    pending: Option<FrameTicket>,
    config: PlayerConfig,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn FrameScheduler>,
    sink: Box<dyn MarkerSink>,
}

impl TrajectoryPlayer {
    /// Creates an idle player that requests frames from `scheduler`.
    pub fn new(config: PlayerConfig, scheduler: impl FrameScheduler + 'static) -> Self {
        Self {
            trajectory: Trajectory::empty(),
            cursor: 0,
            state: PlayerState::Idle,
            speed: 1.0,
            last_tick: None,
            pending: None,
            config,
            clock: Box::new(MonotonicClock),
            scheduler: Box::new(scheduler),
            sink: Box::new(|_: Option<Waypoint>| {}),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_marker_sink(mut self, sink: impl MarkerSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Replaces the held trajectory. Returns whether it has any waypoints.
    pub fn load(&mut self, trajectory: Trajectory) -> bool {
        self.cancel_pending();
        self.trajectory = trajectory;
        self.cursor = 0;
        self.state = PlayerState::Idle;
        self.sink.show_marker(None);
        debug!(points = self.trajectory.len(), "trajectory loaded");
        !self.trajectory.is_empty()
    }

    /// Starts or resumes playback.
    ///
    /// Returns `false` only when there is nothing to play. Resuming from the
    /// final waypoint rewinds to the start.
    pub fn play(&mut self) -> bool {
        let Some(last) = self.trajectory.last_index() else {
            return false;
        };
        if self.state == PlayerState::Playing {
            return true;
        }

        if self.cursor >= last {
            self.cursor = 0;
        }
        self.state = PlayerState::Playing;
        self.last_tick = Some(self.clock.now());
        self.pending = Some(self.scheduler.schedule());
        debug!(cursor = self.cursor, speed = self.speed, "playback started");
        true
    }

    /// Pauses playback, keeping the cursor. Ignored unless playing.
    pub fn pause(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }
        self.cancel_pending();
        self.state = PlayerState::Paused;
        debug!(cursor = self.cursor, "playback paused");
    }

    /// Rewinds to the start and hides the marker.
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.cursor = 0;
        if self.state != PlayerState::Idle {
            self.state = PlayerState::Stopped;
        }
        self.sink.show_marker(None);
        debug!(state = %self.state, "playback stopped");
    }

    pub fn seek_to_start(&mut self) {
        self.seek_to(0);
    }

    pub fn seek_to_end(&mut self) {
        self.seek_to(usize::MAX);
    }

    /// Pauses and moves the cursor to `index`, clamped to the last waypoint.
    pub fn seek_to(&mut self, index: usize) {
        self.pause();
        self.cursor = index.min(self.trajectory.last_index().unwrap_or(0));
        if !self.trajectory.is_empty() {
            self.state = PlayerState::Paused;
        }
        self.sink.show_marker(self.position());
    }

    /// Sets the speed multiplier, clamped to `[0.1, 5]`.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_nan() {
            warn!("ignoring NaN playback speed");
            return;
        }
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Delivers a scheduled frame.
    ///
    /// Frames that are not the outstanding ticket (cancelled, or from an
    /// earlier play session) are dropped.
    pub fn on_frame(&mut self, ticket: FrameTicket) -> TickOutcome {
        if self.pending != Some(ticket) {
            return TickOutcome::Halt;
        }
        self.pending = None;

        let now = self.clock.now();
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        let outcome = self.advance(elapsed);
        if outcome == TickOutcome::Continue {
            self.pending = Some(self.scheduler.schedule());
        }
        outcome
    }

    /// Advances the cursor for `elapsed` wall-clock time.
    ///
    /// Moves at least one waypoint per step and never past the last one.
    /// Reaching the last waypoint pauses playback.
    pub fn advance(&mut self, elapsed: Duration) -> TickOutcome {
        if self.state != PlayerState::Playing {
            return TickOutcome::Halt;
        }
        let Some(last) = self.trajectory.last_index() else {
            self.state = PlayerState::Paused;
            return TickOutcome::Halt;
        };

        if self.cursor < last {
            let budget = elapsed.as_secs_f64() * self.speed * self.config.points_per_second;
            let steps = budget.floor() as usize + 1;
            self.cursor = self.cursor.saturating_add(steps).min(last);
            self.sink.show_marker(self.position());
        }

        if self.cursor >= last {
            self.cancel_pending();
            self.state = PlayerState::Paused;
            debug!(cursor = self.cursor, "playback reached the final waypoint");
            TickOutcome::Halt
        } else {
            TickOutcome::Continue
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Waypoint under the cursor, `None` when nothing is loaded.
    pub fn position(&self) -> Option<Waypoint> {
        self.trajectory.get(self.cursor)
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.trajectory.len()
    }

    /// Cursor position as a fraction of the trajectory, 0 for fewer than two points.
    pub fn progress(&self) -> f64 {
        match self.trajectory.len() {
            0 | 1 => 0.0,
            len => self.cursor as f64 / (len - 1) as f64,
        }
    }

    /// Whether a frame is currently requested.
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            cursor: self.cursor,
            len: self.trajectory.len(),
            speed: self.speed,
            progress: self.progress(),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(ticket) = self.pending.take() {
            self.scheduler.cancel(ticket);
        }
    }
}

impl fmt::Debug for TrajectoryPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrajectoryPlayer")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("len", &self.trajectory.len())
            .field("speed", &self.speed)
            .field("pending", &self.pending)
            .finish()
    }
}
