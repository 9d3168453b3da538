//! Session orchestration.
//!
//! A [`Session`] owns everything the user is working on: the current wall,
//! its obstacles, the planned trajectory, the player and the last rendered
//! scene. Remote calls go through a [`PersistenceService`]; local state is
//! only replaced once the call that produced it has succeeded.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, warn};
use wallkit_communication::{ObstacleRecord, PersistenceService, PlanRequest, WallRecord};
use wallkit_core::constants::{DEFAULT_TRAJECTORY_NAME, MIN_DRAG_EXTENT};
use wallkit_core::{
    Obstacle, ObstacleKind, Rect, SessionError, Trajectory, ValidationError, Wall, Waypoint,
};
use wallkit_planner::{path_length, PlannerParams, TrajectoryAnalyzer, TrajectoryStats};
use wallkit_player::{FrameQueue, PlaybackStatus, PlayerConfig, TrajectoryPlayer};
use wallkit_settings::Config;
use wallkit_visualizer::{
    render, DrawSurface, RenderStyle, SceneSnapshot, ScreenPoint, ViewTransform, ViewportSize,
};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    /// The user declined a confirmation.
    Cancelled,
}

/// User-facing outcome of a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Cancelled,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of a successful planning call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    /// Stored trajectory id, when the service kept it.
    pub id: Option<u64>,
    pub name: String,
    pub stats: TrajectoryStats,
    pub notice: Notice,
}

/// Construction-time settings for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub player: PlayerConfig,
    pub default_speed: f64,
    pub viewport: ViewportSize,
    pub style: RenderStyle,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            default_speed: 1.0,
            viewport: ViewportSize::new(800.0, 600.0),
            style: RenderStyle::default(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Result<Self, ValidationError> {
        let mut style = RenderStyle::default();
        style.padding_px = config.view.padding_px;
        style.legend.width_px = config.view.legend_width_px;

        Ok(Self {
            player: PlayerConfig::new(config.playback.points_per_second)?,
            default_speed: config.playback.default_speed,
            viewport: ViewportSize::new(
                config.view.viewport_width as f64,
                config.view.viewport_height as f64,
            ),
            style,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    kind: ObstacleKind,
    start: Waypoint,
    current: Waypoint,
}

impl Drag {
    fn rect(&self) -> Rect {
        Rect::from_corners(self.start, self.current)
    }
}

/// The user's working state and the operations on it.
pub struct Session<S: PersistenceService> {
    service: S,
    wall: Option<WallRecord>,
    obstacles: Vec<ObstacleRecord>,
    trajectory: Trajectory,
    player: TrajectoryPlayer,
    frames: FrameQueue,
    marker: Rc<Cell<Option<Waypoint>>>,
    viewport: ViewportSize,
    style: RenderStyle,
    drag: Option<Drag>,
    last_scene: Option<SceneSnapshot>,
}

impl<S: PersistenceService> Session<S> {
    pub fn new(service: S, options: SessionOptions) -> Self {
        let frames = FrameQueue::new();
        let marker = Rc::new(Cell::new(None));
        let sink = Rc::clone(&marker);
        let mut player = TrajectoryPlayer::new(options.player, frames.clone())
            .with_marker_sink(move |position: Option<Waypoint>| sink.set(position));
        player.set_speed(options.default_speed);

        Self {
            service,
            wall: None,
            obstacles: Vec::new(),
            trajectory: Trajectory::empty(),
            player,
            frames,
            marker,
            viewport: options.viewport,
            style: options.style,
            drag: None,
            last_scene: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn wall(&self) -> Option<Wall> {
        self.wall.as_ref().and_then(|record| record.wall().ok())
    }

    pub fn wall_record(&self) -> Option<&WallRecord> {
        self.wall.as_ref()
    }

    pub fn obstacles(&self) -> &[ObstacleRecord] {
        &self.obstacles
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    fn require_wall(&self) -> Result<(u64, Wall), SessionError> {
        let record = self.wall.as_ref().ok_or(SessionError::NoWall)?;
        Ok((record.id, record.wall()?))
    }

    /// Creates a wall and makes it current, discarding the previous wall,
    /// its obstacles and any trajectory.
    pub async fn create_wall(&mut self, width: f64, height: f64) -> Result<Notice, SessionError> {
        let wall = Wall::new(width, height)?;
        let record = self.service.create_wall(&wall).await?;
        let obstacles = self.service.list_obstacles(record.id).await?;

        self.drag = None;
        self.wall = Some(record);
        self.obstacles = obstacles;
        self.trajectory = Trajectory::empty();
        self.player.load(Trajectory::empty());
        info!(width, height, "wall created");
        Ok(Notice::success(format!("Created wall: {}m x {}m", width, height)))
    }

    /// Adds an obstacle centered on the wall, named `"<Kind> <n>"`.
    pub async fn add_obstacle(
        &mut self,
        kind: ObstacleKind,
        width: f64,
        height: f64,
    ) -> Result<Notice, SessionError> {
        let (_, wall) = self.require_wall()?;
        let name = kind.default_name(self.obstacles.len() + 1);
        let obstacle = Obstacle::centered_on(&wall, width, height, kind, name)?;
        self.add_obstacle_at(obstacle).await
    }

    /// Adds a fully specified obstacle.
    pub async fn add_obstacle_at(&mut self, obstacle: Obstacle) -> Result<Notice, SessionError> {
        let (wall_id, _) = self.require_wall()?;
        let obstacle = Obstacle::new(
            obstacle.x,
            obstacle.y,
            obstacle.width,
            obstacle.height,
            obstacle.kind,
            obstacle.name,
        )?;

        let created = self.service.create_obstacle(wall_id, &obstacle).await?;
        match self.service.list_obstacles(wall_id).await {
            Ok(obstacles) => self.obstacles = obstacles,
            Err(e) => {
                self.obstacles.push(created);
                return Err(e.into());
            }
        }
        debug!(count = self.obstacles.len(), "obstacle added");
        Ok(Notice::success(format!("Added {} obstacle", obstacle.kind)))
    }

    /// Removes every obstacle from the current wall.
    ///
    /// Obstacles deleted before a failure stay deleted locally as well.
    pub async fn clear_obstacles(&mut self, confirm: bool) -> Result<Notice, SessionError> {
        if self.obstacles.is_empty() {
            return Ok(Notice::info("No obstacles to clear"));
        }
        if !confirm {
            return Ok(Notice::cancelled("Obstacles kept"));
        }
        let (wall_id, _) = self.require_wall()?;

        while let Some(record) = self.obstacles.first() {
            let id = record.id;
            self.service.delete_obstacle(id).await?;
            self.obstacles.remove(0);
        }
        self.obstacles = self.service.list_obstacles(wall_id).await?;
        info!(wall_id, "obstacles cleared");
        Ok(Notice::success("All obstacles removed"))
    }

    /// Plans a coverage trajectory for the current wall and loads it into
    /// the player.
    ///
    /// A blank `name` falls back to the default trajectory name. An empty
    /// result is reported as information, not as a failure.
    pub async fn plan_trajectory(
        &mut self,
        robot_width: f64,
        overlap: f64,
        name: &str,
    ) -> Result<PlanSummary, SessionError> {
        let (wall_id, wall) = self.require_wall()?;
        let params = PlannerParams::new(robot_width, overlap)?;
        let name = match name.trim() {
            "" => DEFAULT_TRAJECTORY_NAME,
            trimmed => trimmed,
        };

        let obstacles = self
            .obstacles
            .iter()
            .map(|record| record.obstacle.clone())
            .collect();
        let request = PlanRequest::new(
            Some(wall_id),
            &wall,
            obstacles,
            params.robot_width(),
            params.overlap(),
        );
        let response = self.service.plan_trajectory(&request, name).await?;

        let trajectory = response.trajectory();
        let stats = TrajectoryAnalyzer::new(&trajectory).stats();
        self.trajectory = trajectory.clone();
        let playable = self.player.load(trajectory);

        let notice = if playable {
            Notice::success("Trajectory planned successfully")
        } else {
            Notice::info("Robot is wider than the paintable height; nothing to play")
        };
        info!(
            points = stats.points,
            distance = path_length(self.trajectory.points()),
            "trajectory planned"
        );
        Ok(PlanSummary {
            id: response.id,
            name: response.name.unwrap_or_else(|| name.to_string()),
            stats,
            notice,
        })
    }

    /// Discards the planned trajectory. Stored copies are left alone.
    pub fn clear_trajectory(&mut self, confirm: bool) -> Notice {
        if self.trajectory.is_empty() {
            return Notice::info("No trajectory to clear");
        }
        if !confirm {
            return Notice::cancelled("Trajectory kept");
        }
        self.trajectory = Trajectory::empty();
        self.player.stop();
        self.player.load(Trajectory::empty());
        Notice::success("Trajectory cleared")
    }

    pub fn player(&self) -> &TrajectoryPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut TrajectoryPlayer {
        &mut self.player
    }

    /// Queue the player requests frames from; drain it to drive playback.
    pub fn frames(&self) -> &FrameQueue {
        &self.frames
    }

    pub fn play(&mut self) -> bool {
        self.player.play()
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn seek_to_start(&mut self) {
        self.player.seek_to_start();
    }

    pub fn seek_to_end(&mut self) {
        self.player.seek_to_end();
    }

    /// Pauses and moves the marker to a fraction of the trajectory.
    pub fn seek_to_progress(&mut self, fraction: f64) {
        let last = self.trajectory.last_index().unwrap_or(0);
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.player.seek_to((fraction * last as f64).round() as usize);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.player.set_speed(speed);
    }

    pub fn playback(&self) -> PlaybackStatus {
        self.player.status()
    }

    /// Position of the playback marker, `None` when hidden.
    pub fn marker(&self) -> Option<Waypoint> {
        self.marker.get()
    }

    /// Transform for the current wall at the session's viewport size.
    pub fn transform(&self) -> Option<ViewTransform> {
        let wall = self.wall()?;
        Some(ViewTransform::fit_wall(
            &wall,
            self.viewport,
            self.style.padding_px,
        ))
    }

    /// Current state as a scene to draw.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            wall: self.wall(),
            obstacles: self
                .obstacles
                .iter()
                .map(|record| record.obstacle.clone())
                .collect(),
            preview: self.preview(),
            trajectory: self.trajectory.clone(),
            marker: self.marker(),
        }
    }

    /// Draws the current state and remembers it for [`resize`](Self::resize).
    pub fn render(&mut self, surface: &mut dyn DrawSurface) -> Option<ViewTransform> {
        self.viewport = surface.size();
        let scene = self.snapshot();
        let transform = render(&scene, surface, &self.style);
        self.last_scene = Some(scene);
        transform
    }

    /// Resizes `surface` and redraws the last rendered scene at the new size.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        surface: &mut dyn DrawSurface,
    ) -> Option<ViewTransform> {
        surface.resize(width, height);
        self.viewport = surface.size();
        let scene = match &self.last_scene {
            Some(scene) => scene.clone(),
            None => self.snapshot(),
        };
        debug!(width, height, "viewport resized");
        let transform = render(&scene, surface, &self.style);
        self.last_scene = Some(scene);
        transform
    }

    /// Starts drawing an obstacle of `kind` at a pointer position.
    pub fn begin_drag(
        &mut self,
        pixel: ScreenPoint,
        kind: ObstacleKind,
    ) -> Result<(), SessionError> {
        let transform = self.transform().ok_or(SessionError::NoWall)?;
        let start = transform.to_world(&pixel);
        self.drag = Some(Drag {
            kind,
            start,
            current: start,
        });
        Ok(())
    }

    /// Moves the free corner of the obstacle being drawn.
    pub fn drag_to(&mut self, pixel: ScreenPoint) -> Option<Obstacle> {
        let transform = self.transform()?;
        let drag = self.drag.as_mut()?;
        drag.current = transform.to_world(&pixel);
        self.preview()
    }

    /// The obstacle being drawn, if it has any area yet.
    pub fn preview(&self) -> Option<Obstacle> {
        let drag = self.drag?;
        let rect = drag.rect();
        Obstacle::new(rect.x, rect.y, rect.width, rect.height, drag.kind, "").ok()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Finishes a drag.
    ///
    /// The obstacle is added when both sides exceed the minimum extent;
    /// smaller drags are discarded and return `None`.
    pub async fn end_drag(&mut self, pixel: ScreenPoint) -> Result<Option<Notice>, SessionError> {
        let Some(mut drag) = self.drag.take() else {
            return Ok(None);
        };
        let Some(transform) = self.transform() else {
            return Ok(None);
        };
        drag.current = transform.to_world(&pixel);

        let rect = drag.rect();
        if rect.width <= MIN_DRAG_EXTENT || rect.height <= MIN_DRAG_EXTENT {
            debug!(width = rect.width, height = rect.height, "drag too small, discarded");
            return Ok(None);
        }

        let name = drag.kind.default_name(self.obstacles.len() + 1);
        let obstacle = Obstacle::new(rect.x, rect.y, rect.width, rect.height, drag.kind, name)?;
        match self.add_obstacle_at(obstacle).await {
            Ok(notice) => Ok(Some(notice)),
            Err(e) => {
                warn!(error = %e, "drawn obstacle was not added");
                Err(e)
            }
        }
    }
}
