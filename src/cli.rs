//! Command line interface.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use wallkit_communication::{
    HttpClientConfig, HttpPersistenceClient, InMemoryService, PersistenceService,
};
use wallkit_core::{
    parse_dimension, parse_overlap_percent, Obstacle, ObstacleKind, ValidationError, Wall,
    Waypoint,
};
use wallkit_planner::{
    CoveragePlanner, RowCrossing, StartCorner, TrajectoryAnalyzer, TrajectoryStats,
};
use wallkit_player::PlaybackDriver;
use wallkit_settings::Config;
use wallkit_visualizer::{render, PixmapSurface, RenderError, RenderStyle, SceneSnapshot};

use crate::session::{Session, SessionOptions};

#[derive(Debug, Parser)]
#[command(
    name = "wallkit",
    about = "Plan, play back and render coverage paths for a wall-painting robot",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")")
)]
pub struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Persistence service root; the in-process store is used when absent
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan a coverage path and print a summary.
    Plan(PlanArgs),

    /// Render the wall, obstacles and path to a PNG file.
    Render(RenderArgs),

    /// Play the planned path back in real time.
    Simulate(SimulateArgs),

    /// Check that the persistence service is up.
    Health,
}

/// Wall, obstacles and planner inputs shared by every scene command.
#[derive(Debug, Clone, Args)]
pub struct SceneArgs {
    /// Wall width in metres
    #[arg(long, value_parser = parse_wall_width)]
    pub width: f64,

    /// Wall height in metres
    #[arg(long, value_parser = parse_wall_height)]
    pub height: f64,

    /// Obstacle as `kind:WxH` (centered) or `kind:WxH@X,Y`; repeatable
    #[arg(long = "obstacle")]
    pub obstacles: Vec<ObstacleSpec>,

    /// Robot width in metres [default: from config]
    #[arg(long = "robot-width", value_parser = parse_robot_width)]
    pub robot_width: Option<f64>,

    /// Overlap between neighbouring rows in percent, 0 to 50 [default: from config]
    #[arg(long, value_parser = parse_overlap)]
    pub overlap: Option<f64>,

    /// Trajectory name
    #[arg(long, default_value = "")]
    pub name: String,
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Corner the sweep starts from: bottom-left, bottom-right, top-left, top-right
    #[arg(long = "start-corner")]
    pub start_corner: Option<StartCorner>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Output PNG file
    #[arg(long, short)]
    pub out: PathBuf,

    /// Image size as WIDTHxHEIGHT [default: from config]
    #[arg(long)]
    pub viewport: Option<Viewport>,

    /// Draw the robot marker at this fraction of the path (0 to 1)
    #[arg(long = "marker-progress")]
    pub marker_progress: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Playback speed multiplier, 0.1 to 5 [default: from config]
    #[arg(long)]
    pub speed: Option<f64>,

    /// Write every frame as a numbered PNG into this directory
    #[arg(long = "frames-dir")]
    pub frames_dir: Option<PathBuf>,
}

/// Obstacle given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    pub width: f64,
    pub height: f64,
    /// Lower-left corner; centered on the wall when absent.
    pub origin: Option<Waypoint>,
}

impl ObstacleSpec {
    /// Builds the obstacle, named as the `index`-th (1-based) on `wall`.
    pub fn to_obstacle(&self, wall: &Wall, index: usize) -> Result<Obstacle, ValidationError> {
        let name = self.kind.default_name(index);
        match self.origin {
            Some(origin) => {
                Obstacle::new(origin.x, origin.y, self.width, self.height, self.kind, name)
            }
            None => Obstacle::centered_on(wall, self.width, self.height, self.kind, name),
        }
    }
}

impl FromStr for ObstacleSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected kind:WxH[@X,Y], got '{}'", s))?;
        let kind = kind.parse::<ObstacleKind>()?;
        let (size, origin) = match rest.split_once('@') {
            Some((size, origin)) => (size, Some(origin)),
            None => (rest, None),
        };

        let (width, height) = size
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH, got '{}'", size))?;
        let width = parse_dimension("Obstacle width", width).map_err(|e| e.to_string())?;
        let height = parse_dimension("Obstacle height", height).map_err(|e| e.to_string())?;

        let origin = match origin {
            Some(origin) => {
                let (x, y) = origin
                    .split_once(',')
                    .ok_or_else(|| format!("expected X,Y, got '{}'", origin))?;
                let x = x.trim().parse::<f64>().map_err(|e| format!("invalid x: {}", e))?;
                let y = y.trim().parse::<f64>().map_err(|e| format!("invalid y: {}", e))?;
                Some(Waypoint::new(x, y))
            }
            None => None,
        };

        Ok(Self {
            kind,
            width,
            height,
            origin,
        })
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = width.trim().parse::<u32>().map_err(|e| e.to_string())?;
        let height = height.trim().parse::<u32>().map_err(|e| e.to_string())?;
        if width == 0 || height == 0 {
            return Err("viewport dimensions must be greater than zero".to_string());
        }
        Ok(Self { width, height })
    }
}

fn parse_wall_width(s: &str) -> Result<f64, String> {
    parse_dimension("Wall width", s).map_err(|e| e.to_string())
}

fn parse_wall_height(s: &str) -> Result<f64, String> {
    parse_dimension("Wall height", s).map_err(|e| e.to_string())
}

fn parse_robot_width(s: &str) -> Result<f64, String> {
    parse_dimension("Robot width", s).map_err(|e| e.to_string())
}

fn parse_overlap(s: &str) -> Result<f64, String> {
    parse_overlap_percent(s).map_err(|e| e.to_string())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.remote.base_url = Some(url);
    }
    config.validate()?;

    match config.remote.base_url.clone() {
        Some(url) => {
            let client = HttpPersistenceClient::new(
                HttpClientConfig::new(url).with_timeout(config.remote.timeout()),
            )?;
            info!(url = client.base_url(), "using remote persistence service");
            dispatch(cli.command, &config, client).await
        }
        None => {
            debug!("using in-process persistence");
            dispatch(cli.command, &config, InMemoryService::new()).await
        }
    }
}

async fn dispatch<S: PersistenceService>(
    command: Commands,
    config: &Config,
    service: S,
) -> anyhow::Result<()> {
    match command {
        Commands::Plan(args) => run_plan(&args, config),
        Commands::Render(args) => run_render(&args, config, service).await,
        Commands::Simulate(args) => run_simulate(&args, config, service).await,
        Commands::Health => run_health(&service).await,
    }
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    stats: &'a TrajectoryStats,
    estimated_playback_secs: f64,
    crossings: &'a [RowCrossing],
    points: &'a [Waypoint],
}

fn run_plan(args: &PlanArgs, config: &Config) -> anyhow::Result<()> {
    let scene = &args.scene;
    let wall = Wall::new(scene.width, scene.height)?;
    let obstacles = scene
        .obstacles
        .iter()
        .enumerate()
        .map(|(i, spec)| spec.to_obstacle(&wall, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let mut planner = config.planner.clone();
    if let Some(robot_width) = scene.robot_width {
        planner.robot_width = robot_width;
    }
    if let Some(overlap) = scene.overlap {
        planner.overlap = overlap;
    }
    if let Some(corner) = args.start_corner {
        planner.start_corner = corner;
    }

    let trajectory = CoveragePlanner::new(planner.params()?).plan(&wall, &obstacles)?;
    let analyzer = TrajectoryAnalyzer::new(&trajectory);
    let stats = analyzer.stats();
    let crossings = analyzer.default_obstacle_crossings(&obstacles);
    let eta = analyzer.estimated_playback(
        config.playback.points_per_second,
        config.playback.default_speed,
    );

    if args.json {
        let output = PlanOutput {
            stats: &stats,
            estimated_playback_secs: eta.as_secs_f64(),
            crossings: &crossings,
            points: trajectory.points(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if trajectory.is_empty() {
        println!("Robot is wider than the paintable height; nothing to play");
        return Ok(());
    }
    println!("Wall:        {}", wall);
    println!("Waypoints:   {}", stats.points);
    println!("Rows:        {}", stats.rows);
    println!("Distance:    {:.2} m", stats.total_length);
    println!(
        "  sweeps {:.2} m, transitions {:.2} m",
        stats.sweep_length, stats.transition_length
    );
    println!("Playback:    {:.1} s", eta.as_secs_f64());
    for crossing in &crossings {
        println!(
            "Row {} (y = {:.2}) passes over {}",
            crossing.row,
            crossing.y,
            crossing.obstacles.join(", ")
        );
    }
    Ok(())
}

/// Creates the wall and obstacles through `service`, then plans.
async fn prepare_session<S: PersistenceService>(
    service: S,
    config: &Config,
    scene: &SceneArgs,
) -> anyhow::Result<Session<S>> {
    let mut session = Session::new(service, SessionOptions::from_config(config)?);
    let notice = session.create_wall(scene.width, scene.height).await?;
    info!("{}", notice);

    let wall = Wall::new(scene.width, scene.height)?;
    for (i, spec) in scene.obstacles.iter().enumerate() {
        let notice = match spec.origin {
            Some(_) => session.add_obstacle_at(spec.to_obstacle(&wall, i + 1)?).await?,
            None => session.add_obstacle(spec.kind, spec.width, spec.height).await?,
        };
        info!("{}", notice);
    }

    let robot_width = scene.robot_width.unwrap_or(config.planner.robot_width);
    let overlap = scene.overlap.unwrap_or(config.planner.overlap);
    let summary = session
        .plan_trajectory(robot_width, overlap, &scene.name)
        .await?;
    info!(
        name = %summary.name,
        points = summary.stats.points,
        distance = %format!("{:.2}", summary.stats.total_length),
        "{}",
        summary.notice
    );
    Ok(session)
}

fn viewport_or_default(viewport: Option<Viewport>, config: &Config) -> Viewport {
    viewport.unwrap_or(Viewport {
        width: config.view.viewport_width,
        height: config.view.viewport_height,
    })
}

async fn run_render<S: PersistenceService>(
    args: &RenderArgs,
    config: &Config,
    service: S,
) -> anyhow::Result<()> {
    let mut session = prepare_session(service, config, &args.scene).await?;
    let viewport = viewport_or_default(args.viewport, config);
    let mut surface = PixmapSurface::new(viewport.width, viewport.height)?;

    if let Some(progress) = args.marker_progress {
        session.seek_to_progress(progress);
    }
    session.render(&mut surface);
    surface.save_png(&args.out)?;
    info!(path = %args.out.display(), "scene rendered");
    println!("{}", args.out.display());
    Ok(())
}

/// Renders playback frames to numbered PNG files.
struct FrameWriter {
    dir: PathBuf,
    surface: PixmapSurface,
    scene: SceneSnapshot,
    style: RenderStyle,
    written: usize,
    error: Option<RenderError>,
}

impl FrameWriter {
    fn new(
        dir: &Path,
        scene: SceneSnapshot,
        style: RenderStyle,
        viewport: Viewport,
    ) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            surface: PixmapSurface::new(viewport.width, viewport.height)?,
            scene,
            style,
            written: 0,
            error: None,
        })
    }

    fn write(&mut self, marker: Option<Waypoint>) {
        if self.error.is_some() {
            return;
        }
        self.scene.marker = marker;
        render(&self.scene, &mut self.surface, &self.style);
        let path = self.dir.join(format!("frame_{:05}.png", self.written));
        match self.surface.save_png(&path) {
            Ok(()) => self.written += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "frame not written");
                self.error = Some(e);
            }
        }
    }
}

async fn run_simulate<S: PersistenceService>(
    args: &SimulateArgs,
    config: &Config,
    service: S,
) -> anyhow::Result<()> {
    let mut session = prepare_session(service, config, &args.scene).await?;
    if let Some(speed) = args.speed {
        session.set_speed(speed);
    }

    let mut writer = match &args.frames_dir {
        Some(dir) => {
            let viewport = session.viewport();
            Some(FrameWriter::new(
                dir,
                session.snapshot(),
                session.style().clone(),
                Viewport {
                    width: viewport.width as u32,
                    height: viewport.height as u32,
                },
            )?)
        }
        None => None,
    };

    if !session.play() {
        println!("Nothing to play");
        return Ok(());
    }

    let driver = PlaybackDriver::new(session.frames().clone(), config.playback.frame_interval());
    let started = tokio::time::Instant::now();
    let mut reported = 0;
    let frames = driver
        .run_with(session.player_mut(), |player| {
            let quarter = (player.progress() * 4.0).floor() as usize;
            if quarter > reported {
                reported = quarter;
                info!(
                    progress = %format!("{:.0}%", player.progress() * 100.0),
                    position = ?player.position(),
                    "playback progress"
                );
            }
            if let Some(writer) = writer.as_mut() {
                writer.write(player.position());
            }
        })
        .await;
    let elapsed = started.elapsed();

    if let Some(writer) = writer {
        if let Some(e) = writer.error {
            return Err(e.into());
        }
        info!(frames = writer.written, dir = %writer.dir.display(), "frames written");
    }

    let status = session.playback();
    println!(
        "Played {} waypoints in {} frames ({:.2} s at {}x)",
        status.len,
        frames,
        elapsed.as_secs_f64(),
        status.speed
    );
    Ok(())
}

async fn run_health<S: PersistenceService>(service: &S) -> anyhow::Result<()> {
    let status = service.health().await?;
    println!("{} ({})", status.status, status.timestamp);
    if !status.is_healthy() {
        anyhow::bail!("service reported '{}'", status.status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_spec_centered() {
        let spec: ObstacleSpec = "window:1.2x1".parse().unwrap();
        assert_eq!(spec.kind, ObstacleKind::Window);
        assert_eq!((spec.width, spec.height), (1.2, 1.0));
        assert_eq!(spec.origin, None);

        let wall = Wall::new(4.0, 3.0).unwrap();
        let obstacle = spec.to_obstacle(&wall, 2).unwrap();
        assert_eq!(obstacle.name, "Window 2");
        assert!((obstacle.x - 1.4).abs() < 1e-12);
        assert!((obstacle.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_obstacle_spec_with_origin() {
        let spec: ObstacleSpec = "door:1x2@0.5,0".parse().unwrap();
        assert_eq!(spec.kind, ObstacleKind::Door);
        assert_eq!(spec.origin, Some(Waypoint::new(0.5, 0.0)));
    }

    #[test]
    fn test_obstacle_spec_errors() {
        assert!("window".parse::<ObstacleSpec>().is_err());
        assert!("chimney:1x1".parse::<ObstacleSpec>().is_err());
        assert!("socket:0x1".parse::<ObstacleSpec>().is_err());
        assert!("socket:1x1@2".parse::<ObstacleSpec>().is_err());
    }

    #[test]
    fn test_viewport_parse() {
        assert_eq!(
            "1024x768".parse::<Viewport>(),
            Ok(Viewport {
                width: 1024,
                height: 768
            })
        );
        assert!("0x768".parse::<Viewport>().is_err());
        assert!("1024".parse::<Viewport>().is_err());
    }

    #[test]
    fn test_cli_parses_plan() {
        let cli = Cli::try_parse_from([
            "wallkit",
            "plan",
            "--width",
            "4",
            "--height",
            "3",
            "--robot-width",
            "0.5",
            "--overlap",
            "0",
            "--obstacle",
            "window:1x1",
            "--start-corner",
            "top-left",
            "--json",
        ])
        .unwrap();
        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.scene.robot_width, Some(0.5));
        assert_eq!(args.scene.overlap, Some(0.0));
        assert_eq!(args.start_corner, Some(StartCorner::TopLeft));
        assert!(args.json);
    }

    #[test]
    fn test_cli_rejects_bad_input() {
        assert!(
            Cli::try_parse_from(["wallkit", "plan", "--width", "-1", "--height", "3"]).is_err()
        );
        assert!(Cli::try_parse_from([
            "wallkit", "plan", "--width", "4", "--height", "3", "--overlap", "60"
        ])
        .is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["wallkit", "health", "--api-url", "http://127.0.0.1:8000"])
            .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:8000"));
        assert!(matches!(cli.command, Commands::Health));
    }
}
