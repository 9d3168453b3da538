//! # WallKit
//!
//! Wall-painting robot simulator:
//! - Boustrophedon coverage path planning over a rectangular wall
//! - Time-driven playback of the planned path with pause, seek and speed control
//! - Fit-to-viewport rendering of the wall, obstacles, path and robot marker
//! - Persistence of walls, obstacles and trajectories through a remote service
//!
//! ## Architecture
//!
//! WallKit is organized as a workspace with multiple crates:
//!
//! 1. **wallkit-core** - Data model, validation, error taxonomy
//! 2. **wallkit-planner** - Coverage planning and trajectory analysis
//! 3. **wallkit-player** - Playback state machine and frame scheduling
//! 4. **wallkit-visualizer** - View transform, draw surfaces, renderer
//! 5. **wallkit-communication** - Persistence service clients
//! 6. **wallkit-settings** - Configuration files
//! 7. **wallkit** - Session orchestration and the command line binary

pub mod cli;
pub mod session;

pub use session::{Notice, NoticeLevel, PlanSummary, Session, SessionOptions};

pub use wallkit_communication::{
    HttpClientConfig, HttpPersistenceClient, InMemoryService, PersistenceService,
};
pub use wallkit_core::{
    Error, Obstacle, ObstacleKind, RemoteError, Result, SessionError, Trajectory,
    ValidationError, Wall, Waypoint,
};
pub use wallkit_planner::{CoveragePlanner, PlannerParams, StartCorner, TrajectoryAnalyzer};
pub use wallkit_player::{PlaybackDriver, PlayerState, TrajectoryPlayer};
pub use wallkit_settings::Config;
pub use wallkit_visualizer::{
    render, DrawSurface, PixmapSurface, RecordingSurface, RenderStyle, SceneSnapshot,
    ViewTransform,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support (default level INFO)
/// - Pretty console output on stderr, or one JSON object per line when
///   `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    // stdout carries command output (JSON waypoints, summaries).
    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_thread_names(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
