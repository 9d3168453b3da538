//! Configuration for WallKit
//!
//! Supports JSON and TOML files stored in the platform configuration
//! directory. Every section falls back to its defaults when missing, so a
//! file only needs the keys it changes.
//!
//! Sections:
//! - Planner defaults (robot width, overlap, start corner)
//! - Playback timing
//! - View layout
//! - Remote persistence service

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wallkit_core::constants::{
    DEFAULT_OVERLAP, DEFAULT_POINTS_PER_SECOND, DEFAULT_ROBOT_WIDTH, LEGEND_WIDTH_PX, MAX_OVERLAP,
    MAX_SPEED, MIN_SPEED, VIEW_PADDING_PX,
};
use wallkit_core::ValidationError;
use wallkit_planner::{PlannerParams, StartCorner};

use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "wallkit";

/// File name of the default configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Coverage planner defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Robot width in metres
    pub robot_width: f64,
    /// Overlap fraction between neighbouring rows, `[0, 0.5]`
    pub overlap: f64,
    pub start_corner: StartCorner,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            robot_width: DEFAULT_ROBOT_WIDTH,
            overlap: DEFAULT_OVERLAP,
            start_corner: StartCorner::default(),
        }
    }
}

impl PlannerSettings {
    pub fn params(&self) -> Result<PlannerParams, ValidationError> {
        Ok(PlannerParams::new(self.robot_width, self.overlap)?.with_start_corner(self.start_corner))
    }
}

/// Playback timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Waypoints advanced per second at 1x speed
    pub points_per_second: f64,
    /// Speed multiplier applied when a session starts
    pub default_speed: f64,
    /// Interval between frames of the headless driver
    pub frame_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            points_per_second: DEFAULT_POINTS_PER_SECOND,
            default_speed: 1.0,
            frame_interval_ms: 16,
        }
    }
}

impl PlaybackSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// View layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Pixels kept free around the wall
    pub padding_px: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Width of the scale ruler in pixels
    pub legend_width_px: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            padding_px: VIEW_PADDING_PX,
            viewport_width: 800,
            viewport_height: 600,
            legend_width_px: LEGEND_WIDTH_PX,
        }
    }
}

/// Remote persistence service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Service root; the in-process store is used when absent
    pub base_url: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 10_000,
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub planner: PlannerSettings,
    pub playback: PlaybackSettings,
    pub view: ViewSettings,
    pub remote: RemoteSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Location of the default configuration file.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        path.push(APP_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        Ok(path)
    }

    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Ok(path) => path,
                Err(e) => {
                    debug!(error = %e, "using default configuration");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let planner = &self.planner;
        if !planner.robot_width.is_finite() || planner.robot_width <= 0.0 {
            return Err(SettingsError::invalid(
                "planner.robot_width",
                "must be greater than zero",
            ));
        }
        if !planner.overlap.is_finite() || !(0.0..=MAX_OVERLAP).contains(&planner.overlap) {
            return Err(SettingsError::invalid(
                "planner.overlap",
                format!("must be between 0 and {}", MAX_OVERLAP),
            ));
        }

        let playback = &self.playback;
        if !playback.points_per_second.is_finite() || playback.points_per_second <= 0.0 {
            return Err(SettingsError::invalid(
                "playback.points_per_second",
                "must be greater than zero",
            ));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&playback.default_speed) {
            return Err(SettingsError::invalid(
                "playback.default_speed",
                format!("must be between {} and {}", MIN_SPEED, MAX_SPEED),
            ));
        }
        if playback.frame_interval_ms == 0 {
            return Err(SettingsError::invalid(
                "playback.frame_interval_ms",
                "must be greater than zero",
            ));
        }

        let view = &self.view;
        if !view.padding_px.is_finite() || view.padding_px < 0.0 {
            return Err(SettingsError::invalid(
                "view.padding_px",
                "must not be negative",
            ));
        }
        if view.viewport_width == 0 || view.viewport_height == 0 {
            return Err(SettingsError::invalid(
                "view.viewport",
                "dimensions must be greater than zero",
            ));
        }
        if !view.legend_width_px.is_finite() || view.legend_width_px <= 0.0 {
            return Err(SettingsError::invalid(
                "view.legend_width_px",
                "must be greater than zero",
            ));
        }

        if self.remote.timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "remote.timeout_ms",
                "must be greater than zero",
            ));
        }
        if let Some(url) = &self.remote.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(SettingsError::invalid(
                    "remote.base_url",
                    "must start with http:// or https://",
                ));
            }
        }

        Ok(())
    }
}
