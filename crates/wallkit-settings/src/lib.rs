//! WallKit Settings Crate
//!
//! Loads, validates and saves the application configuration.

pub mod config;
pub mod error;

pub use config::{
    Config, PlannerSettings, PlaybackSettings, RemoteSettings, ViewSettings, APP_DIR_NAME,
    CONFIG_FILE_NAME,
};
pub use error::{SettingsError, SettingsResult};
