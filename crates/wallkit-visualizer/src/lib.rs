//! # WallKit Visualizer
//!
//! Maps wall coordinates to viewport pixels and draws the scene.
//!
//! ## Core Components
//!
//! - **Viewport**: [`ViewTransform`] fit-to-viewport scale and centering
//! - **Surface**: the [`DrawSurface`] primitive set, with a recording
//!   implementation for tests
//! - **Renderer**: stateless [`render`] of a [`SceneSnapshot`]
//! - **Pixmap**: anti-aliased raster backend with PNG export

pub mod error;
pub mod font;
pub mod pixmap;
pub mod renderer;
pub mod surface;
pub mod viewport;

pub use error::RenderError;
pub use pixmap::PixmapSurface;
pub use renderer::{render, LegendStyle, RenderStyle, SceneSnapshot};
pub use surface::{
    Color, DrawCommand, DrawSurface, LineCap, RecordingSurface, StrokeStyle, TextStyle,
};
pub use viewport::{ScreenPoint, ScreenRect, ViewTransform, ViewportSize};
