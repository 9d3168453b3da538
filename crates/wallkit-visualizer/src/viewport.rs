//! World to viewport coordinate mapping.
//!
//! The wall is fitted into the viewport with a fixed pixel padding and
//! centered on both axes. World y maps directly to pixel y (no flip).

use std::fmt;

use serde::{Deserialize, Serialize};
use wallkit_core::{Wall, Waypoint};

/// Smallest scale a fit may produce when the padding eats the whole viewport.
const MIN_SCALE: f64 = 1e-6;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ViewportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Scale and centering offset from wall metres to viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewTransform {
    /// Largest scale at which the padded wall fits the viewport, centered.
    ///
    /// Wall dimensions must be positive.
    pub fn fit_to_viewport(
        wall_width: f64,
        wall_height: f64,
        viewport_width: f64,
        viewport_height: f64,
        padding: f64,
    ) -> Self {
        let scale_x = (viewport_width - 2.0 * padding) / wall_width;
        let scale_y = (viewport_height - 2.0 * padding) / wall_height;
        let scale = scale_x.min(scale_y).max(MIN_SCALE);

        Self {
            scale,
            offset_x: (viewport_width - wall_width * scale) / 2.0,
            offset_y: (viewport_height - wall_height * scale) / 2.0,
        }
    }

    /// Fits a wall into a viewport.
    pub fn fit_wall(wall: &Wall, viewport: ViewportSize, padding: f64) -> Self {
        Self::fit_to_viewport(
            wall.width,
            wall.height,
            viewport.width,
            viewport.height,
            padding,
        )
    }

    pub fn to_screen(&self, point: &Waypoint) -> ScreenPoint {
        ScreenPoint::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }

    /// Inverse of [`to_screen`](Self::to_screen).
    pub fn to_world(&self, pixel: &ScreenPoint) -> Waypoint {
        Waypoint::new(
            (pixel.x - self.offset_x) / self.scale,
            (pixel.y - self.offset_y) / self.scale,
        )
    }

    /// Maps a world rectangle given by its origin corner and size.
    pub fn rect_to_screen(&self, x: f64, y: f64, width: f64, height: f64) -> ScreenRect {
        let origin = self.to_screen(&Waypoint::new(x, y));
        ScreenRect::new(origin.x, origin.y, width * self.scale, height * self.scale)
    }

    /// World distance spanned by `pixel_width` pixels, rounded to 2 decimals.
    pub fn scale_legend(&self, pixel_width: f64) -> f64 {
        (pixel_width / self.scale * 100.0).round() / 100.0
    }
}
