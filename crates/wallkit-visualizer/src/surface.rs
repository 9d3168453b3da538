//! Drawing surface abstraction.
//!
//! The renderer only issues the primitives below. Backends decide how they
//! are realised: [`PixmapSurface`](crate::PixmapSurface) rasterises them,
//! [`RecordingSurface`] keeps them as a command list.

use serde::{Deserialize, Serialize};

use crate::viewport::{ScreenPoint, ScreenRect, ViewportSize};

/// RGBA color, 8 bits per channel, straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha given as a fraction in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }
}

/// Line end and join shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    /// Round caps and round joins.
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(mut self) -> Self {
        self.cap = LineCap::Round;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub size_px: f64,
}

/// Primitive 2D drawing operations in viewport pixels.
pub trait DrawSurface {
    /// Current surface size in pixels.
    fn size(&self) -> ViewportSize;

    /// Resizes the surface, discarding its content.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears the whole surface.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: ScreenRect, color: Color);

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle);

    /// Strokes an open polyline through `points`.
    fn stroke_path(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle);

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color);

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, stroke: &StrokeStyle);

    /// Draws `text` horizontally centered on `anchor`, with `anchor.y` as baseline.
    fn fill_text(&mut self, text: &str, anchor: ScreenPoint, style: &TextStyle);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        rect: ScreenRect,
        color: Color,
    },
    StrokeRect {
        rect: ScreenRect,
        stroke: StrokeStyle,
    },
    StrokePath {
        points: Vec<ScreenPoint>,
        stroke: StrokeStyle,
    },
    FillCircle {
        center: ScreenPoint,
        radius: f64,
        color: Color,
    },
    StrokeCircle {
        center: ScreenPoint,
        radius: f64,
        stroke: StrokeStyle,
    },
    FillText {
        text: String,
        anchor: ScreenPoint,
        style: TextStyle,
    },
}

/// Surface that records commands instead of drawing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: ViewportSize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: ViewportSize::new(width as f64, height as f64),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Circles filled with `color`, in order.
    pub fn circles(&self, color: Color) -> Vec<(ScreenPoint, f64)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color: c,
                } if *c == color => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> ViewportSize {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = ViewportSize::new(width as f64, height as f64);
        self.commands.clear();
    }

    fn clear(&mut self) {
        // Everything before a clear is no longer visible.
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            stroke: *stroke,
        });
    }

    fn stroke_path(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePath {
            points: points.to_vec(),
            stroke: *stroke,
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, stroke: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
        });
    }

    fn fill_text(&mut self, text: &str, anchor: ScreenPoint, style: &TextStyle) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            anchor,
            style: *style,
        });
    }
}
