//! Raster surface backed by `tiny-skia`.

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use rusttype::{point as rt_point, Scale};
use tiny_skia::{
    FillRule, LineCap as SkiaCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};
use tracing::debug;

use crate::error::RenderError;
use crate::font::{label_font, text_width};
use crate::surface::{Color, DrawSurface, LineCap, StrokeStyle, TextStyle};
use crate::viewport::{ScreenPoint, ScreenRect, ViewportSize};

fn background() -> tiny_skia::Color {
    tiny_skia::Color::WHITE
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    paint.anti_alias = true;
    paint
}

fn skia_stroke(style: &StrokeStyle) -> Stroke {
    let (line_cap, line_join) = match style.cap {
        LineCap::Butt => (SkiaCap::Butt, LineJoin::Miter),
        LineCap::Round => (SkiaCap::Round, LineJoin::Round),
    };
    Stroke {
        width: style.width as f32,
        line_cap,
        line_join,
        ..Default::default()
    }
}

fn skia_rect(rect: ScreenRect) -> Option<Rect> {
    Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

/// Anti-aliased RGBA surface with a white background.
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        pixmap.fill(background());
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(
            pixel.red(),
            pixel.green(),
            pixel.blue(),
            pixel.alpha(),
        ))
    }

    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (pixel, out) in self.pixmap.pixels().iter().zip(img.pixels_mut()) {
            let c = pixel.demultiply();
            *out = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        img
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        debug!(path = %path.display(), "frame written");
        Ok(())
    }

    fn stroke_points(&mut self, points: &[ScreenPoint], style: &StrokeStyle, close: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if close {
            pb.close();
        }
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &paint(style.color),
                &skia_stroke(style),
                Transform::identity(),
                None,
            );
        }
    }

    /// Blends a coverage value of `color` into one premultiplied pixel.
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let (width, height) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        let alpha = coverage.clamp(0.0, 1.0) * color.a as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        let idx = ((y * width + x) * 4) as usize;
        let data = self.pixmap.data_mut();
        let src = [color.r, color.g, color.b];
        for (channel, value) in src.iter().enumerate() {
            let dst = data[idx + channel] as f32;
            data[idx + channel] = (*value as f32 * alpha + dst * (1.0 - alpha)).round() as u8;
        }
        let dst_a = data[idx + 3] as f32;
        data[idx + 3] = (alpha * 255.0 + dst_a * (1.0 - alpha)).round() as u8;
    }
}

impl DrawSurface for PixmapSurface {
    fn size(&self) -> ViewportSize {
        ViewportSize::new(self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    fn resize(&mut self, width: u32, height: u32) {
        match Pixmap::new(width, height) {
            Some(pixmap) => {
                self.pixmap = pixmap;
                self.pixmap.fill(background());
            }
            None => debug!(width, height, "ignoring resize to an empty surface"),
        }
    }

    fn clear(&mut self) {
        self.pixmap.fill(background());
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        if let Some(r) = skia_rect(rect) {
            self.pixmap
                .fill_rect(r, &paint(color), Transform::identity(), None);
        }
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle) {
        let corners = [
            ScreenPoint::new(rect.x, rect.y),
            ScreenPoint::new(rect.x + rect.width, rect.y),
            ScreenPoint::new(rect.x + rect.width, rect.y + rect.height),
            ScreenPoint::new(rect.x, rect.y + rect.height),
        ];
        self.stroke_points(&corners, stroke, true);
    }

    fn stroke_path(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle) {
        self.stroke_points(points, stroke, false);
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) {
        let (cx, cy) = (center.x as f32, center.y as f32);
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius as f32) {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, stroke: &StrokeStyle) {
        let (cx, cy) = (center.x as f32, center.y as f32);
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius as f32) {
            self.pixmap.stroke_path(
                &path,
                &paint(stroke.color),
                &skia_stroke(stroke),
                Transform::identity(),
                None,
            );
        }
    }

    fn fill_text(&mut self, text: &str, anchor: ScreenPoint, style: &TextStyle) {
        let Some(font) = label_font() else {
            return;
        };
        let size = style.size_px as f32;
        let width = text_width(font, text, size);
        let start = rt_point(anchor.x as f32 - width / 2.0, anchor.y as f32);

        for glyph in font.layout(text, Scale::uniform(size), start) {
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                self.blend(
                    gx as i32 + bounds.min.x,
                    gy as i32 + bounds.min.y,
                    style.color,
                    coverage,
                );
            });
        }
    }
}
