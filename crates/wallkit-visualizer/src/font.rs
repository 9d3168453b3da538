//! Label font lookup.
//!
//! Labels use the system sans-serif face found through `fontdb`. The lookup
//! runs once per process; when no usable face exists text is not drawn.

use std::fs;
use std::sync::OnceLock;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use rusttype::Font;
use tracing::{debug, warn};

/// The label font, or `None` when the system has no sans-serif face.
pub fn label_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = load_system_font(&[Family::SansSerif, Family::Name("Arial")]);
        if font.is_none() {
            warn!("no system sans-serif font found; labels will not be drawn");
        }
        font
    })
    .as_ref()
}

fn load_system_font(families: &[Family<'_>]) -> Option<Font<'static>> {
    let mut db = Database::new();
    db.load_system_fonts();

    let query = Query {
        families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db.query(&query)?;
    let face = db.face(id)?;
    debug!(family = ?face.families.first(), "label font selected");

    let bytes = match &face.source {
        Source::File(path) | Source::SharedFile(path, _) => fs::read(path).ok()?,
        Source::Binary(bytes) => bytes.as_ref().as_ref().to_vec(),
    };
    Font::try_from_vec_and_index(bytes, face.index)
}

/// Horizontal advance of `text` at `size_px`.
pub fn text_width(font: &Font<'_>, text: &str, size_px: f32) -> f32 {
    let scale = rusttype::Scale::uniform(size_px);
    font.layout(text, scale, rusttype::point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}
