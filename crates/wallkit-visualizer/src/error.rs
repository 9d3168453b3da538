//! Rendering errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Surfaces need at least one pixel in each direction
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// Image encoding or writing failed
    #[error("failed to encode image: {0}")]
    Encode(String),
}
