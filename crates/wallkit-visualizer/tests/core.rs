#[path = "core/renderer.rs"]
mod renderer;
#[path = "core/viewport.rs"]
mod viewport;
