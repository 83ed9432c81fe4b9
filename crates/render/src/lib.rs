//! Rendering adapter: projects a populated scene through a fixed camera,
//! orders it back to front and emits 2D shapes to a [`Canvas`].
//!
//! # Invariants
//! - The pipeline never adds or removes scene geometry; culled shapes are
//!   only skipped for the frame.
//! - Shapes are emitted in descending depth-key order (painter's algorithm).
//! - The hand-drawn stroke backend sits behind the `Canvas` trait; the
//!   built-in canvases draw plain geometry.

mod camera;
mod canvas;
mod pipeline;
mod projection;
mod svg;

pub use camera::Camera;
pub use canvas::{Canvas, DrawCommand, DrawOptions, FillStyle, RecordingCanvas};
pub use pipeline::{FrameStats, Pipeline, depth_key, shape_seed};
pub use projection::{Projection, Projector};
pub use svg::SvgCanvas;

pub fn crate_info() -> &'static str {
    "papercity-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
