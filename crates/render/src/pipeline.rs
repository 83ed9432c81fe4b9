use glam::DVec2;
use papercity_common::{StrokeStyle, Vector};
use papercity_scene::{Scene, Shape};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::camera::Camera;
use crate::canvas::{Canvas, DrawOptions, FillStyle};
use crate::projection::Projector;

/// Weight of mean depth in the sort key; large enough that depth dominates.
const DEPTH_WEIGHT: f64 = 1000.0;

/// Added to filled shapes so they order ahead of outlines at equal depth.
const FILL_BIAS: f64 = 0.001;

/// Painter's sort key: `meanZ · 1000 + mean distance to eye + fill bias`.
pub fn depth_key(shape: &Shape, eye: Vector) -> f64 {
    let bias = if shape.is_filled() { FILL_BIAS } else { 0.0 };
    shape.mean_z() * DEPTH_WEIGHT + shape.mean_distance_to(eye) + bias
}

/// Jitter seed from the source geometry: `Σ x + 100y + 100000z`, truncated.
pub fn shape_seed(vertices: &[Vector]) -> i64 {
    vertices
        .iter()
        .map(|v| v.x + v.y * 100.0 + v.z * 100_000.0)
        .sum::<f64>() as i64
}

/// Length of the diagonal of the points' bounding box.
fn bounding_diagonal(points: &[DVec2]) -> f64 {
    let (min, max) = points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    );
    (max - min).length()
}

/// Counters for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameStats {
    pub shapes: usize,
    pub emitted: usize,
    pub culled: usize,
    pub elapsed: Duration,
}

/// Projection, depth sort and emission for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    camera: Camera,
    stroke: StrokeStyle,
}

impl Pipeline {
    pub fn new(camera: Camera, stroke: StrokeStyle) -> Self {
        Self { camera, stroke }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Sort the scene back to front and emit every shape that projects
    /// completely. Shapes with any culled vertex are skipped for this frame.
    pub fn run<C: Canvas + ?Sized>(&self, scene: &mut Scene, canvas: &mut C) -> FrameStats {
        let _span = tracing::info_span!("render_pass", shapes = scene.len()).entered();
        let start = Instant::now();

        let eye = self.camera.eye();
        scene.depth_sort(|shape| depth_key(shape, eye));

        let projector = Projector::new(
            &self.camera,
            scene.viewport_width(),
            scene.viewport_height(),
        );
        let mut stats = FrameStats {
            shapes: scene.len(),
            ..FrameStats::default()
        };

        for shape in scene.shapes() {
            let Some(points) = projector.project_shape(shape) else {
                stats.culled += 1;
                continue;
            };

            let options = self.options_for(shape, &points);
            if shape.is_filled() {
                canvas.draw_polygon(&points, &options);
            } else {
                canvas.draw_path(&points, &options);
            }
            stats.emitted += 1;
        }

        stats.elapsed = start.elapsed();
        tracing::debug!(
            emitted = stats.emitted,
            culled = stats.culled,
            elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
            "render pass complete"
        );
        stats
    }

    fn options_for(&self, shape: &Shape, points: &[DVec2]) -> DrawOptions {
        let mut options = DrawOptions {
            stroke_color: Some(self.stroke.color),
            stroke_width: self.stroke.width,
            roughness: self.stroke.roughness,
            bowing: self.stroke.bowing_for(bounding_diagonal(points)),
            disable_multi_stroke: self.stroke.disable_multi_stroke,
            seed: shape_seed(shape.vertices()),
            fill_color: None,
            fill_style: None,
        };
        if let Some(fill) = shape.fill() {
            options.fill_color = Some(fill);
            options.fill_style = Some(FillStyle::Solid);
            options.roughness = self.stroke.fill_roughness;
        }
        if !shape.stroke() {
            options.stroke_color = None;
        }
        options
    }
}
