use glam::DVec2;
use papercity_common::{Matrix, Vector};
use papercity_scene::Shape;

use crate::camera::Camera;

/// Screen-space result of projecting one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Visible(DVec2),
    /// Behind the camera (or on its plane); cannot be placed on screen.
    Culled,
}

impl Projection {
    pub fn point(self) -> Option<DVec2> {
        match self {
            Projection::Visible(p) => Some(p),
            Projection::Culled => None,
        }
    }
}

/// Camera and viewport baked into a single vertex transform.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    offset: Vector,
    view_clip: Matrix,
    width: f64,
    height: f64,
}

impl Projector {
    pub fn new(camera: &Camera, width: f64, height: f64) -> Self {
        Self {
            offset: camera.position,
            view_clip: camera.view_clip(width / height),
            width,
            height,
        }
    }

    /// Translate by the camera offset, rotate, apply the clip matrix, then
    /// map to pixels with the perspective divide fused into the viewport scale.
    pub fn project(&self, v: Vector) -> Projection {
        let c = (v + self.offset).transform(&self.view_clip);
        if c.w <= 0.0 {
            return Projection::Culled;
        }

        let sx = (c.x * self.width) / (2.0 * c.w) + self.width * 0.5;
        let sy = -(c.y * self.height) / (2.0 * c.w) + self.height * 0.5;
        if !sx.is_finite() || !sy.is_finite() {
            return Projection::Culled;
        }
        Projection::Visible(DVec2::new(sx, sy))
    }

    /// Project every vertex of a shape. `None` if any vertex is culled.
    pub fn project_shape(&self, shape: &Shape) -> Option<Vec<DVec2>> {
        shape
            .vertices()
            .iter()
            .map(|v| self.project(*v).point())
            .collect()
    }
}
