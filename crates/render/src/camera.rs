use papercity_common::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fixed pitch-only camera.
///
/// `position` is added to every vertex before rotation, so the eye sits at
/// `-position` in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vector,
    /// Rotation about the x axis, radians.
    pub pitch: f64,
    /// Vertical field of view, radians.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector::new(0.0, -8.0, 2.0),
            pitch: PI * 0.15,
            fov: 60.0_f64.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// World-space eye point.
    pub fn eye(&self) -> Vector {
        self.position.negate()
    }

    pub fn rotation(&self) -> Matrix {
        Matrix::rotation_x(self.pitch)
    }

    pub fn clip_matrix(&self, aspect: f64) -> Matrix {
        Matrix::clip(self.fov, aspect, self.near, self.far)
    }

    /// Rotation followed by the clip matrix, as one transform.
    pub fn view_clip(&self, aspect: f64) -> Matrix {
        self.clip_matrix(aspect).multiply(&self.rotation())
    }
}
