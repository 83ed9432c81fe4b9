use papercity_common::Vector;
use papercity_scene::{Scene, SceneError};

use crate::Generator;

/// Shadow strip length as a fraction of the box height.
const SHADOW_LENGTH: f64 = 0.7;

/// The 8 corners of an axis-aligned box.
///
/// With `v1` the minimum and `v2` the maximum corner: `a..d` lie on the
/// `z = v1.z` face (`a` bottom-left, counter-clockwise) and `e..h` are the same
/// corners on the `z = v2.z` face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub a: Vector,
    pub b: Vector,
    pub c: Vector,
    pub d: Vector,
    pub e: Vector,
    pub f: Vector,
    pub g: Vector,
    pub h: Vector,
}

impl Corners {
    pub fn from_extremes(v1: Vector, v2: Vector) -> Self {
        Self {
            a: Vector::new(v1.x, v1.y, v1.z),
            b: Vector::new(v2.x, v1.y, v1.z),
            c: Vector::new(v2.x, v2.y, v1.z),
            d: Vector::new(v1.x, v2.y, v1.z),
            e: Vector::new(v1.x, v1.y, v2.z),
            f: Vector::new(v2.x, v1.y, v2.z),
            g: Vector::new(v2.x, v2.y, v2.z),
            h: Vector::new(v1.x, v2.y, v2.z),
        }
    }

    pub fn to_array(self) -> [Vector; 8] {
        [self.a, self.b, self.c, self.d, self.e, self.f, self.g, self.h]
    }
}

impl Generator<'_> {
    /// Emit a shaded box between two opposite corners and return its corners.
    ///
    /// Emits four side quads (the `+x` side dark, the rest light) followed by
    /// an unstroked shadow strip cast along `+x` from the `+x` bottom edge.
    pub fn cuboid(
        &self,
        scene: &mut Scene,
        v1: Vector,
        v2: Vector,
    ) -> Result<Corners, SceneError> {
        let k = Corners::from_extremes(v1, v2);
        let palette = self.palette();

        scene.add_shape(vec![k.a, k.b, k.c, k.d], Some(palette.light), true)?;
        scene.add_shape(vec![k.b, k.c, k.g, k.f], Some(palette.dark), true)?;
        scene.add_shape(vec![k.d, k.c, k.g, k.h], Some(palette.light), true)?;
        scene.add_shape(vec![k.a, k.d, k.h, k.e], Some(palette.light), true)?;

        let offset = Vector::new((v2.y - v1.y) * SHADOW_LENGTH, 0.0, 0.0);
        scene.add_shape(
            vec![k.f, k.b, k.b + offset, k.f + offset],
            Some(palette.shadow),
            false,
        )?;

        Ok(k)
    }
}
