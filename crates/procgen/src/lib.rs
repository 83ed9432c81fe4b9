//! Procedural geometry: the cuboid primitive and the building composed from it.
//!
//! # Invariants
//! - Generators only append to the scene; they never reorder or remove shapes.
//! - Shading is two flat tones from the palette, not a lighting model.
//! - Randomness is injected by the caller, so a seeded RNG reproduces a building.

mod building;
mod cuboid;

pub use building::{Building, Facade, LOD_DISTANCE, PADDING, WindowGrid, max_height, min_height};
pub use cuboid::Corners;

use papercity_common::Palette;

/// Shape generator bound to an immutable palette.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    palette: &'a Palette,
}

impl<'a> Generator<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        self.palette
    }
}
