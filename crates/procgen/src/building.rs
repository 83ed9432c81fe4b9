use papercity_common::Vector;
use papercity_scene::{Scene, SceneError};
use rand::Rng;
use serde::Serialize;

use crate::Generator;

/// Inset applied to every side of a footprint so neighbours never share a wall.
pub const PADDING: f64 = 0.1;

/// Buildings whose origin lies beyond this depth draw windows as single lines.
pub const LOD_DISTANCE: f64 = 20.0;

/// Facade lines sit just in front of the footprint edge.
const FACADE_OFFSET: f64 = 0.000_001;

/// Fraction the roof highlight corners are pulled toward the opposite corner.
const ROOF_BEVEL: f64 = 0.05;

pub fn min_height() -> f64 {
    2.0
}

pub fn max_height() -> f64 {
    2.0 + 1.3_f64.powi(5)
}

/// Solved window layout for one facade.
///
/// `spacing_x`/`spacing_y` are derived so that `columns` windows and
/// `columns + 1` gaps exactly fill the padded facade width (rows likewise
/// fill the full height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowGrid {
    pub window_width: f64,
    pub window_height: f64,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub columns: u32,
    pub rows: u32,
    /// Windows drawn as a single vertical stroke.
    pub simplified: bool,
}

impl WindowGrid {
    /// Pick window counts from the desired spacing, then re-solve the spacing
    /// so the grid tiles `available_width` by `available_height` with no residual.
    pub fn solve(
        available_width: f64,
        available_height: f64,
        window_width: f64,
        window_height: f64,
        desired_spacing_x: f64,
        desired_spacing_y: f64,
    ) -> Self {
        let columns = (available_width / (window_width + desired_spacing_x))
            .round()
            .max(1.0) as u32;
        let rows = ((available_height - desired_spacing_y) / (window_height + desired_spacing_y))
            .round()
            .max(1.0) as u32;

        let spacing_x = (available_width - columns as f64 * window_width) / (columns as f64 + 1.0);
        let spacing_y = (available_height - rows as f64 * window_height) / (rows as f64 + 1.0);

        Self {
            window_width,
            window_height,
            spacing_x,
            spacing_y,
            columns,
            rows,
            simplified: false,
        }
    }

    pub fn horizontal_extent(&self) -> f64 {
        self.columns as f64 * self.window_width + (self.columns as f64 + 1.0) * self.spacing_x
    }

    pub fn vertical_extent(&self) -> f64 {
        self.rows as f64 * self.window_height + (self.rows as f64 + 1.0) * self.spacing_y
    }

    pub fn window_count(&self) -> u32 {
        self.columns * self.rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Facade {
    Windows(WindowGrid),
    /// Plain mullion pattern: interior verticals plus one horizontal per row.
    Panels { columns: u32, rows: u32 },
}

/// Summary of one generated building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    pub origin: Vector,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub roof_highlight: bool,
    pub chimneys: u32,
    pub facade: Facade,
    /// Number of shapes this building appended to the scene.
    pub shapes: usize,
}

/// Right-skewed height: mostly low sheds near 2, occasionally towers.
fn sample_height<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.random::<f64>() * 1.3).powi(5) + min_height()
}

impl Generator<'_> {
    /// Generate a building on the footprint starting at `origin`.
    pub fn building<R: Rng + ?Sized>(
        &self,
        scene: &mut Scene,
        rng: &mut R,
        origin: Vector,
        width: f64,
        length: f64,
    ) -> Result<Building, SceneError> {
        let before = scene.len();
        let height = sample_height(rng);

        let k = self.cuboid(
            scene,
            origin + Vector::new(PADDING, 0.0, PADDING),
            origin + Vector::new(width - PADDING, height, length - PADDING),
        )?;

        let roof_highlight = rng.random::<f64>() < 0.5;
        if roof_highlight {
            let pull = |from: Vector, toward: Vector| from - (from - toward) * ROOF_BEVEL;
            scene.add_shape(
                vec![
                    pull(k.d, k.g),
                    pull(k.c, k.h),
                    pull(k.g, k.d),
                    pull(k.h, k.c),
                ],
                Some(self.palette().light),
                true,
            )?;
        }

        let chimneys = (rng.random::<f64>() * 2.0).ceil() as u32;
        for _ in 0..chimneys {
            let size = Vector::new(
                rng.random::<f64>() * 0.3 + 0.1,
                rng.random::<f64>() * 0.2 + 0.1,
                rng.random::<f64>() * 0.3 + 0.1,
            );
            let pos = Vector::new(
                origin.x + PADDING + rng.random::<f64>() * (width - PADDING * 2.0 - size.x),
                origin.y + height,
                origin.z + PADDING + rng.random::<f64>() * (length - PADDING * 2.0 - size.z),
            );
            self.cuboid(scene, pos, pos + size)?;
        }

        let facade = if rng.random::<f64>() < 0.5 {
            Facade::Windows(self.window_facade(scene, rng, origin, width, height)?)
        } else {
            self.panel_facade(scene, rng, origin, width, height)?
        };

        let building = Building {
            origin,
            width,
            length,
            height,
            roof_highlight,
            chimneys,
            facade,
            shapes: scene.len() - before,
        };
        tracing::trace!(
            x = origin.x,
            z = origin.z,
            height,
            chimneys,
            shapes = building.shapes,
            "building generated"
        );
        Ok(building)
    }

    /// Window grid on the front facade.
    pub fn window_facade<R: Rng + ?Sized>(
        &self,
        scene: &mut Scene,
        rng: &mut R,
        origin: Vector,
        width: f64,
        height: f64,
    ) -> Result<WindowGrid, SceneError> {
        let window_width = rng.random::<f64>() * 0.15 + 0.05;
        let window_height = rng.random::<f64>() * 0.15 + 0.05;
        let spacing_x = rng.random::<f64>() * 0.1 + 0.1;
        let spacing_y = rng.random::<f64>() * 0.1 + 0.1;

        let mut grid = WindowGrid::solve(
            width - PADDING * 2.0,
            height,
            window_width,
            window_height,
            spacing_x,
            spacing_y,
        );
        grid.simplified = origin.z > LOD_DISTANCE;

        let z = origin.z - FACADE_OFFSET;
        for ix in 0..grid.columns {
            let x = origin.x
                + PADDING
                + grid.spacing_x
                + ix as f64 * (grid.window_width + grid.spacing_x);
            for iy in 0..grid.rows {
                let y =
                    origin.y + grid.spacing_y + iy as f64 * (grid.window_height + grid.spacing_y);
                let (x1, y1) = (x + grid.window_width, y + grid.window_height);

                let outline = if grid.simplified {
                    let mid = x + grid.window_width * 0.5;
                    vec![Vector::new(mid, y, z), Vector::new(mid, y1, z)]
                } else {
                    vec![
                        Vector::new(x, y, z),
                        Vector::new(x1, y, z),
                        Vector::new(x1, y1, z),
                        Vector::new(x, y1, z),
                        Vector::new(x, y, z),
                    ]
                };
                scene.add_shape(outline, None, true)?;
            }
        }

        Ok(grid)
    }

    /// Evenly spaced divider lines on the front facade: interior verticals
    /// between the columns, and one horizontal line above each row, the
    /// last one at the padded roof edge.
    pub fn panel_facade<R: Rng + ?Sized>(
        &self,
        scene: &mut Scene,
        rng: &mut R,
        origin: Vector,
        width: f64,
        height: f64,
    ) -> Result<Facade, SceneError> {
        let columns = (rng.random::<f64>() * 5.0 + 5.0).round() as u32;
        let rows = (rng.random::<f64>() * 5.0 + 5.0).round() as u32;

        let spacing_x = (width - PADDING * 2.0) / columns as f64;
        let spacing_y = (height - PADDING * 2.0) / rows as f64;
        let z = origin.z - FACADE_OFFSET;

        for k in 1..columns {
            let x = origin.x + PADDING + k as f64 * spacing_x;
            scene.add_shape(
                vec![
                    Vector::new(x, origin.y, z),
                    Vector::new(x, origin.y + height, z),
                ],
                None,
                true,
            )?;
        }

        for k in 1..=rows {
            let y = origin.y + PADDING + k as f64 * spacing_y;
            scene.add_shape(
                vec![
                    Vector::new(origin.x + PADDING, y, z),
                    Vector::new(origin.x + width - PADDING, y, z),
                ],
                None,
                true,
            )?;
        }

        Ok(Facade::Panels { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papercity_common::Palette;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    const EPS: f64 = 1e-9;

    fn scene() -> Scene {
        Scene::new(1280.0, 720.0).unwrap()
    }

    #[test]
    fn height_stays_in_bounds() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        for _ in 0..10_000 {
            let h = sample_height(&mut rng);
            assert!(h >= min_height() && h <= max_height(), "height {h}");
        }
    }

    #[test]
    fn height_is_skewed_low() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(2);
        let samples: Vec<f64> = (0..10_000).map(|_| sample_height(&mut rng)).collect();
        let low = samples.iter().filter(|h| **h < 2.5).count();
        assert!(low > samples.len() / 2);
    }

    #[test]
    fn buildings_respect_bounds() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let mut scene = scene();

        for seed in 0..200 {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let width = (seed % 3 + 1) as f64;
            let length = ((seed / 3) % 3 + 1) as f64;
            let origin = Vector::new((seed % 40) as f64 - 20.0, 0.0, (seed % 30) as f64);
            let b = generator
                .building(&mut scene, &mut rng, origin, width, length)
                .unwrap();

            assert!(b.height >= min_height() && b.height <= max_height());
            assert!(b.chimneys <= 2);
            // Body + roof highlight + chimney boxes must all be present.
            let boxes = 5 * (1 + b.chimneys as usize) + usize::from(b.roof_highlight);
            assert!(b.shapes >= boxes);

            match b.facade {
                Facade::Windows(grid) => {
                    assert!(
                        (grid.horizontal_extent() - (width - 2.0 * PADDING)).abs() < EPS
                    );
                    assert!((grid.vertical_extent() - b.height).abs() < EPS);
                    assert_eq!(b.shapes, boxes + grid.window_count() as usize);
                }
                Facade::Panels { columns, rows } => {
                    assert!((5..=10).contains(&columns));
                    assert!((5..=10).contains(&rows));
                    assert_eq!(b.shapes, boxes + (columns + rows - 1) as usize);
                }
            }
        }
    }

    #[test]
    fn chimney_count_covers_all_cases() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let mut seen = [false; 3];
        for seed in 0..500 {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut s = scene();
            let b = generator
                .building(&mut s, &mut rng, Vector::new(0.0, 0.0, 5.0), 2.0, 2.0)
                .unwrap();
            seen[b.chimneys as usize] = true;
        }
        assert!(seen[1] && seen[2]);
    }

    #[test]
    fn both_facades_occur() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let (mut windows, mut panels) = (0, 0);
        for seed in 0..100 {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut s = scene();
            match generator
                .building(&mut s, &mut rng, Vector::new(0.0, 0.0, 5.0), 3.0, 1.0)
                .unwrap()
                .facade
            {
                Facade::Windows(_) => windows += 1,
                Facade::Panels { .. } => panels += 1,
            }
        }
        assert!(windows > 0 && panels > 0);
    }

    #[test]
    fn window_grid_tiles_exactly() {
        let grid = WindowGrid::solve(2.8, 4.3, 0.12, 0.17, 0.15, 0.11);
        assert!((grid.horizontal_extent() - 2.8).abs() < EPS);
        assert!((grid.vertical_extent() - 4.3).abs() < EPS);
        assert!(grid.spacing_x > 0.0 && grid.spacing_y > 0.0);
    }

    #[test]
    fn near_windows_are_closed_outlines() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let mut s = scene();

        let grid = generator
            .window_facade(&mut s, &mut rng, Vector::new(0.0, 0.0, 4.0), 2.0, 3.0)
            .unwrap();

        assert!(!grid.simplified);
        assert_eq!(s.len(), grid.window_count() as usize);
        for shape in s.shapes() {
            let v = shape.vertices();
            assert_eq!(v.len(), 5);
            assert_eq!(v[0], v[4]);
            assert!(!shape.is_filled());
            assert!(v.iter().all(|p| p.z < 4.0));
        }
    }

    #[test]
    fn distant_windows_collapse_to_lines() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let mut s = scene();

        let grid = generator
            .window_facade(&mut s, &mut rng, Vector::new(0.0, 0.0, 25.0), 2.0, 3.0)
            .unwrap();

        assert!(grid.simplified);
        assert!(s.shapes().iter().all(|shape| shape.vertices().len() == 2));
        let first = s.shapes()[0].vertices();
        assert_eq!(first[0].x, first[1].x);
        assert!((first[1].y - first[0].y - grid.window_height).abs() < EPS);
    }

    #[test]
    fn windows_stay_inside_facade() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let mut s = scene();
        let origin = Vector::new(-3.0, 0.0, 10.0);

        generator
            .window_facade(&mut s, &mut rng, origin, 3.0, 5.0)
            .unwrap();

        for v in s.shapes().iter().flat_map(|shape| shape.vertices()) {
            assert!(v.x >= origin.x + PADDING - EPS);
            assert!(v.x <= origin.x + 3.0 - PADDING + EPS);
            assert!(v.y >= 0.0 && v.y <= 5.0 + EPS);
        }
    }

    #[test]
    fn panel_dividers_span_facade() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let mut s = scene();

        let facade = generator
            .panel_facade(&mut s, &mut rng, Vector::new(0.0, 0.0, 0.0), 2.0, 3.0)
            .unwrap();

        let Facade::Panels { columns, rows } = facade else {
            panic!("expected panel facade");
        };
        assert_eq!(s.len(), (columns + rows - 1) as usize);
        for shape in s.shapes() {
            assert_eq!(shape.vertices().len(), 2);
            for v in shape.vertices() {
                assert!(v.x > 0.0 && v.x < 2.0);
            }
        }
    }

    #[test]
    fn top_panel_divider_sits_at_padded_roof() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let origin = Vector::new(1.0, 0.5, 4.0);

        for seed in 0..5 {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut s = scene();
            let facade = generator
                .panel_facade(&mut s, &mut rng, origin, 2.0, 3.0)
                .unwrap();
            let Facade::Panels { columns, rows } = facade else {
                panic!("expected panel facade");
            };

            let horizontal: Vec<_> = s
                .shapes()
                .iter()
                .filter(|shape| {
                    let v = shape.vertices();
                    (v[0].y - v[1].y).abs() < EPS
                })
                .collect();
            assert_eq!(horizontal.len(), rows as usize);
            assert_eq!(s.len() - horizontal.len(), (columns - 1) as usize);

            let top = horizontal
                .iter()
                .map(|shape| shape.vertices()[0].y)
                .fold(f64::MIN, f64::max);
            assert!((top - (origin.y + 3.0 - PADDING)).abs() < EPS, "top {top}");
        }
    }

    #[test]
    fn roof_highlight_is_inset() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);

        for seed in 0..50 {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut s = scene();
            let b = generator
                .building(&mut s, &mut rng, Vector::new(0.0, 0.0, 0.0), 2.0, 2.0)
                .unwrap();
            if !b.roof_highlight {
                continue;
            }
            let roof = &s.shapes()[5];
            for v in roof.vertices() {
                assert!((v.y - b.height).abs() < EPS);
                assert!(v.x > PADDING && v.x < 2.0 - PADDING);
                assert!(v.z > PADDING && v.z < 2.0 - PADDING);
            }
            return;
        }
        panic!("no roof highlight in 50 seeds");
    }

    #[test]
    fn same_seed_reproduces_building() {
        let palette = Palette::default();
        let generator = Generator::new(&palette);
        let build = || {
            let mut rng = Xoshiro256StarStar::seed_from_u64(99);
            let mut s = scene();
            let b = generator
                .building(&mut s, &mut rng, Vector::new(1.0, 0.0, 2.0), 3.0, 2.0)
                .unwrap();
            (b, s.shapes().to_vec())
        };
        assert_eq!(build(), build());
    }
}
