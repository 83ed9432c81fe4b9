use papercity_common::Vector;
use papercity_procgen::{Building, Generator};
use papercity_scene::{Scene, SceneError};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::{Footprint, OccupancyGrid};

/// What to do when the attempt budget runs out before the target is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Fail the whole pass with [`LayoutError::Exhausted`].
    #[default]
    Fail,
    /// Keep the buildings placed so far.
    KeepPartial,
}

/// Placement parameters. Ranges are half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of buildings to place.
    pub target: usize,
    pub x_min: i32,
    pub x_max: i32,
    pub z_min: i32,
    pub z_max: i32,
    /// Footprint width and length are sampled from `min_size..max_size`.
    pub min_size: i32,
    pub max_size: i32,
    /// Upper bound on samples drawn, successful or not.
    pub max_attempts: usize,
    pub on_exhausted: ExhaustionPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            target: 200,
            x_min: -20,
            x_max: 20,
            z_min: 0,
            z_max: 30,
            min_size: 1,
            max_size: 4,
            max_attempts: 100_000,
            on_exhausted: ExhaustionPolicy::Fail,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.x_min >= self.x_max || self.z_min >= self.z_max {
            return Err(LayoutError::InvalidConfig(format!(
                "empty placement area x={}..{} z={}..{}",
                self.x_min, self.x_max, self.z_min, self.z_max
            )));
        }
        if self.min_size < 1 || self.min_size >= self.max_size {
            return Err(LayoutError::InvalidConfig(format!(
                "footprint sizes must be a non-empty range starting at 1 or more, got {}..{}",
                self.min_size, self.max_size
            )));
        }
        if self.target > 0 && self.max_attempts == 0 {
            return Err(LayoutError::InvalidConfig(
                "max_attempts must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Errors from a layout pass.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("placed {placed} of {target} buildings before exhausting {attempts} attempts")]
    Exhausted {
        placed: usize,
        target: usize,
        attempts: usize,
    },
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Counters for one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    pub placed: usize,
    pub attempts: usize,
    pub rejected: usize,
    pub occupied_cells: usize,
    /// True when the pass stopped on the attempt budget.
    pub exhausted: bool,
}

/// Result of a layout pass: the populated scene plus what was built where.
#[derive(Debug, Clone)]
pub struct City {
    pub scene: Scene,
    pub footprints: Vec<Footprint>,
    pub buildings: Vec<Building>,
    pub stats: LayoutStats,
}

/// Drives the building generator over random, non-overlapping plots.
#[derive(Debug, Clone, Copy)]
pub struct CityPlanner<'a> {
    config: &'a LayoutConfig,
    generator: Generator<'a>,
}

impl<'a> CityPlanner<'a> {
    pub fn new(config: &'a LayoutConfig, generator: Generator<'a>) -> Self {
        Self { config, generator }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    /// Run one layout pass on an empty grid.
    pub fn build<R: Rng + ?Sized>(&self, scene: Scene, rng: &mut R) -> Result<City, LayoutError> {
        self.build_on(scene, OccupancyGrid::new(), rng)
    }

    /// Run one layout pass on a grid that may already have claimed cells.
    ///
    /// The scene is only handed back on success, so a failed pass never
    /// exposes a partially generated city.
    pub fn build_on<R: Rng + ?Sized>(
        &self,
        mut scene: Scene,
        mut grid: OccupancyGrid,
        rng: &mut R,
    ) -> Result<City, LayoutError> {
        self.config.validate()?;
        let _span = tracing::info_span!("layout", target = self.config.target).entered();

        let cfg = self.config;
        let mut footprints = Vec::with_capacity(cfg.target);
        let mut buildings = Vec::with_capacity(cfg.target);
        let mut stats = LayoutStats::default();

        while stats.placed < cfg.target {
            if stats.attempts >= cfg.max_attempts {
                stats.exhausted = true;
                break;
            }
            stats.attempts += 1;

            let footprint = Footprint::new(
                rng.random_range(cfg.x_min..cfg.x_max),
                rng.random_range(cfg.z_min..cfg.z_max),
                rng.random_range(cfg.min_size..cfg.max_size),
                rng.random_range(cfg.min_size..cfg.max_size),
            );
            if !grid.try_claim(&footprint) {
                stats.rejected += 1;
                continue;
            }

            let building = self.generator.building(
                &mut scene,
                rng,
                Vector::new(footprint.x as f64, 0.0, footprint.z as f64),
                footprint.width as f64,
                footprint.length as f64,
            )?;
            footprints.push(footprint);
            buildings.push(building);
            stats.placed += 1;
        }
        stats.occupied_cells = grid.occupied_count();

        if stats.exhausted {
            match cfg.on_exhausted {
                ExhaustionPolicy::Fail => {
                    return Err(LayoutError::Exhausted {
                        placed: stats.placed,
                        target: cfg.target,
                        attempts: stats.attempts,
                    });
                }
                ExhaustionPolicy::KeepPartial => {
                    tracing::warn!(
                        placed = stats.placed,
                        target = cfg.target,
                        attempts = stats.attempts,
                        "layout attempt budget exhausted, keeping partial city"
                    );
                }
            }
        }

        tracing::debug!(
            placed = stats.placed,
            attempts = stats.attempts,
            rejected = stats.rejected,
            shapes = scene.len(),
            "layout complete"
        );

        Ok(City {
            scene,
            footprints,
            buildings,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellCoord;
    use papercity_common::Palette;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use std::collections::HashSet;

    fn scene() -> Scene {
        Scene::new(1280.0, 720.0).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = LayoutConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.target, 200);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let cfg = LayoutConfig {
            x_min: 5,
            x_max: 5,
            ..LayoutConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LayoutError::InvalidConfig(_))));

        let cfg = LayoutConfig {
            min_size: 0,
            ..LayoutConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn full_layout_places_target_without_overlap() {
        let palette = Palette::default();
        let cfg = LayoutConfig::default();
        let planner = CityPlanner::new(&cfg, Generator::new(&palette));
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);

        let city = planner.build(scene(), &mut rng).unwrap();

        assert_eq!(city.buildings.len(), 200);
        assert_eq!(city.footprints.len(), 200);
        assert_eq!(city.stats.placed, 200);
        assert!(!city.stats.exhausted);
        assert_eq!(city.stats.attempts, city.stats.placed + city.stats.rejected);

        let mut seen = HashSet::new();
        for fp in &city.footprints {
            assert!(fp.x >= -20 && fp.x < 20);
            assert!(fp.z >= 0 && fp.z < 30);
            assert!((1..4).contains(&fp.width) && (1..4).contains(&fp.length));
            for cell in fp.cells() {
                assert!(seen.insert(cell), "cell {cell:?} claimed twice");
            }
        }
        assert_eq!(seen.len(), city.stats.occupied_cells);

        let shapes: usize = city.buildings.iter().map(|b| b.shapes).sum();
        assert_eq!(shapes, city.scene.len());
    }

    #[test]
    fn same_seed_same_city() {
        let palette = Palette::default();
        let cfg = LayoutConfig {
            target: 30,
            ..LayoutConfig::default()
        };
        let planner = CityPlanner::new(&cfg, Generator::new(&palette));

        let a = planner
            .build(scene(), &mut Xoshiro256StarStar::seed_from_u64(5))
            .unwrap();
        let b = planner
            .build(scene(), &mut Xoshiro256StarStar::seed_from_u64(5))
            .unwrap();
        assert_eq!(a.footprints, b.footprints);
        assert_eq!(a.scene.shapes(), b.scene.shapes());
    }

    fn saturated_grid(cfg: &LayoutConfig, free: CellCoord) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new();
        // Cover every cell a footprint could reach.
        for x in cfg.x_min..cfg.x_max + cfg.max_size {
            for z in cfg.z_min..cfg.z_max + cfg.max_size {
                let cell = CellCoord::new(x, z);
                if cell != free {
                    grid.mark(cell);
                }
            }
        }
        grid
    }

    #[test]
    fn single_free_cell_terminates_with_partial_city() {
        let palette = Palette::default();
        let cfg = LayoutConfig {
            max_attempts: 20_000,
            on_exhausted: ExhaustionPolicy::KeepPartial,
            ..LayoutConfig::default()
        };
        let planner = CityPlanner::new(&cfg, Generator::new(&palette));
        let free = CellCoord::new(3, 7);
        let grid = saturated_grid(&cfg, free);
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);

        let city = planner.build_on(scene(), grid, &mut rng).unwrap();

        assert!(city.stats.exhausted);
        assert!(city.stats.placed <= 1);
        assert_eq!(city.stats.attempts, 20_000);
        if let Some(fp) = city.footprints.first() {
            assert_eq!(*fp, Footprint::new(3, 7, 1, 1));
        }
    }

    #[test]
    fn single_free_cell_fails_under_strict_policy() {
        let palette = Palette::default();
        let cfg = LayoutConfig {
            max_attempts: 20_000,
            ..LayoutConfig::default()
        };
        let planner = CityPlanner::new(&cfg, Generator::new(&palette));
        let grid = saturated_grid(&cfg, CellCoord::new(-4, 12));
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);

        match planner.build_on(scene(), grid, &mut rng) {
            Err(LayoutError::Exhausted {
                placed,
                target,
                attempts,
            }) => {
                assert!(placed <= 1);
                assert_eq!(target, 200);
                assert_eq!(attempts, 20_000);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn one_cell_area_places_exactly_once() {
        let palette = Palette::default();
        let cfg = LayoutConfig {
            target: 2,
            x_min: 0,
            x_max: 1,
            z_min: 0,
            z_max: 1,
            min_size: 1,
            max_size: 2,
            max_attempts: 50,
            on_exhausted: ExhaustionPolicy::KeepPartial,
        };
        let planner = CityPlanner::new(&cfg, Generator::new(&palette));
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);

        let city = planner.build(scene(), &mut rng).unwrap();
        assert_eq!(city.stats.placed, 1);
        assert_eq!(city.stats.rejected, 49);
        assert_eq!(city.footprints, vec![Footprint::new(0, 0, 1, 1)]);
    }

    #[test]
    fn zero_target_is_empty_city() {
        let palette = Palette::default();
        let cfg = LayoutConfig {
            target: 0,
            ..LayoutConfig::default()
        };
        let planner = CityPlanner::new(&cfg, Generator::new(&palette));
        let city = planner
            .build(scene(), &mut Xoshiro256StarStar::seed_from_u64(0))
            .unwrap();
        assert!(city.scene.is_empty());
        assert_eq!(city.stats.attempts, 0);
    }
}
