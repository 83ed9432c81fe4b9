//! City layout: places non-overlapping buildings on an integer occupancy grid.
//!
//! # Invariants
//! - No two footprints share a grid cell.
//! - A rejected sample claims nothing.
//! - Placement retries are bounded; exhausting them has an explicit outcome.

mod grid;
mod planner;

pub use grid::{CellCoord, Footprint, OccupancyGrid};
pub use planner::{City, CityPlanner, ExhaustionPolicy, LayoutConfig, LayoutError, LayoutStats};
