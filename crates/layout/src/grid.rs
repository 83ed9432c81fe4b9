use serde::Serialize;
use std::collections::HashSet;

/// An integer lattice cell on the ground plane (ignoring the Y axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Axis-aligned rectangle of cells: `x..x + width` by `z..z + length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Footprint {
    pub x: i32,
    pub z: i32,
    pub width: i32,
    pub length: i32,
}

impl Footprint {
    pub fn new(x: i32, z: i32, width: i32, length: i32) -> Self {
        Self { x, z, width, length }
    }

    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (self.x..self.x + self.width).flat_map(move |x| {
            (self.z..self.z + self.length).map(move |z| CellCoord::new(x, z))
        })
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) * self.length.max(0)) as usize
    }
}

/// Set of cells already claimed by a footprint during one layout pass.
#[derive(Debug, Clone, Default)]
pub struct OccupancyGrid {
    cells: HashSet<CellCoord>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a single cell regardless of footprints. Returns `false` if it
    /// was already claimed.
    pub fn mark(&mut self, cell: CellCoord) -> bool {
        self.cells.insert(cell)
    }

    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// True if none of the footprint's cells are claimed.
    pub fn is_free(&self, footprint: &Footprint) -> bool {
        footprint.cells().all(|c| !self.cells.contains(&c))
    }

    /// Claim every cell of the footprint if all are free. Nothing is claimed
    /// when any cell is taken.
    pub fn try_claim(&mut self, footprint: &Footprint) -> bool {
        if !self.is_free(footprint) {
            return false;
        }
        self.cells.extend(footprint.cells());
        true
    }

    /// Number of claimed cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }
}
