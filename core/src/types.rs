use serde::{Deserialize, Serialize};

/// Single coordinate axis of the world grid.
pub type Coord = i64;

/// Grid cell identifier `(row, col)`. Cells exist implicitly for every
/// integer pair; only their recorded state is ever created.
pub type Cell = (Coord, Coord);

/// Width and height of one grid cell, in degrees of latitude/longitude.
pub const CELL_SIZE_DEG: f64 = 1e-4;

/// Cell a fresh world starts the player in.
pub const START_CELL: Cell = (0, 0);

/// One position reading from an external continuous position source.
/// Informational outside of [`crate::GameWorld::apply_sample`]; never
/// authoritative for game logic.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    pub lat: f64,
    pub lng: f64,
    pub accuracy: f64,
}

impl GeoSample {
    pub fn cell(&self) -> Cell {
        to_cell(self.lat, self.lng)
    }
}

/// Rectangular window in continuous coordinates, used to scope rendering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoRect {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

/// Maps a continuous position to the cell containing it. Total: every finite
/// position lands in exactly one cell.
pub fn to_cell(lat: f64, lng: f64) -> Cell {
    (
        (lat / CELL_SIZE_DEG).floor() as Coord,
        (lng / CELL_SIZE_DEG).floor() as Coord,
    )
}

/// Half-open bounds of a cell. The corner values sit on cell boundaries, so
/// feeding them back through [`to_cell`] can land one cell to either side
/// after rounding; use [`cell_center`] when the round trip must be exact.
pub fn cell_bounds((row, col): Cell) -> GeoRect {
    GeoRect {
        min_lat: row as f64 * CELL_SIZE_DEG,
        min_lng: col as f64 * CELL_SIZE_DEG,
        max_lat: (row + 1) as f64 * CELL_SIZE_DEG,
        max_lng: (col + 1) as f64 * CELL_SIZE_DEG,
    }
}

/// Center position of a cell. Centers are far from any boundary, so
/// `to_cell(cell_center(c)) == c` holds for every cell in the coordinate
/// range, which boundary corners cannot guarantee.
pub fn cell_center((row, col): Cell) -> (f64, f64) {
    (
        (row as f64 + 0.5) * CELL_SIZE_DEG,
        (col as f64 + 0.5) * CELL_SIZE_DEG,
    )
}

/// Max of the per-axis absolute differences. The interaction and visibility
/// regions are squares under this metric, matching the rendered grid, with no
/// boundary ambiguity at diagonals.
pub fn chebyshev(a: Cell, b: Cell) -> u64 {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1))
}
