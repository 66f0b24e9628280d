//! Hex board geometry with staggered offset coordinates
//!
//! Cells are addressed by `(col, row)` in a "double-height" offset scheme:
//! the six neighbours of any cell are the same six deltas regardless of
//! parity, which keeps adjacency and distance arithmetic branch-free.
//!
//! Membership and keys are computed in a *canonical frame* where the
//! staggered axis is always `y`: `(col, row)` for vertical-edge boards,
//! `(row, col)` for horizontal-edge boards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::error::{HexError, Result};
use crate::orientation::{Orientation, HORIZONTAL_EDGE_ANGLES, VERTICAL_EDGE_ANGLES};

/// Width of a hex relative to its side (sqrt(3), as used by every table in this crate)
pub const SQRT_3: f32 = 1.73205;

/// Vertical projection factor used by the euclidean distance metric
const ROW_FACTOR: f32 = 0.86602;

/// Neighbour deltas, clockwise from the mode's first active direction
pub const ADJACENT_DELTAS: [(i32, i32); 6] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
];

/// Orientation of each `ADJACENT_DELTAS` slot on a vertical-edge board
const VERTICAL_EDGE_DIRECTIONS: [Orientation; 6] = [
    Orientation::E,
    Orientation::SE,
    Orientation::SW,
    Orientation::W,
    Orientation::NW,
    Orientation::NE,
];

/// Orientation of each `ADJACENT_DELTAS` slot on a horizontal-edge board
const HORIZONTAL_EDGE_DIRECTIONS: [Orientation; 6] = [
    Orientation::NE,
    Orientation::SE,
    Orientation::S,
    Orientation::SW,
    Orientation::NW,
    Orientation::N,
];

// ============================================================================
// COORDINATES
// ============================================================================

/// Offset grid coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub col: i32,
    pub row: i32,
}

impl HexCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Coordinate shifted by a delta
    pub const fn offset(self, dc: i32, dr: i32) -> Self {
        Self::new(self.col + dc, self.row + dr)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{};{}]", self.col, self.row)
    }
}

/// Position in plane space (y grows downward)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn swapped(self) -> Self {
        Self::new(self.y, self.x)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1};{:.1})", self.x, self.y)
    }
}

/// Which hex edges are vertical
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    /// Pointy-top hexes, rows are staggered
    VerticalEdge,
    /// Flat-top hexes, columns are staggered
    HorizontalEdge,
}

/// Distance metric between two cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Plane-like straight line distance, in cells
    Euclidean,
    /// Number of steps on the grid
    Hex,
}

/// Dense index of an on-map cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKey(pub usize);

impl TileKey {
    pub fn index(self) -> usize {
        self.0
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Immutable geometry of a board: sizes, extents, and the direction tables
#[derive(Clone, Debug)]
pub struct Layout {
    mode: GridMode,
    /// Origin in the canonical frame
    origin: Point,
    /// Extents along the canonical x and y axes
    extent_x: i32,
    extent_y: i32,
    /// Hexes in two consecutive canonical rows
    pair_len: i32,
    side: f32,
    width: f32,
    half_width: f32,
    half_height: f32,
    row_pitch: f32,
    slope: f32,
    inv_slope: f32,
    angles: &'static [(Orientation, i32); 6],
    directions: &'static [Orientation; 6],
}

impl Layout {
    pub fn new(config: &BoardConfig) -> Result<Self> {
        if config.cols <= 0 || config.rows <= 0 {
            return Err(HexError::InvalidDimensions {
                cols: config.cols,
                rows: config.rows,
            });
        }
        if !config.side.is_finite() || config.side <= 0.0 {
            return Err(HexError::InvalidSide(config.side));
        }

        let side = config.side;
        let width = side * SQRT_3;
        let half_width = width / 2.0;
        let half_height = side / 2.0;

        let (origin, extent_x, extent_y, angles, directions) = match config.mode {
            GridMode::VerticalEdge => (
                config.origin,
                config.cols,
                config.rows,
                &VERTICAL_EDGE_ANGLES,
                &VERTICAL_EDGE_DIRECTIONS,
            ),
            GridMode::HorizontalEdge => (
                config.origin.swapped(),
                config.rows,
                config.cols,
                &HORIZONTAL_EDGE_ANGLES,
                &HORIZONTAL_EDGE_DIRECTIONS,
            ),
        };

        Ok(Self {
            mode: config.mode,
            origin,
            extent_x,
            extent_y,
            pair_len: 2 * extent_x - 1,
            side,
            width,
            half_width,
            half_height,
            row_pitch: side + half_height,
            slope: half_height / half_width,
            inv_slope: half_width / half_height,
            angles,
            directions,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn is_vertical_edge(&self) -> bool {
        self.mode == GridMode::VerticalEdge
    }

    /// Hex side length
    pub fn side(&self) -> f32 {
        self.side
    }

    /// Distance between two parallel sides
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Distance between the centres of two consecutive staggered lines
    pub fn row_pitch(&self) -> f32 {
        self.row_pitch
    }

    /// `half_height / half_width`
    pub fn slope(&self) -> f32 {
        self.slope
    }

    /// `half_width / half_height`
    pub fn inv_slope(&self) -> f32 {
        self.inv_slope
    }

    /// Active directions of this mode with their angle in degrees
    pub fn angles(&self) -> &'static [(Orientation, i32); 6] {
        self.angles
    }

    /// Orientation of each slot returned by [`Layout::adjacents_of`]
    pub fn directions(&self) -> &'static [Orientation; 6] {
        self.directions
    }

    // ========================================================================
    // CANONICAL FRAME
    // ========================================================================

    fn to_canonical(&self, coord: HexCoord) -> (i32, i32) {
        match self.mode {
            GridMode::VerticalEdge => (coord.col, coord.row),
            GridMode::HorizontalEdge => (coord.row, coord.col),
        }
    }

    fn from_canonical(&self, x: i32, y: i32) -> HexCoord {
        match self.mode {
            GridMode::VerticalEdge => HexCoord::new(x, y),
            GridMode::HorizontalEdge => HexCoord::new(y, x),
        }
    }

    fn point_frame(&self, p: Point) -> Point {
        match self.mode {
            GridMode::VerticalEdge => p,
            GridMode::HorizontalEdge => p.swapped(),
        }
    }

    // ========================================================================
    // BOUNDS & KEYS
    // ========================================================================

    /// Check if a coordinate is on the map
    pub fn is_on_map(&self, coord: HexCoord) -> bool {
        let (x, y) = self.to_canonical(coord);
        if y < 0 || y >= self.extent_y {
            return false;
        }
        x >= (y + 1) / 2 && x < self.extent_x + y / 2
    }

    /// Dense key of an on-map coordinate
    pub fn key(&self, coord: HexCoord) -> Option<TileKey> {
        if !self.is_on_map(coord) {
            return None;
        }
        let (x, y) = self.to_canonical(coord);
        let n = y / 2;
        let mut i = x - n + n * self.pair_len;
        if y % 2 != 0 {
            i += self.extent_x - 1;
        }
        Some(TileKey(i as usize))
    }

    /// Number of on-map cells
    pub fn size(&self) -> usize {
        ((self.extent_y / 2) * self.pair_len + (self.extent_y % 2) * self.extent_x) as usize
    }

    /// All on-map coordinates in key order
    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        (0..self.extent_y).flat_map(move |y| {
            let first = (y + 1) / 2;
            let last = self.extent_x + y / 2;
            (first..last).map(move |x| self.from_canonical(x, y))
        })
    }

    /// The six neighbours of a coordinate, not filtered by membership
    pub fn adjacents_of(&self, coord: HexCoord) -> [HexCoord; 6] {
        ADJACENT_DELTAS.map(|(dc, dr)| coord.offset(dc, dr))
    }

    /// Neighbours paired with the direction leading to them
    pub fn neighbours(&self, coord: HexCoord) -> impl Iterator<Item = (HexCoord, Orientation)> {
        self.adjacents_of(coord)
            .into_iter()
            .zip(self.directions.iter().copied())
    }

    // ========================================================================
    // PLANE GEOMETRY
    // ========================================================================

    /// Plane position of a cell's centre
    pub fn center_of(&self, coord: HexCoord) -> Point {
        let (x, y) = self.to_canonical(coord);
        let (x, y) = (x as f32, y as f32);
        let canonical = Point::new(
            self.origin.x + self.half_width + x * self.width - y * self.half_width,
            self.origin.y + self.half_height + y * self.row_pitch,
        );
        self.point_frame(canonical)
    }

    /// Cell containing a plane position
    pub fn to_grid_coord(&self, p: Point) -> HexCoord {
        let p = self.point_frame(p);

        // float casts saturate and NaN casts to 0
        let mut dy = p.y - self.origin.y;
        let mut row = (dy / self.row_pitch) as i32;
        if dy < 0.0 {
            row = row.saturating_sub(1);
        }

        let mut dx = p.x - self.origin.x + row as f32 * self.half_width;
        let mut col = (dx / self.width) as i32;
        if dx < 0.0 {
            col = col.saturating_sub(1);
        }

        // Above the hex body lie the two slanted ears of the next line
        let body_top = row as f32 * self.row_pitch + self.side;
        if dy > body_top {
            dy -= body_top;
            dx -= col as f32 * self.width;
            if dx < self.half_width {
                if dy > dx * self.slope {
                    row = row.saturating_add(1);
                }
            } else if dy > (self.width - dx) * self.slope {
                row = row.saturating_add(1);
                col = col.saturating_add(1);
            }
        }

        self.from_canonical(col, row)
    }

    /// Distance between two cells
    pub fn distance(&self, a: HexCoord, b: HexCoord, metric: Metric) -> f32 {
        let dx = b.col - a.col;
        let dy = b.row - a.row;
        match metric {
            Metric::Euclidean => {
                if dx == 0 {
                    dy.abs() as f32
                } else if dy == 0 || dx == dy {
                    dx.abs() as f32
                } else {
                    let fdx = (dx - dy / 2) as f32;
                    let fdy = dy as f32 * ROW_FACTOR;
                    (fdx * fdx + fdy * fdy).sqrt()
                }
            }
            Metric::Hex => self.hex_distance(a, b) as f32,
        }
    }

    /// Number of grid steps between two cells
    pub fn hex_distance(&self, a: HexCoord, b: HexCoord) -> i32 {
        let dx = b.col - a.col;
        let dy = b.row - a.row;
        dx.abs().max(dy.abs()).max((dx - dy).abs())
    }
}
