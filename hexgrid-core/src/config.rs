//! Board configuration

use serde::{Deserialize, Serialize};

use crate::board::{GridMode, Point};

/// Shape and placement of a board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of columns
    pub cols: i32,
    /// Number of rows
    pub rows: i32,
    /// Hex side length in plane units
    pub side: f32,
    /// Plane position of the board's top-left corner
    pub origin: Point,
    /// Which hex edges are vertical
    pub mode: GridMode,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cols: 10,
            rows: 7,
            side: 100.0,
            origin: Point::new(0.0, 0.0),
            mode: GridMode::VerticalEdge,
        }
    }
}

impl BoardConfig {
    /// Board with the given dimensions and default geometry
    pub fn new(cols: i32, rows: i32) -> Self {
        Self {
            cols,
            rows,
            ..Default::default()
        }
    }

    /// Set hex side length
    pub fn with_side(mut self, side: f32) -> Self {
        self.side = side;
        self
    }

    /// Set plane origin
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Set grid mode
    pub fn with_mode(mut self, mode: GridMode) -> Self {
        self.mode = mode;
        self
    }
}
