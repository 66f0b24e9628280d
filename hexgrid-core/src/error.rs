//! Error types

use crate::board::HexCoord;

/// Errors raised while building or configuring a board
#[derive(Debug, thiserror::Error)]
pub enum HexError {
    #[error("Board needs at least one column and one row, got {cols}x{rows}")]
    InvalidDimensions { cols: i32, rows: i32 },

    #[error("Hex side length must be finite and positive, got {0}")]
    InvalidSide(f32),

    #[error("Coordinate {0} is not on the map")]
    OffMap(HexCoord),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

pub type Result<T> = std::result::Result<T, HexError>;
