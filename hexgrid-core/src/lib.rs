//! HexGrid Core - Hex board geometry and searches for wargames
//!
//! This crate provides the board-side logic of a hex wargame:
//! - Board geometry (staggered offset coordinates, both hex orientations)
//! - Orientation flags and the angle algebra between cells
//! - Line of sight with exact contact points
//! - Movement, shortest path and range of influence searches
//!
//! Terrain and units stay with the caller through the [`Tile`] and
//! [`Piece`] traits.

pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod influence;
pub mod los;
pub mod movement;
pub mod orientation;
pub mod pathfinding;
pub mod piece;
pub mod tile;

#[cfg(test)]
mod test_support;

// Re-exports for convenient access
pub use board::{GridMode, HexCoord, Layout, Metric, Point, TileKey};
pub use config::BoardConfig;
pub use error::{HexError, Result};
pub use grid::HexBoard;
pub use influence::Influence;
pub use los::{LineOfSight, SightCell};
pub use orientation::Orientation;
pub use pathfinding::ROAD_MARCH_TIE_TOLERANCE;
pub use piece::{Piece, WeaponCategory};
pub use tile::{SearchScratch, Tile, TileCache, TileSource};
