//! Piece capability: what a mover or shooter can do on a given terrain

use crate::orientation::Orientation;
use crate::tile::Tile;

/// Weapon category identifier, interpreted by the piece
pub type WeaponCategory = u32;

/// Movement and fire rules of a unit
pub trait Piece<T: Tile> {
    /// Movement points available at the start of a move
    fn movement_points(&self) -> i32;

    /// Extra points granted while following a road from the start of the move
    fn road_march_bonus(&self) -> i32;

    /// Cost of stepping from `src` to the adjacent `dst`; `None` if impracticable
    fn move_cost(&self, src: &T, dst: &T, orientation: Orientation) -> Option<i32>;

    /// May the unit enter `dst` as its only move without enough points
    fn at_least_one_tile(&self, dst: &T) -> bool;

    /// Maximum range of fire with a weapon category, from a tile
    fn max_range_of_fire(&self, category: WeaponCategory, from: &T) -> i32;

    /// Projected volume of fire at `distance`; `None` if out of range
    fn volume_of_fire(
        &self,
        category: WeaponCategory,
        distance: i32,
        src: &T,
        src_orientation: Orientation,
        dst: &T,
        dst_orientation: Orientation,
    ) -> Option<i32>;
}
