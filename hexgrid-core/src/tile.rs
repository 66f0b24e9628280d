//! Tile capability, per-cell search scratch, and tile storage

use std::cell::{Cell, OnceCell};

use crate::board::{HexCoord, Layout, TileKey};
use crate::orientation::Orientation;

/// Terrain queries the board calls back into
///
/// Implementors own a [`SearchScratch`] which the searches mutate through
/// a shared reference.
pub trait Tile {
    /// Scratch state written by the searches
    fn scratch(&self) -> &SearchScratch;

    /// Is there a road leaving this tile in the given direction
    fn has_road(&self, orientation: Orientation) -> bool;

    /// Does this tile block the sight line from `from` to `to`
    ///
    /// `distance` is the distance between `from` and `to`, `distance_to_this`
    /// the distance between `from` and this tile.
    fn is_line_of_sight_blocked(
        &self,
        from: &Self,
        to: &Self,
        distance: f32,
        distance_to_this: f32,
    ) -> bool;
}

/// Per-cell search state
///
/// Everything except `blocked` is only meaningful while `epoch` equals the
/// board's current epoch; stale values are never cleared.
#[derive(Clone, Debug, Default)]
pub struct SearchScratch {
    epoch: Cell<u64>,
    budget: Cell<i32>,
    estimate: Cell<f32>,
    parent: Cell<Option<HexCoord>>,
    road_march: Cell<bool>,
    blocked: Cell<bool>,
}

impl SearchScratch {
    /// Epoch of the last search that touched this cell
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// True if the last search to touch this cell was `epoch`
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch
    }

    /// Remaining movement points (movement search) or cost so far (path search)
    pub fn budget(&self) -> i32 {
        self.budget.get()
    }

    /// Estimated total cost through this cell (path search)
    pub fn estimate(&self) -> f32 {
        self.estimate.get()
    }

    /// Predecessor in the current search tree
    pub fn parent(&self) -> Option<HexCoord> {
        self.parent.get()
    }

    /// Still eligible for the road march bonus
    pub fn road_march(&self) -> bool {
        self.road_march.get()
    }

    /// Sight blocked on the last traced line
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    pub(crate) fn set_epoch(&self, epoch: u64) {
        self.epoch.set(epoch);
    }

    pub(crate) fn set_budget(&self, budget: i32) {
        self.budget.set(budget);
    }

    pub(crate) fn set_estimate(&self, estimate: f32) {
        self.estimate.set(estimate);
    }

    pub(crate) fn set_parent(&self, parent: Option<HexCoord>) {
        self.parent.set(parent);
    }

    pub(crate) fn set_road_march(&self, road_march: bool) {
        self.road_march.set(road_march);
    }

    pub(crate) fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }
}

/// Where the board gets its tiles from
///
/// Must be referentially stable: the same key always yields the same
/// instance, since search state lives on it. Off-map coordinates (`None`
/// key) all resolve to one shared off-map tile.
pub trait TileSource {
    type Tile: Tile;

    fn resolve(&self, coord: HexCoord, key: Option<TileKey>) -> &Self::Tile;
}

// ============================================================================
// TILE CACHE
// ============================================================================

/// Tile source that builds each tile on first request
pub struct TileCache<T, F> {
    slots: Vec<OnceCell<T>>,
    off_map: T,
    factory: F,
}

impl<T, F> TileCache<T, F>
where
    F: Fn(HexCoord, TileKey) -> T,
{
    pub fn new(layout: &Layout, off_map: T, factory: F) -> Self {
        let slots = (0..layout.size()).map(|_| OnceCell::new()).collect();
        Self {
            slots,
            off_map,
            factory,
        }
    }

    /// Tile for a key, if it was already built
    pub fn get(&self, key: TileKey) -> Option<&T> {
        self.slots.get(key.index()).and_then(OnceCell::get)
    }

    /// Mutable tile for an on-map coordinate, built if needed
    pub fn tile_mut(&mut self, coord: HexCoord, key: TileKey) -> &mut T {
        let factory = &self.factory;
        let slot = &mut self.slots[key.index()];
        slot.get_or_init(|| factory(coord, key));
        match slot.get_mut() {
            Some(tile) => tile,
            None => unreachable!("slot initialised above"),
        }
    }

    /// The shared off-map tile
    pub fn off_map(&self) -> &T {
        &self.off_map
    }

    /// Number of tiles built so far
    pub fn built(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }
}

impl<T, F> TileSource for TileCache<T, F>
where
    T: Tile,
    F: Fn(HexCoord, TileKey) -> T,
{
    type Tile = T;

    fn resolve(&self, coord: HexCoord, key: Option<TileKey>) -> &T {
        match key.and_then(|k| self.slots.get(k.index()).map(|slot| (k, slot))) {
            Some((k, slot)) => slot.get_or_init(|| (self.factory)(coord, k)),
            None => &self.off_map,
        }
    }
}
