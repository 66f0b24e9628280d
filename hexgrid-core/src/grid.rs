//! The board: layout, tile source, and shared search state
//!
//! A board supports one search at a time. Every search entry point takes
//! `&mut self`, bumps the epoch, and reuses the same frontier buffer;
//! capability callbacks only ever see shared tile references and cannot
//! start a nested search on the same board.

use crate::board::{HexCoord, Layout, TileKey};
use crate::config::BoardConfig;
use crate::error::Result;
use crate::tile::{Tile, TileCache, TileSource};

/// Hex board running searches over externally owned tiles
pub struct HexBoard<S> {
    pub(crate) layout: Layout,
    pub(crate) tiles: S,
    epoch: u64,
    pub(crate) frontier: Vec<HexCoord>,
}

impl<S: TileSource> HexBoard<S> {
    pub fn new(layout: Layout, tiles: S) -> Self {
        Self {
            layout,
            tiles,
            epoch: 0,
            frontier: Vec::new(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn tiles(&self) -> &S {
        &self.tiles
    }

    /// Mutable access to the tiles, e.g. to edit terrain between searches
    pub fn tiles_mut(&mut self) -> &mut S {
        &mut self.tiles
    }

    /// Epoch of the most recent search
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Tile at a coordinate (the off-map tile if not on the map)
    pub fn tile(&self, coord: HexCoord) -> &S::Tile {
        self.tiles.resolve(coord, self.layout.key(coord))
    }

    pub(crate) fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}

impl<T, F> HexBoard<TileCache<T, F>>
where
    T: Tile,
    F: Fn(HexCoord, TileKey) -> T,
{
    /// Board whose tiles are built lazily by `factory`
    pub fn with_factory(config: &BoardConfig, off_map: T, factory: F) -> Result<Self> {
        let layout = Layout::new(config)?;
        let tiles = TileCache::new(&layout, off_map, factory);
        Ok(Self::new(layout, tiles))
    }
}

/// Resolve a coordinate through a layout and a tile source
pub(crate) fn resolve<'a, S: TileSource>(
    layout: &Layout,
    tiles: &'a S,
    coord: HexCoord,
) -> &'a S::Tile {
    tiles.resolve(coord, layout.key(coord))
}
