//! Cells a piece can fire at, with the projected volume of fire

use rustc_hash::FxHashMap;

use crate::board::HexCoord;
use crate::grid::{resolve, HexBoard};
use crate::los;
use crate::piece::{Piece, WeaponCategory};
use crate::tile::{Tile, TileSource};

/// Visible cells in range, mapped to `volume_of_fire` (`None` when the
/// piece reports the target out of range)
pub type Influence = FxHashMap<HexCoord, Option<i32>>;

impl<S: TileSource> HexBoard<S> {
    /// Sweep every cell a piece on `origin` sees within its maximum range
    pub fn range_of_influence<P>(
        &mut self,
        piece: &P,
        origin: HexCoord,
        category: WeaponCategory,
    ) -> Influence
    where
        P: Piece<S::Tile>,
    {
        let mut influence = Influence::default();
        if !self.layout.is_on_map(origin) {
            return influence;
        }

        let epoch = self.next_epoch();
        let (layout, tiles, stack) = (&self.layout, &self.tiles, &mut self.frontier);
        stack.clear();
        let from = resolve(layout, tiles, origin);
        let max_range = piece.max_range_of_fire(category, from);
        from.scratch().set_epoch(epoch);
        stack.push(origin);

        while let Some(src_coord) = stack.pop() {
            for dst_coord in layout.adjacents_of(src_coord) {
                if !layout.is_on_map(dst_coord) {
                    continue;
                }
                let dst = resolve(layout, tiles, dst_coord);
                if dst.scratch().is_current(epoch) {
                    continue;
                }
                dst.scratch().set_epoch(epoch);

                let distance = layout.hex_distance(origin, dst_coord);
                if distance > max_range {
                    continue;
                }
                if !los::trace(layout, tiles, origin, dst_coord).is_clear() {
                    continue;
                }
                let o = layout.distant_orientation(origin, dst_coord);
                debug_assert!(o.is_some(), "no orientation from {} to {}", origin, dst_coord);
                let o = o.unwrap_or_default();
                let volume = piece.volume_of_fire(
                    category,
                    distance,
                    from,
                    o,
                    dst,
                    layout.distant_opposite(o),
                );
                influence.insert(dst_coord, volume);
                stack.push(dst_coord);
            }
        }

        tracing::debug!(epoch, origin = %origin, max_range, visible = influence.len(), "range of influence");
        influence
    }
}
