//! Reachable cells within a piece's movement allowance

use crate::board::HexCoord;
use crate::grid::{resolve, HexBoard};
use crate::piece::Piece;
use crate::tile::{Tile, TileSource};

impl<S: TileSource> HexBoard<S> {
    /// Cells a piece standing on `origin` can move to this turn
    ///
    /// Results are in discovery order and never contain the origin. After
    /// the call each reached cell's scratch holds the best remaining
    /// budget and the parent it was reached from.
    pub fn possible_moves<P>(&mut self, piece: &P, origin: HexCoord) -> Vec<HexCoord>
    where
        P: Piece<S::Tile>,
    {
        let mut moves = Vec::new();
        let mp = piece.movement_points();
        if mp <= 0 || !self.layout.is_on_map(origin) {
            return moves;
        }

        let bonus = piece.road_march_bonus();
        let epoch = self.next_epoch();
        let (layout, tiles, stack) = (&self.layout, &self.tiles, &mut self.frontier);
        stack.clear();

        let from = resolve(layout, tiles, origin);
        let s = from.scratch();
        s.set_epoch(epoch);
        s.set_budget(mp);
        s.set_parent(None);
        s.set_road_march(bonus > 0);
        stack.push(origin);

        while let Some(src_coord) = stack.pop() {
            let src = resolve(layout, tiles, src_coord);
            let ss = src.scratch();
            let src_bonus = if ss.road_march() { bonus } else { 0 };
            if ss.budget() + src_bonus <= 0 {
                continue;
            }

            for (dst_coord, o) in layout.neighbours(src_coord) {
                if !layout.is_on_map(dst_coord) {
                    continue;
                }
                let dst = resolve(layout, tiles, dst_coord);
                let Some(cost) = piece.move_cost(src, dst, o) else {
                    continue;
                };
                let r = ss.budget() - cost;
                let rm = ss.road_march() && src.has_road(o);
                let rm_bonus = if rm { bonus } else { 0 };
                // not enough points even on the road; the first step may still be allowed
                if r + rm_bonus < 0 && !(src_coord == origin && piece.at_least_one_tile(dst)) {
                    continue;
                }

                let ds = dst.scratch();
                if !ds.is_current(epoch) {
                    ds.set_epoch(epoch);
                    ds.set_budget(r);
                    ds.set_parent(Some(src_coord));
                    ds.set_road_march(rm);
                    stack.push(dst_coord);
                    moves.push(dst_coord);
                } else {
                    let dst_bonus = if ds.road_march() { bonus } else { 0 };
                    if r > ds.budget() || (rm && r + bonus > ds.budget() + dst_bonus) {
                        ds.set_budget(r);
                        ds.set_parent(Some(src_coord));
                        ds.set_road_march(rm);
                        stack.push(dst_coord);
                    }
                }
            }
        }

        tracing::debug!(epoch, origin = %origin, reached = moves.len(), "possible moves");
        moves
    }
}
