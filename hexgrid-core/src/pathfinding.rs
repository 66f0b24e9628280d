//! A* shortest path honouring move costs and road march

use crate::board::{HexCoord, Metric};
use crate::grid::{resolve, HexBoard};
use crate::piece::Piece;
use crate::tile::{Tile, TileSource};

/// Estimates closer than this are equal when deciding whether a road route
/// should replace an off-road one
pub const ROAD_MARCH_TIE_TOLERANCE: f32 = 0.001;

impl<S: TileSource> HexBoard<S> {
    /// Cheapest route from `origin` to `destination`, both included
    ///
    /// Empty when the destination is unreachable, equals the origin, or
    /// either end is off the map.
    pub fn shortest_path<P>(&mut self, piece: &P, origin: HexCoord, destination: HexCoord) -> Vec<HexCoord>
    where
        P: Piece<S::Tile>,
    {
        if origin == destination
            || !self.layout.is_on_map(origin)
            || !self.layout.is_on_map(destination)
        {
            return Vec::new();
        }

        let bonus = piece.road_march_bonus();
        let epoch = self.next_epoch();
        let (layout, tiles, open) = (&self.layout, &self.tiles, &mut self.frontier);
        open.clear();

        let from = resolve(layout, tiles, origin);
        let s = from.scratch();
        s.set_epoch(epoch);
        s.set_budget(0);
        s.set_estimate(layout.distance(origin, destination, Metric::Euclidean));
        s.set_parent(None);
        s.set_road_march(bonus > 0);
        open.push(origin);

        // lowest estimate at the tail
        while let Some(src_coord) = open.pop() {
            if src_coord == destination {
                break;
            }
            let src = resolve(layout, tiles, src_coord);
            let ss = src.scratch();

            for (dst_coord, o) in layout.neighbours(src_coord) {
                if !layout.is_on_map(dst_coord) {
                    continue;
                }
                let dst = resolve(layout, tiles, dst_coord);
                let Some(cost) = piece.move_cost(src, dst, o) else {
                    continue;
                };
                let cost = cost + ss.budget();
                let mut total = cost as f32 + layout.distance(dst_coord, destination, Metric::Euclidean);
                let rm = ss.road_march() && src.has_road(o);
                if rm {
                    total -= bonus as f32;
                }

                let ds = dst.scratch();
                if !ds.is_current(epoch) {
                    ds.set_epoch(epoch);
                } else if ds.estimate() > total
                    || (rm && !ds.road_march() && (ds.estimate() - total).abs() < ROAD_MARCH_TIE_TOLERANCE)
                {
                    if let Some(i) = open.iter().position(|&c| c == dst_coord) {
                        open.remove(i);
                    }
                } else {
                    continue;
                }

                ds.set_budget(cost);
                ds.set_estimate(total);
                ds.set_road_march(rm);
                ds.set_parent(Some(src_coord));
                let at = open
                    .iter()
                    .position(|&c| resolve(layout, tiles, c).scratch().estimate() <= total);
                match at {
                    Some(i) => open.insert(i, dst_coord),
                    None => open.push(dst_coord),
                }
            }
        }
        open.clear();

        let path = rebuild_path(self, origin, destination, epoch);
        tracing::debug!(epoch, origin = %origin, destination = %destination, steps = path.len(), "shortest path");
        path
    }
}

/// Follow parent links back from the destination
fn rebuild_path<S: TileSource>(
    board: &HexBoard<S>,
    origin: HexCoord,
    destination: HexCoord,
    epoch: u64,
) -> Vec<HexCoord> {
    if !board.tile(destination).scratch().is_current(epoch) {
        return Vec::new();
    }

    let mut path = vec![destination];
    let mut current = destination;
    while current != origin {
        if path.len() > board.layout.size() {
            tracing::warn!(origin = %origin, destination = %destination, "parent chain does not reach the origin");
            return Vec::new();
        }
        match board.tile(current).scratch().parent() {
            Some(parent) => {
                path.push(parent);
                current = parent;
            }
            None => {
                tracing::warn!(at = %current, "parent chain broken");
                return Vec::new();
            }
        }
    }
    path.reverse();
    path
}
