//! Line of sight on a hex grid
//!
//! Cells crossed by a sight line are rasterized with a Bresenham variant
//! working on an oblique axis, in units of half hex widths, so that every
//! step is a legal hex adjacency. Lines running exactly along a diagonal
//! (between two neighbours) are traced ring by ring instead, looking at
//! both cells the line grazes.
//!
//! See <http://zvold.blogspot.com/2010/02/line-of-sight-on-hexagonal-grid.html>.

use serde::Serialize;

use crate::board::{GridMode, HexCoord, Layout, Metric, Point};
use crate::grid::{resolve, HexBoard};
use crate::orientation::Orientation;
use crate::tile::{Tile, TileSource};

/// Slope used for vertical sight lines
const VERTICAL_SLOPE: f32 = i32::MAX as f32;

/// A cell crossed by a sight line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SightCell {
    pub coord: HexCoord,
    pub blocked: bool,
}

/// Result of a line of sight trace
#[derive(Clone, Debug, Default, Serialize)]
pub struct LineOfSight {
    /// Crossed cells, from the observer to the target
    pub cells: Vec<SightCell>,
    /// Point after which sight is blocked, `None` if the target is visible
    pub contact: Option<Point>,
}

impl LineOfSight {
    pub fn is_clear(&self) -> bool {
        self.contact.is_none()
    }

    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.cells.iter().map(|c| c.coord)
    }
}

impl<S: TileSource> HexBoard<S> {
    /// Trace the sight line between two cells
    ///
    /// Does not touch the search epoch, so it is safe to call between or
    /// from within searches.
    pub fn line_of_sight(&self, p0: HexCoord, p1: HexCoord) -> LineOfSight {
        trace(&self.layout, &self.tiles, p0, p1)
    }
}

// ============================================================================
// TRACERS
// ============================================================================

/// Shared state of a trace in progress
struct Tracer<'a, S: TileSource> {
    layout: &'a Layout,
    tiles: &'a S,
    p0: HexCoord,
    from: &'a S::Tile,
    to: &'a S::Tile,
    from_center: Point,
    to_center: Point,
    distance: f32,
    cells: Vec<SightCell>,
    contact: Option<Point>,
}

impl<'a, S: TileSource> Tracer<'a, S> {
    fn new(layout: &'a Layout, tiles: &'a S, p0: HexCoord, p1: HexCoord) -> Self {
        let from = resolve(layout, tiles, p0);
        from.scratch().set_blocked(false);
        Self {
            layout,
            tiles,
            p0,
            from,
            to: resolve(layout, tiles, p1),
            from_center: layout.center_of(p0),
            to_center: layout.center_of(p1),
            distance: layout.distance(p0, p1, Metric::Euclidean),
            cells: vec![SightCell {
                coord: p0,
                blocked: false,
            }],
            contact: None,
        }
    }

    /// Record a crossed cell
    fn push(&mut self, coord: HexCoord, blocked: bool) -> &'a S::Tile {
        let tile = resolve(self.layout, self.tiles, coord);
        tile.scratch().set_blocked(blocked);
        self.cells.push(SightCell { coord, blocked });
        tile
    }

    fn blocks(&self, tile: &S::Tile, coord: HexCoord) -> bool {
        let dt = self.layout.distance(self.p0, coord, Metric::Euclidean);
        tile.is_line_of_sight_blocked(self.from, self.to, self.distance, dt)
    }

    fn contact_at(&self, t: HexCoord, o: Orientation) -> Point {
        contact_point(
            self.layout,
            self.from_center,
            self.to_center,
            self.layout.center_of(t),
            o,
        )
    }

    fn finish(self) -> LineOfSight {
        LineOfSight {
            cells: self.cells,
            contact: self.contact,
        }
    }
}

/// Trace the cells crossed by the line from `p0` to `p1`
pub(crate) fn trace<S: TileSource>(
    layout: &Layout,
    tiles: &S,
    p0: HexCoord,
    p1: HexCoord,
) -> LineOfSight {
    // oblique projection, counted in half widths
    let ddx = 2 * (p1.col - p0.col) - (p1.row - p0.row);
    let ddy = p1.row - p0.row;
    let q13 = (ddx >= 0 && ddy >= 0) || (ddx < 0 && ddy < 0);
    let xs = if ddx < 0 { -1 } else { 1 };
    let ys = if ddy < 0 { -1 } else { 1 };
    let dx = ddx.abs();
    let dy = ddy.abs();
    let dx3 = 3 * dx;
    let dy3 = 3 * dy;

    if dx == 0 || dx == dy3 {
        return trace_diagonal(layout, tiles, p0, p1, dx == 0, q13);
    }

    // less than 45°
    let flat = dx > dy3;
    let mut tracer = Tracer::new(layout, tiles, p0, p1);
    let (mut x, mut y) = (p0.col, p0.row);
    let mut e = -2 * dx;
    let mut los_blocked = false;

    while x != p1.col || y != p1.row {
        if e > 0 {
            // up left
            e -= dy3 + dx3;
            y += ys;
            if !q13 {
                x -= xs;
            }
        } else {
            e += dy3;
            if e > -dx || (!flat && e == -dx) {
                // up right
                e -= dx3;
                y += ys;
                if q13 {
                    x += xs;
                }
            } else if e < -dx3 {
                // down right
                e += dx3;
                y -= ys;
                if !q13 {
                    x += xs;
                }
            } else {
                // right
                e += dy3;
                x += xs;
            }
        }

        let q = HexCoord::new(x, y);
        if los_blocked && tracer.contact.is_none() {
            let prev = tracer.cells[tracer.cells.len() - 1].coord;
            let o = layout.direction_between(prev, q).unwrap_or_default();
            tracer.contact = Some(tracer.contact_at(prev, o));
        }
        let tile = tracer.push(q, los_blocked);
        los_blocked = los_blocked || tracer.blocks(tile, q);
    }

    tracer.finish()
}

/// Trace a line running exactly between two neighbour directions
///
/// Each ring visits the two cells grazed by the line, then the cell where
/// it rejoins the grid. The join cell is blocked once both grazed cells
/// have blocked.
fn trace_diagonal<S: TileSource>(
    layout: &Layout,
    tiles: &S,
    p0: HexCoord,
    p1: HexCoord,
    flat: bool,
    q13: bool,
) -> LineOfSight {
    let dy = if p1.row > p0.row { 1 } else { -1 };
    let dx = if p1.col > p0.col { 1 } else { -1 };
    let mut tracer = Tracer::new(layout, tiles, p0, p1);
    let (mut x, mut y) = (p0.col, p0.row);
    let mut prev_join = p0;
    let mut blocked = 0u8;
    let mut los_blocked = false;

    while x != p1.col || y != p1.row {
        if flat {
            y += dy;
        } else {
            x += dx;
        }
        blocked |= graze(&mut tracer, HexCoord::new(x, y), los_blocked, 0x01);

        if flat {
            x += dx;
        } else {
            y += dy;
            if !q13 {
                x -= dx;
            }
        }
        blocked |= graze(&mut tracer, HexCoord::new(x, y), los_blocked, 0x02);

        if flat {
            y += dy;
        } else {
            x += dx;
        }
        let q = HexCoord::new(x, y);
        let join_blocked = los_blocked || blocked == 0x03;
        let tile = tracer.push(q, join_blocked);
        if join_blocked && tracer.contact.is_none() {
            let o = diagonal_orientation(layout.mode(), dx, dy, flat);
            tracer.contact = Some(if !los_blocked && blocked == 0x03 {
                tracer.contact_at(q, o.opposite())
            } else {
                tracer.contact_at(prev_join, o)
            });
        }
        los_blocked = join_blocked || tracer.blocks(tile, q);
        prev_join = q;
    }

    tracer.finish()
}

/// Visit a grazed cell; returns `bit` if it blocks (off-map cells always do)
fn graze<S: TileSource>(tracer: &mut Tracer<'_, S>, q: HexCoord, los_blocked: bool, bit: u8) -> u8 {
    if !tracer.layout.is_on_map(q) {
        return bit;
    }
    let tile = tracer.push(q, los_blocked);
    if tracer.blocks(tile, q) {
        bit
    } else {
        0
    }
}

/// Edge crossed when leaving a join cell along a diagonal
fn diagonal_orientation(mode: GridMode, dx: i32, dy: i32, flat: bool) -> Orientation {
    let v = mode == GridMode::VerticalEdge;
    if flat {
        let forward = if v { dy == 1 } else { dx == 1 };
        return if forward { Orientation::S } else { Orientation::N };
    }
    if dx == 1 {
        if dy == 1 || v {
            Orientation::E
        } else {
            Orientation::N
        }
    } else if dy == 1 {
        if v {
            Orientation::W
        } else {
            Orientation::S
        }
    } else {
        Orientation::W
    }
}

// ============================================================================
// CONTACT POINT
// ============================================================================

/// Intersection of the sight line with the edge of `t` facing `o`
fn contact_point(layout: &Layout, from: Point, to: Point, t: Point, o: Orientation) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let n = if dx == 0.0 { VERTICAL_SLOPE } else { dy / dx };
    let c = from.y - n * from.x;
    let s = layout.side();
    let dw = layout.half_width();

    match layout.mode() {
        GridMode::VerticalEdge => match o {
            Orientation::N => Point::new(t.x, t.y - s),
            Orientation::S => Point::new(t.x, t.y + s),
            Orientation::E => Point::new(t.x + dw, from.y + n * (t.x + dw - from.x)),
            Orientation::W => Point::new(t.x - dw, from.y + n * (t.x - dw - from.x)),
            _ => {
                let m = layout.slope();
                let p = if o == Orientation::SE || o == Orientation::NW { -m } else { m };
                let mut k = t.y - p * t.x;
                if o == Orientation::SE || o == Orientation::SW {
                    k += s;
                } else {
                    k -= s;
                }
                let x = (k - c) / (n - p);
                Point::new(x, n * x + c)
            }
        },
        GridMode::HorizontalEdge => match o {
            Orientation::E => Point::new(t.x + s, t.y),
            Orientation::W => Point::new(t.x - s, t.y),
            Orientation::N => Point::new(from.x + (t.y - dw - from.y) / n, t.y - dw),
            Orientation::S => Point::new(from.x + (t.y + dw - from.y) / n, t.y + dw),
            _ => {
                let im = layout.inv_slope();
                let p = if o == Orientation::SE || o == Orientation::NW { -im } else { im };
                let k = if o == Orientation::SW || o == Orientation::NW {
                    t.y - p * (t.x - s)
                } else {
                    t.y - p * (t.x + s)
                };
                let x = (k - c) / (n - p);
                Point::new(x, n * x + c)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{board, tile_mut, TestBoard};

    fn block(board: &mut TestBoard, coord: HexCoord) {
        let key = board.layout().key(coord).unwrap();
        board.tiles_mut().tile_mut(coord, key).blocks_sight = true;
    }

    fn assert_near(p: Point, x: f32, y: f32) {
        assert!((p.x - x).abs() < 0.05 && (p.y - y).abs() < 0.05, "{} is not ({}; {})", p, x, y);
    }

    /// Contact lies on the sight segment between the two centres
    fn on_segment(from: Point, to: Point, p: Point) -> bool {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len = (dx * dx + dy * dy).sqrt();
        let off_line = (dx * (p.y - from.y) - dy * (p.x - from.x)).abs() / len;
        let along = (dx * (p.x - from.x) + dy * (p.y - from.y)) / (len * len);
        off_line < 0.5 && (-1e-3..=1.0 + 1e-3).contains(&along)
    }

    #[test]
    fn test_same_cell() {
        let b = board(GridMode::VerticalEdge, 10, 7);
        let p = HexCoord::new(3, 3);
        let los = b.line_of_sight(p, p);
        assert_eq!(los.cells, vec![SightCell { coord: p, blocked: false }]);
        assert!(los.is_clear());
    }

    #[test]
    fn test_straight_row() {
        let b = board(GridMode::VerticalEdge, 10, 7);
        let los = b.line_of_sight(HexCoord::new(1, 2), HexCoord::new(5, 2));
        let coords: Vec<_> = los.coords().collect();
        assert_eq!(
            coords,
            (1..=5).map(|c| HexCoord::new(c, 2)).collect::<Vec<_>>()
        );
        assert!(los.is_clear());
    }

    #[test]
    fn test_general_line_steps() {
        let b = board(GridMode::VerticalEdge, 10, 7);
        let los = b.line_of_sight(HexCoord::new(0, 0), HexCoord::new(3, 1));
        let coords: Vec<_> = los.coords().collect();
        assert_eq!(
            coords,
            vec![
                HexCoord::new(0, 0),
                HexCoord::new(1, 0),
                HexCoord::new(2, 1),
                HexCoord::new(3, 1),
            ]
        );
    }

    #[test]
    fn test_lines_are_contiguous_and_reach_target() {
        for mode in [GridMode::VerticalEdge, GridMode::HorizontalEdge] {
            let b = board(mode, 10, 7);
            let l = b.layout();
            let coords: Vec<_> = l.coords().collect();
            for &p0 in &coords {
                for &p1 in &coords {
                    let los = b.line_of_sight(p0, p1);
                    let path: Vec<_> = los.coords().collect();
                    assert_eq!(path.first(), Some(&p0));
                    assert_eq!(path.last(), Some(&p1));

                    let ddx = (2 * (p1.col - p0.col) - (p1.row - p0.row)).abs();
                    let diagonal = ddx == 0 || ddx == 3 * (p1.row - p0.row).abs();
                    for pair in path.windows(2) {
                        let d = l.hex_distance(pair[0], pair[1]);
                        // a diagonal ring may skip both of its off-map grazed cells
                        let max = if diagonal { 2 } else { 1 };
                        assert!(d >= 1 && d <= max, "{} -> {} in {:?}", pair[0], pair[1], path);
                    }
                }
            }
        }
    }

    #[test]
    fn test_blocker_sets_contact_and_blocks_rest() {
        let mut b = board(GridMode::VerticalEdge, 10, 7);
        block(&mut b, HexCoord::new(3, 2));
        let los = b.line_of_sight(HexCoord::new(1, 2), HexCoord::new(6, 2));
        let blocked: Vec<_> = los.cells.iter().map(|c| c.blocked).collect();
        // the blocking cell itself is visible, everything behind it is not
        assert_eq!(blocked, vec![false, false, false, true, true, true]);
        let contact = los.contact.expect("sight should be blocked");
        let center = b.layout().center_of(HexCoord::new(3, 2));
        assert!((contact.x - (center.x + b.layout().half_width())).abs() < 1e-2);
        assert!((contact.y - center.y).abs() < 1e-2);
        assert!(b.tile(HexCoord::new(5, 2)).scratch().is_blocked());
        assert!(!b.tile(HexCoord::new(3, 2)).scratch().is_blocked());
    }

    #[test]
    fn test_blocked_target_is_still_visible() {
        let mut b = board(GridMode::VerticalEdge, 10, 7);
        block(&mut b, HexCoord::new(4, 2));
        let los = b.line_of_sight(HexCoord::new(1, 2), HexCoord::new(4, 2));
        assert!(los.is_clear());
    }

    #[test]
    fn test_diagonal_needs_both_sides_blocked() {
        let mut b = board(GridMode::VerticalEdge, 10, 7);
        let p0 = HexCoord::new(3, 1);
        let p1 = HexCoord::new(5, 5);
        // straight down: the line grazes (3,2) and (4,2) before joining (4,3)
        block(&mut b, HexCoord::new(3, 2));
        let los = b.line_of_sight(p0, p1);
        assert!(los.is_clear());
        assert_eq!(los.cells[3].coord, HexCoord::new(4, 3));

        block(&mut b, HexCoord::new(4, 2));
        let los = b.line_of_sight(p0, p1);
        assert!(!los.is_clear());
        assert!(los.cells[3].blocked);
        assert!(los.cells.last().unwrap().blocked);
        // contact lies on the top edge of the join cell
        let contact = los.contact.unwrap();
        let join = b.layout().center_of(HexCoord::new(4, 3));
        assert!((contact.y - (join.y - b.layout().side())).abs() < 1e-2);
    }

    #[test]
    fn test_diagonal_off_map_graze_counts_as_blocking() {
        let mut b = board(GridMode::VerticalEdge, 10, 7);
        // along the left edge, one grazed cell per ring is off the map
        let p0 = HexCoord::new(0, 0);
        let p1 = HexCoord::new(2, 4);
        let los = b.line_of_sight(p0, p1);
        assert!(los.is_clear());
        block(&mut b, HexCoord::new(1, 1));
        let los = b.line_of_sight(p0, p1);
        assert!(!los.is_clear());
        assert!(los.cells.iter().all(|c| b.layout().is_on_map(c.coord)));
    }

    #[test]
    fn test_diagonal_blocking_join_cell() {
        let mut b = board(GridMode::VerticalEdge, 10, 7);
        let join = HexCoord::new(4, 3);
        block(&mut b, join);
        let los = b.line_of_sight(HexCoord::new(3, 1), HexCoord::new(5, 5));
        let blocked: Vec<_> = los.cells.iter().map(|c| (c.coord, c.blocked)).collect();
        assert_eq!(
            blocked,
            vec![
                (HexCoord::new(3, 1), false),
                (HexCoord::new(3, 2), false),
                (HexCoord::new(4, 2), false),
                (join, false),
                (HexCoord::new(4, 4), true),
                (HexCoord::new(5, 4), true),
                (HexCoord::new(5, 5), true),
            ]
        );
        // contact on the far side of the blocking join cell
        let center = b.layout().center_of(join);
        assert_near(los.contact.unwrap(), center.x, center.y + b.layout().side());
    }

    #[test]
    fn test_horizontal_edge_contacts() {
        let mut b = board(GridMode::HorizontalEdge, 10, 7);
        let blocker = HexCoord::new(4, 3);
        block(&mut b, blocker);
        let center = b.layout().center_of(blocker);
        assert_near(center, 650.0, 259.81);

        // leaves through the flat south edge
        let los = b.line_of_sight(HexCoord::new(2, 1), HexCoord::new(5, 5));
        let blocked: Vec<_> = los.cells.iter().map(|c| c.blocked).collect();
        assert_eq!(blocked, vec![false, false, false, false, true, true]);
        assert_eq!(los.cells[3].coord, blocker);
        let contact = los.contact.unwrap();
        assert_near(contact, 620.0, center.y + b.layout().half_width());

        // leaves through the slanted south-east edge
        let los = b.line_of_sight(HexCoord::new(1, 1), HexCoord::new(5, 4));
        assert_eq!(los.cells.len(), 6);
        assert!(los.cells[5].blocked && !los.cells[4].blocked);
        assert_near(los.contact.unwrap(), 714.29, 321.67);
    }

    #[test]
    fn test_vertical_edge_slanted_contact() {
        let mut b = board(GridMode::VerticalEdge, 10, 7);
        block(&mut b, HexCoord::new(4, 3));
        let los = b.line_of_sight(HexCoord::new(1, 0), HexCoord::new(5, 4));
        let coords: Vec<_> = los.coords().collect();
        assert_eq!(
            coords,
            vec![
                HexCoord::new(1, 0),
                HexCoord::new(2, 1),
                HexCoord::new(3, 2),
                HexCoord::new(4, 3),
                HexCoord::new(5, 4),
            ]
        );
        // midway along the south-east edge
        assert_near(los.contact.unwrap(), 562.92, 575.0);
    }

    #[test]
    fn test_contacts_lie_on_sight_line() {
        for mode in [GridMode::VerticalEdge, GridMode::HorizontalEdge] {
            let mut b = board(mode, 8, 7);
            let coords: Vec<_> = b.layout().coords().collect();
            for &blocker in &coords {
                tile_mut(&mut b, blocker).blocks_sight = true;
                for &p0 in &coords {
                    for &p1 in &coords {
                        let los = b.line_of_sight(p0, p1);
                        let Some(contact) = los.contact else {
                            continue;
                        };
                        let (from, to) = (b.layout().center_of(p0), b.layout().center_of(p1));
                        assert!(
                            on_segment(from, to, contact),
                            "{:?} blocker {} {} -> {}: {}",
                            mode,
                            blocker,
                            p0,
                            p1,
                            contact
                        );
                    }
                }
                tile_mut(&mut b, blocker).blocks_sight = false;
            }
        }
    }
}
