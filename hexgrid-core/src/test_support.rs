//! Minimal tile and piece used by the unit tests

use crate::board::{GridMode, HexCoord, TileKey};
use crate::config::BoardConfig;
use crate::grid::HexBoard;
use crate::orientation::Orientation;
use crate::piece::{Piece, WeaponCategory};
use crate::tile::{SearchScratch, Tile, TileCache};

#[derive(Clone, Debug, Default)]
pub struct TestTile {
    scratch: SearchScratch,
    pub blocks_sight: bool,
    pub roads: Orientation,
    /// `None` is impracticable
    pub cost: Option<i32>,
}

impl TestTile {
    pub fn open() -> Self {
        Self {
            cost: Some(1),
            ..Self::default()
        }
    }

    pub fn off_map() -> Self {
        Self {
            blocks_sight: true,
            ..Self::default()
        }
    }
}

impl Tile for TestTile {
    fn scratch(&self) -> &SearchScratch {
        &self.scratch
    }

    fn has_road(&self, orientation: Orientation) -> bool {
        self.roads.intersects(orientation)
    }

    fn is_line_of_sight_blocked(&self, _from: &Self, _to: &Self, _d: f32, _dt: f32) -> bool {
        self.blocks_sight
    }
}

pub type TestBoard = HexBoard<TileCache<TestTile, fn(HexCoord, TileKey) -> TestTile>>;

fn open_tile(_: HexCoord, _: TileKey) -> TestTile {
    TestTile::open()
}

/// Board of open, cost-1 tiles
pub fn board(mode: GridMode, cols: i32, rows: i32) -> TestBoard {
    let config = BoardConfig::new(cols, rows).with_mode(mode);
    HexBoard::with_factory(&config, TestTile::off_map(), open_tile as fn(HexCoord, TileKey) -> TestTile)
        .unwrap()
}

pub fn tile_mut(board: &mut TestBoard, coord: HexCoord) -> &mut TestTile {
    let key = board.layout().key(coord).unwrap();
    board.tiles_mut().tile_mut(coord, key)
}

/// Lay a road along consecutive adjacent cells
pub fn road(board: &mut TestBoard, cells: &[HexCoord]) {
    for pair in cells.windows(2) {
        let there = board.layout().direction_between(pair[0], pair[1]).unwrap();
        let back = board.layout().direction_between(pair[1], pair[0]).unwrap();
        tile_mut(board, pair[0]).roads |= there;
        tile_mut(board, pair[1]).roads |= back;
    }
}

#[derive(Clone, Debug)]
pub struct TestPiece {
    pub mp: i32,
    pub bonus: i32,
    pub range: i32,
    /// Farthest distance with a non-`None` volume of fire
    pub effective_range: i32,
    pub at_least_one: bool,
}

impl TestPiece {
    pub fn new(mp: i32) -> Self {
        Self {
            mp,
            bonus: 0,
            range: 3,
            effective_range: 3,
            at_least_one: false,
        }
    }
}

impl Piece<TestTile> for TestPiece {
    fn movement_points(&self) -> i32 {
        self.mp
    }

    fn road_march_bonus(&self) -> i32 {
        self.bonus
    }

    fn move_cost(&self, src: &TestTile, dst: &TestTile, orientation: Orientation) -> Option<i32> {
        match dst.cost {
            Some(_) if src.has_road(orientation) => Some(1),
            cost => cost,
        }
    }

    fn at_least_one_tile(&self, _dst: &TestTile) -> bool {
        self.at_least_one
    }

    fn max_range_of_fire(&self, _category: WeaponCategory, _from: &TestTile) -> i32 {
        self.range
    }

    fn volume_of_fire(
        &self,
        _category: WeaponCategory,
        distance: i32,
        _src: &TestTile,
        _src_orientation: Orientation,
        _dst: &TestTile,
        _dst_orientation: Orientation,
    ) -> Option<i32> {
        (distance <= self.effective_range).then(|| 10 - distance)
    }
}
