//! Demo terrain and unit
//!
//! Five terrain kinds with roads and elevation-based sight blocking, and a
//! reference unit with two movement points and a six hex weapon.

use std::fmt;

use serde::{Deserialize, Serialize};

use hexgrid_core::{Orientation, Piece, SearchScratch, Tile, WeaponCategory};

// ============================================================================
// TERRAIN
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Plain,
    City,
    Wood,
    Mountain,
    /// Impassable
    Blocked,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Plain,
        Terrain::City,
        Terrain::Wood,
        Terrain::Mountain,
        Terrain::Blocked,
    ];

    /// Movement cost to enter, `None` if impassable
    pub fn cost(self) -> Option<i32> {
        match self {
            Terrain::Plain | Terrain::City => Some(1),
            Terrain::Wood => Some(2),
            Terrain::Mountain => Some(3),
            Terrain::Blocked => None,
        }
    }

    /// Height of what stands on the ground (buildings, trees)
    pub fn height(self) -> i32 {
        match self {
            Terrain::City => 2,
            Terrain::Wood => 1,
            _ => 0,
        }
    }

    /// Ground elevation
    pub fn elevation(self) -> i32 {
        match self {
            Terrain::Mountain => 3,
            _ => 0,
        }
    }

    pub fn range_modifier(self) -> i32 {
        match self {
            Terrain::Mountain => 1,
            _ => 0,
        }
    }

    pub fn attack_modifier(self) -> i32 {
        match self {
            Terrain::Wood => 2,
            _ => 0,
        }
    }

    pub fn defense_value(self) -> i32 {
        match self {
            Terrain::City => 2,
            Terrain::Wood | Terrain::Mountain => 1,
            _ => 0,
        }
    }

    /// Map glyph
    pub fn symbol(self) -> char {
        match self {
            Terrain::Plain => '.',
            Terrain::City => 'C',
            Terrain::Wood => 'f',
            Terrain::Mountain => '^',
            Terrain::Blocked => '#',
        }
    }

    /// Next kind in the editing cycle
    pub fn next(self) -> Self {
        match self {
            Terrain::Plain => Terrain::City,
            Terrain::City => Terrain::Wood,
            Terrain::Wood => Terrain::Mountain,
            Terrain::Mountain => Terrain::Blocked,
            Terrain::Blocked => Terrain::Plain,
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Terrain::Plain => "plain",
            Terrain::City => "city",
            Terrain::Wood => "wood",
            Terrain::Mountain => "mountain",
            Terrain::Blocked => "blocked",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// HEX
// ============================================================================

/// A demo board cell
#[derive(Clone, Debug, Default)]
pub struct Hex {
    pub terrain: Terrain,
    pub roads: Orientation,
    scratch: SearchScratch,
}

impl Hex {
    pub fn new(terrain: Terrain, roads: Orientation) -> Self {
        Self {
            terrain,
            roads,
            scratch: SearchScratch::default(),
        }
    }

    /// The shared tile standing for every off-map coordinate
    pub fn off_map() -> Self {
        Self::new(Terrain::Blocked, Orientation::empty())
    }
}

impl Tile for Hex {
    fn scratch(&self) -> &SearchScratch {
        &self.scratch
    }

    fn has_road(&self, orientation: Orientation) -> bool {
        self.roads.intersects(orientation)
    }

    fn is_line_of_sight_blocked(&self, from: &Self, to: &Self, d: f32, dt: f32) -> bool {
        let mut h = self.terrain.height() + self.terrain.elevation();
        if h == 0 {
            return false;
        }
        let e = from.terrain.elevation();
        if e > h {
            // looking down over the obstacle
            if to.terrain.elevation() > h {
                return false;
            }
            return h as f32 * dt / (e - h) as f32 >= d - dt;
        }
        h -= e;
        h as f32 * d / dt >= (to.terrain.elevation() - e) as f32
    }
}

// ============================================================================
// UNIT
// ============================================================================

/// Longest distance the demo weapon reaches
pub const MAX_FIRE_DISTANCE: i32 = 6;

/// Base volume of fire at close range
const BASE_FIRE_POWER: i32 = 10;

/// Demo unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unit {
    pub movement_points: i32,
    pub road_march_bonus: i32,
}

impl Default for Unit {
    fn default() -> Self {
        Self {
            movement_points: 2,
            road_march_bonus: 2,
        }
    }
}

impl Piece<Hex> for Unit {
    fn movement_points(&self) -> i32 {
        self.movement_points
    }

    fn road_march_bonus(&self) -> i32 {
        self.road_march_bonus
    }

    fn move_cost(&self, src: &Hex, dst: &Hex, orientation: Orientation) -> Option<i32> {
        if dst.terrain == Terrain::Blocked {
            return None;
        }
        if src.has_road(orientation) {
            Some(1)
        } else {
            dst.terrain.cost()
        }
    }

    fn at_least_one_tile(&self, _dst: &Hex) -> bool {
        false
    }

    fn max_range_of_fire(&self, _category: WeaponCategory, from: &Hex) -> i32 {
        MAX_FIRE_DISTANCE + from.terrain.range_modifier()
    }

    fn volume_of_fire(
        &self,
        _category: WeaponCategory,
        distance: i32,
        src: &Hex,
        _src_orientation: Orientation,
        dst: &Hex,
        _dst_orientation: Orientation,
    ) -> Option<i32> {
        let fire_power = match distance {
            d if d > MAX_FIRE_DISTANCE => return None,
            d if d > 4 => 4,
            d if d > 2 => 7,
            _ => BASE_FIRE_POWER,
        };
        Some(fire_power - src.terrain.attack_modifier() - dst.terrain.defense_value())
    }
}
