//! Orientation flags and the angle algebra between cells
//!
//! Eight directions are enumerated as independent bit flags, but a board
//! only ever uses six of them: vertical-edge boards have no N/S neighbour,
//! horizontal-edge boards have no E/W neighbour. The two inactive flags
//! are used when a line to a distant cell runs exactly between two active
//! directions, in which case both active flags are OR'd together.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::board::{HexCoord, Layout, ADJACENT_DELTAS};

/// Rounding bias applied to angles between cell centres, in degrees
pub const DEGREE_ADJ: i32 = 2;

/// One or more directions as bit flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Orientation(u8);

impl Orientation {
    pub const E: Self = Self(1);
    pub const NE: Self = Self(2);
    pub const N: Self = Self(4);
    pub const NW: Self = Self(8);
    pub const W: Self = Self(16);
    pub const SW: Self = Self(32);
    pub const S: Self = Self(64);
    pub const SE: Self = Self(128);

    /// All eight single directions, counter-clockwise from east
    pub const ALL: [Self; 8] = [
        Self::E,
        Self::NE,
        Self::N,
        Self::NW,
        Self::W,
        Self::SW,
        Self::S,
        Self::SE,
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Exactly one flag set
    pub const fn is_single(self) -> bool {
        self.0.count_ones() == 1
    }

    /// True if every flag of `other` is set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Opposite direction. Only meaningful for a single flag.
    pub const fn opposite(self) -> Self {
        if self.0 <= Self::NW.0 {
            Self(self.0 << 4)
        } else {
            Self(self.0 >> 4)
        }
    }

    /// Single flags set in this value
    pub fn iter(self) -> impl Iterator<Item = Orientation> {
        Self::ALL.into_iter().filter(move |&o| self.contains(o))
    }

    fn name(self) -> &'static str {
        match self.0 {
            1 => "E",
            2 => "NE",
            4 => "N",
            8 => "NW",
            16 => "W",
            32 => "SW",
            64 => "S",
            128 => "SE",
            _ => "?",
        }
    }
}

impl BitOr for Orientation {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Orientation {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Orientation {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let names: Vec<_> = self.iter().map(Orientation::name).collect();
        write!(f, "{}", names.join("|"))
    }
}

/// Vertical-edge boards: east is 0°, degrees grow clockwise
pub(crate) const VERTICAL_EDGE_ANGLES: [(Orientation, i32); 6] = [
    (Orientation::E, 0),
    (Orientation::SE, 60),
    (Orientation::SW, 120),
    (Orientation::W, 180),
    (Orientation::NW, 240),
    (Orientation::NE, 300),
];

pub(crate) const HORIZONTAL_EDGE_ANGLES: [(Orientation, i32); 6] = [
    (Orientation::SE, 30),
    (Orientation::S, 90),
    (Orientation::SW, 150),
    (Orientation::NW, 210),
    (Orientation::N, 270),
    (Orientation::NE, 330),
];

// ============================================================================
// ANGLE ALGEBRA
// ============================================================================

impl Layout {
    /// Angle of a direction, if active on this board
    pub fn to_degrees(&self, o: Orientation) -> Option<i32> {
        self.angles()
            .iter()
            .find(|&&(k, _)| k == o)
            .map(|&(_, z)| z)
    }

    /// Active direction at exactly this angle
    pub fn to_orientation(&self, degrees: i32) -> Option<Orientation> {
        self.angles()
            .iter()
            .find(|&&(_, z)| z == degrees)
            .map(|&(k, _)| k)
    }

    fn is_active(&self, o: Orientation) -> bool {
        self.to_degrees(o).is_some()
    }

    /// Angle between two adjacent cells, rounded down to 10°
    pub fn angle(&self, from: HexCoord, to: HexCoord) -> i32 {
        let mut a = self.raw_angle(from, to) + DEGREE_ADJ as f32;
        if a < 0.0 {
            a += 360.0;
        }
        (a / 10.0) as i32 * 10
    }

    /// Direction of a single step between adjacent cells
    pub fn direction_between(&self, from: HexCoord, to: HexCoord) -> Option<Orientation> {
        let delta = (to.col - from.col, to.row - from.row);
        ADJACENT_DELTAS
            .iter()
            .position(|&d| d == delta)
            .map(|i| self.directions()[i])
    }

    /// Direction towards a distant cell, combining two flags on exact diagonals
    pub fn distant_orientation(&self, from: HexCoord, to: HexCoord) -> Option<Orientation> {
        let mut a = self.raw_angle(from, to);
        if a < 0.0 {
            a += 360.0;
        }
        a = ((a * 10.0) as i32) as f32 / 10.0;
        let adj = DEGREE_ADJ as f32;

        for &(k, z) in self.angles() {
            let z = z as f32;
            if a >= z + 30.0 - adj && a <= z + 30.0 + adj {
                let mut p = Orientation::from_bits(k.bits() >> 1);
                if p.is_empty() {
                    p = Orientation::SE;
                }
                // the inactive flag sits between two active ones
                if !self.is_active(p) {
                    return Some(k | Orientation::from_bits(p.bits() >> 1));
                }
                return Some(k | p);
            } else if z == 30.0 && (a < adj || a > 360.0 - adj) {
                return Some(Orientation::NE | Orientation::SE);
            } else if a >= z - 30.0 && a <= z + 30.0 {
                return Some(k);
            }
        }

        if self.is_active(Orientation::E) && a > 330.0 && a <= 360.0 {
            Some(Orientation::E)
        } else {
            None
        }
    }

    /// Opposite of a possibly combined orientation
    pub fn distant_opposite(&self, o: Orientation) -> Orientation {
        self.angles()
            .iter()
            .filter(|&&(k, _)| o.contains(k))
            .fold(Orientation::empty(), |acc, &(k, _)| acc | k.opposite())
    }

    fn raw_angle(&self, from: HexCoord, to: HexCoord) -> f32 {
        let a = self.center_of(from);
        let b = self.center_of(to);
        (b.y - a.y).atan2(b.x - a.x).to_degrees()
    }
}
