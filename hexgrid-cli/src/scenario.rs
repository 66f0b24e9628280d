//! Scenario files: a board, its terrain and roads, and where the unit stands
//!
//! Scenarios are JSON. Every field is optional; missing ones fall back to
//! the built-in demo board.

use std::path::Path;

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use hexgrid_core::{
    BoardConfig, GridMode, HexBoard, HexCoord, HexError, Layout, Orientation, Point, TileCache,
    TileKey,
};

use crate::terrain::{Hex, Terrain, Unit};

/// Builds demo tiles on first use
pub type HexFactory = Box<dyn Fn(HexCoord, TileKey) -> Hex>;

/// Board over demo tiles
pub type DemoBoard = HexBoard<TileCache<Hex, HexFactory>>;

/// Terrain override for one cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainPatch {
    pub at: HexCoord,
    pub terrain: Terrain,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub board: BoardConfig,
    /// Cells not listed are plain
    pub terrain: Vec<TerrainPatch>,
    /// Roads as chains of adjacent cells; ends may leave the map
    pub roads: Vec<Vec<HexCoord>>,
    pub unit: Unit,
    /// Where the unit stands
    pub origin: HexCoord,
    /// Default destination or target
    pub target: HexCoord,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::demo()
    }
}

impl Scenario {
    /// The stock 10x7 board: open ground crossed by three roads
    pub fn demo() -> Self {
        let c = HexCoord::new;
        Self {
            name: "demo".to_string(),
            board: BoardConfig::new(10, 7)
                .with_side(100.0)
                .with_origin(Point::new(50.0, 100.0))
                .with_mode(GridMode::VerticalEdge),
            terrain: Vec::new(),
            roads: vec![
                vec![
                    c(0, 2),
                    c(1, 2),
                    c(2, 2),
                    c(3, 2),
                    c(4, 2),
                    c(5, 3),
                    c(6, 4),
                    c(7, 5),
                    c(8, 6),
                    c(9, 7),
                ],
                vec![c(7, -1), c(7, 0), c(7, 1), c(7, 2), c(6, 2), c(5, 2), c(5, 3)],
                (6..=12).map(|col| c(col, 4)).collect(),
            ],
            unit: Unit::default(),
            origin: c(0, 0),
            target: c(3, 3),
        }
    }

    /// Load scenario from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scenario: {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario: {}", path.display()))?;
        Ok(scenario)
    }

    /// Save scenario to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write scenario: {}", path.display()))?;
        Ok(())
    }

    /// Check that every referenced cell fits the board
    pub fn validate(&self) -> hexgrid_core::Result<()> {
        let layout = Layout::new(&self.board)?;
        for at in [self.origin, self.target] {
            if !layout.is_on_map(at) {
                return Err(HexError::OffMap(at));
            }
        }
        for patch in &self.terrain {
            if !layout.is_on_map(patch.at) {
                return Err(HexError::OffMap(patch.at));
            }
        }
        self.road_flags(&layout)?;
        Ok(())
    }

    /// Road directions leaving each on-map cell
    pub fn road_flags(&self, layout: &Layout) -> hexgrid_core::Result<FxHashMap<HexCoord, Orientation>> {
        let mut flags: FxHashMap<HexCoord, Orientation> = FxHashMap::default();
        for road in &self.roads {
            for pair in road.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let (Some(there), Some(back)) =
                    (layout.direction_between(a, b), layout.direction_between(b, a))
                else {
                    return Err(HexError::InvalidScenario(format!(
                        "road step {} -> {} is not between neighbours",
                        a, b
                    )));
                };
                if layout.is_on_map(a) {
                    *flags.entry(a).or_default() |= there;
                }
                if layout.is_on_map(b) {
                    *flags.entry(b).or_default() |= back;
                }
            }
        }
        Ok(flags)
    }

    /// Terrain of each overridden cell
    pub fn terrain_map(&self) -> FxHashMap<HexCoord, Terrain> {
        self.terrain.iter().map(|p| (p.at, p.terrain)).collect()
    }

    /// Board whose tiles are created on demand from this scenario
    pub fn build_board(&self) -> hexgrid_core::Result<DemoBoard> {
        self.validate()?;
        let layout = Layout::new(&self.board)?;
        let roads = self.road_flags(&layout)?;
        let terrain = self.terrain_map();
        let factory: HexFactory = Box::new(move |coord, _key| {
            Hex::new(
                terrain.get(&coord).copied().unwrap_or_default(),
                roads.get(&coord).copied().unwrap_or_default(),
            )
        });

        tracing::debug!(
            name = %self.name,
            cells = layout.size(),
            roads = self.roads.len(),
            "building scenario board"
        );
        HexBoard::with_factory(&self.board, Hex::off_map(), factory)
    }
}
