//! Board queries run from the command line
//!
//! Each query renders a text report: a one-line summary, the map with the
//! result overlaid, and the details.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexgrid_core::{HexCoord, Layout, Point, Tile, WeaponCategory};

use crate::generate::{generate, GenerateConfig};
use crate::render::{digit, render};
use crate::scenario::{DemoBoard, Scenario};

/// Parse a `col,row` coordinate
pub fn parse_coord(s: &str) -> std::result::Result<HexCoord, String> {
    let (col, row) = s
        .split_once([',', ';'])
        .ok_or_else(|| format!("expected col,row but got '{}'", s))?;
    let col = col.trim().parse().map_err(|e| format!("bad column '{}': {}", col, e))?;
    let row = row.trim().parse().map_err(|e| format!("bad row '{}': {}", row, e))?;
    Ok(HexCoord::new(col, row))
}

/// Glyph of the unit and its target
fn marker(coord: HexCoord, from: HexCoord, to: Option<HexCoord>) -> Option<char> {
    if coord == from {
        Some('U')
    } else if Some(coord) == to {
        Some('T')
    } else {
        None
    }
}

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args, Debug)]
pub struct EndpointArgs {
    /// Observer or starting cell (default: the scenario's unit)
    #[arg(long, value_parser = parse_coord, value_name = "COL,ROW")]
    pub from: Option<HexCoord>,

    /// Target or destination cell (default: the scenario's target)
    #[arg(long, value_parser = parse_coord, value_name = "COL,ROW")]
    pub to: Option<HexCoord>,
}

#[derive(Args, Debug)]
pub struct MovesArgs {
    /// Starting cell (default: the scenario's unit)
    #[arg(long, value_parser = parse_coord, value_name = "COL,ROW")]
    pub from: Option<HexCoord>,

    /// Override the unit's movement points
    #[arg(long)]
    pub mp: Option<i32>,
}

#[derive(Args, Debug)]
pub struct InfluenceArgs {
    /// Firing cell (default: the scenario's unit)
    #[arg(long, value_parser = parse_coord, value_name = "COL,ROW")]
    pub from: Option<HexCoord>,

    /// Weapon category
    #[arg(long, default_value = "0")]
    pub category: WeaponCategory,
}

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Plane x coordinate
    #[arg(long, allow_hyphen_values = true)]
    pub x: f32,

    /// Plane y coordinate
    #[arg(long, allow_hyphen_values = true)]
    pub y: f32,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of columns
    #[arg(long, default_value = "10")]
    pub cols: i32,

    /// Number of rows
    #[arg(long, default_value = "7")]
    pub rows: i32,

    /// Use flat-top hexes (horizontal edges)
    #[arg(long)]
    pub horizontal: bool,

    /// Number of roads
    #[arg(long, default_value = "2")]
    pub roads: usize,

    /// Output scenario JSON file (prints to stdout if omitted)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

// ============================================================================
// SESSION
// ============================================================================

/// A scenario with its board
pub struct Session {
    pub scenario: Scenario,
    pub board: DemoBoard,
}

impl Session {
    pub fn new(scenario: Scenario) -> Result<Self> {
        let board = scenario
            .build_board()
            .with_context(|| format!("Failed to build board for scenario '{}'", scenario.name))?;
        Ok(Self { scenario, board })
    }

    fn layout(&self) -> &Layout {
        self.board.layout()
    }

    fn terrain_glyph(&self, coord: HexCoord) -> char {
        self.board.tile(coord).terrain.symbol()
    }

    fn check_on_map(&self, coord: HexCoord) -> Result<()> {
        anyhow::ensure!(self.layout().is_on_map(coord), "{} is not on the map", coord);
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Trace the sight line between two cells
    pub fn line_of_sight(&mut self, args: &EndpointArgs) -> Result<String> {
        let from = args.from.unwrap_or(self.scenario.origin);
        let to = args.to.unwrap_or(self.scenario.target);
        self.check_on_map(from)?;
        self.check_on_map(to)?;

        let los = self.board.line_of_sight(from, to);
        let mut out = String::new();
        match los.contact {
            None => writeln!(out, "line of sight {} -> {}: clear", from, to)?,
            Some(p) => writeln!(out, "line of sight {} -> {}: blocked at {}", from, to, p)?,
        }

        let cells: rustc_hash::FxHashMap<HexCoord, bool> =
            los.cells.iter().map(|c| (c.coord, c.blocked)).collect();
        out.push_str(&render(self.layout(), |c| {
            marker(c, from, Some(to)).unwrap_or_else(|| match cells.get(&c) {
                Some(true) => 'x',
                Some(false) => '+',
                None => self.terrain_glyph(c),
            })
        }));

        let trace: Vec<String> = los
            .cells
            .iter()
            .map(|c| if c.blocked { format!("{}x", c.coord) } else { c.coord.to_string() })
            .collect();
        writeln!(out, "cells: {}", trace.join(" "))?;
        Ok(out)
    }

    /// Cells the unit can reach this turn
    pub fn moves(&mut self, args: &MovesArgs) -> Result<String> {
        let from = args.from.unwrap_or(self.scenario.origin);
        self.check_on_map(from)?;
        let mut unit = self.scenario.unit.clone();
        if let Some(mp) = args.mp {
            unit.movement_points = mp;
        }

        let moves = self.board.possible_moves(&unit, from);
        let reachable: rustc_hash::FxHashSet<HexCoord> = moves.iter().copied().collect();
        let mut out = String::new();
        writeln!(
            out,
            "{} cells reachable from {} with {} MP (+{} on roads)",
            moves.len(),
            from,
            unit.movement_points,
            unit.road_march_bonus
        )?;
        out.push_str(&render(self.layout(), |c| {
            marker(c, from, None).unwrap_or_else(|| {
                if reachable.contains(&c) {
                    'o'
                } else {
                    self.terrain_glyph(c)
                }
            })
        }));
        for c in &moves {
            let s = self.board.tile(*c).scratch();
            let road = if s.road_march() { " road" } else { "" };
            writeln!(out, "  {} left {}{}", c, s.budget(), road)?;
        }
        Ok(out)
    }

    /// Cheapest route between two cells
    pub fn path(&mut self, args: &EndpointArgs) -> Result<String> {
        let from = args.from.unwrap_or(self.scenario.origin);
        let to = args.to.unwrap_or(self.scenario.target);
        self.check_on_map(from)?;
        self.check_on_map(to)?;

        let path = self.board.shortest_path(&self.scenario.unit, from, to);
        let mut out = String::new();
        if path.is_empty() {
            writeln!(out, "no path {} -> {}", from, to)?;
        } else {
            let cost = self.board.tile(to).scratch().budget();
            writeln!(out, "path {} -> {}: {} steps, cost {}", from, to, path.len() - 1, cost)?;
        }
        let on_path: rustc_hash::FxHashSet<HexCoord> = path.iter().copied().collect();
        out.push_str(&render(self.layout(), |c| {
            marker(c, from, Some(to)).unwrap_or_else(|| {
                if on_path.contains(&c) {
                    '*'
                } else {
                    self.terrain_glyph(c)
                }
            })
        }));
        if !path.is_empty() {
            let steps: Vec<String> = path.iter().map(HexCoord::to_string).collect();
            writeln!(out, "route: {}", steps.join(" "))?;
        }
        Ok(out)
    }

    /// Volume of fire on every visible cell in range
    pub fn influence(&mut self, args: &InfluenceArgs) -> Result<String> {
        let from = args.from.unwrap_or(self.scenario.origin);
        self.check_on_map(from)?;

        let influence = self
            .board
            .range_of_influence(&self.scenario.unit, from, args.category);
        let mut out = String::new();
        writeln!(
            out,
            "{} cells under fire from {} (category {})",
            influence.len(),
            from,
            args.category
        )?;
        out.push_str(&render(self.layout(), |c| {
            marker(c, from, None)
                .unwrap_or_else(|| match influence.get(&c) {
                    Some(Some(v)) => digit(*v),
                    Some(None) => '?',
                    None => ' ',
                })
        }));
        Ok(out)
    }

    /// Cell under a plane point
    pub fn locate(&self, args: &LocateArgs) -> Result<String> {
        let point = Point::new(args.x, args.y);
        let layout = self.layout();
        let coord = layout.to_grid_coord(point);
        let mut out = String::new();
        match layout.key(coord) {
            Some(key) => {
                let tile = self.board.tile(coord);
                writeln!(
                    out,
                    "{} -> {} key {} centre {} {} roads {}",
                    point,
                    coord,
                    key.index(),
                    layout.center_of(coord),
                    tile.terrain,
                    tile.roads
                )?;
            }
            None => writeln!(out, "{} -> {} (off map)", point, coord)?,
        }
        Ok(out)
    }

    /// Render the scenario's terrain
    pub fn show(&self) -> String {
        let from = self.scenario.origin;
        let to = self.scenario.target;
        let mut out = format!(
            "{}: {}x{} {:?}\n",
            self.scenario.name, self.scenario.board.cols, self.scenario.board.rows, self.scenario.board.mode
        );
        out.push_str(&render(self.layout(), |c| {
            marker(c, from, Some(to)).unwrap_or_else(|| {
                let tile = self.board.tile(c);
                if tile.terrain == crate::terrain::Terrain::Plain && !tile.roads.is_empty() {
                    '='
                } else {
                    tile.terrain.symbol()
                }
            })
        }));
        out
    }
}

/// Generate a random scenario and write it out
pub fn run_generate(args: &GenerateArgs, seed: Option<u64>) -> Result<String> {
    let mut board = hexgrid_core::BoardConfig::new(args.cols, args.rows);
    if args.horizontal {
        board = board.with_mode(hexgrid_core::GridMode::HorizontalEdge);
    }
    let mut config = GenerateConfig {
        board,
        ..GenerateConfig::default()
    }
    .with_roads(args.roads);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let scenario = generate(&config).context("Failed to generate scenario")?;

    match &args.output {
        Some(path) => {
            scenario.save(path)?;
            tracing::info!("Saved scenario to {}", path.display());
            Ok(Session::new(scenario)?.show())
        }
        None => Ok(serde_json::to_string_pretty(&scenario)? + "\n"),
    }
}
