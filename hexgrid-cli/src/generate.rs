//! Random scenario generation

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hexgrid_core::{BoardConfig, HexCoord, Layout};

use crate::scenario::{Scenario, TerrainPatch};
use crate::terrain::{Terrain, Unit};

/// Terrain mix of generated boards, in percent
const TERRAIN_WEIGHTS: [(Terrain, u32); 4] = [
    (Terrain::City, 6),
    (Terrain::Wood, 18),
    (Terrain::Mountain, 8),
    (Terrain::Blocked, 4),
];

/// Parameters of a generated scenario
#[derive(Clone, Debug)]
pub struct GenerateConfig {
    pub board: BoardConfig,
    pub roads: usize,
    pub seed: Option<u64>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            roads: 2,
            seed: None,
        }
    }
}

impl GenerateConfig {
    /// Set number of roads
    pub fn with_roads(mut self, roads: usize) -> Self {
        self.roads = roads;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Generate a scenario with random terrain, roads and unit placement
pub fn generate(config: &GenerateConfig) -> hexgrid_core::Result<Scenario> {
    let layout = Layout::new(&config.board)?;
    let mut rng = create_rng(config.seed);
    let cells: Vec<HexCoord> = layout.coords().collect();

    let terrain: Vec<TerrainPatch> = cells
        .iter()
        .filter_map(|&at| {
            let terrain = pick_terrain(&mut rng);
            (terrain != Terrain::Plain).then_some(TerrainPatch { at, terrain })
        })
        .collect();

    let roads = (0..config.roads)
        .map(|_| random_road(&layout, &cells, &mut rng))
        .filter(|road| road.len() > 1)
        .collect();

    // the unit and its target stand on passable ground
    let open: Vec<HexCoord> = cells
        .iter()
        .copied()
        .filter(|c| !terrain.iter().any(|p| p.at == *c && p.terrain == Terrain::Blocked))
        .collect();
    let origin = open.choose(&mut rng).copied().unwrap_or(cells[0]);
    let target = open.choose(&mut rng).copied().unwrap_or(origin);

    let name = match config.seed {
        Some(seed) => format!("generated-{}", seed),
        None => "generated".to_string(),
    };
    tracing::info!(name = %name, cells = cells.len(), patches = terrain.len(), "generated scenario");

    Ok(Scenario {
        name,
        board: config.board.clone(),
        terrain,
        roads,
        unit: Unit::default(),
        origin,
        target,
    })
}

fn pick_terrain<R: Rng>(rng: &mut R) -> Terrain {
    let mut roll = rng.gen_range(0..100);
    for (terrain, weight) in TERRAIN_WEIGHTS {
        if roll < weight {
            return terrain;
        }
        roll -= weight;
    }
    Terrain::Plain
}

/// Wander from a random cell, mostly along the first adjacency slot
fn random_road<R: Rng>(layout: &Layout, cells: &[HexCoord], rng: &mut R) -> Vec<HexCoord> {
    let Some(&start) = cells.choose(rng) else {
        return Vec::new();
    };
    let mut road = vec![start];
    let mut at = start;
    loop {
        let slot = if rng.gen_bool(0.7) { 0 } else { 1 };
        let next = layout.adjacents_of(at)[slot];
        if !layout.is_on_map(next) {
            break;
        }
        road.push(next);
        at = next;
    }
    road
}
