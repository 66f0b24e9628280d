//! Integration tests for the HexGrid tools
//!
//! Runs the searches over demo and generated scenarios end to end: scenario
//! files, terrain rules, and the text reports.

use hexgrid_cli::commands::{EndpointArgs, GenerateArgs, InfluenceArgs, MovesArgs};
use hexgrid_cli::generate::{generate, GenerateConfig};
use hexgrid_cli::scenario::TerrainPatch;
use hexgrid_cli::terrain::{Terrain, Unit};
use hexgrid_cli::{commands, Scenario, Session};
use hexgrid_core::{HexCoord, Tile};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn c(col: i32, row: i32) -> HexCoord {
    HexCoord::new(col, row)
}

fn demo_with(patches: &[(HexCoord, Terrain)]) -> Scenario {
    let mut scenario = Scenario::demo();
    scenario
        .terrain
        .extend(patches.iter().map(|&(at, terrain)| TerrainPatch { at, terrain }));
    scenario
}

fn endpoints(from: HexCoord, to: HexCoord) -> EndpointArgs {
    EndpointArgs {
        from: Some(from),
        to: Some(to),
    }
}

// ============================================================================
// DEMO BOARD
// ============================================================================

#[test]
fn test_demo_board_shape() {
    let session = Session::new(Scenario::demo()).unwrap();
    let layout = session.board.layout();
    assert_eq!(layout.size(), 67);
    assert!(layout.is_on_map(c(0, 0)));
    assert!(!layout.is_on_map(c(0, 2)));
    assert!(layout.is_on_map(c(12, 6)));
}

#[test]
fn test_demo_moves_use_road_march() {
    let mut session = Session::new(Scenario::demo()).unwrap();
    let unit = Unit::default();

    let mut moves = session.board.possible_moves(&unit, c(0, 0));
    moves.sort_by_key(|h| (h.col, h.row));
    assert_eq!(moves, vec![c(1, 0), c(1, 1), c(1, 2), c(2, 0), c(2, 1), c(2, 2)]);

    // standing on the road, the bonus carries the unit past its points
    let moves = session.board.possible_moves(&unit, c(2, 2));
    assert_eq!(moves.len(), 18);
    assert!(moves.contains(&c(6, 4)));
    let s = session.board.tile(c(6, 4)).scratch();
    assert_eq!(s.budget(), -2);
    assert!(s.road_march());
    assert!(!moves.contains(&c(7, 5)));
}

#[test]
fn test_demo_path_follows_road() {
    let mut session = Session::new(Scenario::demo()).unwrap();
    let path = session
        .board
        .shortest_path(&Unit::default(), c(1, 2), c(9, 6));
    assert_eq!(
        path,
        vec![c(1, 2), c(2, 2), c(3, 2), c(4, 2), c(5, 3), c(6, 4), c(7, 5), c(8, 6), c(9, 6)]
    );
    assert_eq!(session.board.tile(c(9, 6)).scratch().budget(), 8);

    // without a bonus the road earns nothing and another route of the same cost wins
    let walker = Unit {
        road_march_bonus: 0,
        ..Unit::default()
    };
    let path = session.board.shortest_path(&walker, c(1, 2), c(9, 6));
    assert_eq!(path.len(), 9);
    assert_eq!(path[1], c(2, 3));
    assert_eq!(session.board.tile(c(9, 6)).scratch().budget(), 8);
}

#[test]
fn test_wood_blocks_sight() {
    let mut session = Session::new(demo_with(&[(c(3, 0), Terrain::Wood)])).unwrap();
    let los = session.board.line_of_sight(c(1, 0), c(6, 0));
    let blocked: Vec<bool> = los.cells.iter().map(|s| s.blocked).collect();
    assert_eq!(blocked, vec![false, false, false, true, true, true]);

    let layout = session.board.layout();
    let centre = layout.center_of(c(3, 0));
    let contact = los.contact.unwrap();
    assert!((contact.x - (centre.x + layout.half_width())).abs() < 1e-2);
    assert!((contact.y - centre.y).abs() < 1e-2);
}

#[test]
fn test_influence_on_demo() {
    let mut session = Session::new(Scenario::demo()).unwrap();
    let influence = session.board.range_of_influence(&Unit::default(), c(2, 2), 0);
    assert_eq!(influence.len(), 47);
    assert!(!influence.contains_key(&c(2, 2)));
    assert_eq!(influence.get(&c(3, 2)), Some(&Some(10)));
    assert_eq!(influence.get(&c(5, 2)), Some(&Some(7)));
    assert_eq!(influence.get(&c(8, 5)), Some(&Some(4)));

    // a city in range takes less fire
    let mut session = Session::new(demo_with(&[(c(5, 2), Terrain::City)])).unwrap();
    let influence = session.board.range_of_influence(&Unit::default(), c(2, 2), 0);
    assert_eq!(influence.get(&c(5, 2)), Some(&Some(5)));
}

// ============================================================================
// REPORTS
// ============================================================================

#[test]
fn test_reports() {
    let mut session = Session::new(Scenario::demo()).unwrap();

    let out = session.line_of_sight(&endpoints(c(0, 0), c(3, 3))).unwrap();
    assert!(out.starts_with("line of sight [0;0] -> [3;3]: clear\n"), "{}", out);
    assert!(out.contains("cells: [0;0] [1;1] [2;2] [3;3]"), "{}", out);
    assert!(out.contains('U') && out.contains('T'));

    let out = session
        .moves(&MovesArgs {
            from: None,
            mp: None,
        })
        .unwrap();
    assert!(out.starts_with("6 cells reachable from [0;0] with 2 MP (+2 on roads)"), "{}", out);
    let marked: usize = out.lines().skip(1).take(7).map(|l| l.matches('o').count()).sum();
    assert_eq!(marked, 6);

    let out = session.path(&EndpointArgs { from: None, to: None }).unwrap();
    assert!(out.starts_with("path [0;0] -> [3;3]: 3 steps, cost 3"), "{}", out);
    assert!(out.contains("route: [0;0] [1;1] [2;2] [3;3]"));

    let out = session
        .influence(&InfluenceArgs {
            from: Some(c(2, 2)),
            category: 0,
        })
        .unwrap();
    assert!(out.starts_with("47 cells under fire from [2;2]"), "{}", out);
}

// ============================================================================
// SCENARIO FILES
// ============================================================================

#[test]
fn test_scenario_file_round_trip() {
    let path = std::env::temp_dir().join(format!("hexgrid-scenario-{}.json", std::process::id()));
    let scenario = demo_with(&[(c(4, 3), Terrain::Mountain)]);
    scenario.save(&path).unwrap();
    let loaded = Scenario::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, scenario);

    let session = Session::new(loaded).unwrap();
    assert_eq!(session.board.tile(c(4, 3)).terrain, Terrain::Mountain);
}

#[test]
fn test_load_rejects_off_map_unit() {
    let path = std::env::temp_dir().join(format!("hexgrid-bad-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"origin": {"col": 0, "row": 5}}"#).unwrap();
    let err = Scenario::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(format!("{:#}", err).contains("[0;5] is not on the map"), "{:#}", err);
}

#[test]
fn test_generate_command_is_seeded() {
    let args = GenerateArgs {
        cols: 8,
        rows: 6,
        horizontal: true,
        roads: 3,
        output: None,
    };
    let a = commands::run_generate(&args, Some(11)).unwrap();
    let b = commands::run_generate(&args, Some(11)).unwrap();
    assert_eq!(a, b);
    let scenario: Scenario = serde_json::from_str(&a).unwrap();
    assert_eq!(scenario.name, "generated-11");
    scenario.validate().unwrap();
}

// ============================================================================
// GENERATED BOARDS
// ============================================================================

#[test]
fn test_searches_on_generated_boards() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for seed in 0..5 {
        let scenario = generate(&GenerateConfig::default().with_seed(seed).with_roads(3)).unwrap();
        let mut session = Session::new(scenario).unwrap();
        let cells: Vec<HexCoord> = session.board.layout().coords().collect();
        let unit = Unit::default();

        for _ in 0..20 {
            let from = *cells.choose(&mut rng).unwrap();
            let to = *cells.choose(&mut rng).unwrap();

            let los = session.board.line_of_sight(from, to);
            assert_eq!(los.cells.first().map(|s| s.coord), Some(from));
            assert_eq!(los.cells.last().map(|s| s.coord), Some(to));
            assert_eq!(los.is_clear(), los.cells.iter().all(|s| !s.blocked));

            let path = session.board.shortest_path(&unit, from, to);
            if !path.is_empty() {
                assert_eq!(path.first(), Some(&from));
                assert_eq!(path.last(), Some(&to));
                let layout = session.board.layout();
                assert!(path
                    .windows(2)
                    .all(|w| layout.direction_between(w[0], w[1]).is_some()));
                assert!(path
                    .iter()
                    .all(|h| session.board.tile(*h).terrain != Terrain::Blocked));
            }

            let moves = session.board.possible_moves(&unit, from);
            assert!(!moves.contains(&from));
            assert!(moves
                .iter()
                .all(|h| session.board.layout().hex_distance(from, *h) <= 4));
        }
    }
}
