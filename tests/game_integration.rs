//! Multi-turn integration tests for game mechanics.
//!
//! These tests drive whole games through the public API: world and brain
//! files in, scores and final state out.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use antwar::game::{ENCIRCLEMENT_BONUS, check_invariants, render_dump, render_header};
use antwar::replay::{Recording, ReplayEngine};
use antwar::tournament::{
    TournamentConfig, load_arena, load_entrants, run_game, run_match, run_tournament,
};
use antwar::world::Terrain;
use antwar::{
    Color, MatchConfig, MatchError, Phase, Position, World, parse_brain, parse_brain_str,
    parse_world, parse_world_str,
};
use tempfile::TempDir;

/// Load a brain from the `brains` directory.
fn load_brain(name: &str) -> Arc<antwar::Brain> {
    let path = format!("{}/brains/{name}.brain", env!("CARGO_MANIFEST_DIR"));
    Arc::new(parse_brain(&path).unwrap_or_else(|e| panic!("Failed to load {path}: {e}")))
}

fn sample_world() -> World {
    parse_world(format!("{}/worlds/tiny.world", env!("CARGO_MANIFEST_DIR"))).unwrap()
}

const FIVE_BY_FIVE: &str = "\
5
5
# # # # #
 # + 3 . #
# . . . #
 # . . . #
# # # # #
";

#[test]
fn test_sense_here_loop_keeps_state_and_food() {
    let mut world = parse_world_str(FIVE_BY_FIVE).unwrap();
    let brain = parse_brain_str("looper", "Sense Here 0 0 Food").unwrap();
    world.begin_game(brain.clone(), brain);

    world.step_turn().unwrap();

    assert_eq!(world.ants().len(), 1);
    let ant = &world.ants()[0];
    assert_eq!(ant.state(), 0);
    assert_eq!(ant.position(), Position::new(1, 1));
    assert_eq!(world.grid().total_food() + world.carried_food(), 3);
    assert_eq!(world.turn(), 1);
}

#[test]
fn test_sample_game_runs_to_turn_limit() {
    let mut world = sample_world();
    world.set_config(MatchConfig {
        max_turns: 2_000,
        ..MatchConfig::default()
    });
    world.begin_game(load_brain("forager"), load_brain("marker"));

    let mut turns_seen = 0;
    world
        .run(|w, report| {
            turns_seen += 1;
            assert_eq!(report.turn, w.turn());
        })
        .unwrap();

    assert_eq!(turns_seen, 2_000);
    assert_eq!(world.phase(), Phase::Finished);
    assert_eq!(world.step_turn(), Err(MatchError::Finished));
    assert!(check_invariants(&world).is_empty());
}

#[test]
fn test_games_are_deterministic() {
    let grid = load_arena(
        Some(std::path::Path::new(&format!(
            "{}/worlds/tiny.world",
            env!("CARGO_MANIFEST_DIR")
        ))),
        0,
    )
    .unwrap();
    let config = MatchConfig {
        seed: 99,
        max_turns: 3_000,
        ..MatchConfig::default()
    };
    let (red, black) = (load_brain("forager"), load_brain("marker"));

    let a = run_game(&grid, &red, &black, &config);
    let b = run_game(&grid, &red, &black, &config);
    assert_eq!(a, b);
    assert_eq!(a.turns_played, 3_000);
}

#[test]
fn test_forager_brings_food_home() {
    let grid = load_arena(
        Some(std::path::Path::new(&format!(
            "{}/worlds/tiny.world",
            env!("CARGO_MANIFEST_DIR")
        ))),
        0,
    )
    .unwrap();
    let config = MatchConfig {
        max_turns: 20_000,
        ..MatchConfig::default()
    };

    let result = run_game(&grid, &load_brain("forager"), &load_brain("spinner"), &config);
    assert!(result.red_score > 0, "{result:?}");
    assert_eq!(result.black_score, 0);
    assert_eq!(result.winner(), Some(Color::Red));
}

/// Red hill at (2, 2) with black hills on five of its six neighbours.
const SURROUNDED: &str = "\
7
7
# # # # # # #
 # - . . . . #
# - + - . . #
 # - - . . . #
# . . . . . #
 # . . . . . #
# # # # # # #
";

#[test]
fn test_encirclement_five_enemies_kills() {
    let mut world = parse_world_str(SURROUNDED).unwrap();
    let spinner = load_brain("spinner");
    world.begin_game(Arc::clone(&spinner), spinner);
    let victim = Position::new(2, 2);
    // Ids follow row-major order: black (1, 1) and (1, 2) come first.
    assert_eq!(world.cell(victim).unwrap().occupant(), Some(2));

    let report = world.step_turn().unwrap();

    assert_eq!(report.kills.len(), 1);
    assert_eq!(report.kills[0].color, Color::Red);
    assert_eq!(world.alive_count(Color::Red), 0);
    assert_eq!(world.alive_count(Color::Black), 5);
    let cell = world.cell(victim).unwrap();
    assert!(cell.is_free());
    assert_eq!(cell.food(), ENCIRCLEMENT_BONUS);
    // The bonus lands on red's own anthill.
    assert_eq!(world.red_score(), ENCIRCLEMENT_BONUS);
    assert!(check_invariants(&world).is_empty());
}

#[test]
fn test_encirclement_four_enemies_survives() {
    let four = SURROUNDED.replace(" # - - . . . #", " # - . . . . #");
    let mut world = parse_world_str(&four).unwrap();
    let spinner = load_brain("spinner");
    world.begin_game(Arc::clone(&spinner), spinner);

    for _ in 0..10 {
        let report = world.step_turn().unwrap();
        assert!(report.kills.is_empty());
    }
    assert_eq!(world.alive_count(Color::Red), 1);
}

#[test]
fn test_pickup_and_drop_at_home() {
    // Ant on a red hill with food one step east: fetch it and come back.
    let src = "\
6
3
# # # # # #
 # + 2 . . #
# # # # # #
";
    let brain = parse_brain_str(
        "fetch",
        "move 1 0\npickup 2 2\nturn left 3\nturn left 4\nturn left 5\nmove 6 5\ndrop 7\nturn left 7\n",
    )
    .unwrap();
    let mut world = parse_world_str(src).unwrap();
    world.set_config(MatchConfig {
        rest_after_move: 0,
        ..MatchConfig::default()
    });
    world.begin_game(brain.clone(), parse_brain_str("idle", "turn left 0").unwrap());

    for _ in 0..10 {
        world.step_turn().unwrap();
    }

    assert_eq!(world.red_score(), 1);
    assert_eq!(world.cell(Position::new(2, 1)).unwrap().food(), 1);
    assert!(!world.ants()[0].carrying_food());
    assert_eq!(world.ants()[0].position(), Position::new(1, 1));
}

#[test]
fn test_runtime_fault_removes_ant_and_game_continues() {
    let mut world = parse_world_str(FIVE_BY_FIVE).unwrap();
    // State 1 jumps to state 5, which does not exist.
    let broken = parse_brain_str("broken", "turn left 1\nturn left 5\n").unwrap();
    assert_eq!(broken.dangling_targets(), vec![(1, 5)]);
    world.begin_game(broken.clone(), broken);

    world.step_turn().unwrap();
    world.step_turn().unwrap();
    assert_eq!(world.faulted_count(), 0);

    let report = world.step_turn().unwrap();
    assert_eq!(report.faults.len(), 1);
    assert_eq!(world.alive_count(Color::Red), 0);
    assert_eq!(world.phase(), Phase::Running);
    world.step_turn().unwrap();
}

#[test]
fn test_swap_brains_restarts() {
    let mut world = sample_world();
    world.begin_game(load_brain("forager"), load_brain("spinner"));
    for _ in 0..50 {
        world.step_turn().unwrap();
    }

    world.swap_brains().unwrap();
    assert_eq!(world.turn(), 0);
    assert_eq!(world.team_name(Color::Red), Some("spinner"));
    assert_eq!(world.team_name(Color::Black), Some("forager"));
    assert_eq!(world.grid().total_food(), world.initial_food());
}

#[test]
fn test_stop_finishes_game() {
    let mut world = sample_world();
    world.begin_game(load_brain("forager"), load_brain("marker"));
    let control = world.control();

    world
        .run(|w, _| {
            if w.turn() == 25 {
                control.stop();
            }
        })
        .unwrap();

    assert_eq!(world.turn(), 25);
    assert_eq!(world.phase(), Phase::Finished);
}

#[test]
fn test_dump_has_one_line_per_cell() {
    let mut world = sample_world();
    world.begin_game(load_brain("forager"), load_brain("marker"));
    world.step_turn().unwrap();

    assert_eq!(render_header(&world), "random seed: 12345\n");
    let dump = render_dump(&world);
    assert!(dump.starts_with("\nAfter round 1...\n"));
    assert_eq!(dump.lines().filter(|l| l.starts_with("cell ")).count(), 100);
    assert!(dump.contains("cell (3, 3): red hill; "));
}

#[test]
fn test_match_and_tournament_from_files() {
    let dir = TempDir::new().unwrap();
    let names = ["forager", "spinner", "marker"];
    let mut paths = Vec::new();
    for name in names {
        let src = fs::read_to_string(format!(
            "{}/brains/{name}.brain",
            env!("CARGO_MANIFEST_DIR")
        ))
        .unwrap();
        let path = dir.path().join(format!("{name}.brain"));
        fs::write(&path, src).unwrap();
        paths.push(path);
    }
    let world_path = dir.path().join("arena.world");
    fs::copy(
        format!("{}/worlds/tiny.world", env!("CARGO_MANIFEST_DIR")),
        &world_path,
    )
    .unwrap();

    let entrants = load_entrants(&paths).unwrap();
    let grid = load_arena(Some(&world_path), 0).unwrap();
    let config = TournamentConfig {
        game: MatchConfig {
            max_turns: 10_000,
            ..MatchConfig::default()
        },
        max_match_rounds: 2,
    };

    let m = run_match(&grid, &entrants[0], &entrants[1], &config);
    assert_eq!(m.winner, "forager");
    assert!(m.games.len() >= 2);

    let result = run_tournament(&grid, &entrants, &config).unwrap();
    assert_eq!(result.bracket.len(), 3);
    assert_eq!(result.rounds.len(), 2);
    assert!(names.contains(&result.champion.as_str()));
}

#[test]
fn test_recording_replays_game() {
    let dir = TempDir::new().unwrap();
    let world = sample_world();
    let config = MatchConfig {
        seed: 5,
        max_turns: 400,
        ..MatchConfig::default()
    };
    let (red, black) = (load_brain("forager"), load_brain("marker"));
    let recording = Recording::new(world.grid(), &red, &black, config);
    let path = dir.path().join("game.json");
    recording.save(&path).unwrap();

    let mut engine = ReplayEngine::new(Recording::load(&path).unwrap()).unwrap();
    engine.goto_turn(400).unwrap();
    assert!(engine.is_game_over());

    let direct = run_game(world.grid(), &red, &black, &config);
    assert_eq!(engine.world().red_score(), direct.red_score);
    assert_eq!(engine.world().black_score(), direct.black_score);
    assert_eq!(
        engine.world().alive_count(Color::Black),
        direct.black_alive
    );
}

#[test]
fn test_world_rejects_open_border() {
    let open = FIVE_BY_FIVE.replace("# . . . #", ". . . . #");
    assert!(parse_world_str(&open).is_err());
    let world = parse_world_str(FIVE_BY_FIVE).unwrap();
    assert_eq!(
        world.cell(Position::new(1, 1)).unwrap().terrain(),
        Terrain::RedAnthill
    );
}
