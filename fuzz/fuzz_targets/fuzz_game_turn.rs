#![no_main]

//! Full game turn fuzzer.
//!
//! Builds a small walled world and two brains from fuzzer input, plays a
//! few dozen turns and checks the game invariants after every turn. Any
//! pair of valid brains must play without panicking or creating food.

use arbitrary::Arbitrary;
use antwar::brain::parse_brain_str;
use antwar::game::{MatchConfig, World, check_invariants};
use antwar::world::{Grid, Position, Terrain};
use libfuzzer_sys::fuzz_target;

/// A cell to customise inside the border.
#[derive(Arbitrary, Debug)]
struct FuzzCell {
    x: u8,
    y: u8,
    kind: u8,
}

/// Structured input for game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    /// Interior cells to turn into rock, food or anthills.
    cells: Vec<FuzzCell>,
    /// Red program text.
    red: String,
    /// Black program text.
    black: String,
    /// RNG seed.
    seed: i64,
    /// Turns to play.
    num_turns: u8,
    /// Rest after a move.
    rest: u8,
}

const SIZE: usize = 12;

fuzz_target!(|input: GameInput| {
    let (Ok(red), Ok(black)) = (
        parse_brain_str("red", &input.red),
        parse_brain_str("black", &input.black),
    ) else {
        return;
    };

    let Some(mut grid) = Grid::walled(SIZE, SIZE) else {
        return;
    };
    for cell in input.cells.iter().take(60) {
        let pos = Position::new(
            1 + usize::from(cell.x) % (SIZE - 2),
            1 + usize::from(cell.y) % (SIZE - 2),
        );
        match cell.kind % 5 {
            0 => {
                grid.set_terrain(pos, Terrain::Rocky);
            }
            1 => {
                grid.set_terrain(pos, Terrain::RedAnthill);
            }
            2 => {
                grid.set_terrain(pos, Terrain::BlackAnthill);
            }
            _ => {
                grid.set_food(pos, u32::from(cell.kind % 10));
            }
        }
    }

    let config = MatchConfig {
        seed: input.seed,
        max_turns: u32::from(input.num_turns % 64).max(1),
        rest_after_move: u32::from(input.rest % 16),
        ..MatchConfig::default()
    };
    let mut world = World::with_config(grid, config);
    world.begin_game(red, black);

    while world.step_turn().is_ok() {
        let violations = check_invariants(&world);
        assert!(violations.is_empty(), "{violations:?}");
    }
    assert_eq!(world.turn(), config.max_turns);
});
