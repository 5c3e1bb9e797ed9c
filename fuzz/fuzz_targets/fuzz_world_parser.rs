#![no_main]

//! World parser fuzzer.
//!
//! Arbitrary text must either fail with an error or give a grid with a
//! rocky border that survives a write/parse round trip.

use antwar::world::{Position, Terrain, parse_grid_str, write_world};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|src: &str| {
    let Ok(grid) = parse_grid_str(src) else {
        return;
    };
    for cell in grid.cells() {
        let Position { x, y } = cell.position();
        if x == 0 || y == 0 || x + 1 == grid.width() || y + 1 == grid.height() {
            assert_eq!(cell.terrain(), Terrain::Rocky);
        }
    }

    let again = parse_grid_str(&write_world(&grid)).expect("written world must parse");
    assert_eq!(grid, again);
});
