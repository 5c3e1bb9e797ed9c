//! Plain-text dumps of the whole world, one line per cell.
//!
//! Useful for diffing two runs turn by turn. A line looks like
//!
//! ```text
//! cell (3, 2): 2 food; red hill; red marks: 04; red ant of id 5, dir 1, food 0, state 12, resting 3
//! ```

use std::fmt::Write;

use crate::game::{Ant, World};
use crate::world::{Cell, Color, MARKER_COUNT, Terrain};

/// Header printed once before the first turn dump.
#[must_use]
pub fn render_header(world: &World) -> String {
    format!("random seed: {}\n", world.config().seed)
}

/// Dump every cell in row-major order, preceded by the turn number.
#[must_use]
pub fn render_dump(world: &World) -> String {
    let mut out = format!("\nAfter round {}...\n", world.turn());
    for cell in world.grid().cells() {
        let occupant = cell.occupant().and_then(|id| world.ant(id));
        let _ = writeln!(out, "{}", describe_cell(cell, occupant));
    }
    out
}

/// One dump line for `cell`.
#[must_use]
pub fn describe_cell(cell: &Cell, occupant: Option<&Ant>) -> String {
    let mut line = format!("cell {}: ", cell.position());

    if cell.food() > 0 {
        let _ = write!(line, "{} food; ", cell.food());
    }
    match cell.terrain() {
        Terrain::Rocky => line.push_str("rock "),
        Terrain::RedAnthill => line.push_str("red hill; "),
        Terrain::BlackAnthill => line.push_str("black hill; "),
        Terrain::Clear => {}
    }
    for color in Color::BOTH {
        if cell.has_any_marker(color) {
            #[allow(clippy::cast_possible_truncation)]
            let marks: String = (0..MARKER_COUNT)
                .filter(|&i| cell.markers(color)[i])
                .map(|i| char::from(b'0' + i as u8))
                .collect();
            let _ = write!(line, "{color} marks: {marks}; ");
        }
    }
    if let Some(ant) = occupant {
        let _ = write!(
            line,
            "{} ant of id {}, dir {}, food {}, state {}, resting {}",
            ant.color(),
            ant.id(),
            ant.direction().index(),
            u8::from(ant.carrying_food()),
            ant.state(),
            ant.resting()
        );
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::parse_brain_str;
    use crate::world::{Marker, Position, parse_grid_str};

    const TINY: &str = "\
4
4
# # # #
 # + 2 #
# . - #
 # # # #
";

    #[test]
    fn test_dump_lines() {
        let mut world = crate::game::World::new(parse_grid_str(TINY).unwrap());
        world.begin_game(
            parse_brain_str("r", "mark 0 1\nmark 4 1\n").unwrap(),
            parse_brain_str("b", "turn right 0").unwrap(),
        );
        world.step_turn().unwrap();
        world.step_turn().unwrap();

        let dump = render_dump(&world);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[1], "After round 2...");
        assert_eq!(lines[2], "cell (0, 0): rock ");
        assert_eq!(
            lines[2 + 5],
            "cell (1, 1): red hill; red marks: 04; red ant of id 0, dir 0, food 0, state 1, resting 0"
        );
        assert_eq!(lines[2 + 6], "cell (2, 1): 2 food; ");
        assert_eq!(
            lines[2 + 10],
            "cell (2, 2): black hill; black ant of id 1, dir 2, food 0, state 0, resting 0"
        );
        assert_eq!(lines.len(), 2 + 16);
    }

    #[test]
    fn test_describe_foe_marks() {
        let mut world = crate::game::World::new(parse_grid_str(TINY).unwrap());
        world
            .grid
            .cell_mut(Position::new(1, 2))
            .unwrap()
            .set_marker(Color::Black, Marker::new(5).unwrap());
        let line = describe_cell(world.cell(Position::new(1, 2)).unwrap(), None);
        assert_eq!(line, "cell (1, 2): black marks: 5; ");
        assert_eq!(render_header(&world), "random seed: 12345\n");
    }
}
