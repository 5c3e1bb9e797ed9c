//! ASCII renderer for terminal viewing with ANSI colors.

use std::fmt::Write;

use crate::game::{Ant, Snapshot, World};
use crate::world::{Cell, Color, Position, Terrain};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GRAY: &str = "\x1b[90m";
const YELLOW: &str = "\x1b[33m";

/// ANSI colour for a colony.
const fn colony_color(color: Color) -> &'static str {
    match color {
        Color::Red => "\x1b[31m",
        Color::Black => "\x1b[34m",
    }
}

/// Single-character view of a cell.
///
/// Ants win over terrain: `r`/`b` for an empty-handed ant, `R`/`B` for one
/// carrying food. Otherwise `#` rock, `+`/`-` anthills, a digit for food
/// (9 meaning 9 or more) and `.` for bare ground.
#[must_use]
pub fn cell_glyph(cell: &Cell, occupant: Option<&Ant>) -> char {
    if let Some(ant) = occupant {
        return match (ant.color(), ant.carrying_food()) {
            (Color::Red, false) => 'r',
            (Color::Red, true) => 'R',
            (Color::Black, false) => 'b',
            (Color::Black, true) => 'B',
        };
    }
    match (cell.terrain(), cell.food()) {
        (Terrain::Rocky, _) => '#',
        (_, food @ 1..) => char::from_digit(food.min(9), 10).unwrap_or('9'),
        (Terrain::RedAnthill, 0) => '+',
        (Terrain::BlackAnthill, 0) => '-',
        (Terrain::Clear, 0) => '.',
    }
}

/// Render game state to ASCII with ANSI colors.
///
/// Output format:
/// ```text
/// Turn 42/300000                       [red sampler: 3] [black idle: 0]
/// # # # # #
///  # r . 3 #
/// # . . . #
///  # . b . #
/// # # # # #
///
/// Legend: r/b=ant  R/B=ant with food  +/-=anthill  1-9=food  #=rock
/// red: 1 ants alive   black: 1 ants alive
/// ```
#[must_use]
pub fn render_ascii(world: &World) -> String {
    let names = [
        world.team_name(Color::Red).unwrap_or("?"),
        world.team_name(Color::Black).unwrap_or("?"),
    ];
    render_snapshot(&world.snapshot(), world.config().max_turns, names)
}

/// Render a snapshot; `names` are the red and black team names.
#[must_use]
pub fn render_snapshot(snapshot: &Snapshot, max_turns: u32, names: [&str; 2]) -> String {
    let mut output = String::new();

    let header = format!("Turn {}/{max_turns}", snapshot.turn);
    let _ = write!(output, "{BOLD}{header}{RESET}{}", " ".repeat(40usize.saturating_sub(header.len())));
    for (color, name) in Color::BOTH.into_iter().zip(names) {
        let _ = write!(
            output,
            "{}[{color} {name}: {}]{RESET} ",
            colony_color(color),
            snapshot.score(color)
        );
    }
    output.push('\n');

    let grid = &snapshot.grid;
    for y in 0..grid.height() {
        if y % 2 == 1 {
            output.push(' ');
        }
        for x in 0..grid.width() {
            let Some(cell) = grid.cell(Position::new(x, y)) else {
                continue;
            };
            let occupant = cell.occupant().and_then(|id| snapshot.ants.get(id));
            let glyph = cell_glyph(cell, occupant);
            let paint = match (occupant, cell.terrain()) {
                (Some(ant), _) => colony_color(ant.color()),
                (None, Terrain::Rocky) => GRAY,
                (None, Terrain::RedAnthill) => colony_color(Color::Red),
                (None, Terrain::BlackAnthill) => colony_color(Color::Black),
                (None, Terrain::Clear) if cell.food() > 0 => YELLOW,
                (None, Terrain::Clear) => "",
            };
            if paint.is_empty() {
                output.push(glyph);
            } else {
                let _ = write!(output, "{paint}{glyph}{RESET}");
            }
            output.push(' ');
        }
        output.push('\n');
    }

    output.push_str("\nLegend: r/b=ant  R/B=ant with food  +/-=anthill  1-9=food  #=rock\n");
    for color in Color::BOTH {
        let alive = snapshot
            .ants
            .iter()
            .filter(|a| a.is_alive() && a.color() == color)
            .count();
        let _ = write!(output, "{color}: {alive} ants alive   ");
    }
    output.push('\n');

    output
}
