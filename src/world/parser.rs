//! World-file reading and writing.
//!
//! Format: the width on line 1, the height on line 2, then `height` rows of
//! `width` cell characters. Spaces inside rows only serve to stagger odd
//! rows visually and are ignored.
//!
//! | Char | Cell |
//! |---|---|
//! | `.` | clear, no food |
//! | `1`-`9` | clear with that much food |
//! | `#` | rocky |
//! | `+` | red anthill |
//! | `-` | black anthill |
//!
//! Every border cell must be rocky.

use std::fs;
use std::path::Path;

use crate::error::WorldError;
use crate::game::World;
use crate::world::{Grid, Position, Terrain};

/// Parse a world file into a ready-to-start [`World`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn parse_world(path: impl AsRef<Path>) -> Result<World, WorldError> {
    parse_grid(path).map(World::new)
}

/// Parse world-file text into a ready-to-start [`World`].
///
/// # Errors
///
/// Returns an error if the text is malformed.
pub fn parse_world_str(src: &str) -> Result<World, WorldError> {
    parse_grid_str(src).map(World::new)
}

/// Parse a world file into a bare [`Grid`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn parse_grid(path: impl AsRef<Path>) -> Result<Grid, WorldError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path)
        .map_err(|e| WorldError::Io(format!("{}: {e}", path.display())))?;
    parse_grid_str(&src)
}

/// Parse world-file text into a bare [`Grid`].
///
/// # Errors
///
/// Returns an error if the text is malformed.
pub fn parse_grid_str(src: &str) -> Result<Grid, WorldError> {
    let mut lines = src.lines();
    let width = parse_dimension(lines.next(), "width")?;
    let height = parse_dimension(lines.next(), "height")?;

    let mut rows: Vec<&str> = lines.collect();
    while rows.last().is_some_and(|row| row.trim().is_empty()) {
        rows.pop();
    }
    if rows.len() != height {
        return Err(WorldError::RowCountMismatch {
            expected: height,
            found: rows.len(),
        });
    }

    let rows = rows
        .iter()
        .enumerate()
        .map(|(y, row)| {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() == width {
                Ok(cells)
            } else {
                Err(WorldError::RowLengthMismatch {
                    row: y,
                    expected: width,
                    found: cells.len(),
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut grid = Grid::new(width, height)
        .ok_or_else(|| WorldError::BadDimensions(format!("{width}x{height}")))?;

    for (y, cells) in rows.iter().enumerate() {
        for (x, &ch) in cells.iter().enumerate() {
            let (terrain, food) = decode_cell(ch).ok_or(WorldError::InvalidChar {
                row: y,
                column: x,
                ch,
            })?;
            let pos = Position::new(x, y);
            grid.set_terrain(pos, terrain);
            grid.set_food(pos, food);
        }
    }

    if let Some(cell) = grid
        .cells()
        .iter()
        .find(|c| grid.is_border(c.position()) && c.terrain() != Terrain::Rocky)
    {
        let pos = cell.position();
        return Err(WorldError::NonRockyBorder { x: pos.x, y: pos.y });
    }

    Ok(grid)
}

fn parse_dimension(line: Option<&str>, what: &str) -> Result<usize, WorldError> {
    let line = line.ok_or_else(|| WorldError::BadDimensions(format!("missing {what}")))?;
    match line.trim().parse::<usize>() {
        Ok(0) => Err(WorldError::BadDimensions(format!("{what} must be positive"))),
        Ok(n) => Ok(n),
        Err(_) => Err(WorldError::BadDimensions(format!(
            "{what} is not a number: {:?}",
            line.trim()
        ))),
    }
}

fn decode_cell(ch: char) -> Option<(Terrain, u32)> {
    match ch {
        '.' => Some((Terrain::Clear, 0)),
        '#' => Some((Terrain::Rocky, 0)),
        '+' => Some((Terrain::RedAnthill, 0)),
        '-' => Some((Terrain::BlackAnthill, 0)),
        '1'..='9' => ch.to_digit(10).map(|food| (Terrain::Clear, food)),
        _ => None,
    }
}

/// Render a grid in world-file format.
///
/// Odd rows are indented by one space and cells are separated by spaces.
/// Only terrain and clear-cell food are written; food above 9 is written
/// as 9 and food on anthills is dropped, so this is lossless only for
/// freshly built grids.
#[must_use]
pub fn write_world(grid: &Grid) -> String {
    let mut out = format!("{}\n{}\n", grid.width(), grid.height());
    for y in 0..grid.height() {
        if y % 2 == 1 {
            out.push(' ');
        }
        let row: Vec<String> = (0..grid.width())
            .filter_map(|x| grid.cell(Position::new(x, y)))
            .map(|cell| {
                match cell.terrain() {
                    Terrain::Rocky => '#',
                    Terrain::RedAnthill => '+',
                    Terrain::BlackAnthill => '-',
                    Terrain::Clear => match cell.food() {
                        0 => '.',
                        // min(9) keeps the value a single decimal digit
                        #[allow(clippy::cast_possible_truncation)]
                        food => char::from(b'0' + food.min(9) as u8),
                    },
                }
                .to_string()
            })
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Color;

    const TINY: &str = "\
5
5
# # # # #
 # + . 3 #
# . . . #
 # . - . #
# # # # #
";

    #[test]
    fn test_parse_tiny_world() {
        let grid = parse_grid_str(TINY).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        assert_eq!(
            grid.cell(Position::new(1, 1)).unwrap().terrain(),
            Terrain::RedAnthill
        );
        assert_eq!(grid.cell(Position::new(3, 1)).unwrap().food(), 3);
        assert_eq!(grid.anthills().filter(|(_, c)| *c == Color::Black).count(), 1);
    }

    #[test]
    fn test_write_then_parse_preserves_grid() {
        let grid = parse_grid_str(TINY).unwrap();
        let text = write_world(&grid);
        assert!(text.starts_with("5\n5\n# # # # #\n # + . 3 #\n"));
        assert_eq!(parse_grid_str(&text).unwrap(), grid);
    }

    #[test]
    fn test_non_rocky_border() {
        let src = "3\n3\n###\n#..\n###\n";
        assert_eq!(
            parse_grid_str(src),
            Err(WorldError::NonRockyBorder { x: 2, y: 1 })
        );
    }

    #[test]
    fn test_invalid_char() {
        let src = "3\n3\n###\n#x#\n###\n";
        assert_eq!(
            parse_grid_str(src),
            Err(WorldError::InvalidChar {
                row: 1,
                column: 1,
                ch: 'x'
            })
        );
    }

    #[test]
    fn test_zero_food_digit_is_invalid() {
        let src = "3\n3\n###\n#0#\n###\n";
        assert!(matches!(
            parse_grid_str(src),
            Err(WorldError::InvalidChar { ch: '0', .. })
        ));
    }

    #[test]
    fn test_row_length_mismatch() {
        let src = "4\n3\n####\n#..\n####\n";
        assert_eq!(
            parse_grid_str(src),
            Err(WorldError::RowLengthMismatch {
                row: 1,
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_bad_dimensions() {
        assert!(matches!(
            parse_grid_str("abc\n3\n"),
            Err(WorldError::BadDimensions(_))
        ));
        assert!(matches!(
            parse_grid_str("0\n3\n"),
            Err(WorldError::BadDimensions(_))
        ));
        assert!(matches!(parse_grid_str(""), Err(WorldError::BadDimensions(_))));
    }

    #[test]
    fn test_row_count_mismatch() {
        let src = "3\n4\n###\n#.#\n###\n";
        assert_eq!(
            parse_grid_str(src),
            Err(WorldError::RowCountMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_grid("/definitely/not/here.world"),
            Err(WorldError::Io(_))
        ));
    }
}
