//! Deterministic random world generation.
//!
//! The grid is divided into a lattice of square regions. Each feature (the
//! two anthills, food blobs, rock formations) is stamped into its own
//! randomly chosen region, so features never overlap. The border stays
//! rocky because every stamp keeps a two-cell margin inside its region.

use crate::rng::Rng;
use crate::world::{Grid, Position, Terrain};

/// Side length of one placement region.
pub const REGION_SIZE: usize = 18;

/// Food per cell of a food blob.
const BLOB_FOOD: u32 = 5;

/// Hex radius of a generated anthill.
const ANTHILL_RADIUS: usize = 6;

/// Centre of a region, relative to its corner.
const REGION_CENTRE: Position = Position::new(8, 8);

/// Parameters for [`generate_world`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGenConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Number of 5x5 food blobs.
    pub food_blobs: usize,
    /// Number of rock formations.
    pub rock_formations: usize,
}

impl Default for MapGenConfig {
    fn default() -> Self {
        Self {
            width: 144,
            height: 144,
            food_blobs: 11,
            rock_formations: 14,
        }
    }
}

/// Error type for world generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapGenError {
    /// Description of the error.
    pub reason: String,
}

impl std::fmt::Display for MapGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "World generation error: {}", self.reason)
    }
}

impl std::error::Error for MapGenError {}

/// Shape of a rock formation.
#[derive(Debug, Clone, Copy)]
enum RockShape {
    /// Two-row horizontal wall.
    Wall,
    /// Hex ring with a gap on the east side.
    Ring,
    /// Diagonal ridge.
    Ridge,
    /// Solid hex blob.
    Boulder,
}

impl RockShape {
    const ALL: [Self; 4] = [Self::Wall, Self::Ring, Self::Ridge, Self::Boulder];

    /// Whether the region-relative cell `(x, y)` is rock.
    fn contains(self, local: Position) -> bool {
        let d = local.distance(REGION_CENTRE);
        match self {
            Self::Wall => (8..=9).contains(&local.y) && (2..=15).contains(&local.x),
            Self::Ring => {
                let in_gap = local.x > REGION_CENTRE.x + 2 && local.y.abs_diff(REGION_CENTRE.y) <= 1;
                (5..=6).contains(&d) && !in_gap
            }
            Self::Ridge => {
                (3..=14).contains(&local.x)
                    && (3..=14).contains(&local.y)
                    && local.x.abs_diff(local.y) <= 1
            }
            Self::Boulder => d <= 3,
        }
    }
}

/// Generate a random world.
///
/// # Errors
///
/// Returns an error if the grid is too small to hold every feature in its
/// own region.
pub fn generate_world(seed: i64, config: &MapGenConfig) -> Result<Grid, MapGenError> {
    let cols = config.width / REGION_SIZE;
    let rows = config.height / REGION_SIZE;
    let needed = 2 + config.food_blobs + config.rock_formations;

    if cols * rows < needed {
        return Err(MapGenError {
            reason: format!(
                "{}x{} grid has {} regions of {REGION_SIZE}x{REGION_SIZE}, need {needed}",
                config.width,
                config.height,
                cols * rows
            ),
        });
    }

    let mut grid = Grid::walled(config.width, config.height).ok_or_else(|| MapGenError {
        reason: "Invalid world dimensions (must be > 0)".to_string(),
    })?;

    let mut rng = Rng::new(seed);
    let mut regions: Vec<usize> = (0..cols * rows).collect();
    let mut take_region = |rng: &mut Rng| {
        #[allow(clippy::cast_possible_truncation)]
        let pick = rng.random_int(regions.len() as u32) as usize;
        let region = regions.remove(pick);
        Position::new((region % cols) * REGION_SIZE, (region / cols) * REGION_SIZE)
    };

    for home in [Terrain::RedAnthill, Terrain::BlackAnthill] {
        let origin = take_region(&mut rng);
        stamp(&mut grid, origin, |local| local.distance(REGION_CENTRE) <= ANTHILL_RADIUS, |grid, pos| {
            grid.set_terrain(pos, home);
        });
    }

    for _ in 0..config.food_blobs {
        let origin = take_region(&mut rng);
        stamp(
            &mut grid,
            origin,
            |local| (6..11).contains(&local.x) && (6..11).contains(&local.y),
            |grid, pos| {
                grid.set_food(pos, BLOB_FOOD);
            },
        );
    }

    for _ in 0..config.rock_formations {
        let origin = take_region(&mut rng);
        #[allow(clippy::cast_possible_truncation)]
        let shape = RockShape::ALL[rng.random_int(RockShape::ALL.len() as u32) as usize];
        stamp(&mut grid, origin, |local| shape.contains(local), |grid, pos| {
            grid.set_terrain(pos, Terrain::Rocky);
        });
    }

    Ok(grid)
}

/// Apply `paint` to every cell of the region at `origin` selected by `select`.
///
/// Region-relative coordinates keep the parity of absolute rows because
/// `REGION_SIZE` is even, so hex shapes look the same in every region.
fn stamp(
    grid: &mut Grid,
    origin: Position,
    select: impl Fn(Position) -> bool,
    mut paint: impl FnMut(&mut Grid, Position),
) {
    for dy in 2..REGION_SIZE - 2 {
        for dx in 2..REGION_SIZE - 2 {
            let local = Position::new(dx, dy);
            if select(local) {
                paint(grid, Position::new(origin.x + dx, origin.y + dy));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Color, parse_grid_str, write_world};

    #[test]
    fn test_generation_is_deterministic() {
        let config = MapGenConfig::default();
        let a = generate_world(99, &config).unwrap();
        let b = generate_world(99, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_world_has_features() {
        let grid = generate_world(1, &MapGenConfig::default()).unwrap();
        let red = grid.anthills().filter(|(_, c)| *c == Color::Red).count();
        let black = grid.anthills().filter(|(_, c)| *c == Color::Black).count();
        assert_eq!(red, black);
        assert!(red > 100);
        assert_eq!(grid.total_food(), 11 * 25 * u64::from(BLOB_FOOD));
    }

    #[test]
    fn test_generated_world_is_a_valid_world_file() {
        let grid = generate_world(5, &MapGenConfig::default()).unwrap();
        let reparsed = parse_grid_str(&write_world(&grid)).unwrap();
        assert_eq!(reparsed, grid);
    }

    #[test]
    fn test_too_small_for_features() {
        let config = MapGenConfig {
            width: 36,
            height: 36,
            ..MapGenConfig::default()
        };
        assert!(generate_world(1, &config).is_err());
    }

    #[test]
    fn test_small_world_with_few_features() {
        let config = MapGenConfig {
            width: 40,
            height: 40,
            food_blobs: 1,
            rock_formations: 1,
        };
        let grid = generate_world(3, &config).unwrap();
        assert_eq!(grid.width(), 40);
        assert_eq!(grid.total_food(), 25 * u64::from(BLOB_FOOD));
    }
}
