//! The hex grid: cell storage, adjacency and world files.
//!
//! A [`Grid`] is built once from a world file (or the generator) and is
//! never resized. Terrain is fixed after construction; only food, markers
//! and occupants change during play, through the game layer.

mod cell;
mod geometry;
mod mapgen;
mod parser;

pub use cell::{AntId, Cell, Color, MARKER_COUNT, Marker, Terrain};
pub use geometry::{Direction, Position};
pub use mapgen::{MapGenConfig, MapGenError, REGION_SIZE, generate_world};
pub use parser::{parse_grid, parse_grid_str, parse_world, parse_world_str, write_world};

/// A rectangular hex grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of clear, empty cells.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Position::new(x, y), Terrain::Clear, 0)))
            .collect();

        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Create a grid whose border is rocky and interior clear.
    #[must_use]
    pub fn walled(width: usize, height: usize) -> Option<Self> {
        let mut grid = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                if grid.is_border(Position::new(x, y)) {
                    grid.set_terrain(Position::new(x, y), Terrain::Rocky);
                }
            }
        }
        Some(grid)
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether `pos` lies on the grid.
    #[must_use]
    pub const fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Whether `pos` is on the outermost ring of cells.
    #[must_use]
    pub const fn is_border(&self, pos: Position) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 == self.width || pos.y + 1 == self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    /// The cell at `pos`, or `None` off the grid.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(|idx| &mut self.cells[idx])
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The neighbour of `pos` in `dir`, or `None` if it is off the grid.
    #[must_use]
    pub fn adjacent(&self, pos: Position, dir: Direction) -> Option<Position> {
        pos.step(dir).filter(|&p| self.in_bounds(p))
    }

    /// All on-grid neighbours of `pos`.
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.adjacent(pos, dir))
    }

    /// Replace the terrain at `pos`, keeping food unless the new terrain
    /// is rock. Construction only.
    ///
    /// Returns `false` if `pos` is off the grid.
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> bool {
        match self.cell_mut(pos) {
            Some(cell) => {
                let food = if terrain.is_passable() { cell.food() } else { 0 };
                *cell = Cell::new(pos, terrain, food);
                true
            }
            None => false,
        }
    }

    /// Set the food at `pos`. Construction only.
    ///
    /// Returns `false` if `pos` is off the grid or rocky.
    pub fn set_food(&mut self, pos: Position, food: u32) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.terrain().is_passable() => {
                cell.set_food(food);
                true
            }
            _ => false,
        }
    }

    /// Total food lying on all cells.
    #[must_use]
    pub fn total_food(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.food())).sum()
    }

    /// Food lying on the anthill cells of `color`.
    #[must_use]
    pub fn anthill_food(&self, color: Color) -> u32 {
        let home = color.anthill();
        self.cells
            .iter()
            .filter(|c| c.terrain() == home)
            .map(Cell::food)
            .fold(0u32, u32::saturating_add)
    }

    /// Anthill cells in row-major order, with their colour.
    pub fn anthills(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        self.cells
            .iter()
            .filter_map(|c| c.terrain().anthill_of().map(|color| (c.position(), color)))
    }
}
