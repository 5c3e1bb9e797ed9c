//! Cells, terrain, colony colours and chemical markers.

use std::fmt;

use crate::world::Position;

/// Identifier of an ant, assigned in creation order from 0.
pub type AntId = usize;

/// Number of distinct markers per colour.
pub const MARKER_COUNT: usize = 6;

/// Fixed terrain of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Terrain {
    /// Impassable rock.
    Rocky = 0,
    /// Open ground.
    Clear = 1,
    /// Home of the red colony.
    RedAnthill = 2,
    /// Home of the black colony.
    BlackAnthill = 3,
}

impl Terrain {
    /// Whether an ant may stand on this terrain.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Rocky)
    }

    /// The colony this terrain is home to, if any.
    #[must_use]
    pub const fn anthill_of(self) -> Option<Color> {
        match self {
            Self::RedAnthill => Some(Color::Red),
            Self::BlackAnthill => Some(Color::Black),
            Self::Rocky | Self::Clear => None,
        }
    }
}

/// Colony colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// The red colony.
    Red,
    /// The black colony.
    Black,
}

impl Color {
    /// Both colours, red first.
    pub const BOTH: [Self; 2] = [Self::Red, Self::Black];

    /// The opposing colony.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// The anthill terrain belonging to this colony.
    #[must_use]
    pub const fn anthill(self) -> Terrain {
        match self {
            Self::Red => Terrain::RedAnthill,
            Self::Black => Terrain::BlackAnthill,
        }
    }

    /// Lower-case name used in dumps and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated marker number in `0..6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(u8);

impl Marker {
    /// Validate a marker number.
    #[must_use]
    pub const fn new(n: u8) -> Option<Self> {
        if (n as usize) < MARKER_COUNT {
            Some(Self(n))
        } else {
            None
        }
    }

    /// The marker number.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    terrain: Terrain,
    food: u32,
    occupant: Option<AntId>,
    red_markers: [bool; MARKER_COUNT],
    black_markers: [bool; MARKER_COUNT],
}

impl Cell {
    /// Create an unoccupied, unmarked cell.
    #[must_use]
    pub const fn new(position: Position, terrain: Terrain, food: u32) -> Self {
        Self {
            position,
            terrain,
            food,
            occupant: None,
            red_markers: [false; MARKER_COUNT],
            black_markers: [false; MARKER_COUNT],
        }
    }

    /// Where this cell sits on the grid.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The cell's terrain.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Food particles lying here.
    #[must_use]
    pub const fn food(&self) -> u32 {
        self.food
    }

    /// The ant standing here, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<AntId> {
        self.occupant
    }

    /// Whether an ant could move onto this cell right now.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.terrain.is_passable() && self.occupant.is_none()
    }

    /// Whether `color` has set `marker` here.
    #[must_use]
    pub const fn has_marker(&self, color: Color, marker: Marker) -> bool {
        self.markers(color)[marker.index()]
    }

    /// Whether `color` has any marker set here.
    #[must_use]
    pub fn has_any_marker(&self, color: Color) -> bool {
        self.markers(color).iter().any(|&set| set)
    }

    /// Marker bits of `color`, indexed by marker number.
    #[must_use]
    pub const fn markers(&self, color: Color) -> &[bool; MARKER_COUNT] {
        match color {
            Color::Red => &self.red_markers,
            Color::Black => &self.black_markers,
        }
    }

    pub(crate) fn set_marker(&mut self, color: Color, marker: Marker) {
        self.markers_mut(color)[marker.index()] = true;
    }

    pub(crate) fn clear_marker(&mut self, color: Color, marker: Marker) {
        self.markers_mut(color)[marker.index()] = false;
    }

    fn markers_mut(&mut self, color: Color) -> &mut [bool; MARKER_COUNT] {
        match color {
            Color::Red => &mut self.red_markers,
            Color::Black => &mut self.black_markers,
        }
    }

    pub(crate) fn set_food(&mut self, food: u32) {
        self.food = food;
    }

    pub(crate) fn add_food(&mut self, amount: u32) {
        self.food = self.food.saturating_add(amount);
    }

    /// Remove one particle. Returns `false` if there was none.
    pub(crate) fn take_food(&mut self) -> bool {
        if self.food == 0 {
            return false;
        }
        self.food -= 1;
        true
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<AntId>) {
        self.occupant = occupant;
    }
}
