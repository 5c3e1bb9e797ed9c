//! Hex-grid geometry: positions, facing directions and adjacency.
//!
//! The grid uses offset coordinates with odd rows shifted half a cell to
//! the right, so the coordinate delta for the four diagonal directions
//! depends on the parity of the row.

use std::fmt;

/// A cell coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate in `dir`, ignoring the grid's far edges.
    ///
    /// Returns `None` if the step would go below zero on either axis.
    #[must_use]
    pub fn step(self, dir: Direction) -> Option<Self> {
        let even = self.y % 2 == 0;
        let (x, y) = match dir {
            Direction::East => (self.x.checked_add(1)?, self.y),
            Direction::West => (self.x.checked_sub(1)?, self.y),
            Direction::SouthEast if even => (self.x, self.y + 1),
            Direction::SouthEast => (self.x + 1, self.y + 1),
            Direction::SouthWest if even => (self.x.checked_sub(1)?, self.y + 1),
            Direction::SouthWest => (self.x, self.y + 1),
            Direction::NorthWest if even => (self.x.checked_sub(1)?, self.y.checked_sub(1)?),
            Direction::NorthWest => (self.x, self.y.checked_sub(1)?),
            Direction::NorthEast if even => (self.x, self.y.checked_sub(1)?),
            Direction::NorthEast => (self.x + 1, self.y.checked_sub(1)?),
        };
        Some(Self::new(x, y))
    }

    /// Number of hex steps between two positions.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn distance(self, other: Self) -> usize {
        // convert odd-row offset coordinates to axial (q, r)
        let axial = |p: Self| {
            let r = p.y as i64;
            let q = p.x as i64 - (r - (r & 1)) / 2;
            (q, r)
        };
        let (q1, r1) = axial(self);
        let (q2, r2) = axial(other);
        let dq = q1 - q2;
        let dr = r1 - r2;
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let d = ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as usize;
        d
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the six facing directions, in clockwise order starting east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Direction {
    /// 0
    #[default]
    East = 0,
    /// 1
    SouthEast = 1,
    /// 2
    SouthWest = 2,
    /// 3
    West = 3,
    /// 4
    NorthWest = 4,
    /// 5
    NorthEast = 5,
}

impl Direction {
    /// All directions in cyclic order.
    pub const ALL: [Self; 6] = [
        Self::East,
        Self::SouthEast,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::NorthEast,
    ];

    /// Position of this direction in the cycle (0-5).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index` modulo 6.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// One step counter-clockwise.
    #[must_use]
    pub const fn left(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    /// One step clockwise.
    #[must_use]
    pub const fn right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turning_cycles() {
        assert_eq!(Direction::East.left(), Direction::NorthEast);
        assert_eq!(Direction::East.right(), Direction::SouthEast);
        assert_eq!(Direction::NorthEast.right(), Direction::East);

        let mut dir = Direction::West;
        for _ in 0..6 {
            dir = dir.right();
        }
        assert_eq!(dir, Direction::West);
    }

    #[test]
    fn test_even_row_neighbours() {
        let p = Position::new(5, 4);
        assert_eq!(p.step(Direction::East), Some(Position::new(6, 4)));
        assert_eq!(p.step(Direction::SouthEast), Some(Position::new(5, 5)));
        assert_eq!(p.step(Direction::SouthWest), Some(Position::new(4, 5)));
        assert_eq!(p.step(Direction::West), Some(Position::new(4, 4)));
        assert_eq!(p.step(Direction::NorthWest), Some(Position::new(4, 3)));
        assert_eq!(p.step(Direction::NorthEast), Some(Position::new(5, 3)));
    }

    #[test]
    fn test_odd_row_neighbours() {
        let p = Position::new(5, 3);
        assert_eq!(p.step(Direction::SouthEast), Some(Position::new(6, 4)));
        assert_eq!(p.step(Direction::SouthWest), Some(Position::new(5, 4)));
        assert_eq!(p.step(Direction::NorthWest), Some(Position::new(5, 2)));
        assert_eq!(p.step(Direction::NorthEast), Some(Position::new(6, 2)));
    }

    #[test]
    fn test_step_below_zero() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::NorthEast), None);
        assert_eq!(origin.step(Direction::SouthWest), None);
        assert_eq!(origin.step(Direction::SouthEast), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_step_then_opposite_returns() {
        for y in 1..6 {
            for x in 1..6 {
                let p = Position::new(x, y);
                for dir in Direction::ALL {
                    let q = p.step(dir).unwrap();
                    assert_eq!(q.step(dir.opposite()), Some(p), "{p} {dir:?}");
                }
            }
        }
    }

    #[test]
    fn test_distance_to_neighbours_is_one() {
        let p = Position::new(7, 7);
        for dir in Direction::ALL {
            assert_eq!(p.distance(p.step(dir).unwrap()), 1);
        }
        assert_eq!(p.distance(p), 0);
        assert_eq!(Position::new(0, 0).distance(Position::new(3, 0)), 3);
    }
}
