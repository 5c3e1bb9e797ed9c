//! The eight brain instructions and their operand types.
//!
//! Every operand is validated at parse time except state indices, which
//! are only bounded to `0..=MAX_STATE_INDEX`; a jump past the end of a
//! shorter program surfaces at run time.

use std::fmt;

use crate::world::{Direction, Marker};

/// Index of a state within a brain.
pub type StateIndex = usize;

/// Which cell a `Sense` looks at, relative to the ant's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SenseDir {
    /// The ant's own cell.
    Here,
    /// The cell in the facing direction.
    Ahead,
    /// The cell one turn left of facing.
    LeftAhead,
    /// The cell one turn right of facing.
    RightAhead,
}

impl SenseDir {
    /// Absolute direction to look in, or `None` for the ant's own cell.
    #[must_use]
    pub const fn resolve(self, facing: Direction) -> Option<Direction> {
        match self {
            Self::Here => None,
            Self::Ahead => Some(facing),
            Self::LeftAhead => Some(facing.left()),
            Self::RightAhead => Some(facing.right()),
        }
    }

    /// Brain-file keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Here => "HERE",
            Self::Ahead => "AHEAD",
            Self::LeftAhead => "LEFTAHEAD",
            Self::RightAhead => "RIGHTAHEAD",
        }
    }
}

/// A property of a cell that `Sense` can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Occupied by an ant of the sensing colour.
    Friend,
    /// Occupied by an ant of the other colour.
    Foe,
    /// Friend carrying food.
    FriendWithFood,
    /// Foe carrying food.
    FoeWithFood,
    /// At least one food particle.
    Food,
    /// Rocky terrain.
    Rock,
    /// The given own-colour marker is set.
    Marker(Marker),
    /// Any marker of the other colour is set.
    FoeMarker,
    /// Own anthill.
    Home,
    /// The other colour's anthill.
    FoeHome,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Friend => f.write_str("FRIEND"),
            Self::Foe => f.write_str("FOE"),
            Self::FriendWithFood => f.write_str("FRIENDWITHFOOD"),
            Self::FoeWithFood => f.write_str("FOEWITHFOOD"),
            Self::Food => f.write_str("FOOD"),
            Self::Rock => f.write_str("ROCK"),
            Self::Marker(m) => write!(f, "MARKER {m}"),
            Self::FoeMarker => f.write_str("FOEMARKER"),
            Self::Home => f.write_str("HOME"),
            Self::FoeHome => f.write_str("FOEHOME"),
        }
    }
}

/// Direction of a `Turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnSide {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

impl TurnSide {
    /// The facing after turning from `facing`.
    #[must_use]
    pub const fn apply(self, facing: Direction) -> Direction {
        match self {
            Self::Left => facing.left(),
            Self::Right => facing.right(),
        }
    }
}

/// One parsed brain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Test `condition` on the cell in `dir`; branch on the result.
    Sense {
        /// Cell to look at.
        dir: SenseDir,
        /// Next state if the condition holds.
        on_true: StateIndex,
        /// Next state otherwise.
        on_false: StateIndex,
        /// What to test.
        condition: Condition,
    },
    /// Set an own-colour marker on the current cell.
    Mark {
        /// Marker to set.
        marker: Marker,
        /// Next state.
        next: StateIndex,
    },
    /// Clear an own-colour marker on the current cell.
    Unmark {
        /// Marker to clear.
        marker: Marker,
        /// Next state.
        next: StateIndex,
    },
    /// Pick up one food particle from the current cell.
    PickUp {
        /// Next state if food was taken.
        on_success: StateIndex,
        /// Next state if there was none or the ant is already carrying.
        on_failure: StateIndex,
    },
    /// Drop carried food on the current cell.
    Drop {
        /// Next state.
        next: StateIndex,
    },
    /// Rotate one step.
    Turn {
        /// Rotation direction.
        side: TurnSide,
        /// Next state.
        next: StateIndex,
    },
    /// Step forward in the facing direction.
    Move {
        /// Next state after a successful move.
        on_success: StateIndex,
        /// Next state if blocked.
        on_failure: StateIndex,
    },
    /// Branch randomly: `on_zero` with probability `1/p`.
    Flip {
        /// Range of the draw; at least 1.
        p: u32,
        /// Next state if the draw is 0.
        on_zero: StateIndex,
        /// Next state otherwise.
        on_other: StateIndex,
    },
}

impl Instruction {
    /// Every state index this instruction can jump to.
    #[must_use]
    pub fn targets(&self) -> Vec<StateIndex> {
        match *self {
            Self::Sense {
                on_true, on_false, ..
            } => vec![on_true, on_false],
            Self::PickUp {
                on_success,
                on_failure,
            }
            | Self::Move {
                on_success,
                on_failure,
            } => vec![on_success, on_failure],
            Self::Flip {
                on_zero, on_other, ..
            } => vec![on_zero, on_other],
            Self::Mark { next, .. }
            | Self::Unmark { next, .. }
            | Self::Drop { next }
            | Self::Turn { next, .. } => vec![next],
        }
    }
}

/// Canonical brain-file form; parses back to the same instruction.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sense {
                dir,
                on_true,
                on_false,
                condition,
            } => write!(f, "SENSE {} {on_true} {on_false} {condition}", dir.keyword()),
            Self::Mark { marker, next } => write!(f, "MARK {marker} {next}"),
            Self::Unmark { marker, next } => write!(f, "UNMARK {marker} {next}"),
            Self::PickUp {
                on_success,
                on_failure,
            } => write!(f, "PICKUP {on_success} {on_failure}"),
            Self::Drop { next } => write!(f, "DROP {next}"),
            Self::Turn { side, next } => {
                let side = match side {
                    TurnSide::Left => "LEFT",
                    TurnSide::Right => "RIGHT",
                };
                write!(f, "TURN {side} {next}")
            }
            Self::Move {
                on_success,
                on_failure,
            } => write!(f, "MOVE {on_success} {on_failure}"),
            Self::Flip {
                p,
                on_zero,
                on_other,
            } => write!(f, "FLIP {p} {on_zero} {on_other}"),
        }
    }
}
