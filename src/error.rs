//! Error types for brain parsing, world parsing and match execution.

use std::fmt;

use crate::world::Position;

/// What went wrong while parsing a brain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrainErrorKind {
    /// First token is not one of the eight instruction names.
    UnknownInstruction(String),
    /// Instruction has the wrong number of operands.
    WrongArgCount {
        /// Instruction name as written (upper-cased).
        instruction: &'static str,
        /// Expected token count, including the instruction name.
        expected: usize,
        /// Token count actually found.
        found: usize,
    },
    /// Operand is not a number, not in range, or not a known name.
    ArgOutOfRange {
        /// The offending token.
        token: String,
        /// Human-readable description of what was expected.
        expected: &'static str,
    },
    /// Program has more than [`crate::brain::MAX_STATES`] states.
    TooManyStates(usize),
    /// Program contains no states at all.
    EmptyProgram,
    /// The brain file could not be read.
    Io(String),
}

/// A brain parse failure. No partial program is ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrainError {
    /// 1-based source line of the failure (0 when not line-specific).
    pub line: usize,
    /// Failure details.
    pub kind: BrainErrorKind,
}

impl BrainError {
    pub(crate) fn new(line: usize, kind: BrainErrorKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for BrainErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownInstruction(name) => write!(f, "unknown instruction: {name}"),
            Self::WrongArgCount {
                instruction,
                expected,
                found,
            } => write!(
                f,
                "{instruction} takes {expected} tokens, found {found}"
            ),
            Self::ArgOutOfRange { token, expected } => {
                write!(f, "bad argument {token:?}: expected {expected}")
            }
            Self::TooManyStates(n) => write!(f, "too many states: {n}"),
            Self::EmptyProgram => write!(f, "program has no states"),
            Self::Io(msg) => write!(f, "cannot read brain: {msg}"),
        }
    }
}

impl fmt::Display for BrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "line {}: {}", self.line, self.kind)
        }
    }
}

impl std::error::Error for BrainError {}

/// A world-file parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Width/height header is missing, not a number, or zero.
    BadDimensions(String),
    /// A map row has the wrong number of cells once spaces are removed.
    RowLengthMismatch {
        /// 0-based row index.
        row: usize,
        /// Declared width.
        expected: usize,
        /// Cells found on the row.
        found: usize,
    },
    /// The file has fewer or more map rows than declared.
    RowCountMismatch {
        /// Declared height.
        expected: usize,
        /// Rows found.
        found: usize,
    },
    /// A cell character outside `.#+-1-9`.
    InvalidChar {
        /// 0-based row index.
        row: usize,
        /// 0-based column index.
        column: usize,
        /// The offending character.
        ch: char,
    },
    /// A border cell is not rocky.
    NonRockyBorder {
        /// Column of the offending cell.
        x: usize,
        /// Row of the offending cell.
        y: usize,
    },
    /// The world file could not be read.
    Io(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadDimensions(msg) => write!(f, "bad dimensions: {msg}"),
            Self::RowLengthMismatch {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::RowCountMismatch { expected, found } => {
                write!(f, "map has {found} rows, expected {expected}")
            }
            Self::InvalidChar { row, column, ch } => {
                write!(f, "invalid cell {ch:?} at row {row}, column {column}")
            }
            Self::NonRockyBorder { x, y } => write!(f, "border cell ({x}, {y}) is not rocky"),
            Self::Io(msg) => write!(f, "cannot read world: {msg}"),
        }
    }
}

impl std::error::Error for WorldError {}

/// A defect in a supplied brain detected while it runs.
///
/// The faulting ant is removed from play; the match continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFault {
    /// The ant's current state index is past the end of its program.
    StateIndexOutOfRange {
        /// Faulting ant.
        ant: usize,
        /// Where it was.
        position: Position,
        /// The invalid state index.
        state: usize,
        /// Length of the ant's program.
        program_len: usize,
    },
}

impl fmt::Display for RuntimeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateIndexOutOfRange {
                ant,
                position,
                state,
                program_len,
            } => write!(
                f,
                "ant {ant} at {position} jumped to state {state} of a {program_len}-state program"
            ),
        }
    }
}

impl std::error::Error for RuntimeFault {}

/// Misuse of the turn scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// `step_turn` called before `begin_game`.
    NotStarted,
    /// `step_turn` called after the turn ceiling or a stop request.
    Finished,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "game has not been started"),
            Self::Finished => write!(f, "game is already finished"),
        }
    }
}

impl std::error::Error for MatchError {}
