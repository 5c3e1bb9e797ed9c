//! Ant brains: immutable finite-state programs.
//!
//! A [`Brain`] is parsed once and shared (behind an `Arc`) by every ant of
//! one colour. It is never mutated during a game.

mod instruction;
mod parser;

pub use instruction::{Condition, Instruction, SenseDir, StateIndex, TurnSide};
pub use parser::{parse_brain, parse_brain_str};

/// Maximum number of states in a brain.
pub const MAX_STATES: usize = 10_000;

/// Largest state index accepted as a jump target.
pub const MAX_STATE_INDEX: StateIndex = MAX_STATES - 1;

/// A parsed brain program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brain {
    name: String,
    states: Vec<Instruction>,
}

impl Brain {
    /// Assemble a brain from already validated states.
    pub(crate) fn new(name: impl Into<String>, states: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            states,
        }
    }

    /// Source name, usually the file stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All states in program order.
    #[must_use]
    pub fn states(&self) -> &[Instruction] {
        &self.states
    }

    /// The instruction at `state`, or `None` past the end of the program.
    #[must_use]
    #[inline]
    pub fn state(&self, state: StateIndex) -> Option<Instruction> {
        self.states.get(state).copied()
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false` for a parsed brain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Jump targets that point past the end of the program.
    ///
    /// These parse fine but fault the ant that reaches them.
    #[must_use]
    pub fn dangling_targets(&self) -> Vec<(StateIndex, StateIndex)> {
        self.states
            .iter()
            .enumerate()
            .flat_map(|(from, instr)| instr.targets().into_iter().map(move |to| (from, to)))
            .filter(|&(_, to)| to >= self.states.len())
            .collect()
    }

    /// The program in canonical brain-file form, one state per line.
    #[must_use]
    pub fn to_source(&self) -> String {
        self.states.iter().map(|s| format!("{s}\n")).collect()
    }
}
