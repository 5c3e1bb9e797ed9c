//! Game layer for antwar.
//!
//! Implements the rules on top of the grid:
//! - Ants and their per-turn state
//! - The brain interpreter (one instruction per ant per turn)
//! - The turn scheduler, scoring and match control
//! - The encirclement kill rule
//! - Invariant checks and text dumps for debugging

mod ant;
mod dump;
mod encirclement;
mod interpreter;
mod invariants;
mod state;

pub use ant::Ant;
pub use dump::{describe_cell, render_dump, render_header};
pub use encirclement::{ENCIRCLEMENT_BONUS, ENCIRCLEMENT_THRESHOLD, Kill, enemy_neighbours};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use state::{MatchConfig, MatchControl, Phase, Snapshot, TurnReport, World};
