//! Per-ant mutable state.

use std::sync::Arc;

use crate::brain::{Brain, StateIndex};
use crate::world::{AntId, Color, Direction, Position};

/// A single ant.
///
/// The ant records its own position; the grid's occupant field is the
/// other half of the same fact and the two are only ever changed together
/// by the game layer.
#[derive(Debug, Clone)]
pub struct Ant {
    pub(crate) id: AntId,
    pub(crate) color: Color,
    pub(crate) brain: Arc<Brain>,
    pub(crate) state: StateIndex,
    pub(crate) direction: Direction,
    pub(crate) carrying_food: bool,
    pub(crate) resting: u32,
    pub(crate) alive: bool,
    pub(crate) position: Position,
}

impl Ant {
    /// A fresh ant: state 0, facing east, empty-handed, alive.
    #[must_use]
    pub fn new(id: AntId, color: Color, brain: Arc<Brain>, position: Position) -> Self {
        Self {
            id,
            color,
            brain,
            state: 0,
            direction: Direction::East,
            carrying_food: false,
            resting: 0,
            alive: true,
            position,
        }
    }

    /// Unique id, equal to the ant's index in the world's ant list.
    #[must_use]
    pub const fn id(&self) -> AntId {
        self.id
    }

    /// Colony colour.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The program this ant runs.
    #[must_use]
    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Current state index.
    #[must_use]
    pub const fn state(&self) -> StateIndex {
        self.state
    }

    /// Facing direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the ant holds a food particle.
    #[must_use]
    pub const fn carrying_food(&self) -> bool {
        self.carrying_food
    }

    /// Turns left to rest before the next instruction.
    #[must_use]
    pub const fn resting(&self) -> u32 {
        self.resting
    }

    /// Whether the ant is still in play.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current cell, or the cell it died on.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}
