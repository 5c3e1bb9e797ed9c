//! Game invariants - consistency checks that detect engine bugs.
//!
//! These should never trigger for any pair of brains. A violation means
//! the grid and the ant list have drifted apart or food was created or
//! destroyed outside the rules.

use crate::game::World;
use crate::game::encirclement::ENCIRCLEMENT_BONUS;
use crate::world::{Color, Terrain};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
///
/// Food is conserved in the sense that
/// `food on cells + food carried by living ants` equals the food present
/// when the game began plus [`ENCIRCLEMENT_BONUS`] per encircled ant.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let grid = world.grid();

    for cell in grid.cells() {
        let pos = cell.position();

        if let Some(id) = cell.occupant() {
            match world.ant(id) {
                None => violations.push(InvariantViolation {
                    message: format!("Cell {pos} holds unknown ant {id}"),
                }),
                Some(ant) if !ant.is_alive() => violations.push(InvariantViolation {
                    message: format!("Cell {pos} holds dead ant {id}"),
                }),
                Some(ant) if ant.position() != pos => violations.push(InvariantViolation {
                    message: format!(
                        "Cell {pos} holds ant {id} which thinks it is at {}",
                        ant.position()
                    ),
                }),
                Some(_) => {}
            }
            if cell.terrain() == Terrain::Rocky {
                violations.push(InvariantViolation {
                    message: format!("Ant {id} stands on rock at {pos}"),
                });
            }
        }

        let marked = Color::BOTH.iter().any(|&c| cell.has_any_marker(c));
        if cell.terrain() == Terrain::Rocky && (cell.food() > 0 || marked) {
            violations.push(InvariantViolation {
                message: format!("Rock at {pos} carries food or markers"),
            });
        }
    }

    for ant in world.ants() {
        let occupant = grid.cell(ant.position()).and_then(|c| c.occupant());
        if ant.is_alive() && occupant != Some(ant.id()) {
            violations.push(InvariantViolation {
                message: format!(
                    "Living ant {} at {} is not on its cell (occupant {:?})",
                    ant.id(),
                    ant.position(),
                    occupant
                ),
            });
        }
        if !ant.is_alive() && ant.carrying_food() {
            violations.push(InvariantViolation {
                message: format!("Dead ant {} still carries food", ant.id()),
            });
        }
    }

    let expected = world.initial_food()
        + u64::from(world.encircled_count()) * u64::from(ENCIRCLEMENT_BONUS);
    let actual = grid.total_food() + world.carried_food();
    if actual != expected {
        violations.push(InvariantViolation {
            message: format!("Food not conserved: {actual} present, {expected} expected"),
        });
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &World) {}
