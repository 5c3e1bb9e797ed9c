//! Single-step brain interpreter.

use crate::brain::Instruction;
use crate::error::RuntimeFault;
use crate::game::World;
use crate::world::{AntId, Cell};

/// Execute the current instruction of ant `id` and advance its state.
///
/// Side effects are limited to the ant itself and the one cell it reads
/// or writes. The caller is responsible for skipping dead and resting
/// ants.
///
/// # Errors
///
/// Returns a fault if the ant's state index lies past the end of its
/// program. Nothing is modified in that case.
pub(crate) fn step_ant(world: &mut World, id: AntId) -> Result<(), RuntimeFault> {
    let ant = &world.ants[id];
    let (color, pos, facing, carrying) = (ant.color, ant.position, ant.direction, ant.carrying_food);

    let Some(instr) = ant.brain.state(ant.state) else {
        return Err(RuntimeFault::StateIndexOutOfRange {
            ant: id,
            position: pos,
            state: ant.state,
            program_len: ant.brain.len(),
        });
    };

    let next = match instr {
        Instruction::Sense {
            dir,
            on_true,
            on_false,
            condition,
        } => {
            let target = match dir.resolve(facing) {
                None => Some(pos),
                Some(d) => world.grid.adjacent(pos, d),
            };
            if target.is_some_and(|t| world.cell_matches(t, condition, color)) {
                on_true
            } else {
                on_false
            }
        }
        Instruction::Mark { marker, next } => {
            if let Some(cell) = world.grid.cell_mut(pos) {
                cell.set_marker(color, marker);
            }
            next
        }
        Instruction::Unmark { marker, next } => {
            if let Some(cell) = world.grid.cell_mut(pos) {
                cell.clear_marker(color, marker);
            }
            next
        }
        Instruction::PickUp {
            on_success,
            on_failure,
        } => {
            let taken = !carrying && world.grid.cell_mut(pos).is_some_and(Cell::take_food);
            if taken {
                world.ants[id].carrying_food = true;
                on_success
            } else {
                on_failure
            }
        }
        Instruction::Drop { next } => {
            if carrying {
                if let Some(cell) = world.grid.cell_mut(pos) {
                    cell.add_food(1);
                    world.ants[id].carrying_food = false;
                }
            }
            next
        }
        Instruction::Turn { side, next } => {
            world.ants[id].direction = side.apply(facing);
            next
        }
        Instruction::Move {
            on_success,
            on_failure,
        } => {
            let ahead = world
                .grid
                .adjacent(pos, facing)
                .filter(|&t| world.grid.cell(t).is_some_and(Cell::is_free));
            match ahead {
                Some(target) => {
                    world.relocate(id, target);
                    world.ants[id].resting = world.config.rest_after_move;
                    on_success
                }
                None => on_failure,
            }
        }
        Instruction::Flip {
            p,
            on_zero,
            on_other,
        } => {
            if world.rng.random_int(p) == 0 {
                on_zero
            } else {
                on_other
            }
        }
    };

    world.ants[id].state = next;
    Ok(())
}
