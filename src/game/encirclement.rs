//! The encirclement kill rule.
//!
//! An ant with at least [`ENCIRCLEMENT_THRESHOLD`] of its six neighbours
//! occupied by enemy ants is killed. The check runs once per turn after
//! every ant has stepped and is simultaneous: all victims are found first,
//! then removed, so a kill never rescues or dooms another ant in the same
//! turn.

use tracing::debug;

use crate::game::World;
use crate::world::{AntId, Color, Position};

/// Enemy neighbours needed to kill an ant.
pub const ENCIRCLEMENT_THRESHOLD: usize = 5;

/// Food left on the cell of an encircled ant, on top of what it carried.
pub const ENCIRCLEMENT_BONUS: u32 = 3;

/// An ant killed by encirclement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    /// The victim.
    pub ant: AntId,
    /// Its colour.
    pub color: Color,
    /// Where it died.
    pub position: Position,
    /// Whether it was carrying food.
    pub carrying_food: bool,
}

/// Number of cells next to `pos` holding an ant of the colour opposing
/// `color`. Off-grid neighbours count as empty.
#[must_use]
pub fn enemy_neighbours(world: &World, pos: Position, color: Color) -> usize {
    world
        .grid
        .neighbours(pos)
        .filter_map(|n| world.grid.cell(n).and_then(|c| c.occupant()))
        .filter(|&id| world.ants[id].color != color)
        .count()
}

/// Kill every surrounded ant. Returns the victims in id order.
pub(crate) fn apply(world: &mut World) -> Vec<Kill> {
    let kills: Vec<Kill> = world
        .ants
        .iter()
        .filter(|a| a.alive)
        .filter(|a| enemy_neighbours(world, a.position, a.color) >= ENCIRCLEMENT_THRESHOLD)
        .map(|a| Kill {
            ant: a.id,
            color: a.color,
            position: a.position,
            carrying_food: a.carrying_food,
        })
        .collect();

    for kill in &kills {
        debug!(ant = kill.ant, color = %kill.color, position = %kill.position, "ant encircled");
        world.remove_ant(kill.ant, ENCIRCLEMENT_BONUS);
    }
    kills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::parse_brain_str;
    use crate::world::{Direction, Grid, Terrain};

    /// Red hill at `victim`, black hills on the first `enemies` neighbours.
    fn surrounded(enemies: usize) -> World {
        let victim = Position::new(3, 3);
        let mut grid = Grid::walled(7, 7).unwrap();
        grid.set_terrain(victim, Terrain::RedAnthill);
        for dir in Direction::ALL.into_iter().take(enemies) {
            grid.set_terrain(victim.step(dir).unwrap(), Terrain::BlackAnthill);
        }
        let mut world = World::new(grid);
        let idle = parse_brain_str("idle", "turn left 0").unwrap();
        world.begin_game(idle.clone(), idle);
        world
    }

    fn red_id(world: &World) -> AntId {
        world
            .ants()
            .iter()
            .find(|a| a.color() == Color::Red)
            .map(|a| a.id())
            .unwrap()
    }

    #[test]
    fn test_five_enemies_kill() {
        let mut world = surrounded(5);
        let red = red_id(&world);
        assert_eq!(enemy_neighbours(&world, Position::new(3, 3), Color::Red), 5);

        let report = world.step_turn().unwrap();
        assert_eq!(report.kills.len(), 1);
        assert_eq!(report.kills[0].ant, red);
        assert!(!world.ant(red).unwrap().is_alive());

        let cell = world.cell(Position::new(3, 3)).unwrap();
        assert_eq!(cell.occupant(), None);
        assert_eq!(cell.food(), ENCIRCLEMENT_BONUS);
        assert_eq!(world.encircled_count(), 1);
    }

    #[test]
    fn test_four_enemies_do_not_kill() {
        let mut world = surrounded(4);
        let report = world.step_turn().unwrap();
        assert!(report.kills.is_empty());
        assert!(world.ant(red_id(&world)).unwrap().is_alive());
    }

    #[test]
    fn test_six_enemies_kill() {
        let mut world = surrounded(6);
        let report = world.step_turn().unwrap();
        assert_eq!(report.kills.len(), 1);
    }

    #[test]
    fn test_carried_food_is_dropped_too() {
        let mut world = surrounded(5);
        let red = red_id(&world);
        world.ants[red].carrying_food = true;
        world.step_turn().unwrap();
        assert_eq!(
            world.cell(Position::new(3, 3)).unwrap().food(),
            ENCIRCLEMENT_BONUS + 1
        );
        // the victim stood on its own hill
        assert_eq!(world.red_score(), ENCIRCLEMENT_BONUS + 1);
    }

    #[test]
    fn test_friends_do_not_count() {
        let world = surrounded(5);
        assert_eq!(enemy_neighbours(&world, Position::new(3, 3), Color::Black), 0);
        // a black ant next to the victim sees one enemy
        let black = Position::new(3, 3).step(Direction::East).unwrap();
        assert_eq!(enemy_neighbours(&world, black, Color::Black), 1);
    }
}
