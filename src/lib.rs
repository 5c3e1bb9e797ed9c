// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Antwar: a deterministic ant-colony contest on a hexagonal grid.
//!
//! Two colonies, each driven by a finite-state brain, forage for food and
//! carry it home. This crate provides:
//! - Bit-exact deterministic games from a seed
//! - Brain and world file parsers with line-accurate errors
//! - Matches, knockout tournaments and replays
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Tournament / Replay / CLI         │
//! ├─────────────────────────────────────┤
//! │   Game: scheduler, interpreter,     │
//! │         encirclement                │
//! ├─────────────────────────────────────┤
//! │   World (hex grid)  │ Brain │  Rng  │
//! └─────────────────────────────────────┘
//! ```

pub mod brain;
pub mod error;
pub mod game;
pub mod replay;
pub mod rng;
pub mod tournament;
pub mod world;

pub use brain::{Brain, Instruction, parse_brain, parse_brain_str};
pub use error::{BrainError, BrainErrorKind, MatchError, RuntimeFault, WorldError};

// Re-export key game types at crate root for convenience
pub use game::{MatchConfig, Phase, Snapshot, TurnReport, World};
pub use rng::Rng;
pub use world::{Color, Direction, Grid, Position, parse_world, parse_world_str};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports_play_a_game() {
        let mut world = parse_world_str("3\n3\n# # #\n # + #\n# # #\n").unwrap();
        let brain = parse_brain_str("spin", "turn left 0").unwrap();
        world.begin_game(brain.clone(), brain);
        world.set_config(MatchConfig {
            max_turns: 3,
            ..MatchConfig::default()
        });
        world.run(|_, _| {}).unwrap();
        assert_eq!(world.turn(), 3);
        assert_eq!(world.phase(), Phase::Finished);
    }
}
