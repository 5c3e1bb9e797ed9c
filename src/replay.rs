//! Game recording and replay.
//!
//! Games are fully deterministic, so a recording needs only:
//! - the world as it was loaded (world-file text)
//! - both brains (name and source)
//! - the [`MatchConfig`], whose seed drives every `Flip`
//!
//! No per-turn deltas are stored. To view turn N the game is re-run from
//! turn 0 to N.
//!
//! # Time Travel
//!
//! - **Forward**: step the live game
//! - **Backward**: re-run from turn 0 to (`current_turn` - 1)
//! - **Jump to turn N**: step forward if N is ahead, otherwise re-run

mod render;

pub use render::{cell_glyph, render_ascii, render_snapshot};

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::brain::{Brain, parse_brain_str};
use crate::error::{BrainError, MatchError, WorldError};
use crate::game::{MatchConfig, World};
use crate::world::{Color, Grid, parse_grid_str, write_world};

/// A brain stored by value inside a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainSource {
    /// Team name.
    pub name: String,
    /// Canonical program text.
    pub source: String,
}

impl BrainSource {
    /// Capture a parsed brain.
    #[must_use]
    pub fn from_brain(brain: &Brain) -> Self {
        Self {
            name: brain.name().to_string(),
            source: brain.to_source(),
        }
    }

    /// Parse the stored program.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a valid brain.
    pub fn to_brain(&self) -> Result<Brain, BrainError> {
        parse_brain_str(&self.name, &self.source)
    }
}

/// Everything needed to replay a game, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// The starting world in world-file format.
    pub world: String,
    /// The red colony's brain.
    pub red: BrainSource,
    /// The black colony's brain.
    pub black: BrainSource,
    /// Match parameters, including the seed.
    pub config: MatchConfig,
}

impl Recording {
    /// Record a game about to be played on `grid`.
    #[must_use]
    pub fn new(grid: &Grid, red: &Brain, black: &Brain, config: MatchConfig) -> Self {
        Self {
            world: write_world(grid),
            red: BrainSource::from_brain(red),
            black: BrainSource::from_brain(black),
            config,
        }
    }

    /// Save the recording as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ReplayError::Format(e.to_string()))?;
        fs::write(path, json).map_err(|e| ReplayError::Io(format!("{}: {e}", path.display())))
    }

    /// Load a recording saved with [`Recording::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ReplayError::Io(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&json).map_err(|e| ReplayError::Format(e.to_string()))
    }
}

/// Error type for replay operations.
#[derive(Debug)]
pub enum ReplayError {
    /// Reading or writing the recording failed.
    Io(String),
    /// The recording is not valid JSON of the expected shape.
    Format(String),
    /// A stored brain failed to parse.
    Brain {
        /// Which colony.
        color: Color,
        /// Parse error.
        error: BrainError,
    },
    /// The stored world failed to parse.
    World(WorldError),
    /// Turn number out of bounds.
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Last reachable turn.
        max_turn: u32,
    },
    /// Game is already over.
    GameOver,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "recording I/O failed: {msg}"),
            Self::Format(msg) => write!(f, "malformed recording: {msg}"),
            Self::Brain { color, error } => write!(f, "{color} brain in recording: {error}"),
            Self::World(e) => write!(f, "world in recording: {e}"),
            Self::TurnOutOfBounds {
                requested,
                max_turn,
            } => {
                write!(f, "Turn {requested} out of bounds (max: {max_turn})")
            }
            Self::GameOver => write!(f, "Game is already over"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<WorldError> for ReplayError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}

/// Replay engine - steps through a recorded game deterministically.
pub struct ReplayEngine {
    recording: Recording,
    grid: Grid,
    red: Arc<Brain>,
    black: Arc<Brain>,
    world: World,
}

impl std::fmt::Debug for ReplayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayEngine")
            .field("current_turn", &self.world.turn())
            .field("is_game_over", &self.is_game_over())
            .finish_non_exhaustive()
    }
}

impl ReplayEngine {
    /// Create a replay engine at turn 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored world or brains do not parse.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at_turn(recording, 0)
    }

    /// Create a replay engine already advanced to `target_turn`.
    ///
    /// Stops early if the game finishes first.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored world or brains do not parse.
    pub fn new_at_turn(recording: Recording, target_turn: u32) -> Result<Self, ReplayError> {
        let grid = parse_grid_str(&recording.world)?;
        let red = recording.red.to_brain().map_err(|error| ReplayError::Brain {
            color: Color::Red,
            error,
        })?;
        let black = recording
            .black
            .to_brain()
            .map_err(|error| ReplayError::Brain {
                color: Color::Black,
                error,
            })?;
        let red = Arc::new(red);
        let black = Arc::new(black);

        let mut world = World::with_config(grid.clone(), recording.config);
        world.begin_game(Arc::clone(&red), Arc::clone(&black));

        let mut engine = Self {
            recording,
            grid,
            red,
            black,
            world,
        };
        engine.advance_to(target_turn);
        Ok(engine)
    }

    /// The recording being replayed.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Turns completed so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.world.turn()
    }

    /// The live game.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Check if the game is over.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.world.phase() == crate::game::Phase::Finished
    }

    /// Step forward one turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is already over.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        match self.world.step_turn() {
            Ok(_) => Ok(()),
            Err(MatchError::Finished | MatchError::NotStarted) => Err(ReplayError::GameOver),
        }
    }

    /// Step backward one turn by re-running from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if already at turn 0.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        let Some(target) = self.turn().checked_sub(1) else {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.recording.config.max_turns,
            });
        };
        self.goto_turn(target)
    }

    /// Jump to a specific turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is past the recorded turn ceiling.
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        let max_turn = self.recording.config.max_turns;
        if target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }

        if target_turn < self.turn() {
            let mut world = World::with_config(self.grid.clone(), self.recording.config);
            world.begin_game(Arc::clone(&self.red), Arc::clone(&self.black));
            self.world = world;
        }
        self.advance_to(target_turn);
        Ok(())
    }

    /// Render current state to ASCII for terminal viewing.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(&self.world)
    }

    fn advance_to(&mut self, target_turn: u32) {
        while self.world.turn() < target_turn && self.world.step_turn().is_ok() {}
    }
}
