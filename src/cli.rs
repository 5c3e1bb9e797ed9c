//! CLI command implementations for Antwar.

pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;
pub(crate) mod validate;
pub(crate) mod watch;

mod output;

use antwar::MatchConfig;
use antwar::tournament::load_arena;
use antwar::world::Grid;
use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` and `match` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Interactive TUI.
    Tui,
    /// Plain text output.
    Text,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format, one line per game.
    Csv,
}

/// Build a match config from optional command-line overrides.
pub(crate) fn match_config(seed: Option<i64>, turns: Option<u32>) -> MatchConfig {
    let defaults = MatchConfig::default();
    MatchConfig {
        seed: seed.unwrap_or(defaults.seed),
        max_turns: turns.unwrap_or(defaults.max_turns),
        ..defaults
    }
}

/// Load the arena from `world`, or generate one from `seed`.
pub(crate) fn arena(world: Option<&Path>, seed: i64) -> Result<Grid, CliError> {
    if world.is_none() {
        tracing::info!(seed, "no world file given, generating one");
    }
    Ok(load_arena(world, seed)?)
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<antwar::tournament::TournamentError> for CliError {
    fn from(e: antwar::tournament::TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<antwar::replay::ReplayError> for CliError {
    fn from(e: antwar::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<antwar::BrainError> for CliError {
    fn from(e: antwar::BrainError) -> Self {
        Self::new(format!("brain error: {e}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
