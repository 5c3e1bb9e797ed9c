//! Replay command implementation.

use super::{CliError, ReplayFormat};
use antwar::replay::{Recording, ReplayEngine, ReplayError};
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording_path: &Path,
    format: ReplayFormat,
    turn: Option<u32>,
    every: u32,
) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    let engine = ReplayEngine::new_at_turn(recording, turn.unwrap_or(0))?;

    match format {
        ReplayFormat::Tui => super::watch::run_tui(engine, 100, "Antwar Replay"),
        ReplayFormat::Text => print_text_replay(engine, every.max(1)),
    }
}

fn print_text_replay(mut engine: ReplayEngine, every: u32) -> Result<(), CliError> {
    let recording = engine.recording();
    println!(
        "Replay of {} (red) vs {} (black), seed {}",
        recording.red.name, recording.black.name, recording.config.seed
    );
    println!("Max turns: {}", recording.config.max_turns);
    println!();

    loop {
        if engine.turn() % every == 0 || engine.is_game_over() {
            println!("=== Turn {} ===", engine.turn());
            println!("{}", engine.render_ascii());
        }

        if engine.is_game_over() {
            println!("=== GAME OVER ===");
            break;
        }

        match engine.step_forward() {
            Ok(()) => {}
            Err(ReplayError::GameOver) => {
                println!("=== GAME OVER ===");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
