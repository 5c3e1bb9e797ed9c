//! Validate and generate command implementations.

use super::CliError;
use antwar::brain::parse_brain;
use antwar::world::{Color, MapGenConfig, generate_world, parse_grid, write_world};
use std::fs;
use std::path::{Path, PathBuf};

/// Execute the validate command.
///
/// Checks every file and reports all failures before returning.
///
/// # Errors
///
/// Returns an error if any file is invalid.
pub(crate) fn execute(brains: &[PathBuf], world: Option<&Path>) -> Result<(), CliError> {
    if brains.is_empty() && world.is_none() {
        return Err(CliError::new("Nothing to validate: give brain files and/or --world"));
    }
    let mut failures = 0usize;

    for path in brains {
        println!("Validating brain: {}", path.display());
        match parse_brain(path) {
            Ok(brain) => {
                print_check("Parses", true);
                let dangling = brain.dangling_targets();
                print_check("All jump targets exist", dangling.is_empty());
                for (from, to) in &dangling {
                    println!("      state {from} jumps to missing state {to}");
                }
                println!("  States: {}", brain.len());
            }
            Err(e) => {
                print_check("Parses", false);
                println!("      {e}");
                failures += 1;
            }
        }
        println!();
    }

    if let Some(path) = world {
        println!("Validating world: {}", path.display());
        match parse_grid(path) {
            Ok(grid) => {
                print_check("Parses", true);
                println!("  Size: {}x{}", grid.width(), grid.height());
                println!("  Food: {}", grid.total_food());
                for color in Color::BOTH {
                    let hills = grid.anthills().filter(|&(_, c)| c == color).count();
                    print_check(&format!("{color} anthill present ({hills} cells)"), hills > 0);
                }
            }
            Err(e) => {
                print_check("Parses", false);
                println!("      {e}");
                failures += 1;
            }
        }
        println!();
    }

    if failures > 0 {
        return Err(CliError::new(format!("{failures} file(s) failed validation")));
    }
    println!("Validation successful!");
    Ok(())
}

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if the dimensions cannot hold the requested features
/// or the output cannot be written.
pub(crate) fn generate(
    seed: i64,
    width: usize,
    height: usize,
    food_blobs: usize,
    rock_formations: usize,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let config = MapGenConfig {
        width,
        height,
        food_blobs,
        rock_formations,
    };
    let grid = generate_world(seed, &config).map_err(|e| CliError::new(e.to_string()))?;
    let text = write_world(&grid);

    match output {
        Some(path) => {
            fs::write(path, text)
                .map_err(|e| CliError::new(format!("Failed to write {}: {e}", path.display())))?;
            eprintln!("World written to: {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
