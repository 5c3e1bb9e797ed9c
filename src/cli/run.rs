//! Run command implementation.

use super::output::format_text;
use super::{CliError, OutputFormat, arena, match_config};
use antwar::game::{render_dump, render_header};
use antwar::replay::Recording;
use antwar::tournament::GameResult;
use antwar::{World, parse_brain};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Options for the run command.
#[derive(Debug)]
pub(crate) struct RunOptions {
    pub(crate) red: PathBuf,
    pub(crate) black: PathBuf,
    pub(crate) world: Option<PathBuf>,
    pub(crate) seed: Option<i64>,
    pub(crate) turns: Option<u32>,
    pub(crate) format: OutputFormat,
    pub(crate) save: Option<PathBuf>,
    pub(crate) dump: Option<PathBuf>,
    pub(crate) quiet: bool,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if an input file is invalid or an output cannot be
/// written.
pub(crate) fn execute(opts: &RunOptions) -> Result<(), CliError> {
    let red = Arc::new(parse_brain(&opts.red)?);
    let black = Arc::new(parse_brain(&opts.black)?);
    let config = match_config(opts.seed, opts.turns);
    let grid = arena(opts.world.as_deref(), config.seed)?;
    let verbose = !opts.quiet && opts.format == OutputFormat::Text;

    if verbose {
        println!("Running game with seed {}...", config.seed);
        println!("Red: {}  Black: {}", red.name(), black.name());
        println!();
    }

    // Save recording if requested
    if let Some(save_path) = &opts.save {
        Recording::new(&grid, &red, &black, config).save(save_path)?;
        if verbose {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    let mut world = World::with_config(grid, config);
    world.begin_game(red, black);

    match &opts.dump {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| CliError::new(format!("Failed to create {}: {e}", path.display())))?;
            let mut out = BufWriter::new(file);
            out.write_all(render_header(&world).as_bytes())?;
            out.write_all(render_dump(&world).as_bytes())?;

            let mut write_error = None;
            world
                .run(|world, _| {
                    if write_error.is_none()
                        && let Err(e) = out.write_all(render_dump(world).as_bytes())
                    {
                        write_error = Some(e);
                        world.stop();
                    }
                })
                .map_err(|e| CliError::new(e.to_string()))?;
            if let Some(e) = write_error {
                return Err(e.into());
            }
            out.flush()?;
            info!(path = %path.display(), "dump written");
        }
        None => world
            .run(|_, _| {})
            .map_err(|e| CliError::new(e.to_string()))?,
    }

    let result = GameResult::from_world(&world);
    match opts.format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
