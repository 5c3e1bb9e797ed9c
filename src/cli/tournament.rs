//! Match and tournament command implementations.

use super::output::{JsonTournamentResult, format_match_text, format_tournament_csv, format_tournament_text};
use super::{CliError, OutputFormat, TournamentFormat, arena, match_config};
use antwar::tournament::{TournamentConfig, load_entrants, run_match, run_tournament_with};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Build a tournament config from optional command-line overrides.
fn tournament_config(seed: Option<i64>, turns: Option<u32>, rounds: Option<u32>) -> TournamentConfig {
    let defaults = TournamentConfig::default();
    TournamentConfig {
        game: match_config(seed, turns),
        max_match_rounds: rounds.unwrap_or(defaults.max_match_rounds),
    }
}

/// Execute the match command.
///
/// # Errors
///
/// Returns an error if an input file is invalid.
pub(crate) fn execute_match(
    first: &Path,
    second: &Path,
    world: Option<&Path>,
    seed: Option<i64>,
    turns: Option<u32>,
    rounds: Option<u32>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = tournament_config(seed, turns, rounds);
    let brains = load_entrants(&[first, second])?;
    let grid = arena(world, config.game.seed)?;

    let result = run_match(&grid, &brains[0], &brains[1], &config);

    match format {
        OutputFormat::Text => print!("{}", format_match_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

/// Options for the tournament command.
#[derive(Debug)]
pub(crate) struct TournamentOptions {
    pub(crate) brains: Vec<PathBuf>,
    pub(crate) world: Option<PathBuf>,
    pub(crate) seed: Option<i64>,
    pub(crate) max_turns: Option<u32>,
    pub(crate) rounds: Option<u32>,
    pub(crate) threads: Option<usize>,
    pub(crate) format: TournamentFormat,
    pub(crate) progress: bool,
}

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if an input file is invalid or the field is too small.
pub(crate) fn execute(opts: &TournamentOptions) -> Result<(), CliError> {
    let config = tournament_config(opts.seed, opts.max_turns, opts.rounds);
    let entrants = load_entrants(&opts.brains)?;
    let grid = arena(opts.world.as_deref(), config.game.seed)?;

    // Set thread pool size if specified
    if let Some(num_threads) = opts.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // A knockout of n entrants plays n - 1 matches
    let pb = if opts.progress {
        let pb = ProgressBar::new(entrants.len().saturating_sub(1) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({msg})")
                .map_err(|e| CliError::new(e.to_string()))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let result = run_tournament_with(&grid, &entrants, &config, |m| {
        if let Some(pb) = &pb {
            pb.set_message(format!("{} beat {}", m.winner, if m.winner == m.first { &m.second } else { &m.first }));
            pb.inc(1);
        }
    })?;
    let duration = start.elapsed();

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    match opts.format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&result));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        TournamentFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonTournamentResult::new(&result))?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&result));
        }
    }

    Ok(())
}
