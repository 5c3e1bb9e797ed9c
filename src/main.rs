//! Antwar CLI - Command-line interface for running and viewing ant games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Antwar - A deterministic hex-grid ant colony contest
#[derive(Parser, Debug)]
#[command(name = "antwar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log filter used when `RUST_LOG` is unset (e.g. `info`, `antwar=debug`)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single game between two brains
    Run {
        /// Red colony brain file
        red: PathBuf,

        /// Black colony brain file
        black: PathBuf,

        /// World file (default: generate one from the seed)
        #[arg(short, long)]
        world: Option<PathBuf>,

        /// Random seed (default: 12345)
        #[arg(short, long)]
        seed: Option<i64>,

        /// Maximum turns (default: 300000)
        #[arg(short, long)]
        turns: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Write a full cell dump after every turn to this file
        #[arg(long)]
        dump: Option<PathBuf>,

        /// Suppress progress lines
        #[arg(short, long)]
        quiet: bool,
    },

    /// Play a match (colours swapped each round) between two brains
    Match {
        /// First brain file
        first: PathBuf,

        /// Second brain file
        second: PathBuf,

        /// World file (default: generate one from the seed)
        #[arg(short, long)]
        world: Option<PathBuf>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<i64>,

        /// Maximum turns per game
        #[arg(short, long)]
        turns: Option<u32>,

        /// Maximum rounds of two games (default: 5)
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run a knockout tournament between brains
    Tournament {
        /// Brain files (at least 2)
        #[arg(required = true, num_args = 2..)]
        brains: Vec<PathBuf>,

        /// World file (default: generate one from the seed)
        #[arg(short, long)]
        world: Option<PathBuf>,

        /// Random seed for the draw and every game
        #[arg(short, long)]
        seed: Option<i64>,

        /// Maximum turns per game
        #[arg(short = 't', long)]
        max_turns: Option<u32>,

        /// Maximum rounds per match
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Interactive TUI to watch a game in real-time
    Watch {
        /// Red colony brain file
        red: PathBuf,

        /// Black colony brain file
        black: PathBuf,

        /// World file (default: generate one from the seed)
        #[arg(short, long)]
        world: Option<PathBuf>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<i64>,

        /// Maximum turns
        #[arg(short, long)]
        turns: Option<u32>,

        /// Turn delay in milliseconds (default: 100)
        #[arg(long, default_value = "100")]
        speed: u64,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (JSON)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: tui or text
        #[arg(short, long, default_value = "tui")]
        format: cli::ReplayFormat,

        /// Start at specific turn
        #[arg(short, long)]
        turn: Option<u32>,

        /// Text format only: print every Nth turn (default: 1)
        #[arg(long, default_value = "1")]
        every: u32,
    },

    /// Check brain and world files without playing
    Validate {
        /// Brain files to check
        brains: Vec<PathBuf>,

        /// World file to check
        #[arg(short, long)]
        world: Option<PathBuf>,
    },

    /// Generate a random contest world
    Generate {
        /// Random seed
        #[arg(short, long, default_value = "12345")]
        seed: i64,

        /// Width in cells
        #[arg(long, default_value = "144")]
        width: usize,

        /// Height in cells
        #[arg(long, default_value = "144")]
        height: usize,

        /// Number of food blobs
        #[arg(long, default_value = "11")]
        food_blobs: usize,

        /// Number of rock formations
        #[arg(long, default_value = "14")]
        rocks: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(default_filter: &str) {
    // Logs go to stderr so JSON on stdout stays parseable.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let result = match args.command {
        Commands::Run {
            red,
            black,
            world,
            seed,
            turns,
            format,
            save,
            dump,
            quiet,
        } => cli::run::execute(&cli::run::RunOptions {
            red,
            black,
            world,
            seed,
            turns,
            format,
            save,
            dump,
            quiet,
        }),

        Commands::Match {
            first,
            second,
            world,
            seed,
            turns,
            rounds,
            format,
        } => cli::tournament::execute_match(&first, &second, world.as_deref(), seed, turns, rounds, format),

        Commands::Tournament {
            brains,
            world,
            seed,
            max_turns,
            rounds,
            threads,
            format,
            progress,
        } => cli::tournament::execute(&cli::tournament::TournamentOptions {
            brains,
            world,
            seed,
            max_turns,
            rounds,
            threads,
            format,
            progress,
        }),

        Commands::Watch {
            red,
            black,
            world,
            seed,
            turns,
            speed,
        } => cli::watch::execute(&red, &black, world.as_deref(), seed, turns, speed),

        Commands::Replay {
            recording,
            format,
            turn,
            every,
        } => cli::replay::execute(&recording, format, turn, every),

        Commands::Validate { brains, world } => cli::validate::execute(&brains, world.as_deref()),

        Commands::Generate {
            seed,
            width,
            height,
            food_blobs,
            rocks,
            output,
        } => cli::validate::generate(seed, width, height, food_blobs, rocks, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
