//! # alfnest CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, installs
//! the tracing subscriber and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alf_nest_cli::check::{run_check, CheckArgs};
use alf_nest_cli::config::{CliConfig, LogFormat};
use alf_nest_cli::prune::{run_prune, PruneArgs};
use alf_nest_cli::query::{run_find, run_get, FindArgs, GetArgs};
use alf_nest_cli::reshape::{
    run_flatten, run_flatten_up_to, run_pack, FlattenArgs, FlattenUpToArgs, PackArgs,
};
use alf_nest_cli::EXIT_ERROR;

/// Structural operations on JSON nests.
///
/// Flattens, packs, validates, prunes and queries arbitrarily nested JSON
/// documents using a canonical, sorted-field traversal order.
#[derive(Parser, Debug)]
#[command(name = "alfnest", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the leaves of a nest in canonical order.
    Flatten(FlattenArgs),

    /// Pack a flat JSON array into a template's shape.
    Pack(PackArgs),

    /// Check that two nests share the same structure.
    Check(CheckArgs),

    /// Cut a nest into subtrees at the leaves of a shallow nest.
    FlattenUpTo(FlattenUpToArgs),

    /// Keep only the fields a slim nest names.
    Prune(PruneArgs),

    /// Read the value at a dotted field path.
    Get(GetArgs),

    /// Collect every value held by fields with a given name.
    Find(FindArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    init_tracing(cli.verbose, config.log_format);
    tracing::debug!(?config, "alfnest starting");

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Flatten(args) => run_flatten(args, &config, &mut stdout),
        Commands::Pack(args) => run_pack(args, &config, &mut stdout),
        Commands::Check(args) => run_check(args, &mut stdout),
        Commands::FlattenUpTo(args) => run_flatten_up_to(args, &config, &mut stdout),
        Commands::Prune(args) => run_prune(args, &config, &mut stdout),
        Commands::Get(args) => run_get(args, &config, &mut stdout),
        Commands::Find(args) => run_find(args, &config, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Map the `-v` count to a log level; `RUST_LOG` is not consulted.
fn verbosity_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = verbosity_filter(verbose);
    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
    }
}
