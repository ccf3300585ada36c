//! # Prune Subcommand

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use alf_nest::{from_json, prune_nest_like, to_json};

use crate::config::CliConfig;
use crate::{emit, failed, parse_inline, read_nest, EXIT_OK};

/// Arguments for `alfnest prune`.
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Full JSON nest.
    #[arg(value_name = "NEST")]
    pub nest: PathBuf,

    /// Slim JSON nest naming the fields to keep.
    #[arg(value_name = "SLIM")]
    pub slim: PathBuf,

    /// Inline JSON sentinel; overrides the config file's `sentinel`.
    #[arg(long, value_name = "JSON")]
    pub sentinel: Option<String>,

    /// Prune without a sentinel, so a null in SLIM must face a leaf.
    #[arg(long, conflicts_with = "sentinel")]
    pub no_sentinel: bool,
}

/// Print `NEST` pruned to the fields of `SLIM`.
pub fn run_prune(args: &PruneArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let nest = read_nest(&args.nest)?;
    let slim = read_nest(&args.slim)?;
    let sentinel = match &args.sentinel {
        Some(text) => Some(parse_inline(text, "--sentinel")?),
        None if args.no_sentinel || !config.use_sentinel => None,
        None => Some(config.sentinel.clone()),
    }
    .map(|value| from_json(&value));
    tracing::debug!(has_sentinel = sentinel.is_some(), "pruning nest");

    let pruned = match prune_nest_like(&nest, &slim, sentinel.as_ref()) {
        Ok(pruned) => pruned,
        Err(e) => return Ok(failed(&e)),
    };
    emit(out, &to_json(&pruned), config.pretty)?;
    Ok(EXIT_OK)
}
