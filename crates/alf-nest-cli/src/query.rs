//! # Get and Find Subcommands
//!
//! `get` follows a dotted path through records; `find` searches the whole
//! nest for fields with a given name.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use alf_nest::{find_field, get_field, to_json};

use crate::config::CliConfig;
use crate::{emit, failed, read_nest, EXIT_OK};

/// Arguments for `alfnest get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// JSON nest to read from.
    #[arg(value_name = "NEST")]
    pub nest: PathBuf,

    /// Dotted field path, e.g. `obs.camera`.
    #[arg(value_name = "DOTTED_PATH")]
    pub path: String,
}

/// Print the node at a dotted field path.
pub fn run_get(args: &GetArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let nest = read_nest(&args.nest)?;
    let node = match get_field(&nest, &args.path) {
        Ok(node) => node,
        Err(e) => return Ok(failed(&e)),
    };
    emit(out, &to_json(node), config.pretty)?;
    Ok(EXIT_OK)
}

/// Arguments for `alfnest find`.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// JSON nest to search.
    #[arg(value_name = "NEST")]
    pub nest: PathBuf,

    /// Field name to collect.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Also report null and empty matches.
    #[arg(long)]
    pub keep_empty: bool,
}

/// Print every value held by a field called `NAME`, as a JSON array.
pub fn run_find(args: &FindArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let nest = read_nest(&args.nest)?;
    let ignore_empty = config.ignore_empty && !args.keep_empty;
    let found: Vec<Value> = find_field(&nest, &args.name, ignore_empty)
        .into_iter()
        .map(to_json)
        .collect();
    tracing::info!(name = %args.name, matches = found.len(), "field search finished");
    emit(out, &Value::Array(found), config.pretty)?;
    Ok(EXIT_OK)
}
