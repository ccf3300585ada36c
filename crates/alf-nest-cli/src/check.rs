//! # Check Subcommand
//!
//! Structural congruence of two JSON nests. Leaf values are ignored; only
//! container kinds, lengths, field sets and record type tags are compared.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use alf_nest::assert_same_structure;

use crate::{failed, read_nest, EXIT_OK};

/// Arguments for `alfnest check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// First JSON nest.
    #[arg(value_name = "A")]
    pub a: PathBuf,

    /// Second JSON nest.
    #[arg(value_name = "B")]
    pub b: PathBuf,
}

/// Exit 0 when the nests are congruent, 1 with the first divergence otherwise.
pub fn run_check(args: &CheckArgs, out: &mut dyn Write) -> Result<u8> {
    let a = read_nest(&args.a)?;
    let b = read_nest(&args.b)?;
    match assert_same_structure(&a, &b) {
        Ok(()) => {
            writeln!(out, "OK: structures match")?;
            Ok(EXIT_OK)
        }
        Err(e) => Ok(failed(&e)),
    }
}
