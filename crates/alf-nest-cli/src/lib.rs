//! # alf-nest-cli: Command-Line Surface for the Nest Algebra
//!
//! Provides the `alfnest` binary. Every command reads nests from JSON files,
//! calls one library operation, and prints the result as JSON on stdout.
//!
//! ## Subcommands
//!
//! - `alfnest flatten` / `alfnest flatten-up-to`: list leaves or opaque units.
//! - `alfnest pack`: rebuild a nest from a flat JSON array.
//! - `alfnest check`: structural congruence of two nests.
//! - `alfnest prune`: keep only the fields a slim nest names.
//! - `alfnest get` / `alfnest find`: field lookup.
//!
//! ```bash
//! alfnest flatten sample.json --with-paths
//! alfnest check batch_a.json batch_b.json
//! alfnest prune full.json slim.json --sentinel '{"$tuple": []}'
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` when the operation itself fails on the given nests,
//! `2` on operational errors (unreadable files, malformed JSON, bad config).
//!
//! JSON nest encoding follows `alf_nest::json`: arrays are sequences,
//! `{"$tuple": [...]}` is a tuple, and an object with a `"$type"` string is a
//! named record.

pub mod check;
pub mod config;
pub mod prune;
pub mod query;
pub mod reshape;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use alf_nest::{from_json, Nest, NestError};

/// Exit code for success.
pub const EXIT_OK: u8 = 0;

/// Exit code for an operation that rejected its input nests.
pub const EXIT_FAILED: u8 = 1;

/// Exit code for operational errors.
pub const EXIT_ERROR: u8 = 2;

/// Read a JSON document from a file.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read nest file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse nest JSON: {}", path.display()))
}

/// Read a JSON file as a nest.
pub fn read_nest(path: &Path) -> Result<Nest<Value>> {
    read_json(path).map(|value| from_json(&value))
}

/// Parse an inline JSON argument.
pub fn parse_inline(text: &str, what: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("failed to parse {what} as JSON"))
}

/// Write a JSON result followed by a newline.
pub fn emit(out: &mut dyn Write, value: &Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Report a failed nest operation on stderr and yield the failure exit code.
pub fn failed(err: &NestError) -> u8 {
    eprintln!("FAIL: {err}");
    EXIT_FAILED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_compact_and_pretty() {
        let value = serde_json::json!({"a": [1, 2]});
        let mut compact = Vec::new();
        emit(&mut compact, &value, false).unwrap();
        assert_eq!(String::from_utf8(compact).unwrap(), "{\"a\":[1,2]}\n");

        let mut pretty = Vec::new();
        emit(&mut pretty, &value, true).unwrap();
        assert!(String::from_utf8(pretty).unwrap().contains("\n  \"a\": ["));
    }

    #[test]
    fn read_nest_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_nest(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse nest JSON"));
    }

    #[test]
    fn read_nest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_nest(&dir.path().join("absent.json")).is_err());
    }
}
