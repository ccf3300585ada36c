//! # Flatten, Flatten-Up-To and Pack Subcommands

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::{json, Value};

use alf_nest::{flatten, flatten_up_to, flatten_with_path, pack_sequence_as, to_json};

use crate::config::CliConfig;
use crate::{emit, failed, read_json, read_nest, EXIT_OK};

/// Arguments for `alfnest flatten`.
#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// JSON nest to flatten.
    #[arg(value_name = "NEST")]
    pub nest: PathBuf,

    /// Emit `{"path", "value"}` objects instead of bare leaves.
    #[arg(long)]
    pub with_paths: bool,
}

/// Print the leaves of a nest in canonical order.
pub fn run_flatten(args: &FlattenArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let nest = read_nest(&args.nest)?;
    let result: Vec<Value> = if args.with_paths {
        flatten_with_path(&nest)
            .into_iter()
            .map(|(path, leaf)| json!({"path": path.dotted(), "value": leaf}))
            .collect()
    } else {
        flatten(&nest).into_iter().cloned().collect()
    };
    tracing::info!(leaves = result.len(), "flattened nest");
    emit(out, &Value::Array(result), config.pretty)?;
    Ok(EXIT_OK)
}

/// Arguments for `alfnest flatten-up-to`.
#[derive(Args, Debug)]
pub struct FlattenUpToArgs {
    /// Shallow nest bounding the traversal.
    #[arg(value_name = "SHALLOW")]
    pub shallow: PathBuf,

    /// JSON nest to cut into units.
    #[arg(value_name = "NEST")]
    pub nest: PathBuf,
}

/// Print the subtrees of a nest cut at the leaves of a shallow nest.
pub fn run_flatten_up_to(
    args: &FlattenUpToArgs,
    config: &CliConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    let shallow = read_nest(&args.shallow)?;
    let nest = read_nest(&args.nest)?;
    let units = match flatten_up_to(&shallow, &nest) {
        Ok(units) => units,
        Err(e) => return Ok(failed(&e)),
    };
    let result = Value::Array(units.into_iter().map(to_json).collect());
    emit(out, &result, config.pretty)?;
    Ok(EXIT_OK)
}

/// Arguments for `alfnest pack`.
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Template nest; only its shape is used.
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// JSON array of values, one per template leaf.
    #[arg(value_name = "FLAT")]
    pub flat: PathBuf,
}

/// Pack a flat JSON array into the template's shape.
pub fn run_pack(args: &PackArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let template = read_nest(&args.template)?;
    let Value::Array(values) = read_json(&args.flat)? else {
        bail!("flat values must be a JSON array: {}", args.flat.display());
    };
    let packed = match pack_sequence_as(&template, values) {
        Ok(packed) => packed,
        Err(e) => return Ok(failed(&e)),
    };
    emit(out, &to_json(&packed), config.pretty)?;
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::EXIT_FAILED;

    fn write(dir: &Path, name: &str, value: Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn compact() -> CliConfig {
        CliConfig {
            pretty: false,
            ..CliConfig::default()
        }
    }

    fn output(buf: Vec<u8>) -> Value {
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn flatten_prints_leaves() {
        let dir = tempfile::tempdir().unwrap();
        let nest = write(dir.path(), "n.json", json!({"b": [2, 3], "a": 1}));
        let mut out = Vec::new();
        let args = FlattenArgs {
            nest,
            with_paths: false,
        };
        assert_eq!(run_flatten(&args, &compact(), &mut out).unwrap(), EXIT_OK);
        assert_eq!(output(out), json!([1, 2, 3]));
    }

    #[test]
    fn flatten_with_paths() {
        let dir = tempfile::tempdir().unwrap();
        let nest = write(dir.path(), "n.json", json!({"a": 1, "b": [2]}));
        let mut out = Vec::new();
        let args = FlattenArgs {
            nest,
            with_paths: true,
        };
        run_flatten(&args, &compact(), &mut out).unwrap();
        assert_eq!(
            output(out),
            json!([{"path": "a", "value": 1}, {"path": "b.0", "value": 2}])
        );
    }

    #[test]
    fn flatten_up_to_prints_units() {
        let dir = tempfile::tempdir().unwrap();
        let shallow = write(dir.path(), "s.json", json!([null, null]));
        let nest = write(dir.path(), "n.json", json!([[1, 2], 3]));
        let mut out = Vec::new();
        let args = FlattenUpToArgs { shallow, nest };
        assert_eq!(run_flatten_up_to(&args, &compact(), &mut out).unwrap(), EXIT_OK);
        assert_eq!(output(out), json!([[1, 2], 3]));
    }

    #[test]
    fn flatten_up_to_mismatch_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let shallow = write(dir.path(), "s.json", json!([null, null]));
        let nest = write(dir.path(), "n.json", json!([1, 2, 3]));
        let mut out = Vec::new();
        let args = FlattenUpToArgs { shallow, nest };
        assert_eq!(run_flatten_up_to(&args, &compact(), &mut out).unwrap(), EXIT_FAILED);
        assert!(out.is_empty());
    }

    #[test]
    fn pack_rebuilds_template() {
        let dir = tempfile::tempdir().unwrap();
        let template = write(dir.path(), "t.json", json!({"a": 0, "b": [0, 0]}));
        let flat = write(dir.path(), "f.json", json!([9, 8, 7]));
        let mut out = Vec::new();
        let args = PackArgs { template, flat };
        assert_eq!(run_pack(&args, &compact(), &mut out).unwrap(), EXIT_OK);
        assert_eq!(output(out), json!({"a": 9, "b": [8, 7]}));
    }

    #[test]
    fn pack_wrong_count_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let template = write(dir.path(), "t.json", json!([0, [0, 0]]));
        let flat = write(dir.path(), "f.json", json!([1, 2]));
        let mut out = Vec::new();
        let args = PackArgs { template, flat };
        assert_eq!(run_pack(&args, &compact(), &mut out).unwrap(), EXIT_FAILED);
    }

    #[test]
    fn pack_non_array_is_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let template = write(dir.path(), "t.json", json!([0]));
        let flat = write(dir.path(), "f.json", json!({"not": "array"}));
        let mut out = Vec::new();
        let args = PackArgs { template, flat };
        assert!(run_pack(&args, &compact(), &mut out).is_err());
    }
}
