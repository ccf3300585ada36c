//! # Field Access
//!
//! Named lookups into nests:
//!
//! - `get_field` follows a dotted path through records only (`"a.b"` reads
//!   field `b` of field `a`). Segments are always field names; there is no
//!   index or wildcard syntax.
//! - `find_field` searches every container kind and collects the values of
//!   all fields with a given name, depth-first in canonical order. A match is not
//!   searched further.
//! - `extract_fields` lists a record's `(name, value)` pairs canonically.

use crate::classify::Nullable;
use crate::error::NestError;
use crate::nest::Nest;
use crate::path::NestPath;

/// The node at `dotted` below `nest`.
pub(crate) fn get_field<'n, V>(nest: &'n Nest<V>, dotted: &str) -> Result<&'n Nest<V>, NestError> {
    let mut node = nest;
    let mut path = NestPath::root();
    for name in dotted.split('.') {
        let record = match node {
            Nest::Record(r) => r,
            other => {
                return Err(NestError::PathTypeError {
                    path,
                    found: other.kind(),
                })
            }
        };
        node = record.get(name).ok_or_else(|| NestError::KeyMissing {
            path: path.clone(),
            field: name.to_string(),
        })?;
        path.push_field(name);
    }
    Ok(node)
}

/// Every value held by a field called `name`, in traversal order.
///
/// With `ignore_empty`, matches that are a null leaf or an empty sequence or
/// tuple are skipped. Never fails; no matches yields an empty list.
pub(crate) fn find_field<'n, V: Nullable>(
    nest: &'n Nest<V>,
    name: &str,
    ignore_empty: bool,
) -> Vec<&'n Nest<V>> {
    let mut out = Vec::new();
    let mut stack = vec![Frame::Visit(nest)];
    while let Some(frame) = stack.pop() {
        let node = match frame {
            Frame::Emit(value) => {
                if !(ignore_empty && is_empty_match(value)) {
                    out.push(value);
                }
                continue;
            }
            Frame::Visit(node) => node,
        };
        match node {
            Nest::Leaf(_) => {}
            Nest::Sequence(items) | Nest::Tuple(items) => {
                stack.extend(items.iter().rev().map(Frame::Visit));
            }
            Nest::Record(r) => {
                for (field, value) in r.canonical().into_iter().rev() {
                    stack.push(if field == name {
                        Frame::Emit(value)
                    } else {
                        Frame::Visit(value)
                    });
                }
            }
        }
    }
    out
}

enum Frame<'n, V> {
    /// Search below this node.
    Visit(&'n Nest<V>),
    /// A match, taken as is.
    Emit(&'n Nest<V>),
}

fn is_empty_match<V: Nullable>(value: &Nest<V>) -> bool {
    match value {
        Nest::Leaf(v) => v.is_null(),
        Nest::Sequence(items) | Nest::Tuple(items) => items.is_empty(),
        Nest::Record(_) => false,
    }
}

/// Canonical `(field, value)` pairs of a record node.
pub(crate) fn extract_fields<V>(nest: &Nest<V>) -> Result<Vec<(&str, &Nest<V>)>, NestError> {
    match nest {
        Nest::Record(r) => Ok(r.canonical()),
        other => Err(NestError::PathTypeError {
            path: NestPath::root(),
            found: other.kind(),
        }),
    }
}
