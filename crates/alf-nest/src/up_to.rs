//! # Shallow-Bounded Traversal
//!
//! The `up_to` family caps traversal depth with a secondary "shallow" nest.
//! While the shallow nest is still a container, every input must match it in
//! kind and length or field set. Where the shallow nest has a leaf, the whole
//! corresponding subtree of each input is handed over as one opaque unit,
//! even if it is itself a container.
//!
//! ```text
//! shallow = [_, _]
//! nest    = [[1, 2], 3]      units: [1, 2] and 3
//! ```
//!
//! Results always mirror the shallow nest's shape.

use crate::error::NestError;
use crate::nest::Nest;
use crate::path::NestPath;
use crate::structure::{check_node, child_at, child_named};

/// Subtrees of `nest` cut at the leaves of `shallow`, in canonical order.
pub(crate) fn flatten_up_to<'n, S, V>(
    shallow: &Nest<S>,
    nest: &'n Nest<V>,
) -> Result<Vec<&'n Nest<V>>, NestError> {
    let mut out = Vec::new();
    let mut path = NestPath::root();
    collect_units(shallow, nest, &mut path, &mut out)?;
    Ok(out)
}

fn collect_units<'n, S, V>(
    shallow: &Nest<S>,
    nest: &'n Nest<V>,
    path: &mut NestPath,
    out: &mut Vec<&'n Nest<V>>,
) -> Result<(), NestError> {
    if shallow.is_nested() {
        check_node(shallow, nest, path)?;
    }
    match shallow {
        Nest::Leaf(_) => out.push(nest),
        Nest::Sequence(items) | Nest::Tuple(items) => {
            for (i, sub) in items.iter().enumerate() {
                let child = child_at(shallow, nest, i, path)?;
                path.push_index(i);
                let result = collect_units(sub, child, path, out);
                path.pop();
                result?;
            }
        }
        Nest::Record(r) => {
            for (name, sub) in r.canonical() {
                let child = child_named(nest, name, path)?;
                path.push_field(name);
                let result = collect_units(sub, child, path, out);
                path.pop();
                result?;
            }
        }
    }
    Ok(())
}

/// Apply `func` to the units of `nests` cut at the leaves of `shallow`.
///
/// `func` receives the corresponding unit of every nest, in input order. The
/// result has the shape of `shallow`.
pub(crate) fn map_structure_up_to<S, V, U, F>(
    shallow: &Nest<S>,
    nests: &[&Nest<V>],
    mut func: F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&[&Nest<V>]) -> U,
{
    map_structure_up_to_with_path(shallow, nests, |_, units| func(units))
}

/// Like [`map_structure_up_to`], also passing the path of each unit.
pub(crate) fn map_structure_up_to_with_path<S, V, U, F>(
    shallow: &Nest<S>,
    nests: &[&Nest<V>],
    mut func: F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&NestPath, &[&Nest<V>]) -> U,
{
    if nests.is_empty() {
        return Err(NestError::EmptyInput {
            operation: "map_structure_up_to",
        });
    }
    let mut path = NestPath::root();
    map_up_to(shallow, nests, &mut path, &mut func)
}

fn map_up_to<S, V, U, F>(
    shallow: &Nest<S>,
    nests: &[&Nest<V>],
    path: &mut NestPath,
    func: &mut F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&NestPath, &[&Nest<V>]) -> U,
{
    if shallow.is_nested() {
        for &nest in nests {
            check_node(shallow, nest, path)?;
        }
    }
    match shallow {
        Nest::Leaf(_) => Ok(Nest::Leaf(func(path, nests))),
        Nest::Sequence(items) => {
            Ok(Nest::Sequence(map_items(shallow, items, nests, path, func)?))
        }
        Nest::Tuple(items) => Ok(Nest::Tuple(map_items(shallow, items, nests, path, func)?)),
        Nest::Record(r) => {
            let record = r.rebuild(|name, sub| {
                let children = nests
                    .iter()
                    .map(|&n| child_named(n, name, path))
                    .collect::<Result<Vec<_>, _>>()?;
                path.push_field(name);
                let mapped = map_up_to(sub, &children, path, func);
                path.pop();
                mapped
            })?;
            Ok(Nest::Record(record))
        }
    }
}

fn map_items<S, V, U, F>(
    shallow: &Nest<S>,
    items: &[Nest<S>],
    nests: &[&Nest<V>],
    path: &mut NestPath,
    func: &mut F,
) -> Result<Vec<Nest<U>>, NestError>
where
    F: FnMut(&NestPath, &[&Nest<V>]) -> U,
{
    let mut out = Vec::with_capacity(items.len());
    for (i, sub) in items.iter().enumerate() {
        let children = nests
            .iter()
            .map(|&n| child_at(shallow, n, i, path))
            .collect::<Result<Vec<_>, _>>()?;
        path.push_index(i);
        let mapped = map_up_to(sub, &children, path, func);
        path.pop();
        out.push(mapped?);
    }
    Ok(out)
}
