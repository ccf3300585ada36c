//! # Element-wise Mapping
//!
//! `map_structure` applies a function across the leaves of one or more
//! congruent nests and rebuilds the result in the shape of the first. All
//! inputs are validated against the first nest before any leaf is visited, so
//! the function never observes a partial traversal of mismatched data.
//!
//! `map_flat` is the cheaper variant: it flattens every input, zips the leaf
//! lists, and packs the results into the first nest's shape. It only requires
//! equal leaf counts, not full congruence.

use crate::error::{MismatchReason, NestError};
use crate::nest::Nest;
use crate::pack::{flatten, pack_sequence_as};
use crate::path::NestPath;
use crate::structure::{assert_same_structure, check_node, child_at, child_named};

/// Map `func` over the leaves of congruent `nests`.
///
/// `func` receives the corresponding leaf of every nest, in input order.
pub(crate) fn map_structure<V, U, F>(nests: &[&Nest<V>], mut func: F) -> Result<Nest<U>, NestError>
where
    F: FnMut(&[&V]) -> U,
{
    map_structure_with_path(nests, |_, leaves| func(leaves))
}

/// Like [`map_structure`], also passing the path of each leaf.
pub(crate) fn map_structure_with_path<V, U, F>(
    nests: &[&Nest<V>],
    mut func: F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&NestPath, &[&V]) -> U,
{
    let (&first, rest) = nests.split_first().ok_or(NestError::EmptyInput {
        operation: "map_structure",
    })?;
    for &other in rest {
        assert_same_structure(first, other)?;
    }
    let mut path = NestPath::root();
    map_node(nests, &mut path, &mut func)
}

fn map_node<V, U, F>(
    nests: &[&Nest<V>],
    path: &mut NestPath,
    func: &mut F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&NestPath, &[&V]) -> U,
{
    let Some(&first) = nests.first() else {
        return Err(NestError::EmptyInput {
            operation: "map_structure",
        });
    };
    for &other in &nests[1..] {
        check_node(first, other, path)?;
    }
    match first {
        Nest::Leaf(_) => {
            let leaves: Vec<&V> = nests.iter().filter_map(|n| n.as_leaf()).collect();
            Ok(Nest::Leaf(func(path, &leaves)))
        }
        Nest::Sequence(items) => {
            Ok(Nest::Sequence(map_positional(first, nests, items.len(), path, func)?))
        }
        Nest::Tuple(items) => {
            Ok(Nest::Tuple(map_positional(first, nests, items.len(), path, func)?))
        }
        Nest::Record(r) => {
            let record = r.rebuild(|name, _| {
                let children = nests
                    .iter()
                    .map(|&n| child_named(n, name, path))
                    .collect::<Result<Vec<_>, _>>()?;
                path.push_field(name);
                let mapped = map_node(&children, path, func);
                path.pop();
                mapped
            })?;
            Ok(Nest::Record(record))
        }
    }
}

fn map_positional<V, U, F>(
    first: &Nest<V>,
    nests: &[&Nest<V>],
    len: usize,
    path: &mut NestPath,
    func: &mut F,
) -> Result<Vec<Nest<U>>, NestError>
where
    F: FnMut(&NestPath, &[&V]) -> U,
{
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let children = nests
            .iter()
            .map(|&n| child_at(first, n, i, path))
            .collect::<Result<Vec<_>, _>>()?;
        path.push_index(i);
        let mapped = map_node(&children, path, func);
        path.pop();
        out.push(mapped?);
    }
    Ok(out)
}

/// Map over two congruent nests whose leaf types differ.
pub(crate) fn zip_map<A, B, U, F>(
    a: &Nest<A>,
    b: &Nest<B>,
    mut func: F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&A, &B) -> U,
{
    assert_same_structure(a, b)?;
    zip_node(a, b, &NestPath::root(), &mut func)
}

fn zip_node<A, B, U, F>(
    a: &Nest<A>,
    b: &Nest<B>,
    path: &NestPath,
    func: &mut F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&A, &B) -> U,
{
    match (a, b) {
        (Nest::Leaf(x), Nest::Leaf(y)) => Ok(Nest::Leaf(func(x, y))),
        (Nest::Sequence(xs), Nest::Sequence(ys)) => {
            Ok(Nest::Sequence(zip_items(xs, ys, path, func)?))
        }
        (Nest::Tuple(xs), Nest::Tuple(ys)) => Ok(Nest::Tuple(zip_items(xs, ys, path, func)?)),
        (Nest::Record(x), Nest::Record(_)) => {
            let record = x.rebuild(|name, child| {
                let other = child_named(b, name, path)?;
                zip_node(child, other, &path.field(name), func)
            })?;
            Ok(Nest::Record(record))
        }
        _ => Err(NestError::mismatch(path, MismatchReason::Kind, a.shape(), b.shape())),
    }
}

fn zip_items<A, B, U, F>(
    xs: &[Nest<A>],
    ys: &[Nest<B>],
    path: &NestPath,
    func: &mut F,
) -> Result<Vec<Nest<U>>, NestError>
where
    F: FnMut(&A, &B) -> U,
{
    xs.iter()
        .zip(ys)
        .enumerate()
        .map(|(i, (x, y))| zip_node(x, y, &path.index(i), func))
        .collect()
}

/// Map over nests with equal leaf counts by flattening, zipping, and
/// packing into the shape of `nests[0]`.
pub(crate) fn map_flat<V, U, F>(nests: &[&Nest<V>], mut func: F) -> Result<Nest<U>, NestError>
where
    F: FnMut(&[&V]) -> U,
{
    let (&first, _) = nests.split_first().ok_or(NestError::EmptyInput {
        operation: "map_flat",
    })?;
    let flats: Vec<Vec<&V>> = nests.iter().map(|&n| flatten(n)).collect();
    let expected = flats[0].len();
    if let Some(bad) = flats.iter().find(|f| f.len() != expected) {
        return Err(NestError::LengthMismatch {
            expected,
            actual: bad.len(),
        });
    }
    let results: Vec<U> = (0..expected)
        .map(|i| {
            let column: Vec<&V> = flats.iter().map(|f| f[i]).collect();
            func(&column)
        })
        .collect();
    pack_sequence_as(first, results)
}
