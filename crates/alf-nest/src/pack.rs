//! # Flatten and Pack
//!
//! `flatten` walks a nest depth-first and emits its leaves in canonical order:
//! sequence and tuple children by position, record children sorted by field
//! name. `pack_sequence_as` is its inverse: it consumes a flat sequence in the
//! same order and rebuilds a nest shaped like a template.
//!
//! Round trip: `pack_sequence_as(n, flatten(n))` equals `n`.
//!
//! The flatten side runs on an explicit stack. Packing recurses along the
//! template, with the consumption cursor held by a `Packer` that lives for
//! one call.

use crate::error::NestError;
use crate::nest::Nest;
use crate::path::{NestPath, PathSegment};

/// Leaves of `nest` in canonical order. A bare leaf flattens to itself.
pub(crate) fn flatten<V>(nest: &Nest<V>) -> Vec<&V> {
    let mut out = Vec::new();
    let mut stack = vec![nest];
    while let Some(node) = stack.pop() {
        match node {
            Nest::Leaf(v) => out.push(v),
            Nest::Sequence(items) | Nest::Tuple(items) => stack.extend(items.iter().rev()),
            Nest::Record(r) => stack.extend(r.canonical().into_iter().rev().map(|(_, v)| v)),
        }
    }
    out
}

/// Leaves of `nest` in canonical order, each paired with its path.
pub(crate) fn flatten_with_path<V>(nest: &Nest<V>) -> Vec<(NestPath, &V)> {
    let mut out = Vec::new();
    let mut path = NestPath::root();
    let mut stack: Vec<(&Nest<V>, usize, Option<PathSegment>)> = vec![(nest, 0, None)];
    while let Some((node, depth, segment)) = stack.pop() {
        path.truncate(depth);
        if let Some(segment) = segment {
            path.push(segment);
        }
        let depth = path.depth();
        match node {
            Nest::Leaf(v) => out.push((path.clone(), v)),
            Nest::Sequence(items) | Nest::Tuple(items) => {
                for (i, child) in items.iter().enumerate().rev() {
                    stack.push((child, depth, Some(PathSegment::Index(i))));
                }
            }
            Nest::Record(r) => {
                for (name, child) in r.canonical().into_iter().rev() {
                    stack.push((child, depth, Some(PathSegment::Field(name.to_string()))));
                }
            }
        }
    }
    out
}

/// Number of leaves in `nest`.
pub(crate) fn leaf_count<V>(nest: &Nest<V>) -> usize {
    let mut count = 0;
    let mut stack = vec![nest];
    while let Some(node) = stack.pop() {
        match node {
            Nest::Leaf(_) => count += 1,
            Nest::Sequence(items) | Nest::Tuple(items) => stack.extend(items.iter()),
            Nest::Record(r) => stack.extend(r.iter().map(|(_, v)| v)),
        }
    }
    count
}

/// Rebuild a nest shaped like `template` from a flat sequence.
///
/// The template's leaf values are ignored; only its shape is used.
pub(crate) fn pack_sequence_as<T, U>(
    template: &Nest<T>,
    flat: impl IntoIterator<Item = U>,
) -> Result<Nest<U>, NestError> {
    let values: Vec<U> = flat.into_iter().collect();
    let expected = leaf_count(template);
    if values.len() != expected {
        return Err(NestError::LengthMismatch {
            expected,
            actual: values.len(),
        });
    }
    let mut packer = Packer {
        values: values.into_iter(),
        expected,
        consumed: 0,
    };
    packer.pack(template)
}

/// Cursor over the flat values for a single `pack_sequence_as` call.
struct Packer<I> {
    values: I,
    expected: usize,
    consumed: usize,
}

impl<U, I: Iterator<Item = U>> Packer<I> {
    fn pack<T>(&mut self, template: &Nest<T>) -> Result<Nest<U>, NestError> {
        match template {
            Nest::Leaf(_) => self.next().map(Nest::Leaf),
            Nest::Sequence(items) => Ok(Nest::Sequence(self.pack_all(items)?)),
            Nest::Tuple(items) => Ok(Nest::Tuple(self.pack_all(items)?)),
            Nest::Record(r) => Ok(Nest::Record(r.rebuild(|_, child| self.pack(child))?)),
        }
    }

    fn pack_all<T>(&mut self, items: &[Nest<T>]) -> Result<Vec<Nest<U>>, NestError> {
        items.iter().map(|child| self.pack(child)).collect()
    }

    fn next(&mut self) -> Result<U, NestError> {
        let value = self.values.next().ok_or(NestError::LengthMismatch {
            expected: self.expected,
            actual: self.consumed,
        })?;
        self.consumed += 1;
        Ok(value)
    }
}
