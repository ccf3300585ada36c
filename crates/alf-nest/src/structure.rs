//! # Structural Validator
//!
//! Two nests are congruent when both are leaves, or both are the same
//! container kind with equal length (sequence, tuple) or equal field-name set
//! (record), and every pair of corresponding children is congruent.
//!
//! The walk uses an explicit stack of `(left, right, depth, segment)` frames
//! over one shared path, so deep nests grow neither the call stack nor the
//! cost of path bookkeeping. Children are pushed in reverse so the first
//! divergence reported is the first in canonical order.
//!
//! Leaf types of the two sides may differ: only shape is compared.

use crate::error::{MismatchReason, NestError};
use crate::nest::Nest;
use crate::path::{NestPath, PathSegment};

/// Check that two nodes are the same kind of node, ignoring their children.
///
/// Leaves match leaves; sequences match sequences; tuples match tuples;
/// records match records of the same `RecordKind`.
pub(crate) fn check_kind<A, B>(a: &Nest<A>, b: &Nest<B>, path: &NestPath) -> Result<(), NestError> {
    let reason = match (a, b) {
        (Nest::Leaf(_), Nest::Leaf(_))
        | (Nest::Sequence(_), Nest::Sequence(_))
        | (Nest::Tuple(_), Nest::Tuple(_)) => return Ok(()),
        (Nest::Record(x), Nest::Record(y)) if x.kind() == y.kind() => return Ok(()),
        (Nest::Record(_), Nest::Record(_)) => MismatchReason::RecordType,
        _ => MismatchReason::Kind,
    };
    Err(NestError::mismatch(path, reason, a.shape(), b.shape()))
}

/// Check kind plus length or field set of two nodes.
pub(crate) fn check_node<A, B>(a: &Nest<A>, b: &Nest<B>, path: &NestPath) -> Result<(), NestError> {
    check_kind(a, b, path)?;
    let reason = match (a, b) {
        (Nest::Sequence(xs), Nest::Sequence(ys)) | (Nest::Tuple(xs), Nest::Tuple(ys))
            if xs.len() != ys.len() =>
        {
            MismatchReason::Length
        }
        (Nest::Record(x), Nest::Record(y)) if !x.same_field_set(y) => MismatchReason::FieldSet,
        _ => return Ok(()),
    };
    Err(NestError::mismatch(path, reason, a.shape(), b.shape()))
}

/// Positional child of a node already checked to be a sequence or tuple.
///
/// `reference` is the node `node` is being walked against; it supplies the
/// expected side of a length mismatch.
pub(crate) fn child_at<'n, S, V>(
    reference: &Nest<S>,
    node: &'n Nest<V>,
    index: usize,
    path: &NestPath,
) -> Result<&'n Nest<V>, NestError> {
    match node {
        Nest::Sequence(items) | Nest::Tuple(items) => items.get(index).ok_or_else(|| {
            NestError::mismatch(
                path,
                MismatchReason::Length,
                reference.shape(),
                node.shape(),
            )
        }),
        _ => Err(NestError::PathTypeError {
            path: path.clone(),
            found: node.kind(),
        }),
    }
}

/// Named child of a node already checked to be a record.
pub(crate) fn child_named<'n, V>(
    node: &'n Nest<V>,
    name: &str,
    path: &NestPath,
) -> Result<&'n Nest<V>, NestError> {
    match node {
        Nest::Record(r) => r.get(name).ok_or_else(|| NestError::FieldMissing {
            path: path.clone(),
            field: name.to_string(),
        }),
        _ => Err(NestError::PathTypeError {
            path: path.clone(),
            found: node.kind(),
        }),
    }
}

/// Verify two nests are congruent.
pub(crate) fn assert_same_structure<A, B>(a: &Nest<A>, b: &Nest<B>) -> Result<(), NestError> {
    let mut path = NestPath::root();
    let mut stack: Vec<(&Nest<A>, &Nest<B>, usize, Option<PathSegment>)> = vec![(a, b, 0, None)];
    while let Some((a, b, depth, segment)) = stack.pop() {
        path.truncate(depth);
        if let Some(segment) = segment {
            path.push(segment);
        }
        check_node(a, b, &path)?;
        let depth = path.depth();
        match (a, b) {
            (Nest::Sequence(xs), Nest::Sequence(ys)) | (Nest::Tuple(xs), Nest::Tuple(ys)) => {
                for (i, (x, y)) in xs.iter().zip(ys).enumerate().rev() {
                    stack.push((x, y, depth, Some(PathSegment::Index(i))));
                }
            }
            // Equal field sets, so both canonical orders pair up name for name.
            (Nest::Record(x), Nest::Record(y)) => {
                for ((name, xv), (_, yv)) in x.canonical().into_iter().zip(y.canonical()).rev() {
                    stack.push((xv, yv, depth, Some(PathSegment::Field(name.to_string()))));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Check only the top-level kind of two nests.
pub(crate) fn assert_same_kind<A, B>(a: &Nest<A>, b: &Nest<B>) -> Result<(), NestError> {
    check_kind(a, b, &NestPath::root())
}
