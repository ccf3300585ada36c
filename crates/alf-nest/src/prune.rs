//! # Pruner
//!
//! `prune_nest_like` rebuilds a nest keeping only what a smaller "slim" nest
//! names. At every record level the result holds exactly the slim record's
//! fields, each taken from the full nest; sequences and tuples must match in
//! length. Leaves of the full nest are kept as they are.
//!
//! A sentinel short-circuits the walk: wherever the slim value equals the
//! sentinel, the sentinel itself is emitted and the full nest's subtree at
//! that position is not descended. The field still has to exist.
//!
//! ```text
//! nest = {a: 1, b: 2}     slim = {a: _}            → {a: 1}
//! nest = {a: 1, b: 2}     slim = {a: _, b: ()}     → {a: 1, b: ()}   (sentinel ())
//! ```

use crate::error::{MismatchReason, NestError};
use crate::nest::{Nest, Record};
use crate::path::NestPath;
use crate::structure::{check_kind, child_named};

/// Prune `nest` to the shape of `slim`.
///
/// Sentinel comparison is structural equality on whole nests. `None` means
/// no sentinel; JSON callers pass the null leaf to get the usual behavior.
pub(crate) fn prune_nest_like<V>(
    nest: &Nest<V>,
    slim: &Nest<V>,
    value_to_match: Option<&Nest<V>>,
) -> Result<Nest<V>, NestError>
where
    V: Clone + PartialEq,
{
    let pruner = Pruner { sentinel: value_to_match };
    let mut path = NestPath::root();
    pruner.prune(nest, slim, &mut path)
}

struct Pruner<'s, V> {
    sentinel: Option<&'s Nest<V>>,
}

impl<V: Clone + PartialEq> Pruner<'_, V> {
    fn matches_sentinel(&self, slim: &Nest<V>) -> bool {
        self.sentinel.is_some_and(|s| s == slim)
    }

    fn prune(
        &self,
        nest: &Nest<V>,
        slim: &Nest<V>,
        path: &mut NestPath,
    ) -> Result<Nest<V>, NestError> {
        if self.matches_sentinel(slim) {
            return Ok(slim.clone());
        }
        if nest.is_leaf() && slim.is_leaf() {
            return Ok(nest.clone());
        }
        check_kind(nest, slim, path)?;
        match (nest, slim) {
            (Nest::Sequence(xs), Nest::Sequence(ys)) => {
                Ok(Nest::Sequence(self.prune_items(nest, slim, xs, ys, path)?))
            }
            (Nest::Tuple(xs), Nest::Tuple(ys)) => {
                Ok(Nest::Tuple(self.prune_items(nest, slim, xs, ys, path)?))
            }
            (Nest::Record(full), Nest::Record(keep)) => {
                Ok(Nest::Record(self.prune_record(nest, full, keep, path)?))
            }
            _ => Err(NestError::mismatch(
                path,
                MismatchReason::Kind,
                nest.shape(),
                slim.shape(),
            )),
        }
    }

    fn prune_items(
        &self,
        nest: &Nest<V>,
        slim: &Nest<V>,
        xs: &[Nest<V>],
        ys: &[Nest<V>],
        path: &mut NestPath,
    ) -> Result<Vec<Nest<V>>, NestError> {
        if xs.len() != ys.len() {
            return Err(NestError::mismatch(
                path,
                MismatchReason::Length,
                nest.shape(),
                slim.shape(),
            ));
        }
        let mut out = Vec::with_capacity(xs.len());
        for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
            path.push_index(i);
            let pruned = self.prune(x, y, path);
            path.pop();
            out.push(pruned?);
        }
        Ok(out)
    }

    /// Fields follow the slim record's construction order; the kind is the
    /// full record's.
    fn prune_record(
        &self,
        nest: &Nest<V>,
        full: &Record<V>,
        keep: &Record<V>,
        path: &mut NestPath,
    ) -> Result<Record<V>, NestError> {
        let pruned = keep.rebuild(|name, slim_child| {
            let full_child = child_named(nest, name, path)?;
            path.push_field(name);
            let result = self.prune(full_child, slim_child, path);
            path.pop();
            result
        })?;
        Ok(pruned.with_kind(full.kind().clone()))
    }
}
