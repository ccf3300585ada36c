//! # Operations
//!
//! [`NestOps`] is the public face of the algebra: one method per operation,
//! each reporting failures to the configured [`DiagnosticSink`] before
//! returning them. The free functions re-exported at the crate root are the
//! same operations bound to [`NestOps::default`], which reports through
//! `tracing`.
//!
//! ```rust
//! use alf_nest::{CollectingSink, Nest, NestOps};
//!
//! let sink = CollectingSink::new();
//! let ops = NestOps::new(&sink);
//! let template = Nest::leaves([0, 0]);
//! assert!(ops.pack_sequence_as(&template, [1]).is_err());
//! assert_eq!(sink.reports()[0].operation, "pack_sequence_as");
//! ```

use std::fmt;

use crate::classify::Nullable;
use crate::diagnostics::{reported, DiagnosticSink, TracingSink};
use crate::error::NestError;
use crate::nest::Nest;
use crate::path::NestPath;
use crate::{field, map, pack, prune, structure, up_to};

static TRACING: TracingSink = TracingSink;

/// Nest operations bound to a diagnostic sink.
#[derive(Clone, Copy)]
pub struct NestOps<'a> {
    sink: &'a dyn DiagnosticSink,
}

impl Default for NestOps<'static> {
    fn default() -> Self {
        Self { sink: &TRACING }
    }
}

impl fmt::Debug for NestOps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestOps").finish_non_exhaustive()
    }
}

impl<'a> NestOps<'a> {
    /// Operations reporting to `sink`.
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    /// Leaves of `nest` in canonical order. A bare leaf flattens to a
    /// one-element list.
    pub fn flatten<'n, V>(&self, nest: &'n Nest<V>) -> Vec<&'n V> {
        pack::flatten(nest)
    }

    /// Leaves paired with their paths, in canonical order.
    pub fn flatten_with_path<'n, V>(&self, nest: &'n Nest<V>) -> Vec<(NestPath, &'n V)> {
        pack::flatten_with_path(nest)
    }

    /// Number of leaves in `nest`.
    pub fn leaf_count<V>(&self, nest: &Nest<V>) -> usize {
        pack::leaf_count(nest)
    }

    /// Rebuild a nest shaped like `template` from flat values.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` unless `flat` holds exactly one value per template
    /// leaf.
    pub fn pack_sequence_as<T, U>(
        &self,
        template: &Nest<T>,
        flat: impl IntoIterator<Item = U>,
    ) -> Result<Nest<U>, NestError> {
        reported(
            self.sink,
            "pack_sequence_as",
            pack::pack_sequence_as(template, flat),
        )
    }

    /// Verify that `a` and `b` are congruent.
    ///
    /// # Errors
    ///
    /// `StructureMismatch` at the first divergence in canonical order.
    pub fn assert_same_structure<A, B>(&self, a: &Nest<A>, b: &Nest<B>) -> Result<(), NestError> {
        reported(
            self.sink,
            "assert_same_structure",
            structure::assert_same_structure(a, b),
        )
    }

    /// True when `a` and `b` are congruent. Never reports.
    pub fn is_same_structure<A, B>(&self, a: &Nest<A>, b: &Nest<B>) -> bool {
        structure::assert_same_structure(a, b).is_ok()
    }

    /// Compare only the top-level kinds of `a` and `b`.
    pub fn assert_same_kind<A, B>(&self, a: &Nest<A>, b: &Nest<B>) -> Result<(), NestError> {
        reported(self.sink, "assert_same_kind", structure::assert_same_kind(a, b))
    }

    /// Map `func` over the corresponding leaves of congruent `nests`.
    ///
    /// # Errors
    ///
    /// `EmptyInput` for no nests; `StructureMismatch` (raised before `func`
    /// is first called) when any nest is not congruent with the first.
    pub fn map_structure<V, U, F>(&self, nests: &[&Nest<V>], func: F) -> Result<Nest<U>, NestError>
    where
        F: FnMut(&[&V]) -> U,
    {
        reported(self.sink, "map_structure", map::map_structure(nests, func))
    }

    /// Like [`NestOps::map_structure`], also passing each leaf's path.
    pub fn map_structure_with_path<V, U, F>(
        &self,
        nests: &[&Nest<V>],
        func: F,
    ) -> Result<Nest<U>, NestError>
    where
        F: FnMut(&NestPath, &[&V]) -> U,
    {
        reported(
            self.sink,
            "map_structure_with_path",
            map::map_structure_with_path(nests, func),
        )
    }

    /// Map over two congruent nests with different leaf types.
    pub fn zip_map<A, B, U, F>(
        &self,
        a: &Nest<A>,
        b: &Nest<B>,
        func: F,
    ) -> Result<Nest<U>, NestError>
    where
        F: FnMut(&A, &B) -> U,
    {
        reported(self.sink, "zip_map", map::zip_map(a, b, func))
    }

    /// Flatten, zip and pack: requires equal leaf counts only.
    pub fn map_flat<V, U, F>(&self, nests: &[&Nest<V>], func: F) -> Result<Nest<U>, NestError>
    where
        F: FnMut(&[&V]) -> U,
    {
        reported(self.sink, "map_flat", map::map_flat(nests, func))
    }

    /// Subtrees of `nest` cut at the leaves of `shallow`.
    ///
    /// # Errors
    ///
    /// `StructureMismatch` or `FieldMissing` where `nest` diverges from a
    /// container of `shallow`.
    pub fn flatten_up_to<'n, S, V>(
        &self,
        shallow: &Nest<S>,
        nest: &'n Nest<V>,
    ) -> Result<Vec<&'n Nest<V>>, NestError> {
        reported(self.sink, "flatten_up_to", up_to::flatten_up_to(shallow, nest))
    }

    /// Map `func` over the units of `nests` cut at the leaves of `shallow`.
    pub fn map_structure_up_to<S, V, U, F>(
        &self,
        shallow: &Nest<S>,
        nests: &[&Nest<V>],
        func: F,
    ) -> Result<Nest<U>, NestError>
    where
        F: FnMut(&[&Nest<V>]) -> U,
    {
        reported(
            self.sink,
            "map_structure_up_to",
            up_to::map_structure_up_to(shallow, nests, func),
        )
    }

    /// Like [`NestOps::map_structure_up_to`], also passing each unit's path.
    pub fn map_structure_up_to_with_path<S, V, U, F>(
        &self,
        shallow: &Nest<S>,
        nests: &[&Nest<V>],
        func: F,
    ) -> Result<Nest<U>, NestError>
    where
        F: FnMut(&NestPath, &[&Nest<V>]) -> U,
    {
        reported(
            self.sink,
            "map_structure_up_to_with_path",
            up_to::map_structure_up_to_with_path(shallow, nests, func),
        )
    }

    /// Keep only the fields `slim` names, substituting the sentinel where
    /// `slim` holds it.
    ///
    /// `None` disables the sentinel. For JSON nests the conventional sentinel
    /// is the null leaf, `Some(&Nest::leaf(Value::Null))`: a null in `slim`
    /// then stands for "keep the field, drop its contents" whatever the full
    /// nest holds there.
    ///
    /// # Errors
    ///
    /// `StructureMismatch` on kind or length divergence, `FieldMissing` when
    /// `slim` names a field `nest` lacks.
    pub fn prune_nest_like<V>(
        &self,
        nest: &Nest<V>,
        slim: &Nest<V>,
        value_to_match: Option<&Nest<V>>,
    ) -> Result<Nest<V>, NestError>
    where
        V: Clone + PartialEq,
    {
        reported(
            self.sink,
            "prune_nest_like",
            prune::prune_nest_like(nest, slim, value_to_match),
        )
    }

    /// The node at a dotted field path.
    ///
    /// # Errors
    ///
    /// `PathTypeError` when descent meets a non-record, `KeyMissing` when a
    /// record lacks the next field.
    pub fn get_field<'n, V>(
        &self,
        nest: &'n Nest<V>,
        dotted: &str,
    ) -> Result<&'n Nest<V>, NestError> {
        reported(self.sink, "get_field", field::get_field(nest, dotted))
    }

    /// All values of fields called `name`, in traversal order.
    pub fn find_field<'n, V: Nullable>(
        &self,
        nest: &'n Nest<V>,
        name: &str,
        ignore_empty: bool,
    ) -> Vec<&'n Nest<V>> {
        field::find_field(nest, name, ignore_empty)
    }

    /// Canonical `(field, value)` pairs of a record.
    pub fn extract_fields<'n, V>(
        &self,
        nest: &'n Nest<V>,
    ) -> Result<Vec<(&'n str, &'n Nest<V>)>, NestError> {
        reported(self.sink, "extract_fields", field::extract_fields(nest))
    }
}

/// See [`NestOps::flatten`].
pub fn flatten<V>(nest: &Nest<V>) -> Vec<&V> {
    NestOps::default().flatten(nest)
}

/// See [`NestOps::flatten_with_path`].
pub fn flatten_with_path<V>(nest: &Nest<V>) -> Vec<(NestPath, &V)> {
    NestOps::default().flatten_with_path(nest)
}

/// See [`NestOps::leaf_count`].
pub fn leaf_count<V>(nest: &Nest<V>) -> usize {
    NestOps::default().leaf_count(nest)
}

/// See [`NestOps::pack_sequence_as`].
pub fn pack_sequence_as<T, U>(
    template: &Nest<T>,
    flat: impl IntoIterator<Item = U>,
) -> Result<Nest<U>, NestError> {
    NestOps::default().pack_sequence_as(template, flat)
}

/// See [`NestOps::assert_same_structure`].
pub fn assert_same_structure<A, B>(a: &Nest<A>, b: &Nest<B>) -> Result<(), NestError> {
    NestOps::default().assert_same_structure(a, b)
}

/// See [`NestOps::is_same_structure`].
pub fn is_same_structure<A, B>(a: &Nest<A>, b: &Nest<B>) -> bool {
    NestOps::default().is_same_structure(a, b)
}

/// See [`NestOps::assert_same_kind`].
pub fn assert_same_kind<A, B>(a: &Nest<A>, b: &Nest<B>) -> Result<(), NestError> {
    NestOps::default().assert_same_kind(a, b)
}

/// See [`NestOps::map_structure`].
pub fn map_structure<V, U, F>(nests: &[&Nest<V>], func: F) -> Result<Nest<U>, NestError>
where
    F: FnMut(&[&V]) -> U,
{
    NestOps::default().map_structure(nests, func)
}

/// See [`NestOps::map_structure_with_path`].
pub fn map_structure_with_path<V, U, F>(nests: &[&Nest<V>], func: F) -> Result<Nest<U>, NestError>
where
    F: FnMut(&NestPath, &[&V]) -> U,
{
    NestOps::default().map_structure_with_path(nests, func)
}

/// See [`NestOps::zip_map`].
pub fn zip_map<A, B, U, F>(a: &Nest<A>, b: &Nest<B>, func: F) -> Result<Nest<U>, NestError>
where
    F: FnMut(&A, &B) -> U,
{
    NestOps::default().zip_map(a, b, func)
}

/// See [`NestOps::map_flat`].
pub fn map_flat<V, U, F>(nests: &[&Nest<V>], func: F) -> Result<Nest<U>, NestError>
where
    F: FnMut(&[&V]) -> U,
{
    NestOps::default().map_flat(nests, func)
}

/// See [`NestOps::flatten_up_to`].
pub fn flatten_up_to<'n, S, V>(
    shallow: &Nest<S>,
    nest: &'n Nest<V>,
) -> Result<Vec<&'n Nest<V>>, NestError> {
    NestOps::default().flatten_up_to(shallow, nest)
}

/// See [`NestOps::map_structure_up_to`].
pub fn map_structure_up_to<S, V, U, F>(
    shallow: &Nest<S>,
    nests: &[&Nest<V>],
    func: F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&[&Nest<V>]) -> U,
{
    NestOps::default().map_structure_up_to(shallow, nests, func)
}

/// See [`NestOps::map_structure_up_to_with_path`].
pub fn map_structure_up_to_with_path<S, V, U, F>(
    shallow: &Nest<S>,
    nests: &[&Nest<V>],
    func: F,
) -> Result<Nest<U>, NestError>
where
    F: FnMut(&NestPath, &[&Nest<V>]) -> U,
{
    NestOps::default().map_structure_up_to_with_path(shallow, nests, func)
}

/// See [`NestOps::prune_nest_like`].
pub fn prune_nest_like<V>(
    nest: &Nest<V>,
    slim: &Nest<V>,
    value_to_match: Option<&Nest<V>>,
) -> Result<Nest<V>, NestError>
where
    V: Clone + PartialEq,
{
    NestOps::default().prune_nest_like(nest, slim, value_to_match)
}

/// See [`NestOps::get_field`].
pub fn get_field<'n, V>(nest: &'n Nest<V>, dotted: &str) -> Result<&'n Nest<V>, NestError> {
    NestOps::default().get_field(nest, dotted)
}

/// See [`NestOps::find_field`].
pub fn find_field<'n, V: Nullable>(
    nest: &'n Nest<V>,
    name: &str,
    ignore_empty: bool,
) -> Vec<&'n Nest<V>> {
    NestOps::default().find_field(nest, name, ignore_empty)
}

/// See [`NestOps::extract_fields`].
pub fn extract_fields<V>(nest: &Nest<V>) -> Result<Vec<(&str, &Nest<V>)>, NestError> {
    NestOps::default().extract_fields(nest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, NullSink};

    #[test]
    fn test_failures_are_reported_once() {
        let sink = CollectingSink::new();
        let ops = NestOps::new(&sink);
        let nest = Nest::mapping([("a", Nest::leaves([1, 2]))]);

        let err = ops.get_field(&nest, "a.b").unwrap_err();
        let reports = sink.take();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].operation, "get_field");
        assert_eq!(reports[0].error, err);
    }

    #[test]
    fn test_success_is_silent() {
        let sink = CollectingSink::new();
        let ops = NestOps::new(&sink);
        let nest = Nest::leaves([1, 2]);
        ops.assert_same_structure(&nest, &nest).unwrap();
        ops.pack_sequence_as(&nest, [3, 4]).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_predicate_does_not_report() {
        let sink = CollectingSink::new();
        let ops = NestOps::new(&sink);
        assert!(!ops.is_same_structure(&Nest::leaf(1), &Nest::leaves([1])));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_each_fallible_operation_names_itself() {
        let sink = CollectingSink::new();
        let ops = NestOps::new(&sink);
        let seq = Nest::leaves([1, 2]);
        let leaf = Nest::leaf(0);

        let _ = ops.assert_same_kind(&seq, &leaf);
        let _ = ops.map_structure(&[&seq, &leaf], |v| *v[0]);
        let _ = ops.zip_map(&seq, &leaf, |a, b| a + b);
        let _ = ops.map_flat(&[&seq, &leaf], |v| *v[0]);
        let _ = ops.flatten_up_to(&seq, &leaf);
        let _ = ops.map_structure_up_to(&seq, &[&leaf], |_| 0);
        let _ = ops.prune_nest_like(&leaf, &seq, None);
        let _ = ops.extract_fields(&leaf);

        let names: Vec<&str> = sink.take().iter().map(|r| r.operation).collect();
        assert_eq!(
            names,
            vec![
                "assert_same_kind",
                "map_structure",
                "zip_map",
                "map_flat",
                "flatten_up_to",
                "map_structure_up_to",
                "prune_nest_like",
                "extract_fields",
            ]
        );
    }

    #[test]
    fn test_free_functions_match_ops() {
        let nest = Nest::mapping([("b", Nest::leaf(2)), ("a", Nest::leaf(1))]);
        let ops = NestOps::new(&NullSink);
        assert_eq!(flatten(&nest), ops.flatten(&nest));
        assert_eq!(leaf_count(&nest), 2);
        assert_eq!(get_field(&nest, "b"), Ok(&Nest::leaf(2)));
        assert!(pack_sequence_as(&nest, [1]).is_err());
    }
}
