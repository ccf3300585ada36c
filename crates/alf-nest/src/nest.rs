//! # Nest: Recursive Container Model
//!
//! A nest is an arbitrarily deep composition of three container kinds that
//! bottoms out in opaque leaves:
//!
//! | Variant    | Children identified by | Equality          |
//! |------------|------------------------|-------------------|
//! | `Sequence` | position               | positional        |
//! | `Tuple`    | position               | positional        |
//! | `Record`   | field name             | field-set based   |
//!
//! `Sequence` and `Tuple` traverse identically; they differ only in which
//! constructor rebuilds them, and a sequence never matches a tuple.
//!
//! ## Canonical Order
//!
//! Records keep their fields in construction order, but every traversal visits
//! them sorted by field name. Flattening and packing therefore agree on leaf
//! order no matter how either side built its records.
//!
//! ## Ownership
//!
//! Traversals borrow their inputs and build new nests; nothing in this crate
//! mutates a nest it was handed.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::error::NestError;

/// A nested structure over leaves of type `V`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nest<V> {
    /// A value the algebra never looks inside.
    Leaf(V),
    /// Variable-length ordered container.
    Sequence(Vec<Nest<V>>),
    /// Fixed-arity ordered container.
    Tuple(Vec<Nest<V>>),
    /// Named-field container.
    Record(Record<V>),
}

impl<V> Nest<V> {
    /// Wrap a value as a leaf.
    pub fn leaf(value: V) -> Self {
        Nest::Leaf(value)
    }

    /// Build a sequence from children.
    pub fn sequence(items: impl IntoIterator<Item = Nest<V>>) -> Self {
        Nest::Sequence(items.into_iter().collect())
    }

    /// Build a tuple from children.
    pub fn tuple(items: impl IntoIterator<Item = Nest<V>>) -> Self {
        Nest::Tuple(items.into_iter().collect())
    }

    /// Build a mapping record. A repeated name replaces the earlier field.
    pub fn mapping<K: Into<String>>(fields: impl IntoIterator<Item = (K, Nest<V>)>) -> Self {
        let mut record = Record::new(RecordKind::Mapping);
        for (name, value) in fields {
            record.insert(name, value);
        }
        Nest::Record(record)
    }

    /// Build a named record with the given type tag. A repeated name replaces
    /// the earlier field.
    pub fn named<K: Into<String>>(
        tag: impl Into<String>,
        fields: impl IntoIterator<Item = (K, Nest<V>)>,
    ) -> Self {
        let mut record = Record::new(RecordKind::Named(tag.into()));
        for (name, value) in fields {
            record.insert(name, value);
        }
        Nest::Record(record)
    }

    /// Build a sequence of leaves.
    pub fn leaves(values: impl IntoIterator<Item = V>) -> Self {
        Nest::Sequence(values.into_iter().map(Nest::Leaf).collect())
    }

    /// True for sequences, tuples, and records.
    pub fn is_nested(&self) -> bool {
        !matches!(self, Nest::Leaf(_))
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Nest::Leaf(_))
    }

    /// The leaf value, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Nest::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// The record, if this node is a record.
    pub fn as_record(&self) -> Option<&Record<V>> {
        match self {
            Nest::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Number of direct children; `None` for a leaf.
    pub fn len(&self) -> Option<usize> {
        match self {
            Nest::Leaf(_) => None,
            Nest::Sequence(items) | Nest::Tuple(items) => Some(items.len()),
            Nest::Record(r) => Some(r.len()),
        }
    }

    /// True for a container with no children. Leaves are never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Direct children in canonical order.
    pub fn children(&self) -> Vec<&Nest<V>> {
        match self {
            Nest::Leaf(_) => Vec::new(),
            Nest::Sequence(items) | Nest::Tuple(items) => items.iter().collect(),
            Nest::Record(r) => r.canonical().into_iter().map(|(_, v)| v).collect(),
        }
    }

    /// The first leaf in canonical order, stopping as soon as one is found.
    pub fn first_leaf(&self) -> Option<&V> {
        match self {
            Nest::Leaf(v) => Some(v),
            _ => self.children().into_iter().find_map(Nest::first_leaf),
        }
    }

    /// Apply `func` to every leaf, keeping the shape.
    pub fn map<U>(&self, mut func: impl FnMut(&V) -> U) -> Nest<U> {
        self.map_inner(&mut func)
    }

    fn map_inner<U, F: FnMut(&V) -> U>(&self, func: &mut F) -> Nest<U> {
        match self {
            Nest::Leaf(v) => Nest::Leaf(func(v)),
            Nest::Sequence(items) => {
                Nest::Sequence(items.iter().map(|n| n.map_inner(func)).collect())
            }
            Nest::Tuple(items) => Nest::Tuple(items.iter().map(|n| n.map_inner(func)).collect()),
            Nest::Record(r) => {
                let rebuilt = r.rebuild(|_, child| Ok::<_, Infallible>(child.map_inner(func)));
                Nest::Record(rebuilt.unwrap_or_else(|never| match never {}))
            }
        }
    }

    /// Move the leaves out in canonical order.
    pub fn into_flat(self) -> Vec<V> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Nest::Leaf(v) => out.push(v),
                Nest::Sequence(items) | Nest::Tuple(items) => stack.extend(items.into_iter().rev()),
                Nest::Record(r) => {
                    stack.extend(r.into_canonical().into_iter().rev().map(|(_, v)| v));
                }
            }
        }
        out
    }
}

impl<V> From<Record<V>> for Nest<V> {
    fn from(record: Record<V>) -> Self {
        Nest::Record(record)
    }
}

/// Which record construct a `Record` stands for.
///
/// Records only ever match records of the same kind: two mappings, or two
/// named records carrying the same type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Dictionary-like record.
    Mapping,
    /// Record with declared fields, identified by its type tag.
    Named(String),
}

impl RecordKind {
    /// The type tag of a named record.
    pub fn tag(&self) -> Option<&str> {
        match self {
            RecordKind::Mapping => None,
            RecordKind::Named(tag) => Some(tag),
        }
    }
}

/// A named-field container.
///
/// Fields are stored in construction order and are unique by name. `order`
/// indexes `fields` sorted by name, so canonical iteration never sorts and
/// lookups are binary searches. Deserialization goes through
/// [`Record::try_from_pairs`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "RecordRepr<V>",
    bound(deserialize = "V: Deserialize<'de>")
)]
pub struct Record<V> {
    kind: RecordKind,
    fields: Vec<(String, Nest<V>)>,
    #[serde(skip)]
    order: Vec<usize>,
}

/// Wire form of a record, validated on the way in.
#[derive(Deserialize)]
struct RecordRepr<V> {
    kind: RecordKind,
    fields: Vec<(String, Nest<V>)>,
}

impl<V> TryFrom<RecordRepr<V>> for Record<V> {
    type Error = NestError;

    fn try_from(repr: RecordRepr<V>) -> Result<Self, Self::Error> {
        Record::try_from_pairs(repr.kind, repr.fields)
    }
}

impl<V> Record<V> {
    /// An empty record of the given kind.
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Position of `name` in `order`, or where it would be inserted.
    fn position(&self, name: &str) -> Result<usize, usize> {
        self.order.binary_search_by(|&i| self.fields[i].0.as_str().cmp(name))
    }

    fn push_at(&mut self, slot: usize, name: String, value: Nest<V>) {
        self.order.insert(slot, self.fields.len());
        self.fields.push((name, value));
    }

    /// Build a record, rejecting repeated field names.
    ///
    /// # Errors
    ///
    /// Returns `NestError::DuplicateField` naming the first repeated field.
    pub fn try_from_pairs<K: Into<String>>(
        kind: RecordKind,
        pairs: impl IntoIterator<Item = (K, Nest<V>)>,
    ) -> Result<Self, NestError> {
        let mut record = Self::new(kind);
        for (name, value) in pairs {
            let name = name.into();
            match record.position(&name) {
                Ok(_) => return Err(NestError::DuplicateField { field: name }),
                Err(slot) => record.push_at(slot, name, value),
            }
        }
        Ok(record)
    }

    /// Insert a field, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: Nest<V>) -> Option<Nest<V>> {
        let name = name.into();
        match self.position(&name) {
            Ok(p) => Some(std::mem::replace(&mut self.fields[self.order[p]].1, value)),
            Err(slot) => {
                self.push_at(slot, name, value);
                None
            }
        }
    }

    /// The record kind.
    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field value by name.
    pub fn get(&self, name: &str) -> Option<&Nest<V>> {
        let p = self.position(name).ok()?;
        Some(&self.fields[self.order[p]].1)
    }

    /// True when the record has a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in construction order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Fields in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Nest<V>)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Fields sorted by name.
    pub fn canonical(&self) -> Vec<(&str, &Nest<V>)> {
        self.order
            .iter()
            .map(|&i| (self.fields[i].0.as_str(), &self.fields[i].1))
            .collect()
    }

    /// Field names sorted.
    pub fn canonical_names(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.fields[i].0.as_str()).collect()
    }

    /// Consume the record, yielding fields sorted by name.
    pub fn into_canonical(self) -> Vec<(String, Nest<V>)> {
        let mut slots: Vec<Option<(String, Nest<V>)>> =
            self.fields.into_iter().map(Some).collect();
        self.order.iter().filter_map(|&i| slots[i].take()).collect()
    }

    /// True when both records name exactly the same fields.
    pub fn same_field_set<U>(&self, other: &Record<U>) -> bool {
        self.len() == other.len()
            && self
                .order
                .iter()
                .zip(&other.order)
                .all(|(&i, &j)| self.fields[i].0 == other.fields[j].0)
    }

    /// Rebuild this record's shape with new children.
    ///
    /// `child` is called once per field in canonical order; the result keeps
    /// this record's kind and construction order.
    pub(crate) fn rebuild<U, E>(
        &self,
        mut child: impl FnMut(&str, &Nest<V>) -> Result<Nest<U>, E>,
    ) -> Result<Record<U>, E> {
        let mut built: Vec<Option<Nest<U>>> = self.fields.iter().map(|_| None).collect();
        for &i in &self.order {
            let (name, value) = &self.fields[i];
            built[i] = Some(child(name, value)?);
        }
        let fields = self
            .fields
            .iter()
            .zip(built)
            .filter_map(|((name, _), child)| child.map(|c| (name.clone(), c)))
            .collect();
        Ok(Record {
            kind: self.kind.clone(),
            fields,
            order: self.order.clone(),
        })
    }

    pub(crate) fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }
}

impl<V: PartialEq> PartialEq for Record<V> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.len() == other.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Nest<i32> {
        Nest::mapping([
            ("b", Nest::leaves([2, 3])),
            ("a", Nest::leaf(1)),
        ])
    }

    #[test]
    fn test_canonical_order_sorts_fields() {
        let nest = sample();
        let record = nest.as_record().unwrap();
        assert_eq!(record.field_names(), vec!["b", "a"]);
        assert_eq!(record.canonical_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_into_flat_uses_canonical_order() {
        assert_eq!(sample().into_flat(), vec![1, 2, 3]);
    }

    #[test]
    fn test_record_equality_ignores_construction_order() {
        let a = Nest::mapping([("x", Nest::leaf(1)), ("y", Nest::leaf(2))]);
        let b = Nest::mapping([("y", Nest::leaf(2)), ("x", Nest::leaf(1))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_record_equality_respects_kind() {
        let a = Nest::mapping([("x", Nest::leaf(1))]);
        let b = Nest::named("Point", [("x", Nest::leaf(1))]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequence_and_tuple_differ() {
        assert_ne!(Nest::sequence([Nest::leaf(1)]), Nest::tuple([Nest::leaf(1)]));
    }

    #[test]
    fn test_insert_replaces() {
        let mut record = Record::new(RecordKind::Mapping);
        assert!(record.insert("a", Nest::leaf(1)).is_none());
        assert_eq!(record.insert("a", Nest::leaf(2)), Some(Nest::leaf(1)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_try_from_pairs_rejects_duplicates() {
        let err = Record::try_from_pairs(
            RecordKind::Mapping,
            [("a", Nest::leaf(1)), ("a", Nest::leaf(2))],
        )
        .unwrap_err();
        assert_eq!(err, NestError::DuplicateField { field: "a".into() });
    }

    #[test]
    fn test_first_leaf_skips_empty_containers() {
        let nest = Nest::mapping([
            ("a", Nest::sequence([])),
            ("b", Nest::tuple([Nest::sequence([]), Nest::leaf(7)])),
        ]);
        assert_eq!(nest.first_leaf(), Some(&7));
        assert_eq!(Nest::<i32>::sequence([]).first_leaf(), None);
    }

    #[test]
    fn test_map_preserves_construction_order() {
        let mapped = sample().map(|v| v * 10);
        let record = mapped.as_record().unwrap();
        assert_eq!(record.field_names(), vec!["b", "a"]);
        assert_eq!(mapped.into_flat(), vec![10, 20, 30]);
    }

    #[test]
    fn test_len_and_emptiness() {
        assert_eq!(Nest::leaf(1).len(), None);
        assert!(!Nest::leaf(1).is_empty());
        assert!(Nest::<i32>::tuple([]).is_empty());
        assert_eq!(sample().len(), Some(2));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_fields() {
        let json = r#"{"record":{"kind":"Mapping","fields":[["a",{"leaf":1}],["a",{"leaf":2}]]}}"#;
        let err = serde_json::from_str::<Nest<i32>>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate field"), "{err}");
    }

    #[test]
    fn test_deserialized_record_packs_back() {
        let json = r#"{"record":{"kind":"Mapping","fields":[["b",{"leaf":2}],["a",{"leaf":1}]]}}"#;
        let nest: Nest<i32> = serde_json::from_str(json).unwrap();
        let record = nest.as_record().unwrap();
        assert_eq!(record.canonical_names(), vec!["a", "b"]);
        assert_eq!(record.get("b"), Some(&Nest::leaf(2)));
        let flat = crate::pack::flatten(&nest).into_iter().copied().collect::<Vec<_>>();
        assert_eq!(flat, vec![1, 2]);
        assert_eq!(crate::pack::pack_sequence_as(&nest, flat).unwrap(), nest);
    }

    #[test]
    fn test_lookup_after_inserts_out_of_order() {
        let mut record = Record::new(RecordKind::Mapping);
        for (i, name) in ["m", "c", "x", "a", "q"].into_iter().enumerate() {
            record.insert(name, Nest::leaf(i));
        }
        assert_eq!(record.canonical_names(), vec!["a", "c", "m", "q", "x"]);
        assert_eq!(record.field_names(), vec!["m", "c", "x", "a", "q"]);
        assert_eq!(record.get("x"), Some(&Nest::leaf(2)));
        assert_eq!(record.get("b"), None);
        let names: Vec<String> = record.into_canonical().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "c", "m", "q", "x"]);
    }

    #[test]
    fn test_children_in_canonical_order() {
        let nest = sample();
        assert_eq!(nest.children(), vec![&Nest::leaf(1), &Nest::leaves([2, 3])]);
        assert!(Nest::leaf(0).children().is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let nest = sample();
        let json = serde_json::to_string(&nest).unwrap();
        let back: Nest<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, nest);
    }
}
