//! # Classifier
//!
//! Determines what kind of node a nest value is and, for records, the
//! canonical field list. Classification is total: every node is exactly one of
//! leaf, sequence, tuple, or record.
//!
//! Caller-defined record types join the algebra through [`FieldAccess`], an
//! explicit capability ("declares an ordered field set, can look fields up by
//! name"). [`Nest::from_fields`] turns any implementor into a named record and
//! is where a record missing one of its declared fields is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NestError;
use crate::nest::{Nest, Record, RecordKind};
use crate::path::NestPath;

/// Runtime kind of a nest node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NestKind {
    Leaf,
    Sequence,
    Tuple,
    Record,
}

impl fmt::Display for NestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NestKind::Leaf => "leaf",
            NestKind::Sequence => "sequence",
            NestKind::Tuple => "tuple",
            NestKind::Record => "record",
        };
        f.write_str(text)
    }
}

impl<V> Nest<V> {
    /// The node kind.
    pub fn kind(&self) -> NestKind {
        match self {
            Nest::Leaf(_) => NestKind::Leaf,
            Nest::Sequence(_) => NestKind::Sequence,
            Nest::Tuple(_) => NestKind::Tuple,
            Nest::Record(_) => NestKind::Record,
        }
    }

    /// One-level shape summary of this node.
    pub fn shape(&self) -> NodeShape {
        NodeShape::of(self)
    }
}

/// Result of classifying one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<'a> {
    /// The node kind.
    pub kind: NestKind,
    /// Canonical field names; empty unless `kind` is `Record`.
    pub fields: Vec<&'a str>,
}

/// Classify a node.
pub fn classify<V>(nest: &Nest<V>) -> Classified<'_> {
    let fields = match nest {
        Nest::Record(r) => r.canonical_names(),
        _ => Vec::new(),
    };
    Classified {
        kind: nest.kind(),
        fields,
    }
}

/// One-level summary of a node, carried by errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeShape {
    Leaf,
    Sequence { len: usize },
    Tuple { len: usize },
    Record {
        /// Type tag for named records, `None` for mappings.
        tag: Option<String>,
        /// Field names in canonical order.
        fields: Vec<String>,
    },
}

impl NodeShape {
    /// Summarise a node.
    pub fn of<V>(nest: &Nest<V>) -> Self {
        match nest {
            Nest::Leaf(_) => NodeShape::Leaf,
            Nest::Sequence(items) => NodeShape::Sequence { len: items.len() },
            Nest::Tuple(items) => NodeShape::Tuple { len: items.len() },
            Nest::Record(r) => NodeShape::Record {
                tag: r.kind().tag().map(str::to_string),
                fields: r.canonical_names().into_iter().map(str::to_string).collect(),
            },
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeShape::Leaf => f.write_str("leaf"),
            NodeShape::Sequence { len } => write!(f, "sequence of {len}"),
            NodeShape::Tuple { len } => write!(f, "tuple of {len}"),
            NodeShape::Record { tag, fields } => {
                let name = tag.as_deref().unwrap_or("mapping");
                write!(f, "{name} {{{}}}", fields.join(", "))
            }
        }
    }
}

/// Leaf values that can stand for "nothing".
///
/// `find_field` uses this to skip empty matches.
pub trait Nullable {
    /// True when the value represents an absent value.
    fn is_null(&self) -> bool;
}

impl Nullable for serde_json::Value {
    fn is_null(&self) -> bool {
        serde_json::Value::is_null(self)
    }
}

impl<T> Nullable for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl Nullable for () {
    fn is_null(&self) -> bool {
        true
    }
}

macro_rules! never_null {
    ($($ty:ty),* $(,)?) => {
        $(impl Nullable for $ty {
            fn is_null(&self) -> bool {
                false
            }
        })*
    };
}

never_null!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &str,
);

/// Capability of a caller type that declares an ordered set of named fields.
///
/// # Example
///
/// ```rust
/// use alf_nest::{FieldAccess, Nest};
///
/// struct Step {
///     reward: f32,
///     discount: f32,
/// }
///
/// impl FieldAccess for Step {
///     type Value = f32;
///
///     fn type_tag(&self) -> &str {
///         "Step"
///     }
///
///     fn field_names(&self) -> Vec<&str> {
///         vec!["reward", "discount"]
///     }
///
///     fn field(&self, name: &str) -> Option<Nest<f32>> {
///         match name {
///             "reward" => Some(Nest::leaf(self.reward)),
///             "discount" => Some(Nest::leaf(self.discount)),
///             _ => None,
///         }
///     }
/// }
///
/// let nest = Nest::from_fields(&Step { reward: 1.0, discount: 0.9 }).unwrap();
/// assert_eq!(nest.into_flat(), vec![0.9, 1.0]);
/// ```
pub trait FieldAccess {
    /// Leaf type of the nests the fields produce.
    type Value;

    /// Identifies the concrete record shape; records only match records with
    /// the same tag.
    fn type_tag(&self) -> &str;

    /// Declared field names, in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// The nest for one declared field.
    fn field(&self, name: &str) -> Option<Nest<Self::Value>>;
}

/// Mappings report the tag `"mapping"`.
impl<V: Clone> FieldAccess for Record<V> {
    type Value = V;

    fn type_tag(&self) -> &str {
        self.kind().tag().unwrap_or("mapping")
    }

    fn field_names(&self) -> Vec<&str> {
        Record::field_names(self)
    }

    fn field(&self, name: &str) -> Option<Nest<V>> {
        self.get(name).cloned()
    }
}

impl<V> Nest<V> {
    /// Classify a caller record type as a named record.
    ///
    /// # Errors
    ///
    /// `FieldMissing` when a declared field yields no value, and
    /// `DuplicateField` when a name is declared twice.
    pub fn from_fields<A>(value: &A) -> Result<Self, NestError>
    where
        A: FieldAccess<Value = V> + ?Sized,
    {
        let kind = RecordKind::Named(value.type_tag().to_string());
        let mut pairs = Vec::new();
        for name in value.field_names() {
            let child = value.field(name).ok_or_else(|| NestError::FieldMissing {
                path: NestPath::root(),
                field: name.to_string(),
            })?;
            pairs.push((name, child));
        }
        Ok(Nest::Record(Record::try_from_pairs(kind, pairs)?))
    }
}
