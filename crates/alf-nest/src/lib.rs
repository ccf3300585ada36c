//! # alf-nest: Structural Algebra over Nested Containers
//!
//! This crate treats arbitrarily nested sequences, tuples and records of
//! leaves as one abstract shape, a *nest*, and provides the operations that
//! move data between nests and flat lists: flattening, packing, congruence
//! checking, element-wise mapping, shallow-bounded traversal, pruning and
//! field lookup.
//!
//! ```rust
//! use alf_nest::{flatten, pack_sequence_as, Nest};
//!
//! let nest = Nest::mapping([("b", Nest::leaves([2, 3])), ("a", Nest::leaf(1))]);
//! assert_eq!(flatten(&nest), vec![&1, &2, &3]);
//!
//! let doubled = pack_sequence_as(&nest, [2, 4, 6]).unwrap();
//! assert_eq!(doubled, nest.map(|v| v * 2));
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **One canonical order.** Records are always traversed sorted by field
//!    name, so two independently built records with the same fields flatten
//!    identically.
//!
//! 2. **Explicit node kinds.** `Nest<V>` is a closed enum. A sequence never
//!    matches a tuple, and named records only match records with the same
//!    type tag.
//!
//! 3. **Validate, then act.** Multi-nest operations check congruence up front
//!    and fail with the path of the first divergence before producing output.
//!
//! 4. **Report, then propagate.** Every failure is handed to a
//!    [`DiagnosticSink`] and then returned to the caller unchanged.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Inputs are borrowed and never mutated; every rebuild yields a new nest.

pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod json;
pub mod nest;
pub mod ops;
pub mod path;

mod field;
mod map;
mod pack;
mod prune;
mod structure;
mod up_to;

#[cfg(test)]
mod proptests;

// Re-export primary types for ergonomic imports.
pub use classify::{classify, Classified, FieldAccess, NestKind, NodeShape, Nullable};
pub use diagnostics::{CollectingSink, DiagnosticSink, NullSink, Report, TracingSink};
pub use error::{MismatchReason, NestError};
pub use json::{from_json, to_json};
pub use nest::{Nest, Record, RecordKind};
pub use ops::{
    assert_same_kind, assert_same_structure, extract_fields, find_field, flatten, flatten_up_to,
    flatten_with_path, get_field, is_same_structure, leaf_count, map_flat, map_structure,
    map_structure_up_to, map_structure_up_to_with_path, map_structure_with_path, pack_sequence_as,
    prune_nest_like, zip_map, NestOps,
};
pub use path::{NestPath, PathSegment};
