//! # Error Types
//!
//! Every nest operation fails fast with a `NestError`. These are caller
//! contract violations (two nests that should share a shape do not), never
//! transient faults, so nothing here is retried.
//!
//! Each variant carries the structural path of the offending node plus the
//! conflicting shapes or field names, enough to diagnose the mismatch without
//! re-running the call.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::{NestKind, NodeShape};
use crate::path::NestPath;

/// Errors raised by the nest algebra.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NestError {
    /// Two nests expected to be congruent diverge at `path`.
    #[error("structure mismatch at {}: {reason} ({left} vs {right})", .path.describe())]
    StructureMismatch {
        /// Position of the first divergence.
        path: NestPath,
        /// What differs at that position.
        reason: MismatchReason,
        /// Shape of the node in the first nest.
        left: NodeShape,
        /// Shape of the node in the second nest.
        right: NodeShape,
    },

    /// A flat sequence does not hold exactly as many values as the template
    /// has leaves.
    #[error("length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Leaf count of the template.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A record lacks a field another nest or template requires.
    #[error("field '{field}' missing at {}", .path.describe())]
    FieldMissing {
        /// Position of the record.
        path: NestPath,
        /// The absent field.
        field: String,
    },

    /// Field lookup reached a node that is not a record.
    #[error("expected a record at {}, found {found}", .path.describe())]
    PathTypeError {
        /// Position of the non-record node.
        path: NestPath,
        /// What was found there instead.
        found: NestKind,
    },

    /// Dotted-path descent named a field the record does not have.
    #[error("key '{field}' not found at {}", .path.describe())]
    KeyMissing {
        /// Position of the record that was searched.
        path: NestPath,
        /// The requested field.
        field: String,
    },

    /// A record was built with the same field name twice.
    #[error("duplicate field '{field}' in record")]
    DuplicateField {
        /// The repeated name.
        field: String,
    },

    /// A multi-nest operation was called with no nests.
    #[error("{operation} requires at least one nest")]
    EmptyInput {
        /// The operation that was called.
        operation: &'static str,
    },
}

impl NestError {
    /// Structural position the error refers to, when it has one.
    pub fn path(&self) -> Option<&NestPath> {
        match self {
            NestError::StructureMismatch { path, .. }
            | NestError::FieldMissing { path, .. }
            | NestError::PathTypeError { path, .. }
            | NestError::KeyMissing { path, .. } => Some(path),
            NestError::LengthMismatch { .. }
            | NestError::DuplicateField { .. }
            | NestError::EmptyInput { .. } => None,
        }
    }

    pub(crate) fn mismatch(
        path: &NestPath,
        reason: MismatchReason,
        left: NodeShape,
        right: NodeShape,
    ) -> Self {
        NestError::StructureMismatch {
            path: path.clone(),
            reason,
            left,
            right,
        }
    }
}

/// The property that differs between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MismatchReason {
    /// Leaf vs container, or two different container kinds.
    Kind,
    /// Two records of different kinds (mapping vs named, or different tags).
    RecordType,
    /// Sequences or tuples of different length.
    Length,
    /// Records with different field-name sets.
    FieldSet,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MismatchReason::Kind => "node kinds differ",
            MismatchReason::RecordType => "record types differ",
            MismatchReason::Length => "lengths differ",
            MismatchReason::FieldSet => "field sets differ",
        };
        f.write_str(text)
    }
}
