//! # Nest Paths
//!
//! A `NestPath` names one position inside a nest: a list of segments, each an
//! element index (sequences and tuples) or a field name (records). The dotted
//! form joins segments with `.`, so the second element of field `b` is `b.1`.
//! The root position has an empty dotted form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step from a container into a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Positional child of a sequence or tuple.
    Index(usize),
    /// Named child of a record.
    Field(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{i}"),
            PathSegment::Field(name) => f.write_str(name),
        }
    }
}

/// Position of a node within a nest, from the root down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestPath {
    segments: Vec<PathSegment>,
}

impl NestPath {
    /// The root position.
    pub fn root() -> Self {
        Self::default()
    }

    /// True for the root position.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// A new path one index deeper.
    pub fn index(&self, i: usize) -> Self {
        let mut child = self.clone();
        child.push_index(i);
        child
    }

    /// A new path one field deeper.
    pub fn field(&self, name: &str) -> Self {
        let mut child = self.clone();
        child.push_field(name);
        child
    }

    pub(crate) fn push_index(&mut self, i: usize) {
        self.segments.push(PathSegment::Index(i));
    }

    pub(crate) fn push_field(&mut self, name: &str) {
        self.segments.push(PathSegment::Field(name.to_string()));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn truncate(&mut self, depth: usize) {
        self.segments.truncate(depth);
    }

    /// Segments joined with `.`; empty at the root.
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Dotted form for messages: `<root>` instead of an empty string.
    pub fn describe(&self) -> String {
        if self.is_root() {
            "<root>".to_string()
        } else {
            self.dotted()
        }
    }
}

impl fmt::Display for NestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}
