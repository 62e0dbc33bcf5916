//! Field paths used to attribute messages to the input that caused them.
//!
//! This module provides [`FieldPath`] and [`PathSegment`]. Processors build a
//! path while they descend into a request, and every [`Message`](crate::Message)
//! carries the path of the field it is about.

use std::fmt::{self, Display};

/// One step from a container to the value it holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A key of a mapping, such as `query` or `limit`.
    Field(String),
    /// A position in a list.
    Index(usize),
}

/// The ancestry of a field, rendered as `query.tags[1]`.
///
/// A processor receives the path of its parent and pushes its own label.
/// Labels are allowed to be empty (the item processor of a collection, the
/// default processor of a field set); an empty label adds no segment, so the
/// index or key pushed by the container is the last segment.
///
/// # Example
///
/// ```rust
/// use sluice::FieldPath;
///
/// let path = FieldPath::root()
///     .push_field("body")
///     .push_field("pets")
///     .push_index(0)
///     .push_field("")
///     .push_field("name");
///
/// assert_eq!(path.to_string(), "body.pets[0].name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the value handed to the root processor.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_field(name: impl Into<String>) -> Self {
        Self::root().push_field(name)
    }

    /// A copy of this path with `name` appended. Empty names are dropped.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }
        self.with_segment(PathSegment::Field(name))
    }

    /// A copy of this path with a list position appended.
    pub fn push_index(&self, index: usize) -> Self {
        self.with_segment(PathSegment::Index(index))
    }

    /// `self` followed by every segment of `relative`.
    ///
    /// Filters and validators report messages relative to the value they
    /// were given; the processor running them re-roots those messages here.
    pub fn join(&self, relative: &FieldPath) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .chain(&relative.segments)
                .cloned()
                .collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// The path of the enclosing container; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        self.segments.split_last().map(|(_, init)| Self {
            segments: init.to_vec(),
        })
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    fn with_segment(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) if first => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}
