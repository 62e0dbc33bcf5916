//! Field-level messages produced while processing a value.
//!
//! This module provides [`Message`] for a single failed check and
//! [`MessageSet`] for the ordered, non-empty collection carried by an
//! invalid [`Outcome`](crate::Outcome).

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::FieldPath;

/// A single failed check, attributed to a field.
///
/// - **path**: where in the input the failure happened
/// - **message**: human-readable description
/// - **args**: the values interpolated into the message, for callers that
///   render their own text
/// - **code**: machine-readable identifier
///
/// # Example
///
/// ```rust
/// use sluice::{FieldPath, Message};
///
/// let message = Message::new(FieldPath::from_field("limit"), "expected integer, string given")
///     .with_code("invalid_type")
///     .with_arg("string");
///
/// assert_eq!(message.code, "invalid_type");
/// assert_eq!(message.to_string(), "limit: expected integer, string given");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The path to the field that failed.
    pub path: FieldPath,
    /// Human-readable message.
    pub message: String,
    /// Arguments interpolated into `message`.
    pub args: Vec<String>,
    /// Machine-readable code (e.g. `required`, `not_contained`).
    pub code: String,
}

impl Message {
    /// Creates a message with the default code `validation_error`.
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            args: Vec::new(),
            code: "validation_error".to_string(),
        }
    }

    /// Creates a message about the value itself (root path).
    ///
    /// Filters and validators use this; the processor running them prefixes
    /// the path of the field they ran on.
    pub fn here(message: impl Into<String>) -> Self {
        Self::new(FieldPath::root(), message)
    }

    /// Sets the code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Appends an argument and returns self for chaining.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Returns the message moved under `base`.
    pub fn prefixed(mut self, base: &FieldPath) -> Self {
        self.path = base.join(&self.path);
        self
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for Message {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Message>();
    assert_sync::<Message>();
};

/// A non-empty, ordered collection of messages.
///
/// The only constructors take at least one message, so an invalid outcome
/// always explains itself. Merging two sets concatenates them, earlier
/// messages first, without deduplication.
///
/// ```rust
/// use sluice::{FieldPath, Message, MessageSet};
/// use stillwater::prelude::*;
///
/// let first = MessageSet::single(Message::new(FieldPath::from_field("id"), "required"));
/// let second = MessageSet::single(Message::new(FieldPath::from_field("name"), "required"));
///
/// let combined = first.combine(second);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined.first().path.to_string(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSet(Vec<Message>);

impl MessageSet {
    /// Creates a set holding one message.
    pub fn single(message: Message) -> Self {
        Self(vec![message])
    }

    /// Creates a set from a list, or `None` if the list is empty.
    pub fn from_vec(messages: Vec<Message>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self(messages))
        }
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a message set is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the messages in order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.0.iter()
    }

    /// Returns the first message.
    pub fn first(&self) -> &Message {
        &self.0[0]
    }

    /// Returns all messages attributed to `path`.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&Message> {
        self.0.iter().filter(|m| &m.path == path).collect()
    }

    /// Returns all messages with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&Message> {
        self.0.iter().filter(|m| m.code == code).collect()
    }

    /// Moves every message under `base`.
    pub fn prefixed(self, base: &FieldPath) -> Self {
        if base.is_root() {
            return self;
        }
        Self(self.0.into_iter().map(|m| m.prefixed(base)).collect())
    }

    /// Converts into a plain list.
    pub fn into_vec(self) -> Vec<Message> {
        self.0
    }
}

impl Semigroup for MessageSet {
    fn combine(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl Display for MessageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processing failed with {} message(s):", self.len())?;
        for (i, message) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for MessageSet {}

impl IntoIterator for MessageSet {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageSet {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_defaults() {
        let message = Message::new(FieldPath::from_field("name"), "field is required");

        assert_eq!(message.path.to_string(), "name");
        assert_eq!(message.code, "validation_error");
        assert!(message.args.is_empty());
    }

    #[test]
    fn test_message_display_root() {
        let message = Message::here("value is null");
        assert_eq!(message.to_string(), "(root): value is null");
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(MessageSet::from_vec(Vec::new()).is_none());
        assert_eq!(
            MessageSet::from_vec(vec![Message::here("a")]).map(|m| m.len()),
            Some(1)
        );
    }

    #[test]
    fn test_combine_preserves_order_and_duplicates() {
        let a = MessageSet::single(Message::here("same"));
        let b = MessageSet::single(Message::here("same"));
        let c = MessageSet::single(Message::here("other"));

        let combined = a.combine(b).combine(c);
        let texts: Vec<_> = combined.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["same", "same", "other"]);
    }

    #[test]
    fn test_prefixed_reroots_every_message() {
        let set = MessageSet::single(Message::here("root"))
            .combine(MessageSet::single(Message::new(FieldPath::from_field("id"), "nested")));

        let prefixed = set.prefixed(&FieldPath::from_field("path"));
        let paths: Vec<_> = prefixed.iter().map(|m| m.path.to_string()).collect();
        assert_eq!(paths, vec!["path", "path.id"]);
    }

    #[test]
    fn test_at_path_and_with_code() {
        let id = FieldPath::from_field("id");
        let set = MessageSet::single(Message::new(id.clone(), "a").with_code("required"))
            .combine(MessageSet::single(Message::new(id.clone(), "b").with_code("invalid_type")))
            .combine(MessageSet::single(Message::here("c").with_code("required")));

        assert_eq!(set.at_path(&id).len(), 2);
        assert_eq!(set.with_code("required").len(), 2);
    }

    #[test]
    fn test_display_lists_messages() {
        let set = MessageSet::single(Message::new(FieldPath::from_field("name"), "required"))
            .combine(MessageSet::single(Message::new(FieldPath::from_field("age"), "invalid")));
        let display = set.to_string();

        assert!(display.contains("2 message(s)"));
        assert!(display.contains("name: required"));
        assert!(display.contains("age: invalid"));
    }
}
