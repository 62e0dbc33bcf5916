//! The result of running a filter, validator or processor.
//!
//! An [`Outcome`] pairs the (possibly transformed) value with a verdict:
//! no opinion, valid, or invalid with messages. Outcomes merge with a fixed
//! precedence (`Invalid` > `Valid` > `NoResult`) so that every node in a
//! processor tree can fold the outcomes of its children into one.

use serde_json::Value;
use stillwater::prelude::*;
use stillwater::Validation;

use crate::error::{Message, MessageSet};
use crate::path::FieldPath;

/// The verdict carried by an [`Outcome`], ordered by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// No check expressed an opinion.
    NoResult,
    /// At least one check passed and none failed.
    Valid,
    /// At least one check failed.
    Invalid,
}

/// A value together with the verdict reached about it.
///
/// # Example
///
/// ```rust
/// use sluice::{Message, MessageSet, Outcome, Status};
/// use serde_json::json;
///
/// let coerced = Outcome::no_result(json!(5));
/// let checked = Outcome::valid(json!(5));
/// assert_eq!(coerced.merge(checked).status(), Status::Valid);
///
/// let failed = Outcome::invalid(json!("five"), MessageSet::single(Message::here("not a number")));
/// let merged = failed.merge(Outcome::valid(json!("five")));
/// assert_eq!(merged.status(), Status::Invalid);
/// assert!(!merged.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No opinion; the value may have been transformed.
    NoResult(Value),
    /// The value passed every check that expressed an opinion.
    Valid(Value),
    /// The value failed at least one check.
    Invalid(Value, MessageSet),
}

impl Outcome {
    pub fn no_result(value: Value) -> Self {
        Outcome::NoResult(value)
    }

    pub fn valid(value: Value) -> Self {
        Outcome::Valid(value)
    }

    pub fn invalid(value: Value, messages: MessageSet) -> Self {
        Outcome::Invalid(value, messages)
    }

    /// Shorthand for an invalid outcome with a single message.
    pub fn fail(value: Value, message: Message) -> Self {
        Outcome::Invalid(value, MessageSet::single(message))
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::NoResult(_) => Status::NoResult,
            Outcome::Valid(_) => Status::Valid,
            Outcome::Invalid(..) => Status::Invalid,
        }
    }

    /// True for `Valid` and `NoResult`.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Outcome::Invalid(..))
    }

    pub fn value(&self) -> &Value {
        match self {
            Outcome::NoResult(v) | Outcome::Valid(v) | Outcome::Invalid(v, _) => v,
        }
    }

    pub(crate) fn value_mut(&mut self) -> &mut Value {
        match self {
            Outcome::NoResult(v) | Outcome::Valid(v) | Outcome::Invalid(v, _) => v,
        }
    }

    pub fn into_value(self) -> Value {
        self.into_parts().0
    }

    pub fn messages(&self) -> Option<&MessageSet> {
        match self {
            Outcome::Invalid(_, messages) => Some(messages),
            _ => None,
        }
    }

    /// Replaces the value, keeping the verdict.
    pub fn with_value(self, value: Value) -> Self {
        let (_, status, messages) = self.into_parts();
        Self::from_parts(value, status, messages)
    }

    /// Combines with an outcome produced after this one.
    ///
    /// The later outcome's value wins. The status is the more decisive of the
    /// two and messages are concatenated, earlier first.
    pub fn merge(self, later: Outcome) -> Self {
        let (_, status, messages) = self.into_parts();
        let (value, later_status, later_messages) = later.into_parts();
        Self::from_parts(
            value,
            status.max(later_status),
            combine_messages(messages, later_messages),
        )
    }

    /// Like [`merge`](Self::merge) but keeps this outcome's value.
    ///
    /// Used for validators, whose opinion counts but whose value does not.
    pub fn absorb(self, other: Outcome) -> Self {
        let (value, status, messages) = self.into_parts();
        let (_, other_status, other_messages) = other.into_parts();
        Self::from_parts(
            value,
            status.max(other_status),
            combine_messages(messages, other_messages),
        )
    }

    /// Moves every message under `base`.
    pub fn prefixed(self, base: &FieldPath) -> Self {
        match self {
            Outcome::Invalid(value, messages) => Outcome::Invalid(value, messages.prefixed(base)),
            other => other,
        }
    }

    /// Converts into a `stillwater` validation, dropping the distinction
    /// between `Valid` and `NoResult`.
    pub fn into_validation(self) -> Validation<Value, MessageSet> {
        match self {
            Outcome::Invalid(_, messages) => Validation::Failure(messages),
            Outcome::Valid(value) | Outcome::NoResult(value) => Validation::Success(value),
        }
    }

    pub fn into_parts(self) -> (Value, Status, Option<MessageSet>) {
        match self {
            Outcome::NoResult(v) => (v, Status::NoResult, None),
            Outcome::Valid(v) => (v, Status::Valid, None),
            Outcome::Invalid(v, m) => (v, Status::Invalid, Some(m)),
        }
    }

    fn from_parts(value: Value, status: Status, messages: Option<MessageSet>) -> Self {
        match (status, messages) {
            (_, Some(messages)) => Outcome::Invalid(value, messages),
            (Status::Valid, None) => Outcome::Valid(value),
            _ => Outcome::NoResult(value),
        }
    }
}

impl Semigroup for Outcome {
    fn combine(self, other: Self) -> Self {
        self.merge(other)
    }
}

fn combine_messages(first: Option<MessageSet>, second: Option<MessageSet>) -> Option<MessageSet> {
    match (first, second) {
        (Some(a), Some(b)) => Some(a.combine(b)),
        (a, b) => a.or(b),
    }
}

/// Returns the type name used in messages about `value`.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invalid(value: Value, text: &str) -> Outcome {
        Outcome::fail(value, Message::here(text))
    }

    fn all_kinds() -> Vec<Outcome> {
        vec![
            Outcome::no_result(json!(1)),
            Outcome::valid(json!(2)),
            invalid(json!(3), "three"),
        ]
    }

    #[test]
    fn test_status_precedence() {
        assert_eq!(
            Outcome::no_result(json!(1)).merge(Outcome::valid(json!(2))).status(),
            Status::Valid
        );
        assert_eq!(
            Outcome::valid(json!(1)).merge(Outcome::no_result(json!(2))).status(),
            Status::Valid
        );
        assert_eq!(
            Outcome::no_result(json!(1)).merge(Outcome::no_result(json!(2))).status(),
            Status::NoResult
        );
    }

    #[test]
    fn test_invalid_dominates_from_either_side() {
        for other in all_kinds() {
            let left = invalid(json!(0), "zero").merge(other.clone());
            assert_eq!(left.status(), Status::Invalid);
            let right = other.merge(invalid(json!(0), "zero"));
            assert_eq!(right.status(), Status::Invalid);
        }
    }

    #[test]
    fn test_merge_status_is_associative() {
        for a in all_kinds() {
            for b in all_kinds() {
                for c in all_kinds() {
                    let left = a.clone().merge(b.clone()).merge(c.clone());
                    let right = a.clone().merge(b.clone().merge(c.clone()));
                    assert_eq!(left.status(), right.status());
                    assert_eq!(
                        left.messages().map(|m| m.len()),
                        right.messages().map(|m| m.len())
                    );
                }
            }
        }
    }

    #[test]
    fn test_later_value_wins() {
        let merged = Outcome::valid(json!("before")).merge(Outcome::no_result(json!("after")));
        assert_eq!(merged.value(), &json!("after"));

        let merged = invalid(json!("before"), "x").merge(Outcome::valid(json!("after")));
        assert_eq!(merged.value(), &json!("after"));
    }

    #[test]
    fn test_two_invalids_concatenate_in_order() {
        let merged = invalid(json!(1), "first").merge(invalid(json!(2), "second"));
        let texts: Vec<_> = merged
            .messages()
            .unwrap()
            .iter()
            .map(|m| m.message.clone())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_absorb_keeps_own_value() {
        let absorbed = Outcome::no_result(json!(5)).absorb(invalid(json!("other"), "nope"));
        assert_eq!(absorbed.value(), &json!(5));
        assert_eq!(absorbed.status(), Status::Invalid);
    }

    #[test]
    fn test_into_validation() {
        assert!(Outcome::no_result(json!(1)).into_validation().is_success());
        assert!(Outcome::valid(json!(1)).into_validation().is_success());
        assert!(invalid(json!(1), "x").into_validation().is_failure());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(1)), "integer");
        assert_eq!(type_name(&json!(1.5)), "float");
        assert_eq!(type_name(&json!(["a"])), "list");
        assert_eq!(type_name(&json!({})), "object");
        assert_eq!(type_name(&Value::Null), "null");
    }
}
