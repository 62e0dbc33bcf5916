//! Processors that compose other processors.
//!
//! - [`AllOf`]: every branch must accept the value
//! - [`AnyOf`]: the first branch to accept the value wins
//! - [`OneOf`]: exactly one branch may accept the value
//! - [`Nullable`]: `null` is accepted, anything else goes to the inner processor
//!
//! Branches always receive the same input value; none of them sees another
//! branch's output.

use serde_json::Value;
use stillwater::prelude::*;

use crate::error::{Message, MessageSet};
use crate::outcome::Outcome;
use crate::path::FieldPath;
use crate::processor::Processor;

#[derive(Debug)]
struct Branches {
    processes: String,
    branches: Vec<Box<dyn Processor>>,
}

impl Branches {
    fn new(processes: String, branches: Vec<Box<dyn Processor>>) -> Self {
        Self {
            processes,
            branches,
        }
    }

    fn run(&self, parent: &FieldPath, value: &Value) -> Vec<Outcome> {
        self.branches
            .iter()
            .map(|branch| branch.process(parent, value.clone()))
            .collect()
    }
}

/// Label used for the branch at `index` in messages.
fn branch_label(index: usize) -> String {
    format!("Branch-{}", index + 1)
}

/// Concatenates the messages of every invalid outcome, then `summary`.
fn collect_failures(outcomes: Vec<Outcome>, summary: Message) -> MessageSet {
    let summary = MessageSet::single(summary);
    outcomes
        .into_iter()
        .filter_map(|outcome| outcome.into_parts().2)
        .reduce(|acc, messages| acc.combine(messages))
        .map_or(summary.clone(), |all| all.combine(summary))
}

/// Requires every branch to accept the value.
///
/// The output is the deep merge of every branch's output, later branches
/// winning on conflicting keys.
#[derive(Debug)]
pub struct AllOf(Branches);

impl AllOf {
    pub fn new(processes: impl Into<String>, branches: Vec<Box<dyn Processor>>) -> Self {
        Self(Branches::new(processes.into(), branches))
    }
}

impl Processor for AllOf {
    fn processes(&self) -> &str {
        &self.0.processes
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        let outcomes = self.0.run(parent, &value);
        let Some(merged) = outcomes
            .iter()
            .map(|outcome| outcome.value().clone())
            .reduce(deep_merge)
        else {
            return Outcome::no_result(value);
        };

        outcomes
            .into_iter()
            .reduce(|acc, outcome| acc.combine(outcome))
            .map_or_else(|| Outcome::no_result(value), |acc| acc.with_value(merged))
    }
}

/// Merges `later` into `earlier`. Mappings merge key by key; anything else
/// is replaced by `later`.
pub(crate) fn deep_merge(earlier: Value, later: Value) -> Value {
    match (earlier, later) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, later) => later,
    }
}

/// Accepts the output of the first branch that accepts the value.
#[derive(Debug)]
pub struct AnyOf(Branches);

impl AnyOf {
    pub fn new(processes: impl Into<String>, branches: Vec<Box<dyn Processor>>) -> Self {
        Self(Branches::new(processes.into(), branches))
    }
}

impl Processor for AnyOf {
    fn processes(&self) -> &str {
        &self.0.processes
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        let mut failures = Vec::with_capacity(self.0.branches.len());
        for branch in &self.0.branches {
            let outcome = branch.process(parent, value.clone());
            if outcome.is_valid() {
                return outcome;
            }
            failures.push(outcome);
        }

        let path = parent.push_field(self.0.processes.as_str());
        let summary = Message::new(
            path,
            format!("Value did not match any of {} branches", self.0.branches.len()),
        )
        .with_code("any_of_none_matched")
        .with_arg(self.0.branches.len().to_string());
        Outcome::invalid(value, collect_failures(failures, summary))
    }
}

/// Accepts the value only if exactly one branch does.
///
/// # Example
///
/// ```rust
/// use sluice::chain::Step;
/// use sluice::processor::{Field, OneOf, Processor};
/// use sluice::validator::{IsInt, IsNumber, IsString};
/// use sluice::FieldPath;
/// use serde_json::json;
///
/// let id = OneOf::new("id", vec![
///     Box::new(Field::new("id", vec![Step::validator(IsInt)])),
///     Box::new(Field::new("id", vec![Step::validator(IsNumber)])),
///     Box::new(Field::new("id", vec![Step::validator(IsString)])),
/// ]);
///
/// assert!(id.process(&FieldPath::root(), json!("abc")).is_valid());
///
/// let ambiguous = id.process(&FieldPath::root(), json!(5));
/// let message = ambiguous.messages().unwrap().first();
/// assert_eq!(message.code, "one_of_multiple_matched");
/// assert_eq!(message.args, vec!["Branch-1", "Branch-2"]);
/// ```
#[derive(Debug)]
pub struct OneOf(Branches);

impl OneOf {
    pub fn new(processes: impl Into<String>, branches: Vec<Box<dyn Processor>>) -> Self {
        Self(Branches::new(processes.into(), branches))
    }
}

impl Processor for OneOf {
    fn processes(&self) -> &str {
        &self.0.processes
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        let path = parent.push_field(self.0.processes.as_str());
        let outcomes = self.0.run(parent, &value);

        let matched: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, outcome)| outcome.is_valid())
            .map(|(index, _)| index)
            .collect();

        match matched.as_slice() {
            [] => {
                let summary = Message::new(
                    path,
                    format!("Value did not match any of {} branches", outcomes.len()),
                )
                .with_code("one_of_none_matched")
                .with_arg(outcomes.len().to_string());
                Outcome::invalid(value, collect_failures(outcomes, summary))
            }
            [single] => outcomes
                .into_iter()
                .nth(*single)
                .unwrap_or_else(|| Outcome::no_result(value)),
            several => {
                let labels: Vec<String> = several.iter().map(|i| branch_label(*i)).collect();
                let message = labels.iter().fold(
                    Message::new(
                        path,
                        format!(
                            "Value matched {} branches ({}), expected exactly one",
                            labels.len(),
                            labels.join(", ")
                        ),
                    )
                    .with_code("one_of_multiple_matched"),
                    |message, label| message.with_arg(label.as_str()),
                );
                Outcome::fail(value, message)
            }
        }
    }
}

/// Accepts `null`; hands anything else to the inner processor.
#[derive(Debug)]
pub struct Nullable(Box<dyn Processor>);

impl Nullable {
    pub fn new(inner: impl Processor + 'static) -> Self {
        Self(Box::new(inner))
    }
}

impl Processor for Nullable {
    fn processes(&self) -> &str {
        self.0.processes()
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        if value.is_null() {
            return Outcome::valid(value);
        }
        self.0.process(parent, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Step;
    use crate::filter::ToInt;
    use crate::outcome::Status;
    use crate::processor::{Field, FieldSet};
    use crate::validator::{Fails, IsInt, IsString, Passes};
    use serde_json::json;

    fn field(steps: Vec<Step>) -> Box<dyn Processor> {
        Box::new(Field::new("a", steps))
    }

    #[test]
    fn test_all_of_merges_branch_outputs() {
        let all_of = AllOf::new(
            "a",
            vec![
                Box::new(FieldSet::new("a").field(Field::new("x", vec![Step::filter(ToInt)]))),
                Box::new(FieldSet::new("a").field(Field::new("y", vec![Step::filter(ToInt)]))),
            ],
        );
        let outcome = all_of.process(&FieldPath::root(), json!({"x": "1", "y": "2"}));
        assert_eq!(outcome.value(), &json!({"x": 1, "y": 2}));
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_all_of_collects_every_failure() {
        let all_of = AllOf::new(
            "a",
            vec![
                field(vec![Step::validator(Fails)]),
                field(vec![Step::validator(Passes)]),
                field(vec![Step::validator(Fails)]),
            ],
        );
        let outcome = all_of.process(&FieldPath::root(), json!(1));
        assert_eq!(outcome.messages().unwrap().len(), 2);
    }

    #[test]
    fn test_deep_merge_later_wins() {
        assert_eq!(
            deep_merge(json!({"a": {"b": 1, "c": 1}}), json!({"a": {"c": 2}, "d": 3})),
            json!({"a": {"b": 1, "c": 2}, "d": 3})
        );
        assert_eq!(deep_merge(json!([1]), json!("x")), json!("x"));
    }

    #[test]
    fn test_any_of_takes_first_accepting_branch() {
        let any_of = AnyOf::new(
            "a",
            vec![
                field(vec![Step::validator(IsString)]),
                field(vec![Step::filter(ToInt), Step::validator(IsInt)]),
                field(vec![Step::validator(Passes)]),
            ],
        );
        let outcome = any_of.process(&FieldPath::root(), json!(5.5));
        assert_eq!(outcome, Outcome::valid(json!(5)));
    }

    #[test]
    fn test_any_of_none_matched() {
        let any_of = AnyOf::new(
            "a",
            vec![field(vec![Step::validator(Fails)]), field(vec![Step::validator(Fails)])],
        );
        let outcome = any_of.process(&FieldPath::root(), json!(1));
        let messages = outcome.messages().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages.with_code("any_of_none_matched").len(), 1);
    }

    #[test]
    fn test_one_of_exactly_one() {
        let one_of = OneOf::new(
            "a",
            vec![
                field(vec![Step::validator(IsString)]),
                field(vec![Step::filter(ToInt), Step::validator(IsInt)]),
                field(vec![Step::validator(Fails)]),
            ],
        );
        let outcome = one_of.process(&FieldPath::root(), json!(2.5));
        assert_eq!(outcome, Outcome::valid(json!(2)));
    }

    #[test]
    fn test_one_of_none_matched() {
        let one_of = OneOf::new("a", vec![field(vec![Step::validator(Fails)])]);
        let outcome = one_of.process(&FieldPath::root(), json!(1));
        assert_eq!(outcome.status(), Status::Invalid);
        assert_eq!(
            outcome.messages().unwrap().with_code("one_of_none_matched").len(),
            1
        );
    }

    #[test]
    fn test_nullable() {
        let nullable = Nullable::new(Field::new("a", vec![Step::validator(IsInt)]));
        assert_eq!(
            nullable.process(&FieldPath::root(), Value::Null),
            Outcome::valid(Value::Null)
        );
        assert!(!nullable.process(&FieldPath::root(), json!("x")).is_valid());
        assert_eq!(nullable.processes(), "a");
    }
}
