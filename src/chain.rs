//! Filters, validators and the chains that run them.
//!
//! A [`Filter`] may transform the value it receives; a [`Validator`] only
//! reports on it. A [`Chain`] runs an ordered list of both, feeding each
//! filter's output to the next step and folding every step's verdict into
//! one [`Outcome`]. Chains never stop early: an invalid step still lets the
//! remaining steps run so all applicable messages are collected.

use std::fmt;

use serde_json::Value;

use crate::outcome::Outcome;

/// A unit that may transform a value.
pub trait Filter: Send + Sync + fmt::Debug {
    fn filter(&self, value: Value) -> Outcome;
}

/// A unit that assesses a value without transforming it.
pub trait Validator: Send + Sync + fmt::Debug {
    fn validate(&self, value: &Value) -> Outcome;
}

/// One entry in a [`Chain`].
#[derive(Debug)]
pub enum Step {
    Filter(Box<dyn Filter>),
    Validator(Box<dyn Validator>),
}

impl Step {
    pub fn filter(filter: impl Filter + 'static) -> Self {
        Step::Filter(Box::new(filter))
    }

    pub fn validator(validator: impl Validator + 'static) -> Self {
        Step::Validator(Box::new(validator))
    }
}

/// An ordered list of steps.
///
/// # Example
///
/// ```rust
/// use sluice::chain::{Chain, Step};
/// use sluice::filter::ToInt;
/// use sluice::validator::{IsInt, Maximum};
/// use serde_json::json;
///
/// let chain = Chain::new(vec![
///     Step::filter(ToInt),
///     Step::validator(IsInt),
///     Step::validator(Maximum::inclusive(10.0)),
/// ]);
///
/// let outcome = chain.run(json!("7"));
/// assert!(outcome.is_valid());
/// assert_eq!(outcome.value(), &json!(7));
/// ```
#[derive(Debug, Default)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Runs every step in order.
    ///
    /// The result's value is whatever the last filter produced, or the input
    /// if no filter ran. Messages are relative to the value the chain ran on.
    pub fn run(&self, value: Value) -> Outcome {
        self.steps
            .iter()
            .fold(Outcome::no_result(value), |acc, step| match step {
                Step::Filter(filter) => {
                    let produced = filter.filter(acc.value().clone());
                    acc.merge(produced)
                }
                Step::Validator(validator) => {
                    let produced = validator.validate(acc.value());
                    acc.absorb(produced)
                }
            })
    }
}

impl From<Vec<Step>> for Chain {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Message;
    use crate::outcome::Status;
    use crate::validator::{Fails, Passes};
    use serde_json::json;

    #[derive(Debug)]
    struct Double;

    impl Filter for Double {
        fn filter(&self, value: Value) -> Outcome {
            match value.as_i64() {
                Some(n) => Outcome::no_result(json!(n * 2)),
                None => Outcome::fail(value, Message::here("Double expects an integer")),
            }
        }
    }

    #[derive(Debug)]
    struct Rewrites;

    impl Validator for Rewrites {
        fn validate(&self, _value: &Value) -> Outcome {
            Outcome::valid(json!("rewritten"))
        }
    }

    #[test]
    fn test_empty_chain_returns_no_result() {
        let outcome = Chain::default().run(json!(1));
        assert_eq!(outcome, Outcome::no_result(json!(1)));
    }

    #[test]
    fn test_filters_feed_the_next_step() {
        let chain = Chain::new(vec![Step::filter(Double), Step::filter(Double)]);
        assert_eq!(chain.run(json!(3)).value(), &json!(12));
    }

    #[test]
    fn test_validators_cannot_change_the_value() {
        let chain = Chain::new(vec![Step::validator(Rewrites), Step::filter(Double)]);
        let outcome = chain.run(json!(2));
        assert_eq!(outcome.value(), &json!(4));
        assert_eq!(outcome.status(), Status::Valid);
    }

    #[test]
    fn test_chain_does_not_short_circuit() {
        let chain = Chain::new(vec![
            Step::validator(Fails),
            Step::validator(Passes),
            Step::validator(Fails),
        ]);
        let outcome = chain.run(json!("x"));
        assert_eq!(outcome.status(), Status::Invalid);
        assert_eq!(outcome.messages().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_filter_keeps_running_on_current_value() {
        let chain = Chain::new(vec![Step::filter(Double), Step::filter(Double)]);
        let outcome = chain.run(json!("x"));
        assert_eq!(outcome.value(), &json!("x"));
        assert_eq!(outcome.messages().unwrap().len(), 2);
    }
}
