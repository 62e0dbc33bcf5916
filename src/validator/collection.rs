//! Validators over enumerations, lists and mappings.

use serde_json::Value;

use crate::chain::Validator;
use crate::error::Message;
use crate::outcome::Outcome;

/// Accepts only values found in a fixed enumeration.
#[derive(Debug, Clone)]
pub struct Contained {
    allowed: Vec<Value>,
}

impl Contained {
    pub fn new(allowed: Vec<Value>) -> Self {
        Self { allowed }
    }
}

impl Validator for Contained {
    fn validate(&self, value: &Value) -> Outcome {
        if self.allowed.iter().any(|allowed| same_value(allowed, value)) {
            return Outcome::valid(value.clone());
        }
        let listed = Value::Array(self.allowed.clone()).to_string();
        Outcome::fail(
            value.clone(),
            Message::here(format!(
                "Contained validator did not find value within {}",
                listed
            ))
            .with_code("not_contained")
            .with_arg(listed),
        )
    }
}

/// Bounds the number of items in a list or properties in a mapping.
///
/// Values that are neither are left to the type validators.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count {
    min: usize,
    max: Option<usize>,
}

impl Count {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl Validator for Count {
    fn validate(&self, value: &Value) -> Outcome {
        let (count, unit) = match value {
            Value::Array(items) => (items.len(), "values"),
            Value::Object(map) => (map.len(), "properties"),
            _ => return Outcome::no_result(value.clone()),
        };

        if count < self.min {
            return Outcome::fail(
                value.clone(),
                Message::here(format!(
                    "Expected a minimum of {} {}, {} given",
                    self.min, unit, count
                ))
                .with_code("too_few")
                .with_arg(self.min.to_string()),
            );
        }
        if let Some(max) = self.max.filter(|max| count > *max) {
            return Outcome::fail(
                value.clone(),
                Message::here(format!(
                    "Expected a maximum of {} {}, {} given",
                    max, unit, count
                ))
                .with_code("too_many")
                .with_arg(max.to_string()),
            );
        }
        Outcome::valid(value.clone())
    }
}

/// Requires the named fields of a mapping to hold identical values.
///
/// Missing fields count as `null`.
#[derive(Debug, Clone)]
pub struct Identical {
    fields: Vec<String>,
}

impl Identical {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for Identical {
    fn validate(&self, value: &Value) -> Outcome {
        let Value::Object(map) = value else {
            return Outcome::no_result(value.clone());
        };

        let null = Value::Null;
        let mut values = self.fields.iter().map(|f| map.get(f).unwrap_or(&null));
        let identical = match values.next() {
            Some(first) => values.all(|other| same_value(first, other)),
            None => true,
        };

        if identical {
            Outcome::valid(value.clone())
        } else {
            Outcome::fail(
                value.clone(),
                Message::here("Fields are not identical")
                    .with_code("not_identical")
                    .with_arg(self.fields.join(", ")),
            )
        }
    }
}

/// Requires every item of a list to be distinct.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unique;

impl Validator for Unique {
    fn validate(&self, value: &Value) -> Outcome {
        let Value::Array(items) = value else {
            return Outcome::no_result(value.clone());
        };

        for (i, item) in items.iter().enumerate() {
            if items[..i].iter().any(|earlier| same_value(earlier, item)) {
                return Outcome::fail(
                    value.clone(),
                    Message::here("Collection contains duplicate values")
                        .with_code("not_unique")
                        .with_arg(item.to_string()),
                );
            }
        }
        Outcome::valid(value.clone())
    }
}

/// Structural equality where `1` and `1.0` are the same number.
pub(crate) fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}
