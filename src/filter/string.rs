//! String filters.

use serde_json::Value;

use crate::chain::Filter;
use crate::error::Message;
use crate::outcome::{type_name, Outcome};

/// Parses a JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecode;

impl Filter for JsonDecode {
    fn filter(&self, value: Value) -> Outcome {
        let decoded = match &value {
            Value::String(raw) => serde_json::from_str::<Value>(raw),
            other => {
                let given = type_name(other);
                return Outcome::fail(
                    value,
                    Message::here(format!(
                        "JsonDecode filter expects a string value, {} passed instead",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };

        match decoded {
            Ok(parsed) => Outcome::no_result(parsed),
            Err(err) => Outcome::fail(
                value,
                Message::here(format!("Invalid JSON: {}", err))
                    .with_code("invalid_json")
                    .with_arg(err.to_string()),
            ),
        }
    }
}

/// Splits a string into a list on a delimiter. `""` becomes `[]`.
#[derive(Debug, Clone)]
pub struct Explode {
    delimiter: String,
}

impl Explode {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Filter for Explode {
    fn filter(&self, value: Value) -> Outcome {
        match &value {
            Value::String(s) if s.is_empty() => Outcome::no_result(Value::Array(Vec::new())),
            Value::String(s) => Outcome::no_result(Value::Array(
                s.split(self.delimiter.as_str())
                    .map(|token| Value::String(token.to_string()))
                    .collect(),
            )),
            other => {
                let given = type_name(other);
                Outcome::fail(
                    value,
                    Message::here(format!(
                        "Explode filter expects a string value, {} passed instead",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                )
            }
        }
    }
}

/// Joins a list of scalars into one string. Strings pass through.
///
/// Header values arrive as one string per header line; joining them lets
/// the rest of the chain treat a header like any other parameter.
#[derive(Debug, Clone)]
pub struct Implode {
    delimiter: String,
}

impl Implode {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Filter for Implode {
    fn filter(&self, value: Value) -> Outcome {
        let items = match &value {
            Value::String(_) => return Outcome::no_result(value),
            Value::Array(items) => items,
            other => {
                let given = type_name(other);
                return Outcome::fail(
                    value,
                    Message::here(format!(
                        "Implode filter expects a list value, {} passed instead",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };

        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(s) => parts.push(s.clone()),
                Value::Number(n) => parts.push(n.to_string()),
                Value::Bool(b) => parts.push(b.to_string()),
                other => {
                    let given = type_name(other);
                    return Outcome::fail(
                        value.clone(),
                        Message::here(format!(
                            "Implode filter only joins scalar values, {} found",
                            given
                        ))
                        .with_code("invalid_type")
                        .with_arg(given),
                    );
                }
            }
        }
        Outcome::no_result(Value::String(parts.join(self.delimiter.as_str())))
    }
}
