//! Type coercion filters.
//!
//! Parameters arrive as strings; these filters turn them into the JSON type
//! the schema declares. A coercion that fails leaves the value untouched and
//! reports why.

use serde_json::{Number, Value};

use crate::chain::Filter;
use crate::error::Message;
use crate::outcome::{type_name, Outcome};

/// Coerces scalars to an integer, truncating fractional values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToInt;

impl Filter for ToInt {
    fn filter(&self, value: Value) -> Outcome {
        let parsed = match &value {
            Value::Null => Some(Parsed::Int(0)),
            Value::Bool(b) => Some(Parsed::Int(i64::from(*b))),
            Value::Number(n) => n
                .as_i64()
                .map(Parsed::Int)
                .or_else(|| n.as_f64().map(Parsed::Float)),
            Value::String(s) => parse_number(s),
            Value::Array(_) | Value::Object(_) => {
                let given = type_name(&value);
                return Outcome::fail(
                    value,
                    Message::here(format!(
                        "ToInt filter only accepts null or scalar values, {} given",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };

        match parsed {
            Some(Parsed::Int(i)) => Outcome::no_result(Value::from(i)),
            Some(Parsed::Float(f)) => match truncate(f) {
                Some(i) => Outcome::no_result(Value::from(i)),
                None => Outcome::fail(
                    value,
                    Message::here("ToInt filter only accepts values within the 64-bit integer range")
                        .with_code("out_of_range"),
                ),
            },
            None => Outcome::fail(
                value,
                Message::here("ToInt filter only accepts numeric strings").with_code("not_numeric"),
            ),
        }
    }
}

/// Truncates toward zero, refusing values `i64` cannot hold.
fn truncate(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    // i64::MAX rounds up to 2^63 as a float, so the upper bound is exclusive.
    (truncated >= i64::MIN as f64 && truncated < i64::MAX as f64).then_some(truncated as i64)
}

/// Coerces scalars to a float.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToFloat;

impl Filter for ToFloat {
    fn filter(&self, value: Value) -> Outcome {
        let coerced = match &value {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(s).map(|n| match n {
                Parsed::Int(i) => i as f64,
                Parsed::Float(f) => f,
            }),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                let given = type_name(&value);
                return Outcome::fail(
                    value,
                    Message::here(format!(
                        "ToFloat filter only accepts scalar values, {} is not scalar",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };

        match coerced.and_then(Number::from_f64) {
            Some(n) => Outcome::no_result(Value::Number(n)),
            None => Outcome::fail(
                value,
                Message::here("ToFloat filter only accepts numeric strings")
                    .with_code("not_numeric"),
            ),
        }
    }
}

/// Coerces numeric strings to a number, keeping integers integral.
///
/// `"5"` becomes `5` and `"5.5"` becomes `5.5`. Numbers pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToNumber;

impl Filter for ToNumber {
    fn filter(&self, value: Value) -> Outcome {
        match &value {
            Value::Number(_) => Outcome::no_result(value),
            Value::String(s) => match parse_number(s) {
                Some(Parsed::Int(i)) => Outcome::no_result(Value::from(i)),
                Some(Parsed::Float(f)) => match Number::from_f64(f) {
                    Some(n) => Outcome::no_result(Value::Number(n)),
                    None => not_numeric(value),
                },
                None => not_numeric(value),
            },
            _ => {
                let given = type_name(&value);
                Outcome::fail(
                    value,
                    Message::here(format!(
                        "ToNumber filter only accepts numbers or strings, {} given",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                )
            }
        }
    }
}

fn not_numeric(value: Value) -> Outcome {
    Outcome::fail(
        value,
        Message::here("ToNumber filter only accepts numeric strings").with_code("not_numeric"),
    )
}

/// Coerces `"true"`/`"false"` (and `1`/`0`, `on`/`off`, `yes`/`no`) to a boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToBool;

impl Filter for ToBool {
    fn filter(&self, value: Value) -> Outcome {
        let coerced = match &value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Some(true),
                "false" | "0" | "off" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        };

        match coerced {
            Some(b) => Outcome::no_result(Value::Bool(b)),
            None => {
                let given = type_name(&value);
                Outcome::fail(
                    value,
                    Message::here(format!(
                        "ToBool filter only accepts boolean-like values, {} given",
                        given
                    ))
                    .with_code("not_boolean")
                    .with_arg(given),
                )
            }
        }
    }
}

/// Coerces scalars to their string form. `null` becomes `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToStr;

impl Filter for ToStr {
    fn filter(&self, value: Value) -> Outcome {
        let coerced = match &value {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(_) => return Outcome::no_result(value),
            Value::Array(_) | Value::Object(_) => {
                let given = type_name(&value);
                return Outcome::fail(
                    value,
                    Message::here(format!(
                        "ToStr filter only accepts null or scalar values, {} given",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };
        Outcome::no_result(Value::String(coerced))
    }
}

enum Parsed {
    Int(i64),
    Float(f64),
}

fn parse_number(raw: &str) -> Option<Parsed> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Parsed::Int(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Parsed::Float)
}
