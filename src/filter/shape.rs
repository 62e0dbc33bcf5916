//! Filters that reshape mappings.

use serde_json::{Map, Value};

use crate::chain::Filter;
use crate::error::Message;
use crate::outcome::{type_name, Outcome};

/// Moves the value under `from` to `to`. Missing keys are left alone.
#[derive(Debug, Clone)]
pub struct Rename {
    from: String,
    to: String,
}

impl Rename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Filter for Rename {
    fn filter(&self, value: Value) -> Outcome {
        match value {
            Value::Object(mut map) => {
                if let Some(moved) = map.remove(&self.from) {
                    map.insert(self.to.clone(), moved);
                }
                Outcome::no_result(Value::Object(map))
            }
            other => {
                let given = type_name(&other);
                Outcome::fail(
                    other,
                    Message::here(format!(
                        "Rename filter expects an object, {} passed instead",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                )
            }
        }
    }
}

/// Collects `keys` found at the top of a mapping into a nested mapping
/// under `into`, the way an exploded form object spreads its properties
/// across a query string.
///
/// Nothing happens when `into` is already present or none of the keys are.
#[derive(Debug, Clone)]
pub struct Gather {
    into: String,
    keys: Vec<String>,
}

impl Gather {
    pub fn new<I, S>(into: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            into: into.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for Gather {
    fn filter(&self, value: Value) -> Outcome {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                let given = type_name(&other);
                return Outcome::fail(
                    other,
                    Message::here(format!(
                        "Gather filter expects an object, {} passed instead",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };

        if !map.contains_key(&self.into) {
            let gathered: Map<String, Value> = self
                .keys
                .iter()
                .filter_map(|key| map.remove(key).map(|moved| (key.clone(), moved)))
                .collect();
            if !gathered.is_empty() {
                map.insert(self.into.clone(), Value::Object(gathered));
            }
        }
        Outcome::no_result(Value::Object(map))
    }
}
