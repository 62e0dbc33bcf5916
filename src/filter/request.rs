//! Filters that unpack the raw parts of an HTTP request.

use serde_json::{Map, Value};

use crate::chain::Filter;
use crate::error::Message;
use crate::outcome::{type_name, Outcome};
use crate::path_matcher::PathMatcher;

/// Converts a query string into a mapping of query parameters.
///
/// Keys and values are percent-decoded. A repeated key, or a key written as
/// `key[]`, collects its values into a list; `key[sub]` collects into a
/// nested mapping, which is how `deepObject` parameters travel.
///
/// # Example
///
/// ```rust
/// use sluice::chain::Filter;
/// use sluice::filter::HttpParameters;
/// use serde_json::json;
///
/// let outcome = HttpParameters.filter(json!("limit=5&tags=cat&tags=tabby"));
/// assert_eq!(outcome.value(), &json!({"limit": "5", "tags": ["cat", "tabby"]}));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpParameters;

impl Filter for HttpParameters {
    fn filter(&self, value: Value) -> Outcome {
        let query = match &value {
            Value::String(query) => query.strip_prefix('?').unwrap_or(query),
            other => {
                let given = type_name(other);
                return Outcome::fail(
                    value,
                    Message::here(format!(
                        "HttpParameters expects string value, {} passed instead",
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };

        let mut params = Map::new();
        for (key, raw) in url::form_urlencoded::parse(query.as_bytes()) {
            insert_parameter(&mut params, &key, Value::String(raw.into_owned()));
        }
        Outcome::valid(Value::Object(params))
    }
}

fn insert_parameter(params: &mut Map<String, Value>, key: &str, value: Value) {
    if let Some(name) = key.strip_suffix("[]") {
        match params
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => items.push(value),
            existing => *existing = Value::Array(vec![existing.take(), value]),
        }
        return;
    }

    if let Some((name, sub)) = bracketed(key) {
        let slot = params
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(nested) = slot {
            insert_parameter(nested, sub, value);
        }
        return;
    }

    match params.get_mut(key) {
        None => {
            params.insert(key.to_string(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => *existing = Value::Array(vec![existing.take(), value]),
    }
}

/// Splits `name[sub]` into `("name", "sub")`.
fn bracketed(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let inner = key.strip_suffix(']')?;
    if open == 0 || open + 1 >= inner.len() {
        return None;
    }
    Some((&key[..open], &inner[open + 1..]))
}

/// Converts a request path into a mapping of path parameters.
#[derive(Debug, Clone)]
pub struct MatchPath {
    matcher: PathMatcher,
}

impl MatchPath {
    pub fn new(matcher: PathMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }
}

impl Filter for MatchPath {
    fn filter(&self, value: Value) -> Outcome {
        let params = match &value {
            Value::String(path) => self.matcher.path_params(path),
            other => {
                let given = type_name(other);
                return Outcome::fail(
                    value,
                    Message::here(format!("MatchPath filter expects string, {} passed", given))
                        .with_code("invalid_type")
                        .with_arg(given),
                );
            }
        };

        match params {
            Ok(params) => Outcome::no_result(Value::Object(
                params
                    .into_iter()
                    .map(|(name, segment)| (name, Value::String(segment)))
                    .collect(),
            )),
            Err(mismatch) => Outcome::fail(
                value,
                Message::here("request path does not match expected pattern")
                    .with_code("path_mismatch")
                    .with_arg(mismatch.template),
            ),
        }
    }
}
