//! Validators over the keys of a mapping.

use serde_json::Value;

use crate::chain::Validator;
use crate::error::{Message, MessageSet};
use crate::outcome::Outcome;
use crate::path::FieldPath;

/// Requires each named key to be present.
///
/// Each missing key gets its own message, at the path of the missing field.
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Validator for RequiredFields {
    fn validate(&self, value: &Value) -> Outcome {
        let Value::Object(map) = value else {
            return Outcome::no_result(value.clone());
        };

        let missing = self
            .fields
            .iter()
            .filter(|field| !map.contains_key(field.as_str()))
            .map(|field| {
                Message::new(FieldPath::from_field(field.as_str()), format!("{} is a required field", field))
                    .with_code("required")
                    .with_arg(field.as_str())
            })
            .collect();

        match MessageSet::from_vec(missing) {
            Some(messages) => Outcome::invalid(value.clone(), messages),
            None => Outcome::valid(value.clone()),
        }
    }
}

/// Rejects keys other than the listed ones.
#[derive(Debug, Clone, Default)]
pub struct FixedFields {
    fields: Vec<String>,
}

impl FixedFields {
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

impl Validator for FixedFields {
    fn validate(&self, value: &Value) -> Outcome {
        let Value::Object(map) = value else {
            return Outcome::no_result(value.clone());
        };

        let extra = map
            .keys()
            .filter(|key| !self.fields.iter().any(|field| field == *key))
            .map(|key| {
                Message::new(FieldPath::from_field(key.as_str()), format!("{} is not a fixed field", key))
                    .with_code("additional_property")
                    .with_arg(key.as_str())
            })
            .collect();

        match MessageSet::from_vec(extra) {
            Some(messages) => Outcome::invalid(value.clone(), messages),
            None => Outcome::valid(value.clone()),
        }
    }
}
