//! String validators.

use regex::Regex;
use serde_json::Value;

use crate::chain::Validator;
use crate::error::{CannotProcessSpecification, Message};
use crate::outcome::Outcome;

/// Bounds the length of a string, counted in characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length {
    min: usize,
    max: Option<usize>,
}

impl Length {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl Validator for Length {
    fn validate(&self, value: &Value) -> Outcome {
        let Some(s) = value.as_str() else {
            return Outcome::no_result(value.clone());
        };
        let length = s.chars().count();
        if length < self.min {
            return Outcome::fail(
                value.clone(),
                Message::here(format!(
                    "String is expected to be a minimum of {} characters",
                    self.min
                ))
                .with_code("too_short")
                .with_arg(self.min.to_string()),
            );
        }
        if let Some(max) = self.max.filter(|max| length > *max) {
            return Outcome::fail(
                value.clone(),
                Message::here(format!(
                    "String is expected to be a maximum of {} characters",
                    max
                ))
                .with_code("too_long")
                .with_arg(max.to_string()),
            );
        }
        Outcome::valid(value.clone())
    }
}

/// Requires a string to match a regular expression somewhere.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, CannotProcessSpecification> {
        let regex = Regex::new(pattern).map_err(|err| CannotProcessSpecification::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { regex })
    }
}

impl Validator for Pattern {
    fn validate(&self, value: &Value) -> Outcome {
        let Some(s) = value.as_str() else {
            return Outcome::no_result(value.clone());
        };
        if self.regex.is_match(s) {
            Outcome::valid(value.clone())
        } else {
            Outcome::fail(
                value.clone(),
                Message::here(format!("String does not match the required pattern {}", self.regex))
                    .with_code("pattern_mismatch")
                    .with_arg(self.regex.as_str()),
            )
        }
    }
}
