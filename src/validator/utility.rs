//! Validators with a fixed verdict.

use serde_json::Value;

use crate::chain::Validator;
use crate::error::Message;
use crate::outcome::Outcome;

/// Always valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passes;

impl Validator for Passes {
    fn validate(&self, value: &Value) -> Outcome {
        Outcome::valid(value.clone())
    }
}

/// Always invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fails;

impl Validator for Fails {
    fn validate(&self, value: &Value) -> Outcome {
        Outcome::fail(value.clone(), Message::here("I always fail").with_code("fails"))
    }
}

/// Never expresses an opinion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Indifferent;

impl Validator for Indifferent {
    fn validate(&self, value: &Value) -> Outcome {
        Outcome::no_result(value.clone())
    }
}
