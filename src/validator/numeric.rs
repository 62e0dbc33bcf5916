//! Numeric bound validators.
//!
//! These only judge numbers. Anything else yields no result so that a value
//! of the wrong type is reported once, by the type validator in front.

use serde_json::Value;

use crate::chain::Validator;
use crate::error::Message;
use crate::outcome::Outcome;

/// Lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    limit: f64,
    exclusive: bool,
}

impl Minimum {
    pub fn inclusive(limit: f64) -> Self {
        Self {
            limit,
            exclusive: false,
        }
    }

    pub fn exclusive(limit: f64) -> Self {
        Self {
            limit,
            exclusive: true,
        }
    }
}

impl Validator for Minimum {
    fn validate(&self, value: &Value) -> Outcome {
        let Some(n) = value.as_f64() else {
            return Outcome::no_result(value.clone());
        };
        let (ok, relation) = if self.exclusive {
            (n > self.limit, "greater than")
        } else {
            (n >= self.limit, "greater than or equal to")
        };
        if ok {
            Outcome::valid(value.clone())
        } else {
            Outcome::fail(
                value.clone(),
                Message::here(format!("Number must be {} {}", relation, self.limit))
                    .with_code("below_minimum")
                    .with_arg(self.limit.to_string()),
            )
        }
    }
}

/// Upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maximum {
    limit: f64,
    exclusive: bool,
}

impl Maximum {
    pub fn inclusive(limit: f64) -> Self {
        Self {
            limit,
            exclusive: false,
        }
    }

    pub fn exclusive(limit: f64) -> Self {
        Self {
            limit,
            exclusive: true,
        }
    }
}

impl Validator for Maximum {
    fn validate(&self, value: &Value) -> Outcome {
        let Some(n) = value.as_f64() else {
            return Outcome::no_result(value.clone());
        };
        let (ok, relation) = if self.exclusive {
            (n < self.limit, "less than")
        } else {
            (n <= self.limit, "less than or equal to")
        };
        if ok {
            Outcome::valid(value.clone())
        } else {
            Outcome::fail(
                value.clone(),
                Message::here(format!("Number must be {} {}", relation, self.limit))
                    .with_code("above_maximum")
                    .with_arg(self.limit.to_string()),
            )
        }
    }
}

/// Requires the number to be a multiple of a positive factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultipleOf(f64);

impl MultipleOf {
    pub fn new(factor: f64) -> Self {
        Self(factor)
    }
}

impl Validator for MultipleOf {
    fn validate(&self, value: &Value) -> Outcome {
        let Some(n) = value.as_f64() else {
            return Outcome::no_result(value.clone());
        };
        let quotient = n / self.0;
        if quotient.is_finite() && (quotient - quotient.round()).abs() < 1e-9 {
            Outcome::valid(value.clone())
        } else {
            Outcome::fail(
                value.clone(),
                Message::here(format!("Number must be a multiple of {}", self.0))
                    .with_code("not_multiple_of")
                    .with_arg(self.0.to_string()),
            )
        }
    }
}
