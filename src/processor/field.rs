use serde_json::Value;

use crate::chain::{Chain, Step};
use crate::outcome::Outcome;
use crate::path::FieldPath;
use crate::processor::Processor;

/// Runs a chain over the value of one field.
///
/// # Example
///
/// ```rust
/// use sluice::chain::Step;
/// use sluice::filter::ToInt;
/// use sluice::processor::{Field, Processor};
/// use sluice::validator::IsInt;
/// use sluice::FieldPath;
/// use serde_json::json;
///
/// let limit = Field::new("limit", vec![Step::filter(ToInt), Step::validator(IsInt)]);
/// let outcome = limit.process(&FieldPath::from_field("query"), json!("five"));
///
/// assert!(!outcome.is_valid());
/// assert_eq!(outcome.messages().unwrap().first().path.to_string(), "query.limit");
/// ```
#[derive(Debug)]
pub struct Field {
    processes: String,
    chain: Chain,
}

impl Field {
    pub fn new(processes: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            processes: processes.into(),
            chain: Chain::new(steps),
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }
}

impl Processor for Field {
    fn processes(&self) -> &str {
        &self.processes
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        self.chain
            .run(value)
            .prefixed(&parent.push_field(self.processes.as_str()))
    }
}
