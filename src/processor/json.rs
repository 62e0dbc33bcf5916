use serde_json::Value;

use crate::chain::Step;
use crate::filter::{Implode, JsonDecode};
use crate::outcome::Outcome;
use crate::path::FieldPath;
use crate::processor::{Field, Processor};

/// Decodes a JSON document, then hands it to the wrapped processor.
///
/// An empty string is not decoded; it goes to the wrapped processor as is,
/// or, for an [`optional`](Self::optional) document, is accepted without
/// opinion. A document that fails to decode stops here.
#[derive(Debug)]
pub struct Json {
    decode: Field,
    wrapped: Box<dyn Processor>,
    optional: bool,
}

impl Json {
    pub fn new(wrapped: impl Processor + 'static) -> Self {
        Self {
            decode: Field::new("", vec![Step::filter(JsonDecode)]),
            wrapped: Box::new(wrapped),
            optional: false,
        }
    }

    /// Joins a list of strings with `delimiter` before decoding, for
    /// documents that arrive split into several values.
    pub fn joining(mut self, delimiter: impl Into<String>) -> Self {
        self.decode = Field::new(
            "",
            vec![Step::filter(Implode::new(delimiter)), Step::filter(JsonDecode)],
        );
        self
    }

    /// Lets an empty document through without running the wrapped processor.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl Processor for Json {
    fn processes(&self) -> &str {
        self.wrapped.processes()
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        if value.as_str().is_some_and(str::is_empty) {
            if self.optional {
                return Outcome::no_result(value);
            }
            return self.wrapped.process(parent, value);
        }

        let decoded = self
            .decode
            .process(&parent.push_field(self.processes()), value);
        if !decoded.is_valid() {
            return decoded;
        }
        self.wrapped.process(parent, decoded.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::FieldSet;
    use crate::validator::{IsInt, Passes};
    use serde_json::json;

    fn body() -> Json {
        Json::new(FieldSet::new("body").field(Field::new("id", vec![Step::validator(IsInt)])))
    }

    #[test]
    fn test_decodes_then_processes() {
        let outcome = body().process(&FieldPath::root(), json!(r#"{"id": 5}"#));
        assert_eq!(outcome, Outcome::valid(json!({"id": 5})));
    }

    #[test]
    fn test_invalid_json_stops() {
        let outcome = body().process(&FieldPath::root(), json!("{"));
        let message = outcome.messages().unwrap().first();
        assert_eq!(message.code, "invalid_json");
        assert_eq!(message.path.to_string(), "body");
    }

    #[test]
    fn test_empty_string_is_not_decoded() {
        let passthrough = Json::new(Field::new("body", vec![Step::validator(Passes)]));
        assert_eq!(
            passthrough.process(&FieldPath::root(), json!("")),
            Outcome::valid(json!(""))
        );
        assert_eq!(passthrough.processes(), "body");
    }

    #[test]
    fn test_optional_document_skips_wrapped() {
        assert_eq!(
            body().optional().process(&FieldPath::root(), json!("")),
            Outcome::no_result(json!(""))
        );
        assert!(!body().process(&FieldPath::root(), json!("")).is_valid());
    }
}
