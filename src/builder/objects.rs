use crate::chain::Step;
use crate::error::BuildError;
use crate::processor::{BeforeSet, DefaultProcessor, FieldSet};
use crate::specification::{check_only_type_or_null, AdditionalProperties, SchemaSpec, Type};
use crate::style::Shape;
use crate::validator::{Count, FixedFields, IsMap, RequiredFields};

use super::scalars::enumeration;
use super::{build_schema, decoding_steps};

/// `object` schemas.
///
/// Declared properties become fields. A schema-valued
/// `additionalProperties` processes every other key; `false` rejects them.
pub(super) fn build(spec: &SchemaSpec) -> Result<FieldSet, BuildError> {
    check_only_type_or_null("Objects", Type::Object, spec.schema.types.as_ref())?;
    let schema = &spec.schema;

    let mut before = decoding_steps(&spec.encoding, Shape::Object)?;
    before.push(Step::validator(IsMap));
    before.extend(enumeration(schema));
    if !schema.required.is_empty() {
        before.push(Step::validator(RequiredFields::new(&schema.required)));
    }
    if let Some(AdditionalProperties::Allowed(false)) = schema.additional_properties {
        before.push(Step::validator(FixedFields::new(schema.properties.keys())));
    }
    if schema.min_properties.is_some() || schema.max_properties.is_some() {
        before.push(Step::validator(Count::new(
            schema.min_properties.unwrap_or(0),
            schema.max_properties,
        )));
    }

    let nested = spec.encoding.nested();
    let mut set = FieldSet::new(&spec.field_name).with_before(BeforeSet::new(before));
    for (name, property) in &schema.properties {
        set = set.field(build_schema(name, property, nested)?);
    }
    if let Some(AdditionalProperties::Schema(extra)) = &schema.additional_properties {
        set = set.with_default(DefaultProcessor::new(build_schema("", extra, nested)?));
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::path::FieldPath;
    use crate::processor::Processor;
    use crate::specification::{Encoding, Schema};
    use crate::style::Style;
    use serde_json::{json, Value};

    fn object(schema: Value, encoding: Encoding) -> FieldSet {
        build(&SchemaSpec {
            field_name: "pet".to_string(),
            schema: Schema::from_value(schema).unwrap(),
            encoding,
        })
        .unwrap()
    }

    #[test]
    fn test_required_and_properties() {
        let pet = object(
            json!({
                "type": "object",
                "required": ["id", "name"],
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string"}
                }
            }),
            Encoding::default(),
        );

        let outcome = pet.process(&FieldPath::root(), json!({"id": "7"}));
        let messages = outcome.messages().unwrap();
        let paths: Vec<String> = messages.iter().map(|m| m.path.to_string()).collect();
        assert_eq!(paths, vec!["pet.name", "pet.id"]);
        assert_eq!(messages.first().message, "name is a required field");
    }

    #[test]
    fn test_closed_objects_reject_extra_keys() {
        let pet = object(
            json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {"id": {"type": "integer"}}
            }),
            Encoding::default(),
        );
        let outcome = pet.process(&FieldPath::root(), json!({"id": 1, "colour": "red"}));
        let message = outcome.messages().unwrap().first().clone();
        assert_eq!(message.path.to_string(), "pet.colour");
        assert_eq!(message.code, "additional_property");
    }

    #[test]
    fn test_additional_properties_schema() {
        let scores = object(
            json!({"type": "object", "additionalProperties": {"type": "integer"}}),
            Encoding::string(Style::DeepObject, true),
        );
        let outcome = scores.process(&FieldPath::root(), json!("alice=3&bob=5"));
        assert_eq!(outcome, Outcome::valid(json!({"alice": 3, "bob": 5})));

        let outcome = scores.process(&FieldPath::root(), json!("alice=x"));
        assert_eq!(
            outcome.messages().unwrap().first().path.to_string(),
            "pet.alice"
        );
    }

    #[test]
    fn test_styled_object_parameter() {
        let color = object(
            json!({
                "type": "object",
                "properties": {"R": {"type": "integer"}, "G": {"type": "integer"}}
            }),
            Encoding::string(Style::Matrix, true),
        );
        let outcome = color.process(&FieldPath::root(), json!(";R=100;G=200"));
        assert_eq!(outcome, Outcome::valid(json!({"R": 100, "G": 200})));
    }

    #[test]
    fn test_property_count() {
        let pet = object(json!({"type": "object", "maxProperties": 1}), Encoding::default());
        let outcome = pet.process(&FieldPath::root(), json!({"a": 1, "b": 2}));
        assert_eq!(outcome.messages().unwrap().first().code, "too_many");
    }

    #[test]
    fn test_non_object_reports_once() {
        let pet = object(json!({"type": "object"}), Encoding::default());
        let outcome = pet.process(&FieldPath::root(), json!([1]));
        assert_eq!(outcome.messages().unwrap().len(), 1);
    }
}
