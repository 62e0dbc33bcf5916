//! Turns [`Specification`]s into processor trees.
//!
//! [`build`] is the single entry point: it dispatches on the variant and
//! returns either a complete tree or a [`BuildError`]. Every schema variant
//! honours `nullable` by wrapping its processor in [`Nullable`].
//!
//! # Example
//!
//! ```rust
//! use sluice::builder::build;
//! use sluice::specification::{Encoding, Schema, Specification};
//! use sluice::FieldPath;
//! use serde_json::json;
//!
//! let schema = Schema::from_value(json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": {"type": "string", "minLength": 1},
//!         "age": {"type": "integer", "minimum": 0}
//!     }
//! }))
//! .unwrap();
//!
//! let processor = build(&Specification::from_schema("pet", schema, Encoding::default()).unwrap())
//!     .unwrap();
//!
//! let outcome = processor.process(&FieldPath::root(), json!({"age": -1}));
//! let paths: Vec<String> = outcome
//!     .messages()
//!     .unwrap()
//!     .iter()
//!     .map(|message| message.path.to_string())
//!     .collect();
//! assert_eq!(paths, vec!["pet.name", "pet.age"]);
//! ```

mod arrays;
mod composite;
mod objects;
mod parameter;
mod request;
mod scalars;

use tracing::debug;

use crate::chain::Step;
use crate::error::BuildError;
use crate::filter::Implode;
use crate::processor::{Nullable, Processor, RequestProcessor};
use crate::specification::{Encoding, RequestSpec, Schema, SchemaSpec, Specification};
use crate::style::{FormatStyle, Shape};

/// Builds the processor tree for `specification`.
///
/// # Errors
///
/// Returns a [`BuildError`] when the specification uses something the
/// processors cannot express. No partial tree is ever returned.
pub fn build(specification: &Specification) -> Result<Box<dyn Processor>, BuildError> {
    let processor: Box<dyn Processor> = match specification {
        Specification::Objects(spec) => Box::new(objects::build(spec)?),
        Specification::Arrays(spec) => Box::new(arrays::build(spec)?),
        Specification::Numeric(spec) => Box::new(scalars::numeric(spec)?),
        Specification::Strings(spec) => Box::new(scalars::strings(spec)?),
        Specification::TrueFalse(spec) => Box::new(scalars::true_false(spec)?),
        Specification::Composite(spec) => composite::build(spec)?,
        Specification::Any(spec) => Box::new(scalars::any(spec)),
        Specification::Parameter(parameter) => parameter::build(parameter)?,
        Specification::Request(spec) => Box::new(request::build(spec)?),
    };

    debug!(
        field = specification.field_name(),
        processor = ?processor,
        "built processor"
    );

    Ok(match schema_of(specification) {
        Some(spec) if spec.schema.nullable => Box::new(Nullable::new(processor)),
        _ => processor,
    })
}

/// Builds the processor for a whole operation.
///
/// Same as `build(&Specification::Request(..))`, but keeps the concrete
/// type so the caller can use [`RequestProcessor::process_request`].
pub fn build_request(spec: &RequestSpec) -> Result<RequestProcessor, BuildError> {
    request::build(spec)
}

fn schema_of(specification: &Specification) -> Option<&SchemaSpec> {
    match specification {
        Specification::Objects(spec)
        | Specification::Arrays(spec)
        | Specification::Numeric(spec)
        | Specification::Strings(spec)
        | Specification::TrueFalse(spec)
        | Specification::Composite(spec)
        | Specification::Any(spec) => Some(spec),
        Specification::Parameter(_) | Specification::Request(_) => None,
    }
}

/// Builds a nested schema.
fn build_schema(
    field_name: &str,
    schema: &Schema,
    encoding: Encoding,
) -> Result<Box<dyn Processor>, BuildError> {
    build(&Specification::from_schema(
        field_name,
        schema.clone(),
        encoding,
    )?)
}

/// The steps that undo a parameter's encoding before anything else runs.
fn decoding_steps(encoding: &Encoding, shape: Shape) -> Result<Vec<Step>, BuildError> {
    let mut steps = Vec::new();
    if encoding.from_array {
        steps.push(Step::filter(Implode::new(",")));
    }
    if let Some(style) = encoding.style {
        steps.push(Step::filter(FormatStyle::new(
            style,
            shape,
            encoding.explode(),
        )?));
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CannotProcessSpecification;
    use crate::outcome::Outcome;
    use crate::path::FieldPath;
    use crate::specification::{Type, TypeSet};
    use crate::style::Style;
    use serde_json::{json, Value};

    fn processor(schema: Value, encoding: Encoding) -> Box<dyn Processor> {
        let schema = Schema::from_value(schema).unwrap();
        build(&Specification::from_schema("field", schema, encoding).unwrap()).unwrap()
    }

    #[test]
    fn test_nullable_schemas_accept_null() {
        let nullable = processor(json!({"type": "integer", "nullable": true}), Encoding::default());
        assert_eq!(
            nullable.process(&FieldPath::root(), Value::Null),
            Outcome::valid(Value::Null)
        );
        let strict = processor(json!({"type": "integer"}), Encoding::default());
        assert!(!strict.process(&FieldPath::root(), Value::Null).is_valid());
    }

    #[test]
    fn test_mismatched_variant_is_rejected() {
        let spec = SchemaSpec {
            field_name: "a".to_string(),
            schema: Schema::of_type(Type::String),
            encoding: Encoding::default(),
        };
        assert!(matches!(
            build(&Specification::Arrays(spec)),
            Err(BuildError::Specification(
                CannotProcessSpecification::MismatchedType { .. }
            ))
        ));
    }

    #[test]
    fn test_type_lists_are_rejected() {
        let spec = SchemaSpec {
            field_name: "a".to_string(),
            schema: Schema {
                types: Some(TypeSet::Many(vec![Type::Integer, Type::Null])),
                ..Schema::default()
            },
            encoding: Encoding::default(),
        };
        assert_eq!(
            build(&Specification::Numeric(spec)).unwrap_err(),
            BuildError::Specification(CannotProcessSpecification::ArrayOfTypesUnsupported)
        );
    }

    #[test]
    fn test_decoding_steps() {
        assert!(decoding_steps(&Encoding::default(), Shape::Primitive)
            .unwrap()
            .is_empty());
        let header = Encoding::string(Style::Simple, false).with_from_array(true);
        assert_eq!(decoding_steps(&header, Shape::Array).unwrap().len(), 2);
        assert!(decoding_steps(&Encoding::string(Style::DeepObject, true), Shape::Array).is_err());
    }
}
