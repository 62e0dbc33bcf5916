//! Builder-facing descriptions of what a processor tree should check.
//!
//! A [`Specification`] is the bridge between an already-loaded API
//! description and the builders: each variant names one builder and
//! carries exactly what that builder needs.

mod openapi;
mod schema;

pub use openapi::{Location, MediaType, Operation, Parameter, PathItem, RequestBody, RequestSpec};
pub use schema::{
    check_only_type_or_null, AdditionalProperties, ExclusiveBound, Schema, Type, TypeSet,
};

use crate::error::CannotProcessSpecification;
use crate::style::Style;

/// How values reach a schema's processor.
///
/// Parameters travel as strings, possibly style-encoded; bodies arrive as
/// decoded JSON. The encoding of a parameter applies to its top-level
/// schema; nested schemas only inherit `from_string`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoding {
    /// The style the raw string was serialized with.
    pub style: Option<Style>,
    /// Overrides the style's default `explode`.
    pub explode: Option<bool>,
    /// Scalars arrive as strings and need coercing.
    pub from_string: bool,
    /// The value may arrive as a list of strings to be joined first.
    pub from_array: bool,
}

impl Encoding {
    /// The encoding of a parameter sent as a string.
    pub fn string(style: Style, explode: bool) -> Self {
        Self {
            style: Some(style),
            explode: Some(explode),
            from_string: true,
            from_array: false,
        }
    }

    pub fn with_from_array(mut self, from_array: bool) -> Self {
        self.from_array = from_array;
        self
    }

    pub fn explode(&self) -> bool {
        match (self.explode, self.style) {
            (Some(explode), _) => explode,
            (None, Some(style)) => style.default_explode(),
            (None, None) => false,
        }
    }

    /// The encoding nested schemas see.
    pub fn nested(&self) -> Self {
        Self {
            from_string: self.from_string,
            ..Self::default()
        }
    }
}

/// A schema together with the field it describes and how it is encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSpec {
    pub field_name: String,
    pub schema: Schema,
    pub encoding: Encoding,
}

/// What to build.
#[derive(Debug, Clone, PartialEq)]
pub enum Specification {
    Objects(SchemaSpec),
    Arrays(SchemaSpec),
    /// `integer` or `number`.
    Numeric(SchemaSpec),
    Strings(SchemaSpec),
    TrueFalse(SchemaSpec),
    /// `oneOf`, `anyOf` or `allOf`.
    Composite(SchemaSpec),
    /// No type constraint.
    Any(SchemaSpec),
    /// One operation parameter.
    Parameter(Parameter),
    /// A whole operation.
    Request(RequestSpec),
}

impl Specification {
    /// Picks the variant for a schema.
    ///
    /// The declared type decides; without one, `properties` or
    /// `additionalProperties` imply an object and `items` an array.
    ///
    /// # Errors
    ///
    /// Unresolved `$ref`s and unsupported `type` lists.
    pub fn from_schema(
        field_name: impl Into<String>,
        schema: Schema,
        encoding: Encoding,
    ) -> Result<Self, CannotProcessSpecification> {
        if let Some(reference) = &schema.reference {
            return Err(CannotProcessSpecification::InvalidSchema(format!(
                "unresolved reference '{}'",
                reference
            )));
        }

        let spec = SchemaSpec {
            field_name: field_name.into(),
            encoding,
            schema,
        };

        if spec.schema.is_composite() {
            return Ok(Specification::Composite(spec));
        }

        let inferred = match spec.schema.single_type()? {
            Some(ty) => Some(ty),
            None if !spec.schema.properties.is_empty()
                || spec.schema.additional_properties.is_some() =>
            {
                Some(Type::Object)
            }
            None if spec.schema.items.is_some() => Some(Type::Array),
            None => None,
        };

        match inferred {
            Some(Type::Object) => Self::objects(spec),
            Some(Type::Array) => Self::arrays(spec),
            Some(Type::Integer | Type::Number) => Self::numeric(spec),
            Some(Type::String) => Self::strings(spec),
            Some(Type::Boolean) => Self::true_false(spec),
            Some(Type::Null) | None => Ok(Specification::Any(spec)),
        }
    }

    /// The schema variant for `Objects`, checking the declared type.
    pub fn objects(spec: SchemaSpec) -> Result<Self, CannotProcessSpecification> {
        check_only_type_or_null("Objects", Type::Object, spec.schema.types.as_ref())?;
        Ok(Specification::Objects(spec))
    }

    /// The schema variant for `Arrays`, checking the declared type.
    pub fn arrays(spec: SchemaSpec) -> Result<Self, CannotProcessSpecification> {
        check_only_type_or_null("Arrays", Type::Array, spec.schema.types.as_ref())?;
        Ok(Specification::Arrays(spec))
    }

    /// The schema variant for `Strings`, checking the declared type.
    pub fn strings(spec: SchemaSpec) -> Result<Self, CannotProcessSpecification> {
        check_only_type_or_null("Strings", Type::String, spec.schema.types.as_ref())?;
        Ok(Specification::Strings(spec))
    }

    /// The schema variant for `TrueFalse`, checking the declared type.
    pub fn true_false(spec: SchemaSpec) -> Result<Self, CannotProcessSpecification> {
        check_only_type_or_null("TrueFalse", Type::Boolean, spec.schema.types.as_ref())?;
        Ok(Specification::TrueFalse(spec))
    }

    /// The schema variant for `Numeric`, accepting `integer` or `number`.
    pub fn numeric(spec: SchemaSpec) -> Result<Self, CannotProcessSpecification> {
        let expected = match spec.schema.single_type()? {
            Some(Type::Integer) => Type::Integer,
            _ => Type::Number,
        };
        check_only_type_or_null("Numeric", expected, spec.schema.types.as_ref())?;
        Ok(Specification::Numeric(spec))
    }

    pub fn field_name(&self) -> &str {
        match self {
            Specification::Objects(spec)
            | Specification::Arrays(spec)
            | Specification::Numeric(spec)
            | Specification::Strings(spec)
            | Specification::TrueFalse(spec)
            | Specification::Composite(spec)
            | Specification::Any(spec) => &spec.field_name,
            Specification::Parameter(parameter) => &parameter.name,
            Specification::Request(_) => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_of(schema: serde_json::Value) -> Result<Specification, CannotProcessSpecification> {
        Specification::from_schema("field", Schema::from_value(schema)?, Encoding::default())
    }

    #[test]
    fn test_dispatch_on_type() {
        assert!(matches!(spec_of(json!({"type": "object"})), Ok(Specification::Objects(_))));
        assert!(matches!(spec_of(json!({"type": "array"})), Ok(Specification::Arrays(_))));
        assert!(matches!(spec_of(json!({"type": "integer"})), Ok(Specification::Numeric(_))));
        assert!(matches!(spec_of(json!({"type": "number"})), Ok(Specification::Numeric(_))));
        assert!(matches!(spec_of(json!({"type": "string"})), Ok(Specification::Strings(_))));
        assert!(matches!(spec_of(json!({"type": "boolean"})), Ok(Specification::TrueFalse(_))));
        assert!(matches!(spec_of(json!({})), Ok(Specification::Any(_))));
        assert!(matches!(
            spec_of(json!({"oneOf": [{"type": "string"}]})),
            Ok(Specification::Composite(_))
        ));
    }

    #[test]
    fn test_inferred_types() {
        assert!(matches!(
            spec_of(json!({"properties": {"a": {}}})),
            Ok(Specification::Objects(_))
        ));
        assert!(matches!(spec_of(json!({"items": {}})), Ok(Specification::Arrays(_))));
    }

    #[test]
    fn test_rejects_references_and_type_lists() {
        assert!(matches!(
            spec_of(json!({"$ref": "#/components/schemas/Pet"})),
            Err(CannotProcessSpecification::InvalidSchema(_))
        ));
        assert_eq!(
            spec_of(json!({"type": ["string", "null"]})),
            Err(CannotProcessSpecification::ArrayOfTypesUnsupported)
        );
    }

    #[test]
    fn test_checked_constructors() {
        let spec = SchemaSpec {
            field_name: "a".to_string(),
            schema: Schema::of_type(Type::String),
            encoding: Encoding::default(),
        };
        assert!(Specification::strings(spec.clone()).is_ok());
        assert!(matches!(
            Specification::objects(spec.clone()),
            Err(CannotProcessSpecification::MismatchedType { .. })
        ));
        assert!(matches!(
            Specification::numeric(spec),
            Err(CannotProcessSpecification::MismatchedType { .. })
        ));

        let count = SchemaSpec {
            field_name: "count".to_string(),
            schema: Schema::of_type(Type::Integer),
            encoding: Encoding::default(),
        };
        assert!(Specification::numeric(count.clone()).is_ok());
        assert!(matches!(
            Specification::numeric(SchemaSpec {
                schema: Schema::of_type(Type::Number),
                ..count
            }),
            Ok(Specification::Numeric(_))
        ));
    }

    #[test]
    fn test_encoding() {
        assert!(Encoding::string(Style::Form, true).explode());
        assert!(!Encoding::default().explode());
        let nested = Encoding::string(Style::Matrix, true).with_from_array(true).nested();
        assert_eq!(
            nested,
            Encoding {
                from_string: true,
                ..Encoding::default()
            }
        );
    }
}
