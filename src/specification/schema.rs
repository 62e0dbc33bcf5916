//! The normalized schema object handed to the builders.
//!
//! Only the structural and type keywords the builders understand are read;
//! unknown keywords are ignored. `$ref` is not resolved here, so a schema
//! still holding one is rejected when it is built.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CannotProcessSpecification;

/// A JSON schema type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl Type {
    pub fn as_str(self) -> &'static str {
        match self {
            Type::String => "string",
            Type::Number => "number",
            Type::Integer => "integer",
            Type::Boolean => "boolean",
            Type::Array => "array",
            Type::Object => "object",
            Type::Null => "null",
        }
    }
}

/// The `type` keyword: one name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(Type),
    Many(Vec<Type>),
}

/// `additionalProperties`: a flag or a schema for the extra values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// `exclusiveMinimum` / `exclusiveMaximum`: a flag qualifying
/// `minimum`/`maximum` (OpenAPI 3.0) or a bound of its own (OpenAPI 3.1).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Limit(f64),
}

/// A schema fragment.
///
/// # Example
///
/// ```rust
/// use sluice::specification::{Schema, Type};
/// use serde_json::json;
///
/// let schema = Schema::from_value(json!({
///     "type": "object",
///     "required": ["id"],
///     "properties": {"id": {"type": "integer", "minimum": 1}}
/// }))
/// .unwrap();
///
/// assert_eq!(schema.single_type().unwrap(), Some(Type::Object));
/// assert_eq!(schema.properties["id"].minimum, Some(1.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    #[serde(rename = "type")]
    pub types: Option<TypeSet>,
    pub nullable: bool,
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<Value>>,

    pub required: Vec<String>,
    pub properties: IndexMap<String, Schema>,
    pub additional_properties: Option<AdditionalProperties>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,

    pub items: Option<Box<Schema>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,

    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<ExclusiveBound>,
    pub exclusive_maximum: Option<ExclusiveBound>,
    pub multiple_of: Option<f64>,

    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,

    pub one_of: Vec<Schema>,
    pub any_of: Vec<Schema>,
    pub all_of: Vec<Schema>,

    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

impl Schema {
    /// Reads a schema from JSON.
    pub fn from_value(value: Value) -> Result<Self, CannotProcessSpecification> {
        serde_json::from_value(value)
            .map_err(|err| CannotProcessSpecification::InvalidSchema(err.to_string()))
    }

    /// A schema declaring only a type.
    pub fn of_type(ty: Type) -> Self {
        Self {
            types: Some(TypeSet::Single(ty)),
            ..Self::default()
        }
    }

    /// The one concrete type this schema declares, if any.
    ///
    /// # Errors
    ///
    /// A list such as `["integer", "null"]` is rejected in favour of
    /// `nullable`, and a list naming several concrete types is rejected
    /// outright.
    pub fn single_type(&self) -> Result<Option<Type>, CannotProcessSpecification> {
        match &self.types {
            None => Ok(None),
            Some(TypeSet::Single(ty)) => Ok(Some(*ty)),
            Some(TypeSet::Many(types)) => {
                let mut distinct: Vec<Type> = Vec::with_capacity(types.len());
                for ty in types {
                    if !distinct.contains(ty) {
                        distinct.push(*ty);
                    }
                }
                let concrete: Vec<Type> = distinct
                    .iter()
                    .copied()
                    .filter(|ty| *ty != Type::Null)
                    .collect();
                match (concrete.len(), distinct.len()) {
                    (0, 0) => Ok(None),
                    (0, _) => Ok(Some(Type::Null)),
                    (1, 1) => Ok(Some(concrete[0])),
                    (1, _) => Err(CannotProcessSpecification::ArrayOfTypesUnsupported),
                    _ => Err(CannotProcessSpecification::MultipleTypesUnsupported(
                        concrete.iter().map(|ty| ty.as_str().to_string()).collect(),
                    )),
                }
            }
        }
    }

    pub fn is_composite(&self) -> bool {
        !(self.one_of.is_empty() && self.any_of.is_empty() && self.all_of.is_empty())
    }

    /// A copy without `oneOf`, `anyOf`, `allOf` and `nullable`.
    pub(crate) fn without_composition(&self) -> Self {
        Self {
            nullable: false,
            one_of: Vec::new(),
            any_of: Vec::new(),
            all_of: Vec::new(),
            ..self.clone()
        }
    }

    /// True when the schema constrains anything besides composition.
    pub(crate) fn has_own_constraints(&self) -> bool {
        self.without_composition() != Self::default()
    }
}

/// Checks that `types` names `expected`, and nothing else but `null`.
///
/// An absent `type` passes: the caller picked the variant from other
/// keywords.
///
/// # Errors
///
/// [`CannotProcessSpecification::MismatchedType`] when another type is
/// declared, [`CannotProcessSpecification::ArrayOfTypesUnsupported`] for
/// `[expected, "null"]` and
/// [`CannotProcessSpecification::MultipleTypesUnsupported`] for longer lists.
pub fn check_only_type_or_null(
    specification: &'static str,
    expected: Type,
    types: Option<&TypeSet>,
) -> Result<(), CannotProcessSpecification> {
    let mismatch = |actual: Type| CannotProcessSpecification::MismatchedType {
        specification,
        expected: expected.as_str().to_string(),
        actual: actual.as_str().to_string(),
    };

    match types {
        None => Ok(()),
        Some(TypeSet::Single(ty)) if *ty == expected => Ok(()),
        Some(TypeSet::Single(ty)) => Err(mismatch(*ty)),
        Some(TypeSet::Many(types)) => match types.as_slice() {
            [ty] if *ty == expected => Ok(()),
            [ty] => Err(mismatch(*ty)),
            [a, b] if types.contains(&Type::Null) && (*a == expected || *b == expected) => {
                Err(CannotProcessSpecification::ArrayOfTypesUnsupported)
            }
            _ => Err(CannotProcessSpecification::MultipleTypesUnsupported(
                types.iter().map(|ty| ty.as_str().to_string()).collect(),
            )),
        },
    }
}
