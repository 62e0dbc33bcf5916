use crate::error::BuildError;
use crate::processor::{AllOf, AnyOf, OneOf, Processor};
use crate::specification::{Schema, SchemaSpec};

use super::build_schema;

/// `oneOf`, `anyOf` and `allOf`.
///
/// Constraints declared next to the combinator, such as a `type`, become an
/// extra branch that must also accept the value. Several combinators on one
/// schema must all accept it.
pub(super) fn build(spec: &SchemaSpec) -> Result<Box<dyn Processor>, BuildError> {
    let name = spec.field_name.as_str();
    let schema = &spec.schema;
    let branches = |schemas: &[Schema]| -> Result<Vec<Box<dyn Processor>>, BuildError> {
        schemas
            .iter()
            .map(|branch| build_schema(name, branch, spec.encoding))
            .collect()
    };

    let mut parts: Vec<Box<dyn Processor>> = Vec::new();
    if schema.has_own_constraints() {
        parts.push(build_schema(name, &schema.without_composition(), spec.encoding)?);
    }
    if !schema.all_of.is_empty() {
        parts.push(Box::new(AllOf::new(name, branches(&schema.all_of)?)));
    }
    if !schema.any_of.is_empty() {
        parts.push(Box::new(AnyOf::new(name, branches(&schema.any_of)?)));
    }
    if !schema.one_of.is_empty() {
        parts.push(Box::new(OneOf::new(name, branches(&schema.one_of)?)));
    }

    match parts.len() {
        1 => Ok(parts.remove(0)),
        _ => Ok(Box::new(AllOf::new(name, parts))),
    }
}
