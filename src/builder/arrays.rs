use crate::chain::Step;
use crate::error::BuildError;
use crate::processor::{BeforeSet, Collection};
use crate::specification::{check_only_type_or_null, SchemaSpec, Type};
use crate::style::Shape;
use crate::validator::{Count, IsList, Unique};

use super::scalars::enumeration;
use super::{build_schema, decoding_steps};

/// `array` schemas. Items are processed by the `items` schema, if any.
pub(super) fn build(spec: &SchemaSpec) -> Result<Collection, BuildError> {
    check_only_type_or_null("Arrays", Type::Array, spec.schema.types.as_ref())?;
    let schema = &spec.schema;

    let mut before = decoding_steps(&spec.encoding, Shape::Array)?;
    before.push(Step::validator(IsList));
    before.extend(enumeration(schema));
    if schema.min_items.is_some() || schema.max_items.is_some() {
        before.push(Step::validator(Count::new(
            schema.min_items.unwrap_or(0),
            schema.max_items,
        )));
    }
    if schema.unique_items {
        before.push(Step::validator(Unique));
    }

    let mut collection =
        Collection::new(&spec.field_name).with_before(BeforeSet::new(before));
    if let Some(items) = &schema.items {
        collection = collection.with_each(build_schema("", items, spec.encoding.nested())?);
    }
    Ok(collection)
}
