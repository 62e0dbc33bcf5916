//! Builders for single-field schemas.

use crate::chain::Step;
use crate::error::BuildError;
use crate::filter::{ToBool, ToInt, ToNumber};
use crate::processor::Field;
use crate::specification::{check_only_type_or_null, ExclusiveBound, Schema, SchemaSpec, Type};
use crate::style::Shape;
use crate::validator::{
    Contained, IsBool, IsInt, IsNumber, IsString, Length, Maximum, Minimum, MultipleOf, Passes,
    Pattern,
};

use super::decoding_steps;

/// `integer` and `number` schemas.
pub(super) fn numeric(spec: &SchemaSpec) -> Result<Field, BuildError> {
    let integer = matches!(spec.schema.single_type()?, Some(Type::Integer));
    let expected = if integer { Type::Integer } else { Type::Number };
    check_only_type_or_null("Numeric", expected, spec.schema.types.as_ref())?;

    let mut steps = decoding_steps(&spec.encoding, Shape::Primitive)?;
    if spec.encoding.from_string {
        steps.push(if integer {
            Step::filter(ToInt)
        } else {
            Step::filter(ToNumber)
        });
    }
    steps.push(if integer {
        Step::validator(IsInt)
    } else {
        Step::validator(IsNumber)
    });
    steps.extend(enumeration(&spec.schema));
    steps.extend(bounds(&spec.schema));
    if let Some(factor) = spec.schema.multiple_of {
        steps.push(Step::validator(MultipleOf::new(factor)));
    }

    Ok(Field::new(&spec.field_name, steps))
}

pub(super) fn strings(spec: &SchemaSpec) -> Result<Field, BuildError> {
    check_only_type_or_null("Strings", Type::String, spec.schema.types.as_ref())?;
    let schema = &spec.schema;

    let mut steps = decoding_steps(&spec.encoding, Shape::Primitive)?;
    steps.push(Step::validator(IsString));
    steps.extend(enumeration(schema));
    if schema.min_length.is_some() || schema.max_length.is_some() {
        steps.push(Step::validator(Length::new(
            schema.min_length.unwrap_or(0),
            schema.max_length,
        )));
    }
    if let Some(pattern) = &schema.pattern {
        steps.push(Step::validator(Pattern::new(pattern)?));
    }

    Ok(Field::new(&spec.field_name, steps))
}

pub(super) fn true_false(spec: &SchemaSpec) -> Result<Field, BuildError> {
    check_only_type_or_null("TrueFalse", Type::Boolean, spec.schema.types.as_ref())?;

    let mut steps = decoding_steps(&spec.encoding, Shape::Primitive)?;
    if spec.encoding.from_string {
        steps.push(Step::filter(ToBool));
    }
    steps.push(Step::validator(IsBool));
    steps.extend(enumeration(&spec.schema));

    Ok(Field::new(&spec.field_name, steps))
}

/// Schemas without a type. Only `enum` is checked; with nothing to check
/// the field simply passes.
pub(super) fn any(spec: &SchemaSpec) -> Field {
    let mut steps: Vec<Step> = enumeration(&spec.schema).into_iter().collect();
    if steps.is_empty() {
        steps.push(Step::validator(Passes));
    }
    Field::new(&spec.field_name, steps)
}

pub(super) fn enumeration(schema: &Schema) -> Option<Step> {
    schema
        .enumeration
        .as_ref()
        .map(|allowed| Step::validator(Contained::new(allowed.clone())))
}

/// `minimum`/`maximum` with both the flag and the numeric form of their
/// exclusive counterparts.
fn bounds(schema: &Schema) -> Vec<Step> {
    let mut steps = Vec::new();

    match (schema.minimum, schema.exclusive_minimum) {
        (Some(limit), Some(ExclusiveBound::Flag(true))) => {
            steps.push(Step::validator(Minimum::exclusive(limit)))
        }
        (Some(limit), _) => steps.push(Step::validator(Minimum::inclusive(limit))),
        (None, _) => {}
    }
    if let Some(ExclusiveBound::Limit(limit)) = schema.exclusive_minimum {
        steps.push(Step::validator(Minimum::exclusive(limit)));
    }

    match (schema.maximum, schema.exclusive_maximum) {
        (Some(limit), Some(ExclusiveBound::Flag(true))) => {
            steps.push(Step::validator(Maximum::exclusive(limit)))
        }
        (Some(limit), _) => steps.push(Step::validator(Maximum::inclusive(limit))),
        (None, _) => {}
    }
    if let Some(ExclusiveBound::Limit(limit)) = schema.exclusive_maximum {
        steps.push(Step::validator(Maximum::exclusive(limit)));
    }

    steps
}
