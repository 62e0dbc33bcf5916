use crate::chain::Step;
use crate::error::{BuildError, CannotProcessOpenApi};
use crate::filter::{Gather, HttpParameters, MatchPath};
use crate::path_matcher::PathMatcher;
use crate::processor::{BeforeSet, Field, FieldSet, Json, Processor, RequestProcessor};
use crate::specification::{Encoding, Location, Parameter, RequestBody, RequestSpec, Type};
use crate::style::Style;
use crate::validator::{Passes, RequiredFields};

use super::build_schema;
use super::parameter::{self, json_media};

const BODY: &str = "body";

/// A whole operation: one field set per parameter location plus the body.
///
/// The path is matched against the template first, the query string is
/// parsed, and each location then checks its required parameters before
/// processing the ones present.
pub(super) fn build(spec: &RequestSpec) -> Result<RequestProcessor, BuildError> {
    let matcher = PathMatcher::with_base_path(&spec.base_path, &spec.template)?;
    if let Some(missing) = spec
        .parameters_in(Location::Path)
        .find(|p| !matcher.parameter_names().iter().any(|name| *name == p.name))
    {
        return Err(CannotProcessOpenApi::MissingPathParameter {
            name: missing.name.clone(),
            template: spec.template.clone(),
        }
        .into());
    }

    let path = location(spec, Location::Path, vec![Step::filter(MatchPath::new(matcher))])?;
    let query = location(spec, Location::Query, vec![Step::filter(HttpParameters)])?;
    let header = location(spec, Location::Header, Vec::new())?;
    let cookie = location(spec, Location::Cookie, Vec::new())?;

    Ok(RequestProcessor::new()
        .with_operation(spec.method, spec.operation_id.clone())
        .with_part(path)
        .with_part(query)
        .with_part(header)
        .with_part(cookie)
        .with_part(body(spec.body.as_ref())?))
}

fn location(
    spec: &RequestSpec,
    location: Location,
    mut before: Vec<Step>,
) -> Result<FieldSet, BuildError> {
    before.extend(
        spec.parameters_in(location)
            .filter_map(spread_object)
            .map(Step::filter),
    );

    let required: Vec<String> = spec
        .parameters_in(location)
        .filter(|p| p.required)
        .map(|p| p.key())
        .collect();
    if !required.is_empty() {
        before.push(Step::validator(RequiredFields::new(required)));
    }

    let mut set = FieldSet::new(location.as_str());
    if !before.is_empty() {
        set = set.with_before(BeforeSet::new(before));
    }
    for p in spec.parameters_in(location) {
        set = set.field(parameter::build(p)?);
    }
    Ok(set)
}

/// An exploded form object sends its properties as separate query keys
/// (`?R=100&G=200`); they are gathered back under the parameter's name.
fn spread_object(parameter: &Parameter) -> Option<Gather> {
    let schema = parameter.schema.as_ref()?;
    let is_object = matches!(schema.single_type(), Ok(Some(Type::Object) | None));
    let spread = parameter.location == Location::Query
        && parameter.effective_style() == Style::Form
        && parameter.effective_explode();
    (spread && is_object && !schema.properties.is_empty())
        .then(|| Gather::new(parameter.key(), schema.properties.keys().cloned()))
}

/// The body is a JSON document. Without a declared schema anything
/// decodable is accepted; an optional body may also be empty.
fn body(body: Option<&RequestBody>) -> Result<Json, BuildError> {
    let passes = || Field::new(BODY, vec![Step::validator(Passes)]);

    let Some(body) = body.filter(|body| !body.content.is_empty()) else {
        return Ok(Json::new(passes()));
    };

    let media = json_media(&body.content)?;
    let inner: Box<dyn Processor> = match &media.schema {
        Some(schema) => build_schema(BODY, schema, Encoding::default())?,
        None => Box::new(passes()),
    };
    let json = Json::new(inner);
    Ok(if body.required { json } else { json.optional() })
}
