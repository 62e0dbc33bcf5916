use indexmap::IndexMap;

use crate::error::{BuildError, CannotProcessOpenApi};
use crate::processor::{Json, Processor};
use crate::specification::{Encoding, Location, MediaType, Parameter, Specification};

use super::build_schema;

pub(super) const JSON_MEDIA_TYPE: &str = "application/json";

/// One parameter, labelled with the key it is found under.
///
/// A `schema` parameter is decoded according to its style; a `content`
/// parameter carries a JSON document.
pub(super) fn build(parameter: &Parameter) -> Result<Box<dyn Processor>, BuildError> {
    let key = parameter.key();

    if !parameter.content.is_empty() {
        let media = json_media(&parameter.content)?;
        let schema = media.schema.clone().unwrap_or_default();
        let inner = super::build(&Specification::from_schema(key, schema, Encoding::default())?)?;
        let json = Json::new(inner);
        return Ok(Box::new(if parameter.location == Location::Header {
            json.joining(",")
        } else {
            json
        }));
    }

    let schema = parameter
        .schema
        .as_ref()
        .ok_or_else(|| CannotProcessOpenApi::MissingParameterSchema(parameter.name.clone()))?;
    let encoding = Encoding::string(parameter.effective_style(), parameter.effective_explode())
        .with_from_array(parameter.location == Location::Header);
    build_schema(&key, schema, encoding)
}

/// The `application/json` entry of a content map.
pub(super) fn json_media(
    content: &IndexMap<String, MediaType>,
) -> Result<&MediaType, CannotProcessOpenApi> {
    content.get(JSON_MEDIA_TYPE).ok_or_else(|| {
        CannotProcessOpenApi::UnsupportedMediaTypes(content.keys().cloned().collect())
    })
}
