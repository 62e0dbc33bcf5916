//! Operation descriptions: parameters, request bodies and path items.
//!
//! These mirror the OpenAPI objects of the same names closely enough to be
//! deserialized from a resolved document, but only keep what request
//! processing needs.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

use crate::processor::Method;
use crate::specification::Schema;
use crate::style::Style;

/// Where a parameter is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Path,
    Query,
    Header,
    Cookie,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Path,
        Location::Query,
        Location::Header,
        Location::Cookie,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::Path => "path",
            Location::Query => "query",
            Location::Header => "header",
            Location::Cookie => "cookie",
        }
    }

    /// `simple` for path and header parameters, `form` otherwise.
    pub fn default_style(self) -> Style {
        match self {
            Location::Path | Location::Header => Style::Simple,
            Location::Query | Location::Cookie => Style::Form,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media type entry of a `content` map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// One operation parameter.
///
/// # Example
///
/// ```rust
/// use sluice::specification::{Location, Parameter, Schema, Type};
/// use sluice::style::Style;
///
/// let tags = Parameter::new("tags", Location::Query)
///     .with_schema(Schema {
///         items: Some(Box::new(Schema::of_type(Type::String))),
///         ..Schema::of_type(Type::Array)
///     })
///     .with_style(Style::Form, false);
///
/// assert_eq!(tags.effective_style(), Style::Form);
/// assert!(!tags.effective_explode());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: Location,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub style: Option<Style>,
    #[serde(default)]
    pub explode: Option<bool>,
    #[serde(default)]
    pub schema: Option<Schema>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl Parameter {
    /// A parameter with no schema. Path parameters are always required.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            required: location == Location::Path,
            style: None,
            explode: None,
            schema: None,
            content: IndexMap::new(),
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_content(mut self, media_type: impl Into<String>, schema: Schema) -> Self {
        self.content.insert(
            media_type.into(),
            MediaType {
                schema: Some(schema),
            },
        );
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_style(mut self, style: Style, explode: bool) -> Self {
        self.style = Some(style);
        self.explode = Some(explode);
        self
    }

    pub fn effective_style(&self) -> Style {
        self.style.unwrap_or_else(|| self.location.default_style())
    }

    pub fn effective_explode(&self) -> bool {
        self.explode
            .unwrap_or_else(|| self.effective_style().default_explode())
    }

    /// The key this parameter is found under in its location's mapping.
    /// Header names are case-insensitive and looked up lowercased.
    pub fn key(&self) -> String {
        match self.location {
            Location::Header => self.name.to_ascii_lowercase(),
            _ => self.name.clone(),
        }
    }

    fn same_slot(&self, other: &Parameter) -> bool {
        self.location == other.location && self.key() == other.key()
    }
}

/// A request body description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    /// An `application/json` body.
    pub fn json(schema: Schema) -> Self {
        let mut content = IndexMap::new();
        content.insert(
            "application/json".to_string(),
            MediaType {
                schema: Some(schema),
            },
        );
        Self {
            required: false,
            content,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// An operation on a path item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    pub operation_id: Option<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
}

/// The operations available on one path template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathItem {
    pub parameters: Vec<Parameter>,
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
}

impl PathItem {
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Trace => self.trace.as_ref(),
        }
    }
}

/// Everything needed to build the processor for one operation.
///
/// # Example
///
/// ```rust
/// use sluice::specification::{Location, Parameter, RequestSpec, Schema, Type};
/// use sluice::Method;
///
/// let spec = RequestSpec::new(Method::Get, "/pets/{petId}")
///     .with_operation_id("showPetById")
///     .with_server_url("http://petstore.swagger.io/v1")
///     .unwrap()
///     .with_parameter(
///         Parameter::new("petId", Location::Path).with_schema(Schema::of_type(Type::String)),
///     );
///
/// assert_eq!(spec.base_path, "/v1");
/// assert_eq!(spec.parameters_in(Location::Path).count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub template: String,
    pub base_path: String,
    pub operation_id: Option<String>,
    pub parameters: Vec<Parameter>,
    pub body: Option<RequestBody>,
}

impl RequestSpec {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            base_path: String::new(),
            operation_id: None,
            parameters: Vec::new(),
            body: None,
        }
    }

    /// The spec for `method` on `path_item`, or `None` if the path item has
    /// no such operation.
    ///
    /// Path-item parameters apply to every operation; an operation
    /// parameter with the same name and location replaces one.
    pub fn from_path_item(template: impl Into<String>, path_item: &PathItem, method: Method) -> Option<Self> {
        let operation = path_item.operation(method)?;
        let mut spec = Self::new(method, template);
        spec.operation_id = operation.operation_id.clone();
        spec.body = operation.request_body.clone();
        for parameter in path_item.parameters.iter().chain(&operation.parameters) {
            spec = spec.with_parameter(parameter.clone());
        }
        Some(spec)
    }

    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Sets the prefix every request path carries before the template.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the base path to the path of a server URL.
    pub fn with_server_url(self, server_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(server_url)?;
        let base_path = url.path().trim_end_matches('/').to_string();
        Ok(self.with_base_path(base_path))
    }

    /// Adds a parameter, replacing one with the same name and location.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        match self.parameters.iter_mut().find(|p| p.same_slot(&parameter)) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn parameters_in(&self, location: Location) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |parameter| parameter.location == location)
    }
}
