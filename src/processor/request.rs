use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::error::Message;
use crate::outcome::{type_name, Outcome};
use crate::path::FieldPath;
use crate::processor::Processor;

/// An HTTP method an operation can be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Put => "put",
            Method::Post => "post",
            Method::Delete => "delete",
            Method::Options => "options",
            Method::Head => "head",
            Method::Patch => "patch",
            Method::Trace => "trace",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown HTTP method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "put" => Ok(Method::Put),
            "post" => Ok(Method::Post),
            "delete" => Ok(Method::Delete),
            "options" => Ok(Method::Options),
            "head" => Ok(Method::Head),
            "patch" => Ok(Method::Patch),
            "trace" => Ok(Method::Trace),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// The raw parts of an HTTP request, as a framework adapter would hand them
/// over.
///
/// Header names are stored lowercased. A `cookie` header is also split into
/// individual cookies.
///
/// # Example
///
/// ```rust
/// use sluice::{Method, RawRequest};
/// use serde_json::json;
///
/// let request = RawRequest::from_url(Method::Get, "http://petstore.io/pets?limit=5")
///     .unwrap()
///     .with_header("X-Trace", "abc");
///
/// assert_eq!(
///     request.to_value(),
///     json!({
///         "path": "/pets",
///         "query": "limit=5",
///         "header": {"x-trace": ["abc"]},
///         "cookie": {},
///         "body": "",
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub headers: IndexMap<String, Vec<String>>,
    pub cookies: IndexMap<String, String>,
    pub body: String,
}

impl RawRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            headers: IndexMap::new(),
            cookies: IndexMap::new(),
            body: String::new(),
        }
    }

    /// Takes the path and query string from an absolute URL.
    pub fn from_url(method: Method, url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url)?;
        Ok(Self::new(method, url.path()).with_query(url.query().unwrap_or_default()))
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Appends a header value. Repeated headers keep every value in order.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if name == "cookie" {
            for pair in value.split(';') {
                if let Some((key, cookie)) = pair.trim().split_once('=') {
                    self.cookies.insert(key.to_string(), cookie.to_string());
                }
            }
        }
        self.headers.entry(name).or_default().push(value);
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// The mapping a [`RequestProcessor`] takes as input.
    pub fn to_value(&self) -> Value {
        json!({
            "path": self.path,
            "query": self.query,
            "header": self.headers,
            "cookie": self.cookies,
            "body": self.body,
        })
    }
}

/// The parts of a request a [`RequestProcessor`] fills in when absent.
fn defaults() -> [(&'static str, Value); 5] {
    [
        ("path", Value::String(String::new())),
        ("query", Value::String(String::new())),
        ("header", Value::Object(Map::new())),
        ("cookie", Value::Object(Map::new())),
        ("body", Value::String(String::new())),
    ]
}

/// Routes each part of a request to the processor built for it.
///
/// Input is a mapping with `path`, `query`, `header`, `cookie` and `body`
/// keys; missing keys default to an empty string or mapping. Each part's
/// processor should be labelled with the part's name so messages read
/// `query.limit` or `body.name`. When the operation is known its method and
/// id are written under `request` in the output.
#[derive(Debug, Default)]
pub struct RequestProcessor {
    operation: Option<(Method, Option<String>)>,
    parts: Vec<Box<dyn Processor>>,
}

impl RequestProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, method: Method, operation_id: Option<String>) -> Self {
        self.operation = Some((method, operation_id));
        self
    }

    /// Adds the processor for one part. The part is chosen by the
    /// processor's label.
    pub fn with_part(mut self, processor: impl Processor + 'static) -> Self {
        self.parts.push(Box::new(processor));
        self
    }

    /// Processes a raw request.
    pub fn process_request(&self, request: &RawRequest) -> Outcome {
        self.process(&FieldPath::root(), request.to_value())
    }
}

impl Processor for RequestProcessor {
    fn processes(&self) -> &str {
        ""
    }

    fn process(&self, parent: &FieldPath, value: Value) -> Outcome {
        let mut request = match value {
            Value::Object(map) => map,
            other => {
                let given = type_name(&other);
                return Outcome::fail(
                    other,
                    Message::new(
                        parent.clone(),
                        format!("Request processor expects an object, {} passed", given),
                    )
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };
        for (part, default) in defaults() {
            request.entry(part).or_insert(default);
        }

        let mut acc = Outcome::valid(Value::Null);
        for processor in &self.parts {
            if let Some(slot) = request.get_mut(processor.processes()) {
                let mut produced = processor.process(parent, slot.take());
                *slot = produced.value_mut().take();
                acc = acc.absorb(produced);
            }
        }

        if let Some((method, operation_id)) = &self.operation {
            request.insert(
                "request".to_string(),
                json!({"method": method.as_str(), "operationId": operation_id}),
            );
        }
        acc.with_value(Value::Object(request))
    }
}
