//! Errors raised while assembling a processor tree.
//!
//! These are fatal: a builder either returns a complete tree or one of these
//! errors, never a partial tree.

/// Any failure to build a processor tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The schema uses a shape the builders cannot express.
    #[error(transparent)]
    Specification(#[from] CannotProcessSpecification),

    /// The operation description cannot be processed.
    #[error(transparent)]
    OpenApi(#[from] CannotProcessOpenApi),

    /// A processor was assembled with conflicting children.
    #[error(transparent)]
    ProcessorArguments(#[from] InvalidProcessorArguments),
}

/// A schema or specification is structurally unsupported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CannotProcessSpecification {
    /// A specification variant was built from a schema of another type.
    #[error("{specification} expects type '{expected}', '{actual}' given")]
    MismatchedType {
        specification: &'static str,
        expected: String,
        actual: String,
    },

    /// `type` was given as an array such as `["integer", "null"]`.
    #[error("arrays of types are not supported, declare a single type and use `nullable` instead")]
    ArrayOfTypesUnsupported,

    /// `type` lists more than one concrete type.
    #[error("multiple types are not supported: {}", .0.join(", "))]
    MultipleTypesUnsupported(Vec<String>),

    /// The serialization style cannot encode the schema's shape.
    #[error("style '{style}' cannot be used for {shape} values")]
    UnsupportedStyle { style: String, shape: String },

    /// The schema JSON could not be read.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A `pattern` keyword is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// An operation description cannot be turned into a request processor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CannotProcessOpenApi {
    /// Only `application/json` content is supported.
    #[error("unsupported media types: {}, only application/json is supported", .0.join(", "))]
    UnsupportedMediaTypes(Vec<String>),

    /// A path template could not be parsed.
    #[error("invalid path template '{template}': {reason}")]
    InvalidPathTemplate { template: String, reason: String },

    /// A `path` parameter has no placeholder in the template.
    #[error("path parameter '{name}' does not appear in '{template}'")]
    MissingPathParameter { name: String, template: String },

    /// A parameter lacks both `schema` and `content`.
    #[error("parameter '{0}' must define either a schema or content")]
    MissingParameterSchema(String),
}

/// A field set was given more than one instance of a single-slot child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidProcessorArguments {
    #[error("FieldSet cannot have more than one BeforeSet")]
    MultipleBeforeSets,

    #[error("FieldSet cannot have more than one AfterSet")]
    MultipleAfterSets,

    #[error("FieldSet cannot have more than one DefaultProcessor")]
    MultipleDefaultProcessors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_display() {
        let error: BuildError = CannotProcessSpecification::MismatchedType {
            specification: "Numeric",
            expected: "integer".to_string(),
            actual: "string".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Numeric expects type 'integer', 'string' given"
        );

        let error: BuildError =
            CannotProcessOpenApi::UnsupportedMediaTypes(vec!["text/plain".to_string()]).into();
        assert!(error.to_string().contains("text/plain"));

        let error: BuildError = InvalidProcessorArguments::MultipleAfterSets.into();
        assert_eq!(error.to_string(), "FieldSet cannot have more than one AfterSet");
    }
}
