//! # Sluice
//!
//! Schema-driven filtering and validation of HTTP requests that accumulates
//! ALL errors instead of stopping at the first one.
//!
//! ## Overview
//!
//! An operation description (path template, parameters, request body) is
//! turned once into an immutable tree of processors. Each raw request is then
//! run through the tree: path, query, header, cookie and body values are
//! decoded from their serialization style, coerced to the declared types and
//! validated. The result is either the fully coerced request or every problem
//! found, each tagged with the path of the offending value.
//!
//! ## Core Types
//!
//! - [`FieldPath`]: Path to a value in the request (e.g., `query.tags[1]`)
//! - [`Message`] / [`MessageSet`]: Path-tagged errors, in discovery order
//! - [`Outcome`]: The result of running any part of the tree
//! - [`Processor`]: A node of the tree; see [`processor`] for the kinds
//! - [`Specification`](specification::Specification): What to build
//! - [`ProcessorRegistry`]: Built operations, routed by method and path
//!
//! ## Example
//!
//! ```rust
//! use sluice::builder::build_request;
//! use sluice::specification::{Location, Parameter, RequestSpec, Schema, Type};
//! use sluice::style::Style;
//! use sluice::{Method, RawRequest};
//! use serde_json::json;
//!
//! let list_pets = RequestSpec::new(Method::Get, "/pets")
//!     .with_parameter(
//!         Parameter::new("limit", Location::Query).with_schema(Schema {
//!             maximum: Some(100.0),
//!             ..Schema::of_type(Type::Integer)
//!         }),
//!     )
//!     .with_parameter(
//!         Parameter::new("tags", Location::Query)
//!             .with_schema(Schema {
//!                 items: Some(Box::new(Schema::of_type(Type::String))),
//!                 ..Schema::of_type(Type::Array)
//!             })
//!             .with_style(Style::Form, false),
//!     );
//!
//! let processor = build_request(&list_pets).unwrap();
//!
//! let outcome = processor
//!     .process_request(&RawRequest::new(Method::Get, "/pets").with_query("limit=5&tags=cat,tabby"));
//! assert!(outcome.is_valid());
//! assert_eq!(outcome.value()["query"], json!({"limit": 5, "tags": ["cat", "tabby"]}));
//!
//! let outcome = processor
//!     .process_request(&RawRequest::new(Method::Get, "/pets").with_query("limit=five"));
//! assert!(!outcome.is_valid());
//! for message in outcome.messages().unwrap().iter() {
//!     assert_eq!(message.path.to_string(), "query.limit");
//! }
//! ```

pub mod builder;
pub mod chain;
pub mod error;
pub mod filter;
pub mod outcome;
pub mod path;
pub mod path_matcher;
pub mod processor;
pub mod registry;
pub mod specification;
pub mod style;
pub mod validator;

pub use error::{
    BuildError, CannotProcessOpenApi, CannotProcessSpecification, InvalidProcessorArguments,
    Message, MessageSet,
};
pub use outcome::{Outcome, Status};
pub use path::{FieldPath, PathSegment};
pub use path_matcher::{PathMatcher, PathMismatch};
pub use processor::{Method, Processor, RawRequest, RequestProcessor};
pub use registry::{ProcessorRegistry, RegisteredOperation, RegistryError};
