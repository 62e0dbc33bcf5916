//! Operation registry for built request processors.
//!
//! This module provides the [`ProcessorRegistry`] type that stores the
//! processor built for each operation and routes raw requests to them.

use indexmap::IndexMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

use crate::builder::build_request;
use crate::error::BuildError;
use crate::outcome::Outcome;
use crate::path_matcher::PathMatcher;
use crate::processor::{Method, RawRequest, RequestProcessor};
use crate::specification::RequestSpec;

/// One registered operation.
#[derive(Debug)]
pub struct RegisteredOperation {
    method: Method,
    matcher: PathMatcher,
    processor: RequestProcessor,
}

impl RegisteredOperation {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn processor(&self) -> &RequestProcessor {
        &self.processor
    }

    pub fn process(&self, request: &RawRequest) -> Outcome {
        self.processor.process_request(request)
    }
}

/// Type alias for the operation storage map.
type OperationMap = Arc<RwLock<IndexMap<String, Arc<RegisteredOperation>>>>;

/// A thread-safe registry of request processors.
///
/// Operations are registered under their operation id, or `"METHOD
/// template"` when they have none, and built once at registration.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can process requests concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use sluice::specification::{Location, Parameter, RequestSpec, Schema, Type};
/// use sluice::{Method, ProcessorRegistry, RawRequest};
/// use serde_json::json;
///
/// let registry = ProcessorRegistry::new();
/// registry
///     .register(
///         &RequestSpec::new(Method::Get, "/pets/{petId}")
///             .with_operation_id("showPetById")
///             .with_parameter(
///                 Parameter::new("petId", Location::Path)
///                     .with_schema(Schema::of_type(Type::Integer)),
///             ),
///     )
///     .unwrap();
///
/// let outcome = registry
///     .process_routed(&RawRequest::new(Method::Get, "/pets/42"))
///     .unwrap();
/// assert_eq!(outcome.value()["path"], json!({"petId": 42}));
/// ```
pub struct ProcessorRegistry {
    operations: OperationMap,
}

impl ProcessorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            operations: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Builds and registers the processor for an operation, returning the
    /// key it was registered under.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Build` if the processor cannot be built and
    /// `RegistryError::DuplicateOperation` if the key is already taken.
    pub fn register(&self, spec: &RequestSpec) -> Result<String, RegistryError> {
        let key = spec
            .operation_id
            .clone()
            .unwrap_or_else(|| format!("{} {}", spec.method.as_str().to_uppercase(), spec.template));

        if self.operations.read().contains_key(&key) {
            return Err(RegistryError::DuplicateOperation(key));
        }

        let operation = RegisteredOperation {
            method: spec.method,
            matcher: PathMatcher::with_base_path(&spec.base_path, &spec.template)
                .map_err(BuildError::from)?,
            processor: build_request(spec)?,
        };

        let mut operations = self.operations.write();
        if operations.contains_key(&key) {
            return Err(RegistryError::DuplicateOperation(key));
        }
        debug!(operation = %key, template = %spec.template, "registered operation");
        operations.insert(key.clone(), Arc::new(operation));
        Ok(key)
    }

    /// Retrieves an operation by key.
    pub fn get(&self, key: &str) -> Option<Arc<RegisteredOperation>> {
        self.operations.read().get(key).cloned()
    }

    /// Processes a request with the named operation.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::OperationNotFound` if the key is unknown.
    pub fn process(&self, key: &str, request: &RawRequest) -> Result<Outcome, RegistryError> {
        let operation = self
            .get(key)
            .ok_or_else(|| RegistryError::OperationNotFound(key.to_string()))?;
        Ok(operation.process(request))
    }

    /// Finds the operation for a method and concrete path.
    ///
    /// When several templates match, the one with the fewest parameters
    /// wins, so `/pets/mine` is preferred over `/pets/{petId}`.
    pub fn route(&self, method: Method, path: &str) -> Option<(String, Arc<RegisteredOperation>)> {
        let operations = self.operations.read();
        let found = operations
            .iter()
            .filter(|(_, operation)| operation.method == method && operation.matcher.matches(path))
            .min_by_key(|(_, operation)| operation.matcher.parameter_names().len())
            .map(|(key, operation)| (key.clone(), Arc::clone(operation)));
        debug!(
            method = %method,
            path,
            operation = found.as_ref().map(|(key, _)| key.as_str()),
            "routed request"
        );
        found
    }

    /// Routes a request by its method and path, then processes it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NoMatchingRoute` if no operation matches.
    pub fn process_routed(&self, request: &RawRequest) -> Result<Outcome, RegistryError> {
        let (_, operation) =
            self.route(request.method, &request.path)
                .ok_or_else(|| RegistryError::NoMatchingRoute {
                    method: request.method,
                    path: request.path.clone(),
                })?;
        Ok(operation.process(request))
    }

    /// Routes and processes many requests in parallel, keeping their order.
    pub fn process_all(&self, requests: &[RawRequest]) -> Vec<Result<Outcome, RegistryError>> {
        requests
            .par_iter()
            .map(|request| self.process_routed(request))
            .collect()
    }

    /// Registered operation keys, in registration order.
    pub fn keys(&self) -> Vec<String> {
        self.operations.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.operations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.read().is_empty()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ProcessorRegistry {
    fn clone(&self) -> Self {
        Self {
            operations: Arc::clone(&self.operations),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register an operation under a key that already exists.
    #[error("operation '{0}' already registered")]
    DuplicateOperation(String),

    /// Attempted to process with an operation key that doesn't exist.
    #[error("operation '{0}' not found")]
    OperationNotFound(String),

    /// No registered operation matches the request.
    #[error("no operation matches {method} {path}")]
    NoMatchingRoute { method: Method, path: String },

    /// The operation's processor could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
}
