//! Binding of templated URL paths such as `/pets/{petId}`.

use indexmap::IndexMap;
use regex::Regex;

use crate::error::CannotProcessOpenApi;

/// A concrete path did not match a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("path '{path}' does not match '{template}'")]
pub struct PathMismatch {
    pub path: String,
    pub template: String,
}

/// Matches concrete paths against a path template and binds its placeholders.
///
/// Each `{name}` placeholder matches exactly one non-empty path segment. The
/// bound values are returned raw, without percent-decoding, so that the
/// parameter's style decoder sees them as they were sent.
///
/// # Example
///
/// ```rust
/// use sluice::PathMatcher;
///
/// let matcher = PathMatcher::new("/pets/{petId}").unwrap();
/// let params = matcher.path_params("/pets/Harley").unwrap();
/// assert_eq!(params["petId"], "Harley");
///
/// assert!(matcher.path_params("/pets").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PathMatcher {
    template: String,
    base_path: String,
    names: Vec<String>,
    pattern: Regex,
}

impl PathMatcher {
    /// Creates a matcher with no base path.
    pub fn new(template: &str) -> Result<Self, CannotProcessOpenApi> {
        Self::with_base_path("", template)
    }

    /// Creates a matcher that expects `base_path` in front of `template`.
    ///
    /// A trailing `/` on the base path is ignored, so `/v1/` and `/v1` are
    /// equivalent.
    pub fn with_base_path(base_path: &str, template: &str) -> Result<Self, CannotProcessOpenApi> {
        let invalid = |reason: &str| CannotProcessOpenApi::InvalidPathTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        if !template.starts_with('/') {
            return Err(invalid("template must start with '/'"));
        }
        let base_path = base_path.trim_end_matches('/');
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return Err(invalid("base path must start with '/'"));
        }

        let mut source = String::from("^");
        source.push_str(&regex::escape(base_path));

        let mut names: Vec<String> = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find(['{', '}']) {
            if rest.as_bytes()[open] == b'}' {
                return Err(invalid("unbalanced '}'"));
            }
            source.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let name = &after[..close];
            if name.is_empty() || name.contains(['{', '/']) {
                return Err(invalid("placeholder names must be non-empty segments"));
            }
            if names.iter().any(|existing| existing == name) {
                return Err(invalid("placeholder names must be unique"));
            }
            names.push(name.to_string());
            source.push_str("([^/]+)");
            rest = &after[close + 1..];
        }
        source.push_str(&regex::escape(rest));
        source.push('$');

        let pattern = Regex::new(&source).map_err(|err| invalid(&err.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            base_path: base_path.to_string(),
            names,
            pattern,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Placeholder names in template order.
    pub fn parameter_names(&self) -> &[String] {
        &self.names
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// Binds every placeholder to the segment it matched in `path`.
    pub fn path_params(&self, path: &str) -> Result<IndexMap<String, String>, PathMismatch> {
        let captures = self.pattern.captures(path).ok_or_else(|| PathMismatch {
            path: path.to_string(),
            template: self.template.clone(),
        })?;

        Ok(self
            .names
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(name, capture)| {
                capture.map(|segment| (name.clone(), segment.as_str().to_string()))
            })
            .collect())
    }
}
