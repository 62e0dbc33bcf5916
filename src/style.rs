//! Decoders for OpenAPI parameter serialization styles.
//!
//! A parameter sent in a path, query, header or cookie arrives as a flat
//! string. Its `style` and `explode` settings say how a list or mapping was
//! flattened into that string; [`decode`] reverses it. Decoded items are
//! always strings: coercing them to the declared item type is left to the
//! processors built for the items.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::chain::Filter;
use crate::error::{CannotProcessSpecification, Message};
use crate::outcome::{type_name, Outcome};

/// An OpenAPI serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Style {
    Matrix,
    Label,
    Simple,
    Form,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

impl Style {
    /// `explode` defaults to true for `form` and false for every other style.
    pub fn default_explode(self) -> bool {
        matches!(self, Style::Form)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Matrix => "matrix",
            Style::Label => "label",
            Style::Simple => "simple",
            Style::Form => "form",
            Style::SpaceDelimited => "spaceDelimited",
            Style::PipeDelimited => "pipeDelimited",
            Style::DeepObject => "deepObject",
        }
    }

    fn supports(self, shape: Shape) -> bool {
        match self {
            Style::Matrix | Style::Label | Style::Simple | Style::Form => true,
            Style::SpaceDelimited | Style::PipeDelimited => shape != Shape::Primitive,
            Style::DeepObject => shape == Shape::Object,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown style name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style '{0}'")]
pub struct UnknownStyle(pub String);

impl FromStr for Style {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matrix" => Ok(Style::Matrix),
            "label" => Ok(Style::Label),
            "simple" => Ok(Style::Simple),
            "form" => Ok(Style::Form),
            "spaceDelimited" => Ok(Style::SpaceDelimited),
            "pipeDelimited" => Ok(Style::PipeDelimited),
            "deepObject" => Ok(Style::DeepObject),
            other => Err(UnknownStyle(other.to_string())),
        }
    }
}

/// What a style-encoded string decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Primitive,
    Array,
    Object,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Primitive => "primitive",
            Shape::Array => "array",
            Shape::Object => "object",
        })
    }
}

/// A string that does not follow its style's grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("{style} style values must start with '{prefix}'")]
    MissingPrefix { style: Style, prefix: char },

    #[error("{style} style objects need key/value pairs, {count} values given")]
    UnpairedValues { style: Style, count: usize },

    #[error("'{token}' is not a key=value pair")]
    MissingKeyValue { token: String },

    #[error("'{token}' is not a name[key]=value pair")]
    MissingBrackets { token: String },

    #[error("{style} style cannot decode {shape} values")]
    Unsupported { style: Style, shape: Shape },
}

/// Decodes `raw` according to a style.
///
/// # Example
///
/// ```rust
/// use sluice::style::{decode, Shape, Style};
/// use serde_json::json;
///
/// let color = decode(Style::Matrix, Shape::Object, true, ";R=100;G=200;B=150").unwrap();
/// assert_eq!(color, json!({"R": "100", "G": "200", "B": "150"}));
///
/// let ids = decode(Style::Simple, Shape::Array, false, "100,200,150").unwrap();
/// assert_eq!(ids, json!(["100", "200", "150"]));
/// ```
pub fn decode(style: Style, shape: Shape, explode: bool, raw: &str) -> Result<Value, StyleError> {
    if !style.supports(shape) {
        return Err(StyleError::Unsupported { style, shape });
    }

    match style {
        Style::Simple => split_shape(style, shape, explode, raw, ','),
        Style::Label => {
            let body = strip_prefix(style, raw, '.')?;
            let delimiter = if explode { '.' } else { ',' };
            split_shape(style, shape, explode, body, delimiter)
        }
        Style::Matrix => decode_matrix(shape, explode, strip_prefix(style, raw, ';')?),
        Style::Form => match (shape, explode) {
            (Shape::Array, true) => Ok(Value::Array(vec![Value::String(raw.to_string())])),
            (Shape::Object, true) => pairs(raw.split('&').filter(|t| !t.is_empty())),
            _ => split_shape(style, shape, false, raw, ','),
        },
        Style::SpaceDelimited => split_shape(style, shape, false, raw, ' '),
        Style::PipeDelimited => split_shape(style, shape, false, raw, '|'),
        Style::DeepObject => decode_deep_object(raw),
    }
}

fn strip_prefix(style: Style, raw: &str, prefix: char) -> Result<&str, StyleError> {
    if raw.is_empty() {
        return Ok(raw);
    }
    raw.strip_prefix(prefix)
        .ok_or(StyleError::MissingPrefix { style, prefix })
}

/// Splits on one delimiter. Exploded objects are `key=value` tokens, other
/// objects alternate keys and values.
fn split_shape(
    style: Style,
    shape: Shape,
    explode: bool,
    body: &str,
    delimiter: char,
) -> Result<Value, StyleError> {
    match shape {
        Shape::Primitive => Ok(Value::String(body.to_string())),
        Shape::Array => Ok(Value::Array(
            tokens(body, delimiter)
                .map(|t| Value::String(t.to_string()))
                .collect(),
        )),
        Shape::Object if explode => pairs(tokens(body, delimiter)),
        Shape::Object => alternating(style, tokens(body, delimiter).collect()),
    }
}

/// `;name=value` for primitives, `;name=a,b` or `;name=a;name=b` for arrays,
/// `;name=k,v` or `;k=v` for objects.
fn decode_matrix(shape: Shape, explode: bool, body: &str) -> Result<Value, StyleError> {
    let after_name = |token: &str| token.split_once('=').map_or("", |(_, v)| v).to_string();

    match (shape, explode) {
        (Shape::Primitive, _) => Ok(Value::String(after_name(body))),
        (Shape::Array, true) => Ok(Value::Array(
            tokens(body, ';')
                .map(|t| Value::String(after_name(t)))
                .collect(),
        )),
        (Shape::Object, true) => pairs(tokens(body, ';')),
        (_, false) => {
            let values = after_name(body);
            split_shape(Style::Matrix, shape, false, &values, ',')
        }
    }
}

/// `name[key]=value` pairs joined with `&`; the keys become the mapping.
fn decode_deep_object(raw: &str) -> Result<Value, StyleError> {
    let mut map = Map::new();
    for token in tokens(raw, '&') {
        let (name, value) = token
            .split_once('=')
            .ok_or_else(|| StyleError::MissingKeyValue {
                token: token.to_string(),
            })?;
        let key = name
            .split_once('[')
            .filter(|(prefix, _)| !prefix.is_empty())
            .and_then(|(_, rest)| rest.strip_suffix(']'))
            .filter(|key| !key.is_empty() && !key.contains(['[', ']']))
            .ok_or_else(|| StyleError::MissingBrackets {
                token: token.to_string(),
            })?;
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(Value::Object(map))
}

fn tokens(body: &str, delimiter: char) -> impl Iterator<Item = &str> {
    body.split(delimiter).filter(|t| !t.is_empty())
}

fn pairs<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Value, StyleError> {
    let mut map = Map::new();
    for token in tokens {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| StyleError::MissingKeyValue {
                token: token.to_string(),
            })?;
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(Value::Object(map))
}

fn alternating(style: Style, tokens: Vec<&str>) -> Result<Value, StyleError> {
    if tokens.len() % 2 != 0 {
        return Err(StyleError::UnpairedValues {
            style,
            count: tokens.len(),
        });
    }
    Ok(Value::Object(
        tokens
            .chunks(2)
            .map(|pair| (pair[0].to_string(), Value::String(pair[1].to_string())))
            .collect(),
    ))
}

/// Filter applying [`decode`] to string input.
///
/// Input that already has the target shape passes through unchanged: a query
/// parameter repeated in the URL is a list before any style applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatStyle {
    style: Style,
    shape: Shape,
    explode: bool,
}

impl FormatStyle {
    pub fn new(style: Style, shape: Shape, explode: bool) -> Result<Self, CannotProcessSpecification> {
        if !style.supports(shape) {
            return Err(CannotProcessSpecification::UnsupportedStyle {
                style: style.to_string(),
                shape: shape.to_string(),
            });
        }
        Ok(Self {
            style,
            shape,
            explode,
        })
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

impl Filter for FormatStyle {
    fn filter(&self, value: Value) -> Outcome {
        let raw = match (&value, self.shape) {
            (Value::String(raw), _) => raw,
            (Value::Array(_), Shape::Array) | (Value::Object(_), Shape::Object) => {
                return Outcome::no_result(value)
            }
            (_, Shape::Primitive) => return Outcome::no_result(value),
            (other, _) => {
                let given = type_name(other);
                return Outcome::fail(
                    value,
                    Message::here(format!(
                        "{} style expects a string value, {} passed instead",
                        self.style, given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                );
            }
        };

        match decode(self.style, self.shape, self.explode, raw) {
            Ok(decoded) => Outcome::no_result(decoded),
            Err(err) => Outcome::fail(
                value,
                Message::here(err.to_string())
                    .with_code("style_mismatch")
                    .with_arg(self.style.as_str()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matrix() {
        assert_eq!(
            decode(Style::Matrix, Shape::Object, true, ";R=100;G=200;B=150").unwrap(),
            json!({"R": "100", "G": "200", "B": "150"})
        );
        assert_eq!(
            decode(Style::Matrix, Shape::Object, false, ";color=R,100,G,200").unwrap(),
            json!({"R": "100", "G": "200"})
        );
        assert_eq!(
            decode(Style::Matrix, Shape::Array, false, ";color=blue,black").unwrap(),
            json!(["blue", "black"])
        );
        assert_eq!(
            decode(Style::Matrix, Shape::Array, true, ";color=blue;color=black").unwrap(),
            json!(["blue", "black"])
        );
        assert_eq!(
            decode(Style::Matrix, Shape::Primitive, false, ";color=blue").unwrap(),
            json!("blue")
        );
        assert_eq!(
            decode(Style::Matrix, Shape::Array, false, ";color").unwrap(),
            json!([])
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(
            decode(Style::Label, Shape::Array, false, ".blue,black").unwrap(),
            json!(["blue", "black"])
        );
        assert_eq!(
            decode(Style::Label, Shape::Array, true, ".blue.black").unwrap(),
            json!(["blue", "black"])
        );
        assert_eq!(
            decode(Style::Label, Shape::Object, true, ".R=100.G=200").unwrap(),
            json!({"R": "100", "G": "200"})
        );
        assert_eq!(
            decode(Style::Label, Shape::Array, false, "blue"),
            Err(StyleError::MissingPrefix {
                style: Style::Label,
                prefix: '.'
            })
        );
    }

    #[test]
    fn test_simple() {
        assert_eq!(
            decode(Style::Simple, Shape::Array, false, "100,200,150").unwrap(),
            json!(["100", "200", "150"])
        );
        assert_eq!(
            decode(Style::Simple, Shape::Object, false, "R,100,G,200").unwrap(),
            json!({"R": "100", "G": "200"})
        );
        assert_eq!(
            decode(Style::Simple, Shape::Object, true, "R=100,G=200").unwrap(),
            json!({"R": "100", "G": "200"})
        );
        assert_eq!(decode(Style::Simple, Shape::Array, false, "").unwrap(), json!([]));
    }

    #[test]
    fn test_form_and_delimited() {
        assert_eq!(
            decode(Style::Form, Shape::Array, false, "cat,tabby").unwrap(),
            json!(["cat", "tabby"])
        );
        assert_eq!(
            decode(Style::Form, Shape::Array, true, "cat").unwrap(),
            json!(["cat"])
        );
        assert_eq!(
            decode(Style::SpaceDelimited, Shape::Array, false, "cat tabby").unwrap(),
            json!(["cat", "tabby"])
        );
        assert_eq!(
            decode(Style::PipeDelimited, Shape::Array, false, "cat|tabby").unwrap(),
            json!(["cat", "tabby"])
        );
    }

    #[test]
    fn test_deep_object() {
        assert_eq!(
            decode(Style::DeepObject, Shape::Object, true, "color[R]=100&color[G]=200").unwrap(),
            json!({"R": "100", "G": "200"})
        );
        assert_eq!(
            decode(Style::DeepObject, Shape::Object, true, "color[R]=100&G=200"),
            Err(StyleError::MissingBrackets {
                token: "G=200".to_string()
            })
        );
        assert_eq!(
            decode(Style::DeepObject, Shape::Object, true, "color[R]"),
            Err(StyleError::MissingKeyValue {
                token: "color[R]".to_string()
            })
        );
        for token in ["[R]=1", "color[]=1", "color[R=1", "color[a][b]=1"] {
            assert!(decode(Style::DeepObject, Shape::Object, true, token).is_err());
        }

        let filter = FormatStyle::new(Style::DeepObject, Shape::Object, true).unwrap();
        let outcome = filter.filter(json!("R=100"));
        assert_eq!(outcome.messages().unwrap().first().code, "style_mismatch");
    }

    #[test]
    fn test_object_grammar_errors() {
        assert_eq!(
            decode(Style::Simple, Shape::Object, false, "R,100,G"),
            Err(StyleError::UnpairedValues {
                style: Style::Simple,
                count: 3
            })
        );
        assert_eq!(
            decode(Style::Matrix, Shape::Object, true, ";R=100;G"),
            Err(StyleError::MissingKeyValue {
                token: "G".to_string()
            })
        );
    }

    #[test]
    fn test_unsupported_combinations() {
        assert!(FormatStyle::new(Style::DeepObject, Shape::Array, true).is_err());
        assert!(FormatStyle::new(Style::PipeDelimited, Shape::Primitive, false).is_err());
        assert!(FormatStyle::new(Style::DeepObject, Shape::Object, true).is_ok());
    }

    #[test]
    fn test_format_style_filter() {
        let filter = FormatStyle::new(Style::Form, Shape::Array, false).unwrap();
        assert_eq!(
            filter.filter(json!("cat,tabby")),
            Outcome::no_result(json!(["cat", "tabby"]))
        );
        assert_eq!(
            filter.filter(json!(["cat", "tabby"])),
            Outcome::no_result(json!(["cat", "tabby"]))
        );
        assert!(!filter.filter(json!({"a": 1})).is_valid());

        let filter = FormatStyle::new(Style::Simple, Shape::Object, false).unwrap();
        let outcome = filter.filter(json!("R,100,G"));
        assert_eq!(outcome.value(), &json!("R,100,G"));
        assert_eq!(outcome.messages().unwrap().first().code, "style_mismatch");
    }

    #[test]
    fn test_style_names() {
        assert_eq!("deepObject".parse::<Style>().unwrap(), Style::DeepObject);
        assert!("tabular".parse::<Style>().is_err());
        assert!(Style::Form.default_explode());
        assert!(!Style::Simple.default_explode());
    }
}
