//! Type validators.

use serde_json::Value;

use crate::chain::Validator;
use crate::error::Message;
use crate::outcome::{type_name, Outcome};

macro_rules! type_validator {
    ($(#[$doc:meta])* $name:ident, $expected:literal, $check:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Validator for $name {
            fn validate(&self, value: &Value) -> Outcome {
                let check: fn(&Value) -> bool = $check;
                if check(value) {
                    return Outcome::valid(value.clone());
                }
                let given = type_name(value);
                Outcome::fail(
                    value.clone(),
                    Message::here(format!(
                        concat!(stringify!($name), " validator expects ", $expected, " value, {} passed instead"),
                        given
                    ))
                    .with_code("invalid_type")
                    .with_arg(given),
                )
            }
        }
    };
}

type_validator!(
    /// Accepts integral numbers.
    IsInt,
    "integer",
    |v| v.is_i64() || v.is_u64()
);

type_validator!(
    /// Accepts numbers stored as floating point.
    IsFloat,
    "float",
    |v| v.is_f64()
);

type_validator!(
    /// Accepts any number.
    IsNumber,
    "number",
    |v| v.is_number()
);

type_validator!(IsString, "string", |v| v.is_string());

type_validator!(IsBool, "boolean", |v| v.is_boolean());

type_validator!(
    /// Accepts sequential lists.
    IsList,
    "list",
    |v| v.is_array()
);

type_validator!(
    /// Accepts mappings keyed by string.
    IsMap,
    "object",
    |v| v.is_object()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Status;
    use serde_json::json;

    #[test]
    fn test_is_int() {
        assert_eq!(IsInt.validate(&json!(5)), Outcome::valid(json!(5)));
        assert_eq!(IsInt.validate(&json!(-5)).status(), Status::Valid);

        let outcome = IsInt.validate(&json!("five"));
        assert_eq!(outcome.value(), &json!("five"));
        let message = outcome.messages().unwrap().first();
        assert_eq!(
            message.message,
            "IsInt validator expects integer value, string passed instead"
        );
        assert_eq!(message.args, vec!["string"]);
        assert!(!IsInt.validate(&json!(5.5)).is_valid());
    }

    #[test]
    fn test_numeric_types() {
        assert!(IsFloat.validate(&json!(1.5)).is_valid());
        assert!(!IsFloat.validate(&json!(1)).is_valid());
        assert!(IsNumber.validate(&json!(1)).is_valid());
        assert!(IsNumber.validate(&json!(1.5)).is_valid());
        assert!(!IsNumber.validate(&json!("1")).is_valid());
    }

    #[test]
    fn test_container_types() {
        assert!(IsList.validate(&json!([])).is_valid());
        assert!(!IsList.validate(&json!({})).is_valid());
        assert!(IsMap.validate(&json!({})).is_valid());
        assert_eq!(
            IsMap.validate(&json!(["a"])).messages().unwrap().first().message,
            "IsMap validator expects object value, list passed instead"
        );
    }

    #[test]
    fn test_scalar_types() {
        assert!(IsString.validate(&json!("a")).is_valid());
        assert!(!IsString.validate(&Value::Null).is_valid());
        assert!(IsBool.validate(&json!(false)).is_valid());
        assert!(!IsBool.validate(&json!("false")).is_valid());
    }
}
