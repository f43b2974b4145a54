//! String codec for stored values
//!
//! The backing store only holds strings, so every value crosses a text
//! boundary:
//!
//! | Value | Stored text |
//! |-------|-------------|
//! | `Array`, `Object`, `Null` | canonical JSON (`serde_json`) |
//! | `Bool` | `true` / `false` |
//! | `Int` | decimal literal |
//! | `Float` | shortest decimal, `NaN`, `Infinity`, `-Infinity` |
//! | `String` | unchanged |
//! | `Function` | rejected |
//!
//! Decoding has no type tag to go on. It tries JSON first and falls back to
//! the raw text as a string, so a stored string that happens to be valid
//! JSON (`"123"`, `"true"`) reads back as the decoded value.

use tracing::trace;

use crate::error::{Error, Result};
use crate::value::Value;

/// Encode a value into its stored text form
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] for `Value::Function`, and
/// [`Error::Serialization`] if JSON encoding fails.
pub fn encode(value: &Value) -> Result<String> {
    match value {
        Value::Function(_) => Err(Error::UnsupportedValue {
            type_name: value.type_name(),
        }),
        Value::Array(_) | Value::Object(_) | Value::Null => {
            Ok(serde_json::to_string(&value.to_json())?)
        }
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(format_float(*f)),
        Value::String(s) => Ok(s.clone()),
    }
}

/// Decode stored text, falling back to the raw string
///
/// Never fails: text that is not valid JSON is returned as
/// `Value::String` unchanged.
pub fn decode(raw: &str) -> Value {
    match try_decode(raw) {
        Some(value) => value,
        None => {
            trace!(len = raw.len(), "stored text is not JSON, returning raw string");
            Value::String(raw.to_string())
        }
    }
}

/// Decode stored text as JSON, `None` if it is not valid JSON
pub fn try_decode(raw: &str) -> Option<Value> {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .map(Value::from)
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f == 0.0 {
        // covers -0.0
        "0".to_string()
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_encode_array_as_json() {
        let v = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(encode(&v).unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_encode_object_as_json() {
        let v: Value = json!({"prop": "value", "otherProp": ["another", "value"]}).into();
        let encoded = encode(&v).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(reparsed, json!({"prop": "value", "otherProp": ["another", "value"]}));
    }

    #[test]
    fn test_encode_primitives_as_text() {
        assert_eq!(encode(&Value::from("abc")).unwrap(), "abc");
        assert_eq!(encode(&Value::Int(1)).unwrap(), "1");
        assert_eq!(encode(&Value::Int(-42)).unwrap(), "-42");
        assert_eq!(encode(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(encode(&Value::Null).unwrap(), "null");
    }

    #[test]
    fn test_encode_string_is_not_quoted() {
        // Strings pass through without JSON quoting
        assert_eq!(encode(&Value::from("he said \"hi\"")).unwrap(), "he said \"hi\"");
    }

    #[test]
    fn test_encode_float_forms() {
        assert_eq!(encode(&Value::Float(1.5)).unwrap(), "1.5");
        assert_eq!(encode(&Value::Float(2.0)).unwrap(), "2");
        assert_eq!(encode(&Value::Float(-0.0)).unwrap(), "0");
        assert_eq!(encode(&Value::Float(f64::NAN)).unwrap(), "NaN");
        assert_eq!(encode(&Value::Float(f64::INFINITY)).unwrap(), "Infinity");
        assert_eq!(encode(&Value::Float(f64::NEG_INFINITY)).unwrap(), "-Infinity");
    }

    #[test]
    fn test_encode_rejects_function() {
        let err = encode(&Value::function(|_| Value::Null)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedValue {
                type_name: "Function"
            }
        ));
    }

    #[test]
    fn test_encode_nested_function_is_dropped() {
        let mut obj = HashMap::new();
        obj.insert("cb".to_string(), Value::function(|_| Value::Null));
        obj.insert("n".to_string(), Value::Int(1));
        assert_eq!(encode(&Value::Object(obj)).unwrap(), r#"{"n":1}"#);
    }

    #[test]
    fn test_decode_json() {
        assert_eq!(decode("[1,2,3]"), Value::from(json!([1, 2, 3])));
        assert_eq!(decode(r#"{"a":10}"#), Value::from(json!({"a": 10})));
    }

    #[test]
    fn test_decode_falls_back_to_raw_string() {
        assert_eq!(decode("abc"), Value::from("abc"));
        assert_eq!(decode("{broken"), Value::from("{broken"));
        assert_eq!(decode(""), Value::from(""));
        assert_eq!(decode("NaN"), Value::from("NaN"));
    }

    #[test]
    fn test_decode_is_ambiguous_for_json_like_strings() {
        // No type tag: these were written as strings but decode as JSON
        assert_eq!(decode("123"), Value::Int(123));
        assert_eq!(decode("true"), Value::Bool(true));
        assert_eq!(decode("null"), Value::Null);
    }

    #[test]
    fn test_try_decode() {
        assert!(try_decode("hello").is_none());
        assert_eq!(try_decode("1.25"), Some(Value::Float(1.25)));
    }
}
