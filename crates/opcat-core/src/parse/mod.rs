pub mod ref_resolve;
pub mod spec;

use serde_json::{Map, Number, Value};
use serde_yaml_ng::Value as YamlValue;

use crate::error::ParseError;
use spec::SwaggerDoc;

/// Parse a Swagger document from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerDoc, ParseError> {
    let value: YamlValue = serde_yaml_ng::from_str(input)?;
    SwaggerDoc::from_value(yaml_to_json(value))
}

/// Parse a Swagger document from JSON.
pub fn from_json(input: &str) -> Result<SwaggerDoc, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    SwaggerDoc::from_value(value)
}

/// Convert a YAML tree into a JSON tree, keeping mapping order.
///
/// Scalar mapping keys are stringified, so `200:` and `"200":` both become the
/// key `"200"`. Non-scalar keys have no JSON counterpart and are dropped.
pub fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => yaml_number_to_json(&n),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                match yaml_key_to_string(&key) {
                    Some(key) => {
                        map.insert(key, yaml_to_json(value));
                    }
                    None => log::debug!("dropping non-scalar mapping key {:?}", key),
                }
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number_to_json(n: &serde_yaml_ng::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key_to_string(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Null => Some("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key_to_string(&tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}

/// Short name of a JSON value's kind, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
