use serde_json::{Map, Value};

use super::value_kind;
use crate::error::ParseError;

/// A loaded Swagger 2.0 document.
///
/// Only the root is required to be a mapping. Every section the catalog reads
/// is extracted leniently: a missing or mistyped section becomes empty, so a
/// malformed document degrades instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwaggerDoc {
    pub swagger: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub definitions: Map<String, Value>,
    pub paths: Map<String, Value>,
    pub security_definitions: Map<String, Value>,
    /// Document-wide default security requirement, passed through as written.
    pub security: Option<Value>,
}

impl SwaggerDoc {
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let mut root = match value {
            Value::Object(root) => root,
            other => return Err(ParseError::NotAMapping(value_kind(&other))),
        };

        let swagger = root.get("swagger").and_then(scalar_to_string);
        match swagger.as_deref() {
            Some("2.0") => {}
            Some(other) => log::warn!("expected a Swagger 2.0 document, found version {other}"),
            None => log::warn!("document has no `swagger` version field"),
        }

        let info = root.get("info");
        let title = info
            .and_then(|i| i.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let version = info.and_then(|i| i.get("version")).and_then(scalar_to_string);

        Ok(Self {
            swagger,
            title,
            version,
            definitions: take_mapping(&mut root, "definitions"),
            paths: take_mapping(&mut root, "paths"),
            security_definitions: take_mapping(&mut root, "securityDefinitions"),
            security: root.remove("security"),
        })
    }

    /// Number of path templates in the document.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }
}

fn take_mapping(root: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match root.remove(key) {
        Some(Value::Object(map)) => map,
        Some(other) => {
            log::warn!(
                "ignoring `{key}`: expected a mapping, found {}",
                value_kind(&other)
            );
            Map::new()
        }
        None => Map::new(),
    }
}

/// Read a string or number scalar; YAML often types `version: 1.0` as a float.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
