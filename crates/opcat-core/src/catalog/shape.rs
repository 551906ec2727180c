use serde_json::{Map, Value};

use crate::parse::ref_resolve::RefResolver;

/// Array fields that usually hold the page's items, most likely first.
const PREFERRED_ITEM_FIELDS: [&str; 3] = ["entities", "results", "conversations"];

/// Top-level shape of a response schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseShape {
    pub properties: Vec<String>,
    pub items_path: Option<String>,
}

impl ResponseShape {
    pub fn inspect(resolver: &RefResolver<'_>, schema: &Value) -> Self {
        Self {
            properties: top_level_properties(resolver, schema),
            items_path: items_path(resolver, schema),
        }
    }
}

/// Property names of the (resolved) schema, in declaration order.
pub fn top_level_properties(resolver: &RefResolver<'_>, schema: &Value) -> Vec<String> {
    let resolved = resolver.resolve(schema);
    properties_of(&resolved)
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default()
}

/// JSON path of the array field holding the page's items.
///
/// `entities`, `results` and `conversations` win in that order when they are
/// arrays; otherwise the first array-typed property is used.
pub fn items_path(resolver: &RefResolver<'_>, schema: &Value) -> Option<String> {
    let resolved = resolver.resolve(schema);
    let props = properties_of(&resolved)?;

    PREFERRED_ITEM_FIELDS
        .iter()
        .find(|name| props.get(**name).is_some_and(is_array))
        .map(|name| name.to_string())
        .or_else(|| {
            props
                .iter()
                .find(|(_, prop)| is_array(prop))
                .map(|(name, _)| name.clone())
        })
        .map(|name| format!("$.{name}"))
}

fn properties_of(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

fn is_array(prop: &Value) -> bool {
    prop.get("type").and_then(Value::as_str) == Some("array")
}
