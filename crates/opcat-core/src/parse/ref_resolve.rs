use std::borrow::Cow;

use serde_json::{Map, Value};

use super::spec::SwaggerDoc;
use crate::error::ResolveError;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Resolves `#/definitions/<Name>` pointers against a document's definitions.
///
/// Resolution is a single level of indirection: refs nested inside the
/// resolved definition are left untouched.
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    definitions: &'a Map<String, Value>,
}

impl<'a> RefResolver<'a> {
    pub fn new(doc: &'a SwaggerDoc) -> Self {
        Self::from_definitions(&doc.definitions)
    }

    pub fn from_definitions(definitions: &'a Map<String, Value>) -> Self {
        Self { definitions }
    }

    /// Resolve a schema node that may be a `$ref`.
    ///
    /// - `#/definitions/<name>` returns the definition, or an empty mapping
    ///   when the document does not define `<name>`.
    /// - Any other `$ref` form is left unresolved and the node is returned
    ///   as-is.
    /// - Nodes without `$ref` are returned unchanged.
    pub fn resolve<'n>(&self, node: &'n Value) -> Cow<'n, Value>
    where
        'a: 'n,
    {
        let Some(ref_value) = node.get("$ref") else {
            return Cow::Borrowed(node);
        };

        match definition_name(ref_value) {
            Ok(name) => match self.definitions.get(name) {
                Some(definition) => Cow::Borrowed(definition),
                None => {
                    log::debug!("definition `{name}` not found, resolving to an empty schema");
                    Cow::Owned(Value::Object(Map::new()))
                }
            },
            Err(e) => {
                log::debug!("leaving reference unresolved: {e}");
                Cow::Borrowed(node)
            }
        }
    }
}

/// Extract `<name>` from a `#/definitions/<name>` reference.
fn definition_name(ref_value: &Value) -> Result<&str, ResolveError> {
    let ref_path = ref_value
        .as_str()
        .ok_or_else(|| ResolveError::NonStringRef(ref_value.to_string()))?;
    ref_path
        .strip_prefix(DEFINITIONS_PREFIX)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))
}
