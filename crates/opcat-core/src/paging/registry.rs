use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use super::PagingType;
use crate::error::RegistryError;
use crate::parse::{value_kind, yaml_to_json};

/// Override fields for one operation. Unset fields keep the heuristic value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingOverride {
    pub paging_type: Option<PagingType>,
    pub items_path: Option<String>,
}

impl PagingOverride {
    fn is_empty(&self) -> bool {
        self.paging_type.is_none() && self.items_path.is_none()
    }
}

/// Paging type and items path after overrides were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePaging {
    pub paging_type: PagingType,
    pub items_path: Option<String>,
    pub override_applied: bool,
}

/// User-supplied pagination overrides, keyed by catalog key or operation id.
///
/// ```yaml
/// getConversations:
///   type: TOTALHITS
///   itemsPath: $.conversations
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingRegistry {
    entries: IndexMap<String, PagingOverride>,
}

impl PagingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a YAML (or JSON) file.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a registry document. Malformed entries are skipped, not errors.
    pub fn from_yaml(input: &str) -> Result<Self, RegistryError> {
        if input.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
        Ok(Self::from_value(&yaml_to_json(value)))
    }

    pub fn from_value(value: &Value) -> Self {
        let mut registry = Self::new();
        let root = match value {
            Value::Object(root) => root,
            Value::Null => return registry,
            other => {
                log::warn!(
                    "paging registry root must be a mapping, found {}; ignoring it",
                    value_kind(other)
                );
                return registry;
            }
        };

        for (key, entry) in root {
            let Some(fields) = entry.as_object() else {
                log::warn!("ignoring paging override `{key}`: expected a mapping");
                continue;
            };
            let over = PagingOverride {
                paging_type: string_field(key, fields.get("type")).and_then(|tag| {
                    tag.parse::<PagingType>()
                        .inspect_err(|e| log::warn!("ignoring type of paging override `{key}`: {e}"))
                        .ok()
                }),
                items_path: string_field(key, fields.get("itemsPath")).map(str::to_string),
            };
            if over.is_empty() {
                log::warn!("ignoring paging override `{key}`: no usable fields");
                continue;
            }
            registry.insert(key.clone(), over);
        }
        registry
    }

    pub fn insert(&mut self, key: impl Into<String>, over: PagingOverride) {
        self.entries.insert(key.into(), over);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the override for an operation: catalog key first, then operation id.
    pub fn lookup(&self, catalog_key: &str, operation_id: &str) -> Option<&PagingOverride> {
        self.entries
            .get(catalog_key)
            .or_else(|| self.entries.get(operation_id))
    }

    /// Apply the matching override, field by field, on top of heuristic values.
    pub fn merge(
        &self,
        catalog_key: &str,
        operation_id: &str,
        paging_type: PagingType,
        items_path: Option<String>,
    ) -> EffectivePaging {
        match self.lookup(catalog_key, operation_id) {
            Some(over) => EffectivePaging {
                paging_type: over.paging_type.unwrap_or(paging_type),
                items_path: over.items_path.clone().or(items_path),
                override_applied: true,
            },
            None => EffectivePaging {
                paging_type,
                items_path,
                override_applied: false,
            },
        }
    }
}

/// A non-empty string field; anything else counts as unset.
fn string_field<'v>(key: &str, value: Option<&'v Value>) -> Option<&'v str> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.as_str()),
        Value::String(_) | Value::Null => None,
        other => {
            log::warn!(
                "ignoring field of paging override `{key}`: expected a string, found {}",
                value_kind(other)
            );
            None
        }
    }
}
