use serde::Serialize;
use serde_json::Value;

use super::method::HttpMethod;
use crate::paging::PagingType;

/// One entry of `operations.json`: a single (path, method) operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub catalog_key: String,
    /// As declared, or synthesized as `<method>_<path>`. Not unique.
    pub operation_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    /// Effective security requirement, passed through as written.
    pub security: Option<Value>,
    pub required_permissions: Option<Vec<String>>,
    pub parameters: Vec<ParameterRecord>,
    pub response_top_level_properties: Vec<String>,
    pub response_items_path: Option<String>,
    pub paging_type: PagingType,
}

/// A normalized operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRecord {
    pub name: Option<String>,
    #[serde(rename = "in")]
    pub location: Option<String>,
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: Option<String>,
    pub schema: Option<Value>,
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
}

/// One entry of `pagination-map.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingRecord {
    #[serde(rename = "type")]
    pub paging_type: PagingType,
    pub items_path: Option<String>,
    pub response_props: Vec<String>,
    pub override_applied: bool,
}

/// One entry of `catalog-collisions.json`, keyed by the disambiguated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionRecord {
    pub operation_id: String,
    pub collided_with: String,
    pub reason: String,
}
