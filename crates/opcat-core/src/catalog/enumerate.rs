use serde_json::{Map, Value};

use super::keys::{IdSource, KeyAllocator, KeyAssignment};
use super::method::HttpMethod;
use super::records::{OperationRecord, PagingRecord, ParameterRecord};
use super::security::required_permissions;
use super::shape::ResponseShape;
use super::{Catalog, CatalogOptions};
use crate::paging::{PagingRegistry, classify_paging};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::spec::SwaggerDoc;
use crate::parse::value_kind;

/// Build the operation catalog for a document.
pub fn build_catalog(
    doc: &SwaggerDoc,
    registry: &PagingRegistry,
    options: &CatalogOptions,
) -> Catalog {
    CatalogContext::new(doc, registry, options).build()
}

/// Read-only lookup tables shared by every operation of a run.
pub struct CatalogContext<'a> {
    doc: &'a SwaggerDoc,
    resolver: RefResolver<'a>,
    registry: &'a PagingRegistry,
    options: &'a CatalogOptions,
}

impl<'a> CatalogContext<'a> {
    pub fn new(
        doc: &'a SwaggerDoc,
        registry: &'a PagingRegistry,
        options: &'a CatalogOptions,
    ) -> Self {
        Self {
            doc,
            resolver: RefResolver::new(doc),
            registry,
            options,
        }
    }

    /// Walk every path and method in document order.
    pub fn build(&self) -> Catalog {
        let mut catalog = Catalog::default();
        let mut keys = KeyAllocator::new(self.options.key_matching);

        for (path, item) in &self.doc.paths {
            let Some(item) = item.as_object() else {
                log::warn!(
                    "skipping path `{path}`: expected a mapping, found {}",
                    value_kind(item)
                );
                continue;
            };
            let shared_params = parameter_list(item.get("parameters"));

            for (key, op) in item {
                let Some(method) = HttpMethod::from_key(key) else {
                    continue;
                };
                let Some(op) = op.as_object() else {
                    log::warn!("skipping {method} {path}: operation is not a mapping");
                    continue;
                };
                self.add_operation(&mut catalog, &mut keys, path, method, shared_params, op);
            }
        }

        catalog
    }

    fn add_operation(
        &self,
        catalog: &mut Catalog,
        keys: &mut KeyAllocator,
        path: &str,
        method: HttpMethod,
        shared_params: &[Value],
        op: &Map<String, Value>,
    ) {
        let (operation_id, source) = match non_empty_string(op.get("operationId")) {
            Some(id) => (id, IdSource::Declared),
            None => (format!("{}_{}", method.as_lower(), path), IdSource::Synthesized),
        };

        let KeyAssignment { key, collision } = keys.allocate(&operation_id, source);
        if let Some(collision) = collision {
            catalog.collisions.insert(key.clone(), collision);
        }

        let parameters = shared_params
            .iter()
            .chain(parameter_list(op.get("parameters")))
            .filter_map(Value::as_object)
            .map(|p| self.parameter_record(p))
            .collect();

        let shape = self
            .response_schema(op)
            .map(|schema| ResponseShape::inspect(&self.resolver, schema))
            .unwrap_or_default();
        let heuristic = classify_paging(shape.properties.iter().map(String::as_str));
        let paging = self
            .registry
            .merge(&key, &operation_id, heuristic, shape.items_path);

        let security = op.get("security").or(self.doc.security.as_ref()).cloned();
        let required_permissions =
            required_permissions(security.as_ref(), &self.doc.security_definitions);

        log::debug!("{method} {path} -> {key} ({})", paging.paging_type);

        catalog.paging.insert(
            key.clone(),
            PagingRecord {
                paging_type: paging.paging_type,
                items_path: paging.items_path.clone(),
                response_props: shape.properties.clone(),
                override_applied: paging.override_applied,
            },
        );
        catalog.operations.insert(
            key.clone(),
            OperationRecord {
                catalog_key: key,
                operation_id,
                method,
                path: path.to_string(),
                tags: string_list(op.get("tags")),
                summary: non_empty_string(op.get("summary")).unwrap_or_default(),
                description: non_empty_string(op.get("description")).unwrap_or_default(),
                security,
                required_permissions,
                parameters,
                response_top_level_properties: shape.properties,
                response_items_path: paging.items_path,
                paging_type: paging.paging_type,
            },
        );
    }

    fn parameter_record(&self, param: &Map<String, Value>) -> ParameterRecord {
        let param_type = non_empty_string(param.get("type")).or_else(|| {
            let schema = param.get("schema")?;
            non_empty_string(self.resolver.resolve(schema).get("type"))
        });

        ParameterRecord {
            name: non_empty_string(param.get("name")),
            location: non_empty_string(param.get("in")),
            // Only a boolean `true` marks a parameter required; strings do not.
            required: param
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            param_type,
            schema: param.get("schema").cloned(),
            ref_path: non_empty_string(param.get("$ref")),
        }
    }

    /// First response, in configured code order, that declares a schema.
    fn response_schema<'o>(&self, op: &'o Map<String, Value>) -> Option<&'o Value> {
        let responses = op.get("responses")?.as_object()?;
        self.options
            .response_codes
            .iter()
            .find_map(|code| responses.get(code)?.as_object()?.get("schema"))
    }
}

fn parameter_list(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::KeyMatching;
    use crate::paging::{PagingOverride, PagingType};
    use serde_json::json;

    fn catalog_for(doc: Value) -> Catalog {
        catalog_with(doc, &PagingRegistry::new(), &CatalogOptions::default())
    }

    fn catalog_with(doc: Value, registry: &PagingRegistry, options: &CatalogOptions) -> Catalog {
        let doc = SwaggerDoc::from_value(doc).unwrap();
        build_catalog(&doc, registry, options)
    }

    #[test]
    fn synthesizes_missing_operation_ids() {
        let catalog = catalog_for(json!({
            "swagger": "2.0",
            "paths": {"/api/v2/users": {"get": {"responses": {}}}}
        }));
        let op = &catalog.operations["get_/api/v2/users"];
        assert_eq!(op.operation_id, "get_/api/v2/users");
        assert_eq!(op.method, HttpMethod::Get);
        assert_eq!(op.summary, "");
        assert!(op.tags.is_empty());
    }

    #[test]
    fn non_method_keys_are_not_operations() {
        let catalog = catalog_for(json!({
            "paths": {
                "/users/{userId}": {
                    "parameters": [{"name": "userId", "in": "path", "required": true, "type": "string"}],
                    "x-internal": true,
                    "get": {"operationId": "getUser"},
                    "delete": {"operationId": "deleteUser"}
                }
            }
        }));
        assert_eq!(
            catalog.operations.keys().collect::<Vec<_>>(),
            ["getUser", "deleteUser"]
        );
    }

    #[test]
    fn path_parameters_come_first() {
        let catalog = catalog_for(json!({
            "paths": {
                "/users/{userId}": {
                    "parameters": [{"name": "userId", "in": "path", "required": true, "type": "string"}],
                    "get": {
                        "operationId": "getUser",
                        "parameters": [
                            {"name": "expand", "in": "query", "type": "array"},
                            {"name": "body", "in": "body", "schema": {"$ref": "#/definitions/User"}},
                            {"$ref": "#/parameters/pageSize"}
                        ]
                    }
                }
            },
            "definitions": {"User": {"type": "object"}}
        }));
        let params = &catalog.operations["getUser"].parameters;
        let names: Vec<_> = params.iter().map(|p| p.name.as_deref()).collect();
        assert_eq!(names, [Some("userId"), Some("expand"), Some("body"), None]);

        assert!(params[0].required);
        assert!(!params[1].required);
        assert_eq!(params[1].param_type.as_deref(), Some("array"));
        assert_eq!(params[2].location.as_deref(), Some("body"));
        assert_eq!(params[2].param_type.as_deref(), Some("object"));
        assert_eq!(params[2].schema, Some(json!({"$ref": "#/definitions/User"})));
        assert_eq!(params[3].ref_path.as_deref(), Some("#/parameters/pageSize"));
        assert_eq!(params[3].param_type, None);
    }

    #[test]
    fn required_is_boolean_only() {
        let catalog = catalog_for(json!({
            "paths": {
                "/users": {
                    "get": {
                        "operationId": "getUsers",
                        "parameters": [
                            {"name": "a", "in": "query", "required": "true"},
                            {"name": "b", "in": "query", "required": "yes"},
                            {"name": "c", "in": "query", "required": 1},
                            {"name": "d", "in": "query", "required": true}
                        ]
                    }
                }
            }
        }));
        let required: Vec<bool> = catalog.operations["getUsers"]
            .parameters
            .iter()
            .map(|p| p.required)
            .collect();
        assert_eq!(required, [false, false, false, true]);
    }

    #[test]
    fn first_response_with_schema_wins() {
        let catalog = catalog_for(json!({
            "paths": {
                "/jobs": {
                    "post": {
                        "operationId": "postJob",
                        "responses": {
                            "200": {"description": "no body"},
                            "202": {"schema": {"properties": {"cursor": {}, "jobs": {"type": "array"}}}},
                            "default": {"schema": {"properties": {"nextUri": {}}}}
                        }
                    }
                }
            }
        }));
        let op = &catalog.operations["postJob"];
        assert_eq!(op.paging_type, PagingType::Cursor);
        assert_eq!(op.response_items_path.as_deref(), Some("$.jobs"));
        assert_eq!(op.response_top_level_properties, ["cursor", "jobs"]);
    }

    #[test]
    fn configured_response_codes_are_respected() {
        let options = CatalogOptions {
            response_codes: vec!["default".to_string()],
            ..CatalogOptions::default()
        };
        let catalog = catalog_with(
            json!({
                "paths": {"/jobs": {"get": {
                    "operationId": "getJobs",
                    "responses": {
                        "200": {"schema": {"properties": {"cursor": {}}}},
                        "default": {"schema": {"properties": {"nextUri": {}}}}
                    }
                }}}
            }),
            &PagingRegistry::new(),
            &options,
        );
        assert_eq!(catalog.operations["getJobs"].paging_type, PagingType::NextUri);
    }

    #[test]
    fn no_schema_means_unknown() {
        let catalog = catalog_for(json!({
            "paths": {"/users/{id}": {"delete": {"operationId": "deleteUser", "responses": {"204": {"description": "gone"}}}}}
        }));
        let paging = &catalog.paging["deleteUser"];
        assert_eq!(paging.paging_type, PagingType::Unknown);
        assert_eq!(paging.items_path, None);
        assert!(paging.response_props.is_empty());
    }

    #[test]
    fn operation_security_overrides_document_default() {
        let catalog = catalog_for(json!({
            "securityDefinitions": {"oauth": {"type": "oauth2"}},
            "security": [{"oauth": ["default:read"]}],
            "paths": {
                "/a": {
                    "get": {"operationId": "inherits"},
                    "put": {"operationId": "overrides", "security": [{"oauth": ["a:write", "a:read"]}]},
                    "post": {"operationId": "anonymous", "security": []}
                }
            }
        }));
        assert_eq!(
            catalog.operations["inherits"].required_permissions,
            Some(vec!["default:read".to_string()])
        );
        assert_eq!(
            catalog.operations["overrides"].required_permissions,
            Some(vec!["a:read".to_string(), "a:write".to_string()])
        );
        let anonymous = &catalog.operations["anonymous"];
        assert_eq!(anonymous.security, Some(json!([])));
        assert_eq!(anonymous.required_permissions, None);
    }

    #[test]
    fn missing_security_is_null() {
        let catalog = catalog_for(json!({"paths": {"/a": {"get": {"operationId": "a"}}}}));
        assert_eq!(catalog.operations["a"].security, None);
        assert_eq!(catalog.operations["a"].required_permissions, None);
    }

    #[test]
    fn registry_overrides_heuristics() {
        let mut registry = PagingRegistry::new();
        registry.insert(
            "getConversations",
            PagingOverride {
                paging_type: Some(PagingType::TotalHits),
                items_path: Some("$.conversations".to_string()),
            },
        );
        let catalog = catalog_with(
            json!({"paths": {"/conversations": {"get": {"operationId": "getConversations"}}}}),
            &registry,
            &CatalogOptions::default(),
        );
        let op = &catalog.operations["getConversations"];
        assert_eq!(op.paging_type, PagingType::TotalHits);
        assert_eq!(op.response_items_path.as_deref(), Some("$.conversations"));
        assert!(catalog.paging["getConversations"].override_applied);
    }

    #[test]
    fn method_case_variants_collide_on_synthesized_ids() {
        let catalog = catalog_with(
            json!({"paths": {"/a": {"GET": {}, "get": {}}}}),
            &PagingRegistry::new(),
            &CatalogOptions {
                key_matching: KeyMatching::CaseInsensitive,
                ..CatalogOptions::default()
            },
        );
        assert_eq!(
            catalog.operations.keys().collect::<Vec<_>>(),
            ["get_/a", "get_/a__2"]
        );
        assert_eq!(catalog.collisions.len(), 1);
        assert_eq!(catalog.collisions["get_/a__2"].collided_with, "get_/a");
        assert_eq!(catalog.operations["get_/a__2"].operation_id, "get_/a");
        assert_eq!(catalog.operations["get_/a__2"].method, HttpMethod::Get);
    }

    #[test]
    fn malformed_items_are_skipped() {
        let catalog = catalog_for(json!({
            "paths": {
                "/broken": "not a path item",
                "/half": {"get": "not an operation", "put": {"operationId": "putHalf", "parameters": "nope", "responses": []}}
            }
        }));
        assert_eq!(catalog.len(), 1);
        let op = &catalog.operations["putHalf"];
        assert!(op.parameters.is_empty());
        assert_eq!(op.paging_type, PagingType::Unknown);
    }
}
