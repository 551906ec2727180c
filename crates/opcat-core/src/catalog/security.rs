use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// Scopes required by a security requirement list, sorted and de-duplicated.
///
/// Only schemes declared in `securityDefinitions` contribute. Returns `None`
/// rather than an empty list when nothing is required.
pub fn required_permissions(
    security: Option<&Value>,
    security_definitions: &Map<String, Value>,
) -> Option<Vec<String>> {
    let requirements = security?.as_array()?;

    let mut scopes = BTreeSet::new();
    for requirement in requirements.iter().filter_map(Value::as_object) {
        for (scheme, scheme_scopes) in requirement {
            if !security_definitions.contains_key(scheme) {
                log::debug!("security scheme `{scheme}` is not declared, skipping");
                continue;
            }
            let Some(scheme_scopes) = scheme_scopes.as_array() else {
                continue;
            };
            scopes.extend(scheme_scopes.iter().filter_map(Value::as_str).map(str::to_string));
        }
    }

    if scopes.is_empty() {
        None
    } else {
        Some(scopes.into_iter().collect())
    }
}
