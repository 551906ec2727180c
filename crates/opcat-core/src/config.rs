use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::keys::KeyMatching;
use crate::error::ConfigError;

/// Response codes scanned, in order, for the schema used to infer paging.
pub const DEFAULT_RESPONSE_CODES: [&str; 6] = ["200", "201", "202", "203", "204", "default"];

/// Top-level project configuration loaded from `.opcat.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub input: String,
    pub output: String,
    /// Optional per-operation pagination overrides.
    pub paging_registry: Option<String>,
    pub key_matching: KeyMatching,
    pub response_codes: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            input: "swagger.json".to_string(),
            output: "generated".to_string(),
            paging_registry: None,
            key_matching: KeyMatching::default(),
            response_codes: DEFAULT_RESPONSE_CODES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".opcat.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<CatalogConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: CatalogConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# opcat configuration
input: swagger.json
output: generated

# paging_registry: registry/paging-registry.yaml

# How catalog keys are compared when detecting collisions.
key_matching: case_sensitive   # case_sensitive | case_insensitive

# Responses scanned in order for the schema used to infer pagination.
response_codes: ["200", "201", "202", "203", "204", "default"]
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.input, "swagger.json");
        assert_eq!(config.output, "generated");
        assert_eq!(config.paging_registry, None);
        assert_eq!(config.key_matching, KeyMatching::CaseSensitive);
        assert_eq!(
            config.response_codes,
            vec!["200", "201", "202", "203", "204", "default"]
        );
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: specs/swagger.json
output: out
paging_registry: registry/paging-registry.yaml
key_matching: case_insensitive
response_codes: ["200", "default"]
"#;
        let config: CatalogConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "specs/swagger.json");
        assert_eq!(config.output, "out");
        assert_eq!(
            config.paging_registry.as_deref(),
            Some("registry/paging-registry.yaml")
        );
        assert_eq!(config.key_matching, KeyMatching::CaseInsensitive);
        assert_eq!(config.response_codes, vec!["200", "default"]);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: CatalogConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        // Defaults applied
        assert_eq!(config.output, "generated");
        assert_eq!(config.key_matching, KeyMatching::CaseSensitive);
        assert_eq!(config.response_codes.len(), 6);
    }

    #[test]
    fn test_default_config_content_parses() {
        let config: CatalogConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let loaded = load_config(Path::new("does/not/exist/.opcat.yaml")).unwrap();
        assert!(loaded.is_none());
    }
}
