//! Configuration loading.
//!
//! Settings come from a local TOML file and are validated before use.
//! Workload tables come from YAML text; [`load_table`] never fails and
//! degrades to an empty table instead.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ConfigTable, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Workloads document error: {0}")]
    Document(#[from] serde_yaml::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate gateway settings from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a YAML workloads document.
///
/// An empty document parses to an empty table. Duplicate names resolve to the
/// last occurrence.
pub fn parse_table(raw: &str) -> Result<ConfigTable, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(ConfigTable::new());
    }
    let table: Option<ConfigTable> = serde_yaml::from_str(raw)?;
    Ok(table.unwrap_or_default())
}

/// Parse a YAML workloads document, logging and returning an empty table on
/// failure.
pub fn load_table(raw: &str) -> ConfigTable {
    match parse_table(raw) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse workloads document");
            ConfigTable::new()
        }
    }
}

/// Serialize a table back into a YAML workloads document.
pub fn render_table(table: &ConfigTable) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::WorkloadDescriptor;

    const DOCUMENT: &str = r#"
workload1:
  provider: example
  host: example.com
  type: web
workload2:
  provider: googlecloud
  host: console.cloud.google.com
  type: console
"#;

    #[test]
    fn test_parse_table() {
        let table = parse_table(DOCUMENT).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table["workload1"],
            WorkloadDescriptor {
                provider: "example".into(),
                host: "example.com".into(),
                kind: "web".into(),
            }
        );
        assert_eq!(table["workload2"].host, "console.cloud.google.com");
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_table("").unwrap().is_empty());
        assert!(parse_table("   \n").unwrap().is_empty());
        assert!(parse_table("~").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_degrades_to_empty() {
        assert!(parse_table("workload1: [unterminated").is_err());
        assert!(load_table("workload1: [unterminated").is_empty());

        // Wrong shape: a list instead of a mapping.
        assert!(load_table("- provider: example\n  host: example.com\n").is_empty());

        // One bad entry poisons the whole document rather than yielding a partial table.
        let partial = "good:\n  provider: example\n  host: a.com\n  type: web\nbad:\n  provider: example\n";
        assert!(load_table(partial).is_empty());
    }

    #[test]
    fn test_round_trip() {
        let table = parse_table(DOCUMENT).unwrap();
        let rendered = render_table(&table).unwrap();
        assert_eq!(parse_table(&rendered).unwrap(), table);
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("gateway-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            "[source]\nurl = \"https://config.internal/hosts.yaml\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.source.url, "https://config.internal/hosts.yaml");
        assert_eq!(config.source.timeout_secs, 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_config_rejects_invalid_settings() {
        let path = std::env::temp_dir().join(format!("gateway-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[listener]\nbind_address = \"not-an-address\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        fs::remove_file(&path).unwrap();
    }
}
