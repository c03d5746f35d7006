//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ControllerConfig, LegacyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}

/// Load and validate configuration from a YAML or TOML file.
///
/// The format is picked from the extension: `.yml` and `.yaml` are YAML,
/// everything else is TOML.
pub fn load_config(path: &Path) -> Result<ControllerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml") | Some("yaml")
    );

    let config = if is_yaml {
        parse_yaml(&content)?
    } else {
        toml::from_str(&content)?
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

const LEGACY_KEYS: [&str; 6] = [
    "httpdPodName",
    "httpdContainerName",
    "httpdBinary",
    "proxyBalancerConf",
    "tomcatImage",
    "tomcatLabels",
];

/// Parse YAML, accepting both the sectioned layout and the flat legacy one.
pub fn parse_yaml(content: &str) -> Result<ControllerConfig, ConfigError> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;

    let is_legacy = value
        .as_mapping()
        .map(|m| LEGACY_KEYS.iter().any(|key| m.contains_key(*key)))
        .unwrap_or(false);

    if is_legacy {
        tracing::debug!("Flat legacy configuration layout detected");
        let legacy: LegacyConfig = serde_yaml::from_value(value)?;
        Ok(legacy.into())
    } else if value.is_null() {
        Ok(ControllerConfig::default())
    } else {
        Ok(serde_yaml::from_value(value)?)
    }
}
