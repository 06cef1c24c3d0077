//! # Configuration Loader
//!
//! Reads a TOML file and maps it onto the `AppConfig` DTO.
//!
//! No validation and no default values here: empty strings and missing
//! sections are accepted as facts. Callers decide what an empty value means.

use anyhow::Context;
use mo_core::config::AppConfig;
use std::path::PathBuf;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}
