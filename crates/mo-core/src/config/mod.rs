//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! - No business logic or policies
//! - No validation logic
//! - No default value calculation
//!
//! > **This module contains data only, no policy, no validation.**

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON file listing `{ name, code }` settlement banks (path only, no existence check)
    pub bank_list_path: PathBuf,

    /// JSON file listing `{ id, name }` business categories
    pub category_list_path: PathBuf,

    /// Tracing filter directives (empty means "use the built-in defaults")
    pub log_filter: String,

    /// Directory for rolling log files (empty disables file logging)
    pub log_dir: PathBuf,

    /// Code accepted by the sandbox identity verification service
    pub sandbox_verification_code: String,

    /// Emails the sandbox services treat as already registered
    pub sandbox_registered_emails: Vec<String>,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(Self {
            bank_list_path: PathBuf::from(str_at("directory", "bank_list_path")),
            category_list_path: PathBuf::from(str_at("directory", "category_list_path")),
            log_filter: str_at("logging", "filter"),
            log_dir: PathBuf::from(str_at("logging", "log_dir")),
            sandbox_verification_code: str_at("sandbox", "verification_code"),
            sandbox_registered_emails: toml_value
                .get("sandbox")
                .and_then(|s| s.get("registered_emails"))
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    ///
    /// **Note**: This is a pure data constructor with "empty" as valid facts.
    pub fn empty() -> Self {
        Self {
            bank_list_path: PathBuf::new(),
            category_list_path: PathBuf::new(),
            log_filter: String::new(),
            log_dir: PathBuf::new(),
            sandbox_verification_code: String::new(),
            sandbox_registered_emails: Vec::new(),
        }
    }

    /// Create AppConfig with directory files located under `data_dir`.
    ///
    /// The base directory is computed by the caller.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            bank_list_path: data_dir.join("banks.json"),
            category_list_path: data_dir.join("categories.json"),
            ..Self::empty()
        }
    }
}
