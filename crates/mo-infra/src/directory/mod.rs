//! File-backed reference data: settlement banks and business categories.
//!
//! Both files are JSON arrays. A missing or empty file yields an empty list.

mod bank_directory;
mod category_catalog;

pub use bank_directory::FileBankDirectory;
pub use category_catalog::FileCategoryCatalog;

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use tokio::fs;

async fn read_json_list<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "reference data file missing");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
