use std::path::PathBuf;

use async_trait::async_trait;
use mo_core::ports::CategoryCatalogPort;
use mo_core::registration::BusinessCategory;

use super::read_json_list;

/// Category catalog read from a JSON file of `{ "id", "name" }` entries.
pub struct FileCategoryCatalog {
    path: PathBuf,
}

impl FileCategoryCatalog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CategoryCatalogPort for FileCategoryCatalog {
    async fn list_categories(&self) -> anyhow::Result<Vec<BusinessCategory>> {
        read_json_list(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_categories_with_numeric_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        std::fs::write(
            &path,
            r#"[{ "id": 1, "name": "Electronics" }, { "id": 3, "name": "Fashion" }]"#,
        )
        .unwrap();
        let catalog = FileCategoryCatalog::new(path);

        let categories = catalog.list_categories().await.unwrap();

        assert_eq!(
            categories,
            vec![
                BusinessCategory::new(1, "Electronics"),
                BusinessCategory::new(3, "Fashion"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_file_yields_no_categories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        std::fs::write(&path, "   ").unwrap();

        let categories = FileCategoryCatalog::new(path).list_categories().await.unwrap();
        assert!(categories.is_empty());
    }
}
