use std::path::PathBuf;

use async_trait::async_trait;
use mo_core::ports::BankDirectoryPort;
use mo_core::registration::BankEntry;
use tokio::sync::OnceCell;

use super::read_json_list;

/// Bank directory read from a JSON file of `{ "name", "code" }` entries.
///
/// The file is loaded on the first search and kept for the process lifetime.
pub struct FileBankDirectory {
    path: PathBuf,
    banks: OnceCell<Vec<BankEntry>>,
}

impl FileBankDirectory {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            banks: OnceCell::new(),
        }
    }
}

#[async_trait]
impl BankDirectoryPort for FileBankDirectory {
    /// Case-insensitive substring match on the bank name. A blank query lists every bank.
    async fn search_banks(&self, query: &str) -> anyhow::Result<Vec<BankEntry>> {
        let banks = self
            .banks
            .get_or_try_init(|| read_json_list(&self.path))
            .await?;

        let query = query.trim().to_lowercase();
        Ok(banks
            .iter()
            .filter(|bank| bank.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BANKS: &str = r#"[
        { "name": "Access Bank", "code": "044" },
        { "name": "Guaranty Trust Bank", "code": "058" },
        { "name": "Zenith Bank", "code": "057" }
    ]"#;

    #[tokio::test]
    async fn search_matches_name_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("banks.json");
        std::fs::write(&path, BANKS).unwrap();
        let directory = FileBankDirectory::new(path);

        let found = directory.search_banks("TRUST").await.unwrap();

        assert_eq!(found, vec![BankEntry::new("Guaranty Trust Bank", "058")]);
    }

    #[tokio::test]
    async fn blank_query_lists_every_bank() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("banks.json");
        std::fs::write(&path, BANKS).unwrap();
        let directory = FileBankDirectory::new(path);

        assert_eq!(directory.search_banks("  ").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_file_yields_no_banks() {
        let temp_dir = TempDir::new().unwrap();
        let directory = FileBankDirectory::new(temp_dir.path().join("missing.json"));

        assert!(directory.search_banks("bank").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("banks.json");
        std::fs::write(&path, "{ not json").unwrap();
        let directory = FileBankDirectory::new(path);

        let err = directory.search_banks("bank").await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
