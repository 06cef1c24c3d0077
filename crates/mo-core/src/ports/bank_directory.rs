use anyhow::Result;
use async_trait::async_trait;

use crate::registration::BankEntry;

#[async_trait]
pub trait BankDirectoryPort: Send + Sync {
    /// Banks whose name matches `query`. Entries returned here are the only
    /// ones a draft may select.
    async fn search_banks(&self, query: &str) -> Result<Vec<BankEntry>>;
}
