use anyhow::Result;
use async_trait::async_trait;

use crate::registration::BusinessCategory;

#[async_trait]
pub trait CategoryCatalogPort: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<BusinessCategory>>;
}
