//! Reference data the draft resolves against: settlement banks and business categories.

use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// A settlement bank as returned by the bank directory lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankEntry {
    pub name: String,
    pub code: String,
}

impl BankEntry {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// A business category as published by the category catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCategory {
    pub id: CategoryId,
    pub name: String,
}

impl BusinessCategory {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId(id),
            name: name.into(),
        }
    }
}

/// Category list fetched once per session.
///
/// Resolution is a single exact name lookup. Anything that does not match is
/// left unresolved and reported by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<BusinessCategory>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<BusinessCategory>) -> Self {
        Self { categories }
    }

    pub fn resolve(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.id)
    }

    pub fn categories(&self) -> &[BusinessCategory] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
