//! Category model
//!
//! Categories classify products across all businesses. Products reference a
//! category without owning it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Validation errors for categories and brands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CatalogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::NameTooLong(len) => write!(f, "Name too long ({} chars, max 80)", len),
        }
    }
}

impl std::error::Error for CatalogValidationError {}

pub(crate) fn validate_catalog_name(name: &str) -> Result<(), CatalogValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > 80 {
        return Err(CatalogValidationError::NameTooLong(len));
    }
    Ok(())
}

/// A product category (e.g., "Pantallas", "Baterías")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,

    /// Unique (case-insensitive) name
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default = "super::initial_revision")]
    pub revision: u32,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
            revision: super::initial_revision(),
        }
    }

    /// Create a category with a description
    pub fn with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut category = Self::new(name);
        category.description = Some(description.into());
        category
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.revision += 1;
    }

    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        validate_catalog_name(&self.name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
