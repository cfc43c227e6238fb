//! Brand model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{validate_catalog_name, CatalogValidationError};
use super::ids::BrandId;

/// A product brand (e.g., "Samsung", "Xiaomi")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    /// Unique (case-insensitive) name
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "super::initial_revision")]
    pub revision: u32,
}

impl Brand {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BrandId::new(),
            name: name.into(),
            description: None,
            website: None,
            created_at: now,
            updated_at: now,
            revision: super::initial_revision(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.revision += 1;
    }

    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        validate_catalog_name(&self.name)
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
