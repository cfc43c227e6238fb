//! Business model
//!
//! A business is the tenant root: it owns products, incomes and expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BusinessId;

/// Validation errors for businesses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for BusinessValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Business name is required"),
            Self::NameTooLong(len) => {
                write!(f, "Business name too long ({} chars, max 120)", len)
            }
        }
    }
}

impl std::error::Error for BusinessValidationError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "super::initial_revision")]
    pub revision: u32,
}

impl Business {
    /// Create a new business
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BusinessId::new(),
            name: name.into(),
            address: None,
            website: None,
            created_at: now,
            updated_at: now,
            revision: super::initial_revision(),
        }
    }

    /// Mark the business as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.revision += 1;
    }

    pub fn validate(&self) -> Result<(), BusinessValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BusinessValidationError::EmptyName);
        }
        if name.chars().count() > 120 {
            return Err(BusinessValidationError::NameTooLong(name.chars().count()));
        }
        Ok(())
    }
}

impl fmt::Display for Business {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
