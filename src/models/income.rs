//! Income model
//!
//! Money received by a business on a given date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BusinessId, IncomeId};
use super::money::Money;

/// Validation errors for income and expense entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyDescription,
    NegativeAmount,
    AmountOutOfRange,
}

impl std::fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description is required"),
            Self::NegativeAmount => write!(f, "Amount cannot be negative"),
            Self::AmountOutOfRange => write!(f, "Amount cannot exceed {}", Money::MAX),
        }
    }
}

impl std::error::Error for EntryValidationError {}

pub(crate) fn validate_entry(description: &str, amount: Money) -> Result<(), EntryValidationError> {
    if description.trim().is_empty() {
        return Err(EntryValidationError::EmptyDescription);
    }
    if amount.is_negative() {
        return Err(EntryValidationError::NegativeAmount);
    }
    if amount.is_out_of_range() {
        return Err(EntryValidationError::AmountOutOfRange);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: IncomeId,
    pub description: String,
    pub amount: Money,
    /// Date the income was received
    pub date: NaiveDate,
    pub business_id: BusinessId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "super::initial_revision")]
    pub revision: u32,
}

impl Income {
    pub fn new(
        business_id: BusinessId,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeId::new(),
            description: description.into(),
            amount,
            date,
            business_id,
            created_at: now,
            updated_at: now,
            revision: super::initial_revision(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.revision += 1;
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_entry(&self.description, self.amount)
    }
}
