//! Expense model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BusinessId, ExpenseId};
use super::income::{validate_entry, EntryValidationError};
use super::money::Money;

/// Money spent by a business on a given date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub business_id: BusinessId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "super::initial_revision")]
    pub revision: u32,
}

impl Expense {
    pub fn new(
        business_id: BusinessId,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
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
