//! Expense service

use chrono::NaiveDate;

use crate::models::{BusinessId, EntryValidationError, Expense, Money};
use crate::storage::{Repository, Storage};

use super::ledger::{LedgerRecord, LedgerService};

/// Service for expense management
pub type ExpenseService<'a> = LedgerService<'a, Expense>;

impl LedgerRecord for Expense {
    fn create(business_id: BusinessId, description: String, amount: Money, date: NaiveDate) -> Self {
        Expense::new(business_id, description, amount, date)
    }

    fn repository(storage: &Storage) -> &Repository<Self> {
        &storage.expenses
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
    }

    fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    fn touch(&mut self) {
        Expense::touch(self);
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        Expense::validate(self)
    }
}
