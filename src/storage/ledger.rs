//! Income and expense persistence
//!
//! Both are dated money movements owned by a business and are listed by
//! date, most recent first.

use chrono::{DateTime, NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::BizdeskResult;
use crate::models::{BusinessId, Expense, ExpenseId, Income, IncomeId, Money};

use super::repository::{Record, Repository};

pub type IncomeRepository = Repository<Income>;
pub type ExpenseRepository = Repository<Expense>;

/// A dated money movement belonging to a business
pub trait LedgerEntry: Record {
    fn business_id(&self) -> BusinessId;
    fn date(&self) -> NaiveDate;
    fn amount(&self) -> Money;
}

impl<T: LedgerEntry> Repository<T> {
    /// Entries matching a predicate, by date descending
    pub fn find_by_date<F>(&self, predicate: F) -> BizdeskResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        // `find` already orders by creation, so equal dates keep newest first
        let mut list = self.find(predicate)?;
        list.sort_by_key(|entry| std::cmp::Reverse(entry.date()));
        Ok(list)
    }

    /// Entries of one business, by date descending
    pub fn entries_for(&self, business_id: BusinessId) -> BizdeskResult<Vec<T>> {
        self.find_by_date(|e| e.business_id() == business_id)
    }

    /// Entries dated on or after `since`, optionally limited to one business
    pub fn since(&self, business_id: Option<BusinessId>, since: NaiveDate) -> BizdeskResult<Vec<T>> {
        self.find_by_date(|e| {
            e.date() >= since && business_id.map_or(true, |id| e.business_id() == id)
        })
    }
}

impl Record for Income {
    type Id = IncomeId;
    const ENTITY: EntityType = EntityType::Income;

    fn id(&self) -> IncomeId {
        self.id
    }

    fn label(&self) -> String {
        self.description.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}

impl LedgerEntry for Income {
    fn business_id(&self) -> BusinessId {
        self.business_id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

impl Record for Expense {
    type Id = ExpenseId;
    const ENTITY: EntityType = EntityType::Expense;

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn label(&self) -> String {
        self.description.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}

impl LedgerEntry for Expense {
    fn business_id(&self) -> BusinessId {
        self.business_id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> Money {
        self.amount
    }
}
