//! Shared logic for incomes and expenses
//!
//! Both are dated amounts owned by a business with identical rules, so one
//! generic service serves both through [`LedgerRecord`].

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BizdeskError, BizdeskResult};
use crate::models::{Business, BusinessId, EntryValidationError, Money};
use crate::storage::{LedgerEntry, Repository, Storage};

use super::{clean_text, lenient_date, not_found, parse_ref, BusinessRef};

const REQUIRED_FIELDS: &str = "Description, amount, and businessId are required";

/// Record types managed by [`LedgerService`]
pub trait LedgerRecord: LedgerEntry {
    fn create(business_id: BusinessId, description: String, amount: Money, date: NaiveDate) -> Self;

    fn repository(storage: &Storage) -> &Repository<Self>;

    fn set_description(&mut self, description: String);
    fn set_amount(&mut self, amount: Money);
    fn set_date(&mut self, date: NaiveDate);

    fn touch(&mut self);
    fn validate(&self) -> Result<(), EntryValidationError>;
}

/// Request body for creating an income or expense
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntry {
    pub description: Option<String>,
    pub amount: Option<Money>,
    /// Defaults to today
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub business_id: Option<String>,
}

/// Request body for updating an income or expense; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntry {
    pub description: Option<String>,
    pub amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub revision: Option<u32>,
}

/// An income or expense with its business name
#[derive(Debug, Clone, Serialize)]
pub struct EntryView<T> {
    #[serde(flatten)]
    pub entry: T,
    pub business: BusinessRef,
}

/// Service for income or expense management
pub struct LedgerService<'a, T> {
    storage: &'a Storage,
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: LedgerRecord> LedgerService<'a, T> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            _marker: std::marker::PhantomData,
        }
    }

    fn repo(&self) -> &'a Repository<T> {
        T::repository(self.storage)
    }

    pub fn create(&self, request: CreateEntry) -> BizdeskResult<EntryView<T>> {
        let (description, amount, business_id) = match (
            clean_text(request.description.as_deref()),
            request.amount,
            clean_text(request.business_id.as_deref()),
        ) {
            (Some(description), Some(amount), Some(business_id)) => {
                (description, amount, business_id)
            }
            _ => return Err(BizdeskError::Validation(REQUIRED_FIELDS.into())),
        };

        let id = parse_ref::<Business>(&business_id)?;
        let business = self
            .storage
            .businesses
            .get(id)?
            .ok_or_else(|| not_found::<Business>(&business_id))?;

        let date = request.date.unwrap_or_else(|| Local::now().date_naive());
        let entry = T::create(business.id, description, amount, date);
        entry
            .validate()
            .map_err(|e| BizdeskError::Validation(e.to_string()))?;

        self.repo().upsert(entry.clone())?;
        self.repo().save()?;
        self.storage.log_create(&entry)?;

        let kind = T::ENTITY;
        info!(
            kind = %kind,
            business = %business.id.short(),
            amount = %entry.amount(),
            "entry created"
        );

        Ok(EntryView {
            entry,
            business: BusinessRef {
                name: business.name,
            },
        })
    }

    pub fn get(&self, id: T::Id) -> BizdeskResult<T> {
        self.repo().get(id)?.ok_or_else(|| not_found::<T>(id))
    }

    pub fn get_view(&self, id: T::Id) -> BizdeskResult<EntryView<T>> {
        let entry = self.get(id)?;
        self.view(entry)
    }

    /// Entries by date descending, optionally limited to one business and
    /// to dates on or after `since`
    pub fn list(
        &self,
        business_id: Option<BusinessId>,
        since: Option<NaiveDate>,
    ) -> BizdeskResult<Vec<EntryView<T>>> {
        let entries = match since {
            Some(since) => self.repo().since(business_id, since)?,
            None => self
                .repo()
                .find_by_date(|e| business_id.map_or(true, |id| e.business_id() == id))?,
        };

        let names: std::collections::HashMap<BusinessId, String> = self
            .storage
            .businesses
            .get_all()?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| EntryView {
                business: BusinessRef {
                    name: names.get(&entry.business_id()).cloned().unwrap_or_default(),
                },
                entry,
            })
            .collect())
    }

    pub fn update(&self, id: T::Id, request: UpdateEntry) -> BizdeskResult<EntryView<T>> {
        let description = match request.description.as_deref() {
            Some(description) => Some(
                clean_text(Some(description))
                    .ok_or_else(|| BizdeskError::Validation(REQUIRED_FIELDS.into()))?,
            ),
            None => None,
        };

        let (before, entry) = self
            .repo()
            .update_checked(id, request.revision, |entry| {
                if let Some(description) = description {
                    entry.set_description(description);
                }
                if let Some(amount) = request.amount {
                    entry.set_amount(amount);
                }
                if let Some(date) = request.date {
                    entry.set_date(date);
                }

                entry
                    .validate()
                    .map_err(|e| BizdeskError::Validation(e.to_string()))?;
                entry.touch();
                Ok(())
            })?
            .ok_or_else(|| not_found::<T>(id))?;

        self.repo().save()?;
        self.storage.log_update(&before, &entry)?;

        self.view(entry)
    }

    pub fn delete(&self, id: T::Id, revision: Option<u32>) -> BizdeskResult<T> {
        let entry = self
            .repo()
            .delete_checked(id, revision)?
            .ok_or_else(|| not_found::<T>(id))?;

        self.repo().save()?;
        self.storage.log_delete(&entry)?;

        Ok(entry)
    }

    fn view(&self, entry: T) -> BizdeskResult<EntryView<T>> {
        let name = self
            .storage
            .businesses
            .get(entry.business_id())?
            .map(|b| b.name)
            .unwrap_or_default();
        Ok(EntryView {
            entry,
            business: BusinessRef { name },
        })
    }
}
