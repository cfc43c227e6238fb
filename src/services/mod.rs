//! Service layer for Bizdesk
//!
//! The service layer provides business logic on top of the storage layer:
//! required-field validation, referential checks, revision checks, cascades,
//! and the audit trail. Both the HTTP handlers and the CLI go through it.

pub mod brand;
pub mod business;
pub mod category;
pub mod expense;
pub mod export;
pub mod income;
pub mod ledger;
pub mod product;
pub mod seed;

pub use brand::{BrandService, CreateBrand, UpdateBrand};
pub use business::{BusinessCounts, BusinessService, BusinessSummary, CreateBusiness, UpdateBusiness};
pub use category::{CatalogSummary, CategoryService, CreateCategory, ProductCount, UpdateCategory};
pub use expense::ExpenseService;
pub use export::ExportService;
pub use income::IncomeService;
pub use ledger::{CreateEntry, EntryView, LedgerRecord, LedgerService, UpdateEntry};
pub use product::{CreateProduct, ProductService, ProductView, UpdateProduct};
pub use seed::{SeedReport, SeedService};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BizdeskError, BizdeskResult};
use crate::storage::Record;

/// `{ "name": ... }` reference to the owning business
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BusinessRef {
    pub name: String,
}

/// `{ "id": ..., "name": ... }` reference to a category or brand
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

pub(crate) fn not_found<T: Record>(identifier: impl ToString) -> BizdeskError {
    BizdeskError::NotFound {
        entity_type: T::ENTITY.as_str(),
        identifier: identifier.to_string(),
    }
}

/// Trimmed text, or `None` when absent or blank
pub(crate) fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a referenced id; malformed ids are reported like unknown ones
pub(crate) fn parse_ref<T>(raw: &str) -> BizdeskResult<T::Id>
where
    T: Record,
    T::Id: std::str::FromStr,
{
    raw.parse::<T::Id>().map_err(|_| not_found::<T>(raw))
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping the date part
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s))),
    }
}
