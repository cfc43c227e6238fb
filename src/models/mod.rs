//! Core data models for Bizdesk
//!
//! This module contains the data structures of the business domain:
//! businesses, their products, incomes and expenses, and the shared
//! product categories and brands.

pub mod brand;
pub mod business;
pub mod category;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;
pub mod product;

pub use brand::Brand;
pub use business::Business;
pub use category::{CatalogValidationError, Category};
pub use expense::Expense;
pub use ids::{BrandId, BusinessId, CategoryId, ExpenseId, IncomeId, ProductId};
pub use income::{EntryValidationError, Income};
pub use money::Money;
pub use product::Product;

/// Revision every record starts at
pub(crate) fn initial_revision() -> u32 {
    1
}
