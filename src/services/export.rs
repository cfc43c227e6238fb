//! Export service
//!
//! Reads the rows of each export section from storage. The HTTP handler runs
//! the three fetches of an `all` export concurrently; [`ExportService::export`]
//! runs them one after another for the CLI.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::ExportSettings;
use crate::error::BizdeskResult;
use crate::export::{self, CsvExport, DataType, EntryRow, ExportData, ProductRow};
use crate::models::BusinessId;
use crate::storage::Storage;

/// Service for CSV export
pub struct ExportService<'a> {
    storage: &'a Storage,
}

impl<'a> ExportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Products of a business, newest first, with category and brand names
    pub fn product_rows(&self, business_id: BusinessId) -> BizdeskResult<Vec<ProductRow>> {
        let categories: HashMap<_, _> = self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let brands: HashMap<_, _> = self
            .storage
            .brands
            .get_all()?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        Ok(self
            .storage
            .products
            .for_business(business_id)?
            .into_iter()
            .map(|product| ProductRow {
                category: product.category_id.and_then(|id| categories.get(&id).cloned()),
                brand: product.brand_id.and_then(|id| brands.get(&id).cloned()),
                product,
            })
            .collect())
    }

    /// Incomes of a business by date descending
    pub fn income_rows(&self, business_id: BusinessId) -> BizdeskResult<Vec<EntryRow>> {
        Ok(self
            .storage
            .incomes
            .entries_for(business_id)?
            .into_iter()
            .map(EntryRow::from)
            .collect())
    }

    /// Expenses of a business by date descending
    pub fn expense_rows(&self, business_id: BusinessId) -> BizdeskResult<Vec<EntryRow>> {
        Ok(self
            .storage
            .expenses
            .entries_for(business_id)?
            .into_iter()
            .map(EntryRow::from)
            .collect())
    }

    /// Fetch the sections `data_type` covers
    pub fn collect(&self, business_id: BusinessId, data_type: DataType) -> BizdeskResult<ExportData> {
        let mut data = ExportData::default();
        if data_type.includes(export::Section::Products) {
            data.products = self.product_rows(business_id)?;
        }
        if data_type.includes(export::Section::Incomes) {
            data.incomes = self.income_rows(business_id)?;
        }
        if data_type.includes(export::Section::Expenses) {
            data.expenses = self.expense_rows(business_id)?;
        }
        Ok(data)
    }

    /// Name of the business for the export filename, if it exists
    pub fn business_name(&self, business_id: BusinessId) -> BizdeskResult<Option<String>> {
        Ok(self.storage.businesses.get(business_id)?.map(|b| b.name))
    }

    /// Produce a complete export
    ///
    /// `Ok(None)` means there was nothing to export under the `not_found`
    /// policy.
    pub fn export(
        &self,
        business_id: BusinessId,
        data_type: DataType,
        selected: &[String],
        settings: &ExportSettings,
        today: NaiveDate,
    ) -> BizdeskResult<Option<CsvExport>> {
        let data = self.collect(business_id, data_type)?;
        debug!(
            business = %business_id.short(),
            data_type = %data_type,
            products = data.products.len(),
            incomes = data.incomes.len(),
            expenses = data.expenses.len(),
            "export data collected"
        );

        let Some(content) = export::build_csv(data_type, &data, selected, settings) else {
            return Ok(None);
        };
        let name = self.business_name(business_id)?;

        Ok(Some(CsvExport {
            filename: export::export_filename(name.as_deref(), data_type, today),
            content,
        }))
    }
}
