//! Business service
//!
//! Provides business logic for businesses: CRUD with record counts, cascade
//! deletion of owned records, and the metrics summary.

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BizdeskError, BizdeskResult};
use crate::models::{Business, BusinessId};
use crate::reports::BusinessMetrics;
use crate::storage::Storage;

use super::{clean_text, double_option, not_found};

/// Request body for creating a business
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusiness {
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

/// Request body for updating a business; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusiness {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub website: Option<Option<String>>,
    pub revision: Option<u32>,
}

/// Number of records owned by a business
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusinessCounts {
    pub products: usize,
    pub incomes: usize,
    pub expenses: usize,
}

/// A business with its `_count` block
#[derive(Debug, Clone, Serialize)]
pub struct BusinessSummary {
    #[serde(flatten)]
    pub business: Business,
    #[serde(rename = "_count")]
    pub counts: BusinessCounts,
}

/// Service for business management
pub struct BusinessService<'a> {
    storage: &'a Storage,
}

impl<'a> BusinessService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new business
    pub fn create(&self, request: CreateBusiness) -> BizdeskResult<BusinessSummary> {
        let name = clean_text(request.name.as_deref())
            .ok_or_else(|| BizdeskError::Validation("Business name is required".into()))?;

        let mut business = Business::new(name);
        business.address = clean_text(request.address.as_deref());
        business.website = clean_text(request.website.as_deref());

        business
            .validate()
            .map_err(|e| BizdeskError::Validation(e.to_string()))?;

        self.storage.businesses.upsert(business.clone())?;
        self.storage.businesses.save()?;
        self.storage.log_create(&business)?;

        info!(business = %business.id.short(), name = %business.name, "business created");

        Ok(BusinessSummary {
            business,
            counts: BusinessCounts::default(),
        })
    }

    pub fn get(&self, id: BusinessId) -> BizdeskResult<Option<Business>> {
        self.storage.businesses.get(id)
    }

    /// Find a business by UUID or case-insensitive name
    pub fn find(&self, identifier: &str) -> BizdeskResult<Option<Business>> {
        self.storage.businesses.resolve(identifier)
    }

    /// Get a business with its record counts
    pub fn get_summary(&self, id: BusinessId) -> BizdeskResult<BusinessSummary> {
        let business = self.get(id)?.ok_or_else(|| not_found::<Business>(id))?;
        let counts = self.counts(id)?;
        Ok(BusinessSummary { business, counts })
    }

    /// All businesses with record counts, newest first
    pub fn list(&self) -> BizdeskResult<Vec<BusinessSummary>> {
        self.storage
            .businesses
            .get_all()?
            .into_iter()
            .map(|business| {
                let counts = self.counts(business.id)?;
                Ok(BusinessSummary { business, counts })
            })
            .collect()
    }

    pub fn counts(&self, id: BusinessId) -> BizdeskResult<BusinessCounts> {
        Ok(BusinessCounts {
            products: self.storage.products.count_where(|p| p.business_id == id)?,
            incomes: self.storage.incomes.count_where(|i| i.business_id == id)?,
            expenses: self.storage.expenses.count_where(|e| e.business_id == id)?,
        })
    }

    /// Update a business; fields present in the request overwrite stored values
    pub fn update(&self, id: BusinessId, request: UpdateBusiness) -> BizdeskResult<Business> {
        let name = match request.name.as_deref() {
            Some(name) => Some(
                clean_text(Some(name))
                    .ok_or_else(|| BizdeskError::Validation("Business name is required".into()))?,
            ),
            None => None,
        };

        let (before, business) = self
            .storage
            .businesses
            .update_checked(id, request.revision, |business| {
                if let Some(name) = name {
                    business.name = name;
                }
                if let Some(address) = request.address {
                    business.address = clean_text(address.as_deref());
                }
                if let Some(website) = request.website {
                    business.website = clean_text(website.as_deref());
                }

                business
                    .validate()
                    .map_err(|e| BizdeskError::Validation(e.to_string()))?;
                business.touch();
                Ok(())
            })?
            .ok_or_else(|| not_found::<Business>(id))?;

        self.storage.businesses.save()?;
        self.storage.log_update(&before, &business)?;

        Ok(business)
    }

    /// Delete a business together with its products, incomes and expenses
    pub fn delete(&self, id: BusinessId, revision: Option<u32>) -> BizdeskResult<Business> {
        let business = self
            .storage
            .businesses
            .delete_checked(id, revision)?
            .ok_or_else(|| not_found::<Business>(id))?;

        let products = self.storage.products.delete_where(|p| p.business_id == id)?;
        let incomes = self.storage.incomes.delete_where(|i| i.business_id == id)?;
        let expenses = self.storage.expenses.delete_where(|e| e.business_id == id)?;

        self.storage.products.save()?;
        self.storage.incomes.save()?;
        self.storage.expenses.save()?;
        self.storage.businesses.save()?;

        self.storage.log_deletes(&products)?;
        self.storage.log_deletes(&incomes)?;
        self.storage.log_deletes(&expenses)?;
        self.storage.log_delete(&business)?;

        info!(
            business = %business.id.short(),
            products = products.len(),
            incomes = incomes.len(),
            expenses = expenses.len(),
            "business deleted"
        );

        Ok(business)
    }

    /// Income, expense and inventory figures for one business
    pub fn metrics(&self, id: BusinessId) -> BizdeskResult<BusinessMetrics> {
        let business = self.get(id)?.ok_or_else(|| not_found::<Business>(id))?;
        let products = self.storage.products.for_business(id)?;
        let incomes = self.storage.incomes.entries_for(id)?;
        let expenses = self.storage.expenses.entries_for(id)?;

        Ok(BusinessMetrics::compute(
            &business,
            &products,
            &incomes,
            &expenses,
            Local::now().date_naive(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Expense, Income, Money, Product};
    use crate::storage::tests::create_test_storage;

    fn create(service: &BusinessService, name: &str) -> Business {
        service
            .create(CreateBusiness {
                name: Some(name.into()),
                ..Default::default()
            })
            .unwrap()
            .business
    }

    #[test]
    fn test_create_business() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BusinessService::new(&storage);

        let summary = service
            .create(CreateBusiness {
                name: Some("  Servicell ".into()),
                address: Some("Calle Mayor 1".into()),
                website: Some("   ".into()),
            })
            .unwrap();

        assert_eq!(summary.business.name, "Servicell");
        assert_eq!(summary.business.address.as_deref(), Some("Calle Mayor 1"));
        assert!(summary.business.website.is_none());
        assert_eq!(summary.counts, BusinessCounts::default());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["_count"]["products"], 0);
        assert_eq!(json["name"], "Servicell");
    }

    #[test]
    fn test_create_requires_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BusinessService::new(&storage);

        let err = service.create(CreateBusiness::default()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: Business name is required");
    }

    #[test]
    fn test_update_overwrites_present_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BusinessService::new(&storage);
        let business = create(&service, "Servicell");

        let updated = service
            .update(
                business.id,
                UpdateBusiness {
                    address: Some(Some("Plaza 2".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Servicell");
        assert_eq!(updated.address.as_deref(), Some("Plaza 2"));
        assert_eq!(updated.revision, 2);

        let cleared = service
            .update(
                business.id,
                UpdateBusiness {
                    address: Some(None),
                    revision: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(cleared.address.is_none());
    }

    #[test]
    fn test_stale_revision_conflicts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BusinessService::new(&storage);
        let business = create(&service, "Servicell");

        service
            .update(business.id, UpdateBusiness { name: Some("A".into()), ..Default::default() })
            .unwrap();

        let err = service
            .update(
                business.id,
                UpdateBusiness {
                    name: Some("B".into()),
                    revision: Some(1),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_conflict());

        assert!(service.delete(business.id, Some(1)).unwrap_err().is_conflict());
        assert_eq!(service.get(business.id).unwrap().unwrap().name, "A");
    }

    #[test]
    fn test_delete_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BusinessService::new(&storage);
        let doomed = create(&service, "Cerrado");
        let kept = create(&service, "Abierto");

        let today = Local::now().date_naive();
        for business_id in [doomed.id, kept.id] {
            storage
                .products
                .upsert(Product::new(business_id, "Cable", Money::from_cents(500), Money::zero()))
                .unwrap();
            storage
                .incomes
                .upsert(Income::new(business_id, "Venta", Money::from_cents(500), today))
                .unwrap();
            storage
                .expenses
                .upsert(Expense::new(business_id, "Luz", Money::from_cents(100), today))
                .unwrap();
        }

        service.delete(doomed.id, None).unwrap();

        assert!(service.get(doomed.id).unwrap().is_none());
        assert_eq!(storage.products.count().unwrap(), 1);
        assert_eq!(storage.incomes.count().unwrap(), 1);
        assert_eq!(storage.expenses.count().unwrap(), 1);
        assert_eq!(service.counts(kept.id).unwrap().products, 1);

        let entries = storage.audit().read_all().unwrap();
        let deletes = entries
            .iter()
            .filter(|e| e.operation == Operation::Delete)
            .count();
        assert_eq!(deletes, 4);
    }

    #[test]
    fn test_missing_business() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BusinessService::new(&storage);

        assert!(service.get_summary(BusinessId::new()).unwrap_err().is_not_found());
        assert!(service.delete(BusinessId::new(), None).unwrap_err().is_not_found());
        assert!(service.metrics(BusinessId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_includes_counts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BusinessService::new(&storage);
        let business = create(&service, "Servicell");
        storage
            .products
            .upsert(Product::new(business.id, "Funda", Money::from_cents(900), Money::zero()))
            .unwrap();

        let list = service.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].counts.products, 1);
        assert_eq!(service.find("SERVICELL").unwrap().unwrap().id, business.id);
    }
}
