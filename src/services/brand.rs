//! Brand service

use serde::Deserialize;
use tracing::info;

use crate::error::{BizdeskError, BizdeskResult};
use crate::models::{Brand, BrandId};
use crate::storage::Storage;

use super::category::{CatalogSummary, ProductCount};
use super::{clean_text, double_option, not_found};

/// Request body for creating a brand
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

/// Request body for updating a brand; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBrand {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub website: Option<Option<String>>,
    pub revision: Option<u32>,
}

/// Service for brand management
pub struct BrandService<'a> {
    storage: &'a Storage,
}

impl<'a> BrandService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, request: CreateBrand) -> BizdeskResult<Brand> {
        let name = clean_text(request.name.as_deref())
            .ok_or_else(|| BizdeskError::Validation("Brand name is required".into()))?;

        self.ensure_unique(&name, None)?;

        let mut brand = Brand::new(name);
        brand.description = clean_text(request.description.as_deref());
        brand.website = clean_text(request.website.as_deref());

        brand
            .validate()
            .map_err(|e| BizdeskError::Validation(e.to_string()))?;

        self.storage.brands.upsert(brand.clone())?;
        self.storage.brands.save()?;
        self.storage.log_create(&brand)?;

        info!(brand = %brand.name, "brand created");

        Ok(brand)
    }

    pub fn get(&self, id: BrandId) -> BizdeskResult<Brand> {
        self.storage
            .brands
            .get(id)?
            .ok_or_else(|| not_found::<Brand>(id))
    }

    /// All brands ordered by name, with product counts
    pub fn list(&self) -> BizdeskResult<Vec<CatalogSummary<Brand>>> {
        self.storage
            .brands
            .get_all_by_name()?
            .into_iter()
            .map(|brand| {
                let id = brand.id;
                let products = self
                    .storage
                    .products
                    .count_where(|p| p.brand_id == Some(id))?;
                Ok(CatalogSummary {
                    item: brand,
                    counts: ProductCount { products },
                })
            })
            .collect()
    }

    pub fn update(&self, id: BrandId, request: UpdateBrand) -> BizdeskResult<Brand> {
        let name = match request.name.as_deref() {
            Some(name) => {
                let name = clean_text(Some(name))
                    .ok_or_else(|| BizdeskError::Validation("Brand name is required".into()))?;
                self.ensure_unique(&name, Some(id))?;
                Some(name)
            }
            None => None,
        };

        let (before, brand) = self
            .storage
            .brands
            .update_checked(id, request.revision, |brand| {
                if let Some(name) = name {
                    brand.name = name;
                }
                if let Some(description) = request.description {
                    brand.description = clean_text(description.as_deref());
                }
                if let Some(website) = request.website {
                    brand.website = clean_text(website.as_deref());
                }

                brand
                    .validate()
                    .map_err(|e| BizdeskError::Validation(e.to_string()))?;
                brand.touch();
                Ok(())
            })?
            .ok_or_else(|| not_found::<Brand>(id))?;

        self.storage.brands.save()?;
        self.storage.log_update(&before, &brand)?;

        Ok(brand)
    }

    /// Delete a brand, clearing it from every product that referenced it
    pub fn delete(&self, id: BrandId, revision: Option<u32>) -> BizdeskResult<Brand> {
        let brand = self
            .storage
            .brands
            .delete_checked(id, revision)?
            .ok_or_else(|| not_found::<Brand>(id))?;

        let detached = self.storage.products.clear_brand(id)?;

        self.storage.products.save()?;
        self.storage.brands.save()?;
        self.storage.log_updates(&detached)?;
        self.storage.log_delete(&brand)?;

        info!(brand = %brand.name, detached = detached.len(), "brand deleted");

        Ok(brand)
    }

    fn ensure_unique(&self, name: &str, current: Option<BrandId>) -> BizdeskResult<()> {
        match self.storage.brands.get_by_name(name)? {
            Some(existing) if Some(existing.id) != current => Err(BizdeskError::Duplicate {
                entity_type: "Brand",
                identifier: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
