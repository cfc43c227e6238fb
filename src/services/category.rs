//! Category service
//!
//! Provides business logic for the shared product categories: unique
//! case-insensitive names, product counts, and detaching products when a
//! category is deleted.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BizdeskError, BizdeskResult};
use crate::models::{Category, CategoryId};
use crate::storage::Storage;

use super::{clean_text, double_option, not_found};

/// Request body for creating a category
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request body for updating a category; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub revision: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductCount {
    pub products: usize,
}

/// A category or brand with the number of products referencing it
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(rename = "_count")]
    pub counts: ProductCount,
}

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, request: CreateCategory) -> BizdeskResult<Category> {
        let name = clean_text(request.name.as_deref())
            .ok_or_else(|| BizdeskError::Validation("Category name is required".into()))?;

        self.ensure_unique(&name, None)?;

        let mut category = Category::new(name);
        category.description = clean_text(request.description.as_deref());

        category
            .validate()
            .map_err(|e| BizdeskError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;
        self.storage.log_create(&category)?;

        info!(category = %category.name, "category created");

        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> BizdeskResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| not_found::<Category>(id))
    }

    /// All categories ordered by name, with product counts
    pub fn list(&self) -> BizdeskResult<Vec<CatalogSummary<Category>>> {
        self.storage
            .categories
            .get_all_by_name()?
            .into_iter()
            .map(|category| {
                let id = category.id;
                let products = self
                    .storage
                    .products
                    .count_where(|p| p.category_id == Some(id))?;
                Ok(CatalogSummary {
                    item: category,
                    counts: ProductCount { products },
                })
            })
            .collect()
    }

    /// Update a category; fields present in the request overwrite stored values
    pub fn update(&self, id: CategoryId, request: UpdateCategory) -> BizdeskResult<Category> {
        let name = match request.name.as_deref() {
            Some(name) => {
                let name = clean_text(Some(name))
                    .ok_or_else(|| BizdeskError::Validation("Category name is required".into()))?;
                self.ensure_unique(&name, Some(id))?;
                Some(name)
            }
            None => None,
        };

        let (before, category) = self
            .storage
            .categories
            .update_checked(id, request.revision, |category| {
                if let Some(name) = name {
                    category.name = name;
                }
                if let Some(description) = request.description {
                    category.description = clean_text(description.as_deref());
                }

                category
                    .validate()
                    .map_err(|e| BizdeskError::Validation(e.to_string()))?;
                category.touch();
                Ok(())
            })?
            .ok_or_else(|| not_found::<Category>(id))?;

        self.storage.categories.save()?;
        self.storage.log_update(&before, &category)?;

        Ok(category)
    }

    /// Delete a category, clearing it from every product that referenced it
    pub fn delete(&self, id: CategoryId, revision: Option<u32>) -> BizdeskResult<Category> {
        let category = self
            .storage
            .categories
            .delete_checked(id, revision)?
            .ok_or_else(|| not_found::<Category>(id))?;

        let detached = self.storage.products.clear_category(id)?;

        self.storage.products.save()?;
        self.storage.categories.save()?;
        self.storage.log_updates(&detached)?;
        self.storage.log_delete(&category)?;

        info!(category = %category.name, detached = detached.len(), "category deleted");

        Ok(category)
    }

    fn ensure_unique(&self, name: &str, current: Option<CategoryId>) -> BizdeskResult<()> {
        match self.storage.categories.get_by_name(name)? {
            Some(existing) if Some(existing.id) != current => Err(BizdeskError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
