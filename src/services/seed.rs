//! Seed service
//!
//! Loads the starter catalogue of categories and brands, skipping names that
//! already exist.

use serde::Serialize;
use tracing::info;

use crate::error::BizdeskResult;
use crate::models::{Brand, Category};
use crate::storage::{Storage, SEED_BRANDS, SEED_CATEGORIES};

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Size of the category catalogue
    pub categories: usize,
    /// Size of the brand catalogue
    pub brands: usize,
    /// Categories actually inserted by this run
    #[serde(skip)]
    pub inserted_categories: usize,
    /// Brands actually inserted by this run
    #[serde(skip)]
    pub inserted_brands: usize,
}

pub struct SeedService<'a> {
    storage: &'a Storage,
}

impl<'a> SeedService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Insert every catalogue entry whose name is not taken yet
    pub fn run(&self) -> BizdeskResult<SeedReport> {
        let mut new_categories = Vec::new();
        for (name, description) in SEED_CATEGORIES {
            if self.storage.categories.get_by_name(name)?.is_none() {
                let category = Category::with_description(*name, *description);
                self.storage.categories.upsert(category.clone())?;
                new_categories.push(category);
            }
        }

        let mut new_brands = Vec::new();
        for (name, description, website) in SEED_BRANDS {
            if self.storage.brands.get_by_name(name)?.is_none() {
                let mut brand = Brand::new(*name);
                brand.description = Some(description.to_string());
                brand.website = website.map(str::to_string);
                self.storage.brands.upsert(brand.clone())?;
                new_brands.push(brand);
            }
        }

        if !new_categories.is_empty() {
            self.storage.categories.save()?;
        }
        if !new_brands.is_empty() {
            self.storage.brands.save()?;
        }
        for category in &new_categories {
            self.storage.log_create(category)?;
        }
        for brand in &new_brands {
            self.storage.log_create(brand)?;
        }

        info!(
            categories = new_categories.len(),
            brands = new_brands.len(),
            "seed catalogue loaded"
        );

        Ok(SeedReport {
            categories: SEED_CATEGORIES.len(),
            brands: SEED_BRANDS.len(),
            inserted_categories: new_categories.len(),
            inserted_brands: new_brands.len(),
        })
    }
}
