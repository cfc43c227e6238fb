//! Product service
//!
//! Provides business logic for product inventory: required fields, the owning
//! business and optional category/brand references, and list views with the
//! referenced names resolved.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BizdeskError, BizdeskResult};
use crate::models::{Brand, BrandId, Business, BusinessId, Category, CategoryId, Money, Product, ProductId};
use crate::storage::Storage;

use super::{clean_text, double_option, not_found, parse_ref, BusinessRef, NamedRef};

const REQUIRED_FIELDS: &str = "Name, businessId, price, and cost are required";

/// Request body for creating a product
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Money>,
    pub cost: Option<Money>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
    pub business_id: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<String>,
}

/// Request body for updating a product; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sku: Option<Option<String>>,
    pub price: Option<Money>,
    pub cost: Option<Money>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub brand_id: Option<Option<String>>,
    pub revision: Option<u32>,
}

/// A product with its business, category and brand names
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub business: BusinessRef,
    pub category: Option<NamedRef>,
    pub brand: Option<NamedRef>,
}

/// Service for product management
pub struct ProductService<'a> {
    storage: &'a Storage,
}

impl<'a> ProductService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new product
    pub fn create(&self, request: CreateProduct) -> BizdeskResult<ProductView> {
        let (name, business_id, price, cost) = match (
            clean_text(request.name.as_deref()),
            clean_text(request.business_id.as_deref()),
            request.price,
            request.cost,
        ) {
            (Some(name), Some(business_id), Some(price), Some(cost)) => {
                (name, business_id, price, cost)
            }
            _ => return Err(BizdeskError::Validation(REQUIRED_FIELDS.into())),
        };

        let business_id = self.existing_business(&business_id)?;

        let mut product = Product::new(business_id, name, price, cost);
        product.description = clean_text(request.description.as_deref());
        product.sku = clean_text(request.sku.as_deref());
        product.stock = request.stock.unwrap_or(0);
        product.min_stock = request.min_stock.unwrap_or(0);
        product.category_id = self.category_ref(request.category_id.as_deref())?;
        product.brand_id = self.brand_ref(request.brand_id.as_deref())?;

        product
            .validate()
            .map_err(|e| BizdeskError::Validation(e.to_string()))?;

        self.storage.products.upsert(product.clone())?;
        self.storage.products.save()?;
        self.storage.log_create(&product)?;

        info!(product = %product.id.short(), business = %business_id.short(), "product created");

        self.view(product)
    }

    pub fn get(&self, id: ProductId) -> BizdeskResult<Option<Product>> {
        self.storage.products.get(id)
    }

    /// Get a product with its references resolved
    pub fn get_view(&self, id: ProductId) -> BizdeskResult<ProductView> {
        let product = self.get(id)?.ok_or_else(|| not_found::<Product>(id))?;
        self.view(product)
    }

    /// Products, newest first, optionally limited to one business
    pub fn list(&self, business_id: Option<BusinessId>) -> BizdeskResult<Vec<ProductView>> {
        let products = match business_id {
            Some(id) => self.storage.products.for_business(id)?,
            None => self.storage.products.get_all()?,
        };

        let businesses: HashMap<BusinessId, Business> = self
            .storage
            .businesses
            .get_all()?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();
        let categories: HashMap<CategoryId, Category> = self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let brands: HashMap<BrandId, Brand> = self
            .storage
            .brands
            .get_all()?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| ProductView {
                business: BusinessRef {
                    name: businesses
                        .get(&product.business_id)
                        .map(|b| b.name.clone())
                        .unwrap_or_default(),
                },
                category: product
                    .category_id
                    .and_then(|id| categories.get(&id))
                    .map(|c| NamedRef { id: c.id.to_string(), name: c.name.clone() }),
                brand: product
                    .brand_id
                    .and_then(|id| brands.get(&id))
                    .map(|b| NamedRef { id: b.id.to_string(), name: b.name.clone() }),
                product,
            })
            .collect())
    }

    /// Update a product; fields present in the request overwrite stored values
    pub fn update(&self, id: ProductId, request: UpdateProduct) -> BizdeskResult<ProductView> {
        let name = match request.name.as_deref() {
            Some(name) => Some(
                clean_text(Some(name))
                    .ok_or_else(|| BizdeskError::Validation("Product name is required".into()))?,
            ),
            None => None,
        };
        let category_id = match request.category_id {
            Some(raw) => Some(self.category_ref(raw.as_deref())?),
            None => None,
        };
        let brand_id = match request.brand_id {
            Some(raw) => Some(self.brand_ref(raw.as_deref())?),
            None => None,
        };

        let (before, product) = self
            .storage
            .products
            .update_checked(id, request.revision, |product| {
                if let Some(name) = name {
                    product.name = name;
                }
                if let Some(description) = request.description {
                    product.description = clean_text(description.as_deref());
                }
                if let Some(sku) = request.sku {
                    product.sku = clean_text(sku.as_deref());
                }
                if let Some(price) = request.price {
                    product.price = price;
                }
                if let Some(cost) = request.cost {
                    product.cost = cost;
                }
                if let Some(stock) = request.stock {
                    product.stock = stock;
                }
                if let Some(min_stock) = request.min_stock {
                    product.min_stock = min_stock;
                }
                if let Some(category_id) = category_id {
                    product.category_id = category_id;
                }
                if let Some(brand_id) = brand_id {
                    product.brand_id = brand_id;
                }

                product
                    .validate()
                    .map_err(|e| BizdeskError::Validation(e.to_string()))?;
                product.touch();
                Ok(())
            })?
            .ok_or_else(|| not_found::<Product>(id))?;

        self.storage.products.save()?;
        self.storage.log_update(&before, &product)?;

        self.view(product)
    }

    /// Delete a product
    pub fn delete(&self, id: ProductId, revision: Option<u32>) -> BizdeskResult<Product> {
        let product = self
            .storage
            .products
            .delete_checked(id, revision)?
            .ok_or_else(|| not_found::<Product>(id))?;

        self.storage.products.save()?;
        self.storage.log_delete(&product)?;

        Ok(product)
    }

    fn view(&self, product: Product) -> BizdeskResult<ProductView> {
        let business = self.storage.businesses.get(product.business_id)?;
        let category = match product.category_id {
            Some(id) => self.storage.categories.get(id)?,
            None => None,
        };
        let brand = match product.brand_id {
            Some(id) => self.storage.brands.get(id)?,
            None => None,
        };

        Ok(ProductView {
            business: BusinessRef {
                name: business.map(|b| b.name).unwrap_or_default(),
            },
            category: category.map(|c| NamedRef { id: c.id.to_string(), name: c.name }),
            brand: brand.map(|b| NamedRef { id: b.id.to_string(), name: b.name }),
            product,
        })
    }

    fn existing_business(&self, raw: &str) -> BizdeskResult<BusinessId> {
        let id = parse_ref::<Business>(raw)?;
        match self.storage.businesses.get(id)? {
            Some(_) => Ok(id),
            None => Err(not_found::<Business>(raw)),
        }
    }

    /// Resolve an optional category reference; blank means none
    fn category_ref(&self, raw: Option<&str>) -> BizdeskResult<Option<CategoryId>> {
        let Some(raw) = clean_text(raw) else {
            return Ok(None);
        };
        let id = parse_ref::<Category>(&raw)?;
        match self.storage.categories.get(id)? {
            Some(_) => Ok(Some(id)),
            None => Err(not_found::<Category>(raw)),
        }
    }

    /// Resolve an optional brand reference; blank means none
    fn brand_ref(&self, raw: Option<&str>) -> BizdeskResult<Option<BrandId>> {
        let Some(raw) = clean_text(raw) else {
            return Ok(None);
        };
        let id = parse_ref::<Brand>(&raw)?;
        match self.storage.brands.get(id)? {
            Some(_) => Ok(Some(id)),
            None => Err(not_found::<Brand>(raw)),
        }
    }
}
