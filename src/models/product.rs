//! Product model
//!
//! Inventory items owned by a business, optionally classified by a shared
//! category and brand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BrandId, BusinessId, CategoryId, ProductId};
use super::money::Money;

/// Validation errors for products
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    EmptyName,
    NegativePrice,
    NegativeCost,
    PriceOutOfRange,
    CostOutOfRange,
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Product name is required"),
            Self::NegativePrice => write!(f, "Product price cannot be negative"),
            Self::NegativeCost => write!(f, "Product cost cannot be negative"),
            Self::PriceOutOfRange => write!(f, "Product price cannot exceed {}", Money::MAX),
            Self::CostOutOfRange => write!(f, "Product cost cannot exceed {}", Money::MAX),
        }
    }
}

impl std::error::Error for ProductValidationError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Sale price per unit
    pub price: Money,
    /// Purchase cost per unit
    pub cost: Money,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub min_stock: u32,
    pub business_id: BusinessId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "super::initial_revision")]
    pub revision: u32,
}

impl Product {
    pub fn new(business_id: BusinessId, name: impl Into<String>, price: Money, cost: Money) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: name.into(),
            description: None,
            sku: None,
            price,
            cost,
            stock: 0,
            min_stock: 0,
            business_id,
            category_id: None,
            brand_id: None,
            created_at: now,
            updated_at: now,
            revision: super::initial_revision(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.revision += 1;
    }

    /// Stock at or below the configured minimum
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Profit per unit sold
    pub fn unit_profit(&self) -> Money {
        self.price - self.cost
    }

    /// Profit margin as a percentage of price; `None` when the price is zero
    pub fn margin_percent(&self) -> Option<f64> {
        if self.price.is_zero() {
            return None;
        }
        Some(self.unit_profit().cents() as f64 / self.price.cents() as f64 * 100.0)
    }

    /// Stock valued at cost
    pub fn inventory_value(&self) -> Money {
        self.cost * self.stock
    }

    /// Stock valued at sale price
    pub fn retail_value(&self) -> Money {
        self.price * self.stock
    }

    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.price.is_negative() {
            return Err(ProductValidationError::NegativePrice);
        }
        if self.cost.is_negative() {
            return Err(ProductValidationError::NegativeCost);
        }
        if self.price.is_out_of_range() {
            return Err(ProductValidationError::PriceOutOfRange);
        }
        if self.cost.is_out_of_range() {
            return Err(ProductValidationError::CostOutOfRange);
        }
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cable() -> Product {
        Product::new(
            BusinessId::new(),
            "Cable USB",
            Money::from_cents(550),
            Money::from_cents(200),
        )
    }

    #[test]
    fn test_derived_values() {
        let mut product = cable();
        product.stock = 10;

        assert_eq!(product.unit_profit().cents(), 350);
        assert_eq!(product.inventory_value().cents(), 2000);
        assert_eq!(product.retail_value().cents(), 5500);
        let margin = product.margin_percent().unwrap();
        assert!((margin - 63.636363).abs() < 0.0001);
    }

    #[test]
    fn test_margin_with_zero_price() {
        let mut product = cable();
        product.price = Money::zero();
        assert!(product.margin_percent().is_none());
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let mut product = cable();
        product.min_stock = 5;

        product.stock = 6;
        assert!(!product.is_low_stock());
        product.stock = 5;
        assert!(product.is_low_stock());
        product.stock = 0;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_validation() {
        let mut product = cable();
        assert!(product.validate().is_ok());

        product.cost = Money::from_cents(-1);
        assert_eq!(product.validate(), Err(ProductValidationError::NegativeCost));

        product.cost = Money::zero();
        product.price = Money::from_cents(-1);
        assert_eq!(product.validate(), Err(ProductValidationError::NegativePrice));

        product.name = " ".into();
        assert_eq!(product.validate(), Err(ProductValidationError::EmptyName));
    }

    #[test]
    fn test_validation_upper_bound() {
        let mut product = cable();
        product.price = Money::MAX;
        product.cost = Money::MAX;
        assert!(product.validate().is_ok());

        product.price = Money::from_decimal(1e13);
        assert_eq!(product.validate(), Err(ProductValidationError::PriceOutOfRange));

        product.price = Money::MAX;
        product.cost = Money::from_cents(Money::MAX.cents() + 1);
        assert_eq!(product.validate(), Err(ProductValidationError::CostOutOfRange));
    }

    #[test]
    fn test_derived_values_at_the_limit() {
        let mut product = cable();
        product.price = Money::MAX;
        product.cost = Money::MAX;
        product.stock = u32::MAX;

        assert_eq!(product.retail_value().cents(), i64::MAX);
        assert_eq!(product.inventory_value().cents(), i64::MAX);
        assert_eq!(product.unit_profit(), Money::zero());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Funda",
            "price": 12,
            "cost": 4.5,
            "businessId": "650e8400-e29b-41d4-a716-446655440000",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.cost.cents(), 450);
        assert!(product.category_id.is_none());
        assert_eq!(product.revision, 1);
    }
}
