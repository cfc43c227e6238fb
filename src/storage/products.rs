//! Product persistence

use chrono::{DateTime, Utc};

use crate::audit::EntityType;
use crate::error::BizdeskResult;
use crate::models::{BrandId, BusinessId, CategoryId, Product, ProductId};

use super::repository::{Record, Repository};

pub type ProductRepository = Repository<Product>;

impl Record for Product {
    type Id = ProductId;
    const ENTITY: EntityType = EntityType::Product;

    fn id(&self) -> ProductId {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}

impl Repository<Product> {
    /// Products of one business, newest first
    pub fn for_business(&self, business_id: BusinessId) -> BizdeskResult<Vec<Product>> {
        self.find(|p| p.business_id == business_id)
    }

    /// Detach every product from a deleted category
    ///
    /// Returns `(before, after)` pairs for the products that changed.
    pub fn clear_category(&self, category_id: CategoryId) -> BizdeskResult<Vec<(Product, Product)>> {
        self.update_where(
            |p| p.category_id == Some(category_id),
            |p| {
                p.category_id = None;
                p.touch();
            },
        )
    }

    /// Detach every product from a deleted brand
    pub fn clear_brand(&self, brand_id: BrandId) -> BizdeskResult<Vec<(Product, Product)>> {
        self.update_where(
            |p| p.brand_id == Some(brand_id),
            |p| {
                p.brand_id = None;
                p.touch();
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ProductRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ProductRepository::new(temp_dir.path().join("products.json"));
        (temp_dir, repo)
    }

    fn product(business_id: BusinessId, name: &str) -> Product {
        Product::new(business_id, name, Money::from_cents(1000), Money::from_cents(400))
    }

    #[test]
    fn test_for_business() {
        let (_temp_dir, repo) = create_test_repo();
        let mine = BusinessId::new();
        let other = BusinessId::new();

        repo.upsert(product(mine, "Cable")).unwrap();
        repo.upsert(product(mine, "Funda")).unwrap();
        repo.upsert(product(other, "Batería")).unwrap();

        assert_eq!(repo.for_business(mine).unwrap().len(), 2);
        assert_eq!(repo.for_business(other).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_category_and_brand() {
        let (_temp_dir, repo) = create_test_repo();
        let business_id = BusinessId::new();
        let category_id = CategoryId::new();
        let brand_id = BrandId::new();

        let mut tagged = product(business_id, "Pantalla");
        tagged.category_id = Some(category_id);
        tagged.brand_id = Some(brand_id);
        let tagged_id = tagged.id;
        repo.upsert(tagged).unwrap();
        repo.upsert(product(business_id, "Suelto")).unwrap();

        let changed = repo.clear_category(category_id).unwrap();
        assert_eq!(changed.len(), 1);
        let stored = repo.get(tagged_id).unwrap().unwrap();
        assert!(stored.category_id.is_none());
        assert_eq!(stored.brand_id, Some(brand_id));
        assert_eq!(stored.revision, 2);

        assert_eq!(repo.clear_brand(brand_id).unwrap().len(), 1);
        assert!(repo.get(tagged_id).unwrap().unwrap().brand_id.is_none());
        assert!(repo.clear_brand(brand_id).unwrap().is_empty());
    }
}
