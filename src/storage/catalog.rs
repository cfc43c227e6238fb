//! Category and brand persistence
//!
//! Both are shared across businesses and looked up by unique,
//! case-insensitive name.

use chrono::{DateTime, Utc};

use crate::audit::EntityType;
use crate::error::BizdeskResult;
use crate::models::{Brand, BrandId, Category, CategoryId};

use super::repository::{Record, Repository};

pub type CategoryRepository = Repository<Category>;
pub type BrandRepository = Repository<Brand>;

/// A record addressable by its display name
pub trait NamedRecord: Record {
    fn name(&self) -> &str;
}

impl<T: NamedRecord> Repository<T> {
    /// Find a record by name, ignoring case and surrounding whitespace
    pub fn get_by_name(&self, name: &str) -> BizdeskResult<Option<T>> {
        let name_lower = name.trim().to_lowercase();
        self.find_one(|item| item.name().to_lowercase() == name_lower)
    }

    /// All records ordered by name
    pub fn get_all_by_name(&self) -> BizdeskResult<Vec<T>> {
        let mut list = self.get_all()?;
        list.sort_by_key(|item| item.name().to_lowercase());
        Ok(list)
    }
}

impl Record for Category {
    type Id = CategoryId;
    const ENTITY: EntityType = EntityType::Category;

    fn id(&self) -> CategoryId {
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

impl NamedRecord for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Brand {
    type Id = BrandId;
    const ENTITY: EntityType = EntityType::Brand;

    fn id(&self) -> BrandId {
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

impl NamedRecord for Brand {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo.upsert(Category::new("Baterías")).unwrap();

        assert!(repo.get_by_name("baterías").unwrap().is_some());
        assert!(repo.get_by_name("  BATERÍAS ").unwrap().is_some());
        assert!(repo.get_by_name("Pantallas").unwrap().is_none());
    }

    #[test]
    fn test_get_all_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BrandRepository::new(temp_dir.path().join("brands.json"));
        for name in ["Xiaomi", "apple", "Samsung"] {
            repo.upsert(Brand::new(name)).unwrap();
        }

        let names: Vec<String> = repo
            .get_all_by_name()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["apple", "Samsung", "Xiaomi"]);
    }
}
