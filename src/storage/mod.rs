//! Storage layer for Bizdesk
//!
//! JSON file storage with atomic writes: one file per collection, held in
//! memory behind `RwLock`s and shared by the HTTP server and the CLI.

pub mod businesses;
pub mod catalog;
pub mod file_io;
pub mod init;
pub mod ledger;
pub mod products;
pub mod repository;

pub use businesses::BusinessRepository;
pub use catalog::{BrandRepository, CategoryRepository, NamedRecord};
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, SEED_BRANDS, SEED_CATEGORIES};
pub use ledger::{ExpenseRepository, IncomeRepository, LedgerEntry};
pub use products::ProductRepository;
pub use repository::{check_revision, Record, Repository};

use tracing::debug;

use crate::audit::{generate_diff, AuditEntry, AuditLogger};
use crate::config::paths::BizdeskPaths;
use crate::error::BizdeskError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BizdeskPaths,
    pub businesses: BusinessRepository,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub brands: BrandRepository,
    pub incomes: IncomeRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BizdeskPaths) -> Result<Self, BizdeskError> {
        paths.ensure_directories()?;

        Ok(Self {
            businesses: BusinessRepository::new(paths.businesses_file()),
            products: ProductRepository::new(paths.products_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            brands: BrandRepository::new(paths.brands_file()),
            incomes: IncomeRepository::new(paths.incomes_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &BizdeskPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BizdeskError> {
        self.businesses.load()?;
        self.products.load()?;
        self.categories.load()?;
        self.brands.load()?;
        self.incomes.load()?;
        self.expenses.load()?;
        debug!(base_dir = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BizdeskError> {
        self.businesses.save()?;
        self.products.save()?;
        self.categories.save()?;
        self.brands.save()?;
        self.incomes.save()?;
        self.expenses.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a create operation in the audit log
    pub fn log_create<T: Record>(&self, record: &T) -> Result<(), BizdeskError> {
        self.audit.log(&AuditEntry::create(
            T::ENTITY,
            record.id().to_string(),
            Some(record.label()),
            record,
        ))
    }

    /// Record an update operation, with a summary of the changed fields
    pub fn log_update<T: Record>(&self, before: &T, after: &T) -> Result<(), BizdeskError> {
        self.audit.log(&update_entry(before, after))
    }

    /// Record updates of several records at once
    pub fn log_updates<T: Record>(&self, changes: &[(T, T)]) -> Result<(), BizdeskError> {
        let entries: Vec<AuditEntry> = changes
            .iter()
            .map(|(before, after)| update_entry(before, after))
            .collect();
        self.audit.log_batch(&entries)
    }

    /// Record a delete operation in the audit log
    pub fn log_delete<T: Record>(&self, record: &T) -> Result<(), BizdeskError> {
        self.audit.log(&AuditEntry::delete(
            T::ENTITY,
            record.id().to_string(),
            Some(record.label()),
            record,
        ))
    }

    /// Record deletion of several records at once
    pub fn log_deletes<T: Record>(&self, records: &[T]) -> Result<(), BizdeskError> {
        let entries: Vec<AuditEntry> = records
            .iter()
            .map(|record| {
                AuditEntry::delete(T::ENTITY, record.id().to_string(), Some(record.label()), record)
            })
            .collect();
        self.audit.log_batch(&entries)
    }
}

fn update_entry<T: Record>(before: &T, after: &T) -> AuditEntry {
    let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
        (Ok(b), Ok(a)) => generate_diff(&b, &a),
        _ => None,
    };

    AuditEntry::update(
        T::ENTITY,
        after.id().to_string(),
        Some(after.label()),
        before,
        after,
        diff,
    )
}
