//! Seed CLI command

use crate::error::BizdeskResult;
use crate::services::SeedService;
use crate::storage::Storage;

/// Load the starter catalogue of categories and brands
pub fn handle_seed_command(storage: &Storage) -> BizdeskResult<()> {
    let report = SeedService::new(storage).run()?;

    println!(
        "Catalogue loaded: {} categories, {} brands",
        report.categories, report.brands
    );
    if report.inserted_categories + report.inserted_brands == 0 {
        println!("Nothing new to add; every entry already exists.");
    } else {
        println!(
            "Added {} categories and {} brands.",
            report.inserted_categories, report.inserted_brands
        );
    }

    Ok(())
}
