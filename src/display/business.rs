//! Business display formatting
//!
//! Formats businesses for terminal output as a table.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::services::BusinessSummary;

#[derive(Tabled)]
struct BusinessRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Products")]
    products: usize,
    #[tabled(rename = "Incomes")]
    incomes: usize,
    #[tabled(rename = "Expenses")]
    expenses: usize,
    #[tabled(rename = "Created")]
    created: String,
}

/// Format businesses with their record counts as a table
pub fn format_business_list(summaries: &[BusinessSummary]) -> String {
    if summaries.is_empty() {
        return "No businesses found.".to_string();
    }

    let rows = summaries.iter().map(|s| BusinessRow {
        id: s.business.id.to_string(),
        name: s.business.name.clone(),
        products: s.counts.products,
        incomes: s.counts.incomes,
        expenses: s.counts.expenses,
        created: s.business.created_at.format("%Y-%m-%d").to_string(),
    });

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(2..5)).with(Alignment::right()))
        .to_string()
}
