//! Column tables for CSV export
//!
//! Each exportable resource declares a static table of labelled accessors.
//! The labels are the Spanish column headers users pick from.

use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::models::{Expense, Income, Money, Product};

/// One exported cell before formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Money(Money),
    Count(u32),
    Percent(f64),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    /// Render the cell as field text; `date_format` is a strftime pattern
    ///
    /// Dates fall back to `YYYY-MM-DD` when the pattern cannot be rendered.
    pub fn render(&self, date_format: &str) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Money(m) => m.to_decimal_string(),
            CellValue::Count(n) => n.to_string(),
            CellValue::Percent(p) => format!("{:.2}%", p),
            CellValue::Date(d) => {
                let mut out = String::new();
                match write!(out, "{}", d.format(date_format)) {
                    Ok(()) => out,
                    Err(_) => d.format("%Y-%m-%d").to_string(),
                }
            }
            CellValue::Empty => String::new(),
        }
    }

    fn text(value: Option<&str>) -> Self {
        match value {
            Some(s) => CellValue::Text(s.to_string()),
            None => CellValue::Empty,
        }
    }
}

/// A labelled accessor over rows of type `R`
pub struct Column<R> {
    pub label: &'static str,
    pub value: fn(&R) -> CellValue,
}

impl<R> Column<R> {
    pub fn cell(&self, row: &R) -> CellValue {
        (self.value)(row)
    }
}

/// Calendar day of a timestamp in the server's local time zone
pub fn local_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// A product with its category and brand names resolved
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub product: Product,
    pub category: Option<String>,
    pub brand: Option<String>,
}

/// An income or expense, reduced to the exported fields
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: String,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Income> for EntryRow {
    fn from(income: Income) -> Self {
        Self {
            id: income.id.to_string(),
            description: income.description,
            amount: income.amount,
            date: income.date,
            created_at: income.created_at,
        }
    }
}

impl From<Expense> for EntryRow {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id.to_string(),
            description: expense.description,
            amount: expense.amount,
            date: expense.date,
            created_at: expense.created_at,
        }
    }
}

pub static PRODUCT_COLUMNS: &[Column<ProductRow>] = &[
    Column { label: "ID", value: product_id },
    Column { label: "Nombre", value: product_name },
    Column { label: "Descripción", value: product_description },
    Column { label: "SKU", value: product_sku },
    Column { label: "Precio", value: product_price },
    Column { label: "Coste", value: product_cost },
    Column { label: "Stock", value: product_stock },
    Column { label: "Stock Mínimo", value: product_min_stock },
    Column { label: "Categoría", value: product_category },
    Column { label: "Marca", value: product_brand },
    Column { label: "Beneficio Unitario", value: product_unit_profit },
    Column { label: "Margen Beneficio", value: product_margin },
    Column { label: "Valor Total Inventario", value: product_inventory_value },
    Column { label: "Fecha Creación", value: product_created },
    Column { label: "Última Actualización", value: product_updated },
];

pub static ENTRY_COLUMNS: &[Column<EntryRow>] = &[
    Column { label: "ID", value: entry_id },
    Column { label: "Descripción", value: entry_description },
    Column { label: "Cantidad", value: entry_amount },
    Column { label: "Fecha", value: entry_date },
    Column { label: "Fecha Registro", value: entry_registered },
];

fn product_id(row: &ProductRow) -> CellValue {
    CellValue::Text(row.product.id.to_string())
}

fn product_name(row: &ProductRow) -> CellValue {
    CellValue::Text(row.product.name.clone())
}

fn product_description(row: &ProductRow) -> CellValue {
    CellValue::text(row.product.description.as_deref())
}

fn product_sku(row: &ProductRow) -> CellValue {
    CellValue::text(row.product.sku.as_deref())
}

fn product_price(row: &ProductRow) -> CellValue {
    CellValue::Money(row.product.price)
}

fn product_cost(row: &ProductRow) -> CellValue {
    CellValue::Money(row.product.cost)
}

fn product_stock(row: &ProductRow) -> CellValue {
    CellValue::Count(row.product.stock)
}

fn product_min_stock(row: &ProductRow) -> CellValue {
    CellValue::Count(row.product.min_stock)
}

fn product_category(row: &ProductRow) -> CellValue {
    CellValue::text(row.category.as_deref())
}

fn product_brand(row: &ProductRow) -> CellValue {
    CellValue::text(row.brand.as_deref())
}

fn product_unit_profit(row: &ProductRow) -> CellValue {
    CellValue::Money(row.product.unit_profit())
}

fn product_margin(row: &ProductRow) -> CellValue {
    row.product
        .margin_percent()
        .map_or(CellValue::Empty, CellValue::Percent)
}

fn product_inventory_value(row: &ProductRow) -> CellValue {
    CellValue::Money(row.product.inventory_value())
}

fn product_created(row: &ProductRow) -> CellValue {
    CellValue::Date(local_day(row.product.created_at))
}

fn product_updated(row: &ProductRow) -> CellValue {
    CellValue::Date(local_day(row.product.updated_at))
}

fn entry_id(row: &EntryRow) -> CellValue {
    CellValue::Text(row.id.clone())
}

fn entry_description(row: &EntryRow) -> CellValue {
    CellValue::Text(row.description.clone())
}

fn entry_amount(row: &EntryRow) -> CellValue {
    CellValue::Money(row.amount)
}

fn entry_date(row: &EntryRow) -> CellValue {
    CellValue::Date(row.date)
}

fn entry_registered(row: &EntryRow) -> CellValue {
    CellValue::Date(local_day(row.created_at))
}
