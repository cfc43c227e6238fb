//! CSV export of a business's data
//!
//! A request names a data type (`products`, `incomes`, `expenses` or `all`)
//! and the column labels to include. Each section keeps the selected labels
//! its column table declares; in `all` mode a label may carry a section
//! suffix (`_INGRESO`, `_GASTO`) to target one section only. Sections without
//! data turn into a one-line placeholder.

pub mod columns;
pub mod csv;

pub use self::columns::{CellValue, Column, EntryRow, ProductRow, ENTRY_COLUMNS, PRODUCT_COLUMNS};
pub use self::csv::{escape_csv, generate_csv, section_placeholder};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::{EmptySectionPolicy, ExportSettings};
use crate::error::{BizdeskError, BizdeskResult};

pub const NO_FIELDS_SELECTED: &str = "Debes seleccionar al menos un campo para exportar";
pub const INVALID_DATA_TYPE: &str = "Tipo de datos no válido";
pub const NOTHING_TO_EXPORT: &str = "No hay datos para exportar";

/// Business name used in filenames when the business is unknown
const FALLBACK_NAME: &str = "negocio";

const SUFFIXES: &[&str] = &["_INGRESO", "_GASTO"];

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Products,
    Incomes,
    Expenses,
    All,
}

impl DataType {
    /// The part of the filename naming the exported data
    pub fn file_label(&self) -> &'static str {
        match self {
            DataType::Products => "productos",
            DataType::Incomes => "ingresos",
            DataType::Expenses => "gastos",
            DataType::All => "todos_los_datos",
        }
    }

    /// The single section exported, or `None` for `all`
    pub fn section(&self) -> Option<Section> {
        match self {
            DataType::Products => Some(Section::Products),
            DataType::Incomes => Some(Section::Incomes),
            DataType::Expenses => Some(Section::Expenses),
            DataType::All => None,
        }
    }

    pub fn includes(&self, section: Section) -> bool {
        self.section().map_or(true, |s| s == section)
    }
}

impl FromStr for DataType {
    type Err = BizdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(DataType::Products),
            "incomes" => Ok(DataType::Incomes),
            "expenses" => Ok(DataType::Expenses),
            "all" => Ok(DataType::All),
            _ => Err(BizdeskError::Validation(INVALID_DATA_TYPE.into())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Products => "products",
            DataType::Incomes => "incomes",
            DataType::Expenses => "expenses",
            DataType::All => "all",
        };
        write!(f, "{}", name)
    }
}

/// One part of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Products,
    Incomes,
    Expenses,
}

impl Section {
    pub fn spanish_name(&self) -> &'static str {
        match self {
            Section::Products => "productos",
            Section::Incomes => "ingresos",
            Section::Expenses => "gastos",
        }
    }

    /// Label suffix that targets this section in `all` mode
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Section::Products => None,
            Section::Incomes => Some("_INGRESO"),
            Section::Expenses => Some("_GASTO"),
        }
    }
}

/// Request body of an export
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Accepted for compatibility; the business comes from the path
    pub business_id: Option<String>,
    pub data_type: Option<String>,
    #[serde(default)]
    pub selected_fields: Vec<String>,
}

impl ExportRequest {
    /// Check the request before any data is read
    ///
    /// An empty field selection is reported before an invalid data type.
    pub fn validate(&self) -> BizdeskResult<DataType> {
        if self.selected_fields.is_empty() {
            return Err(BizdeskError::Validation(NO_FIELDS_SELECTED.into()));
        }
        self.data_type
            .as_deref()
            .unwrap_or_default()
            .parse()
    }
}

/// Rows fetched for an export; sections outside the data type stay empty
#[derive(Debug, Clone, Default)]
pub struct ExportData {
    pub products: Vec<ProductRow>,
    pub incomes: Vec<EntryRow>,
    pub expenses: Vec<EntryRow>,
}

/// A finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Columns of `table` picked by `selected`, in selection order without repeats
///
/// A label with the section's suffix selects the unsuffixed column; a label
/// carrying another section's suffix is ignored.
pub fn select_columns<'t, R>(
    table: &'t [Column<R>],
    selected: &[String],
    section: Section,
) -> Vec<&'t Column<R>> {
    let mut picked: Vec<&Column<R>> = Vec::new();

    for raw in selected {
        let label = match section.suffix().and_then(|s| raw.strip_suffix(s)) {
            Some(base) => base,
            None if SUFFIXES.iter().any(|s| raw.ends_with(s)) => continue,
            None => raw.as_str(),
        };

        if let Some(column) = table.iter().find(|c| c.label == label) {
            if !picked.iter().any(|p| p.label == column.label) {
                picked.push(column);
            }
        }
    }

    picked
}

/// One section's CSV, or `None` when it has no rows or no usable columns
pub fn render_section(
    section: Section,
    data: &ExportData,
    selected: &[String],
    date_format: &str,
) -> Option<String> {
    let csv = match section {
        Section::Products => {
            let columns = select_columns(PRODUCT_COLUMNS, selected, section);
            if columns.is_empty() {
                return None;
            }
            generate_csv(&data.products, &columns, date_format)
        }
        Section::Incomes | Section::Expenses => {
            let rows = if section == Section::Incomes {
                &data.incomes
            } else {
                &data.expenses
            };
            let columns = select_columns(ENTRY_COLUMNS, selected, section);
            if columns.is_empty() {
                return None;
            }
            generate_csv(rows, &columns, date_format)
        }
    };

    (!csv.is_empty()).then_some(csv)
}

/// Build the CSV body for `data_type`
///
/// Returns `None` only for a single-section export without data under the
/// `not_found` policy. `all` always yields three sections separated by a
/// blank line.
pub fn build_csv(
    data_type: DataType,
    data: &ExportData,
    selected: &[String],
    settings: &ExportSettings,
) -> Option<String> {
    let render = |section: Section| {
        render_section(section, data, selected, &settings.date_format)
    };

    match data_type.section() {
        Some(section) => match render(section) {
            Some(csv) => Some(csv),
            None => match settings.empty_section {
                EmptySectionPolicy::Placeholder => Some(section_placeholder(section)),
                EmptySectionPolicy::NotFound => None,
            },
        },
        None => {
            let sections: Vec<String> = [Section::Products, Section::Incomes, Section::Expenses]
                .into_iter()
                .map(|section| render(section).unwrap_or_else(|| section_placeholder(section)))
                .collect();
            Some(sections.join("\n\n"))
        }
    }
}

/// `<business>_<type>_<YYYY-MM-DD>.csv`
pub fn export_filename(business_name: Option<&str>, data_type: DataType, today: NaiveDate) -> String {
    let name = business_name
        .map(sanitize_filename)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    format!(
        "{}_{}_{}.csv",
        name,
        data_type.file_label(),
        today.format("%Y-%m-%d")
    )
}

/// Replace characters that cannot appear in a quoted header filename
fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
