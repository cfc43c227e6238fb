//! CSV serialization
//!
//! Header row plus one row per record, joined by `\n` with no trailing
//! newline. Fields containing a comma, a double quote or a newline are
//! quoted with internal quotes doubled.

use super::columns::Column;
use super::Section;

/// Quote a field when it contains a comma, a double quote or a newline
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Serialize `rows` under `columns`; empty when there are no rows
pub fn generate_csv<R>(rows: &[R], columns: &[&Column<R>], date_format: &str) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let header = columns
        .iter()
        .map(|c| escape_csv(c.label))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header);
    for row in rows {
        let line = columns
            .iter()
            .map(|c| escape_csv(&c.cell(row).render(date_format)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// The single line standing in for a section without data
pub fn section_placeholder(section: Section) -> String {
    escape_csv(&format!(
        "El apartado de {} no contiene información",
        section.spanish_name()
    ))
}
