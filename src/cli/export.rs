//! Export CLI command
//!
//! Produces the same CSV as the HTTP export endpoint.

use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;

use crate::config::Settings;
use crate::error::{BizdeskError, BizdeskResult};
use crate::export::{ExportRequest, NOTHING_TO_EXPORT};
use crate::services::{BusinessService, ExportService};
use crate::storage::Storage;

/// Arguments of `bizdesk export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Business name or ID
    pub business: String,

    /// What to export: products, incomes, expenses or all
    #[arg(short = 't', long, default_value = "all")]
    pub data_type: String,

    /// Column label to include; repeat for several (e.g. --field Nombre --field Precio)
    #[arg(short, long = "field")]
    pub fields: Vec<String>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> BizdeskResult<()> {
    let request = ExportRequest {
        business_id: None,
        data_type: Some(args.data_type),
        selected_fields: args.fields,
    };
    let data_type = request.validate()?;

    let business = BusinessService::new(storage)
        .find(&args.business)?
        .ok_or_else(|| BizdeskError::business_not_found(&args.business))?;

    let export = ExportService::new(storage)
        .export(
            business.id,
            data_type,
            &request.selected_fields,
            &settings.export,
            Local::now().date_naive(),
        )?
        .ok_or_else(|| BizdeskError::Export(NOTHING_TO_EXPORT.into()))?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &export.content)
                .map_err(|e| BizdeskError::Export(format!("Failed to write {}: {}", path.display(), e)))?;
            println!("Exported {} to {}", data_type, path.display());
            println!("Suggested filename: {}", export.filename);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", export.content)?;
        }
    }

    Ok(())
}
