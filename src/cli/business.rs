//! Business CLI commands

use clap::Subcommand;

use crate::display::format_business_list;
use crate::error::{BizdeskError, BizdeskResult};
use crate::services::BusinessService;
use crate::storage::Storage;

/// Business subcommands
#[derive(Subcommand)]
pub enum BusinessCommands {
    /// List businesses with their record counts
    List,

    /// Show income, expense and inventory metrics
    Metrics {
        /// Business name or ID
        business: String,
    },
}

/// Handle a business command
pub fn handle_business_command(storage: &Storage, cmd: BusinessCommands) -> BizdeskResult<()> {
    let service = BusinessService::new(storage);

    match cmd {
        BusinessCommands::List => {
            let summaries = service.list()?;
            println!("{}", format_business_list(&summaries));
        }
        BusinessCommands::Metrics { business } => {
            let found = service
                .find(&business)?
                .ok_or_else(|| BizdeskError::business_not_found(&business))?;
            let metrics = service.metrics(found.id)?;
            print!("{}", metrics.format_terminal());
        }
    }

    Ok(())
}
