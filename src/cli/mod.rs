//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod business;
pub mod export;
pub mod history;
pub mod seed;

pub use business::{handle_business_command, BusinessCommands};
pub use export::{handle_export_command, ExportArgs};
pub use history::handle_history_command;
pub use seed::handle_seed_command;
