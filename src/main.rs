use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bizdesk::api::{self, AppState};
use bizdesk::cli::{
    handle_business_command, handle_export_command, handle_history_command, handle_seed_command,
    BusinessCommands, ExportArgs,
};
use bizdesk::config::{BizdeskPaths, Settings};
use bizdesk::storage::init::{initialize_storage, needs_initialization};
use bizdesk::storage::Storage;

#[derive(Parser)]
#[command(
    name = "bizdesk",
    author = "Kaylee Beyene",
    version,
    about = "Inventory, income and expense tracking for small businesses",
    long_about = "Bizdesk keeps the products, incomes and expenses of several \
                  businesses, serves them over a JSON HTTP API, and exports \
                  them as CSV with Spanish column labels."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to bind (overrides BIZDESK_BIND and the settings file)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Load the starter catalogue of categories and brands
    Seed,

    /// Business commands
    #[command(subcommand, alias = "biz")]
    Business(BusinessCommands),

    /// Export business data as CSV
    Export(ExportArgs),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BizdeskPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    bizdesk::log::init_logging(&settings.log_level);

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Serve { bind }) => {
            let bind = bind.unwrap_or_else(|| settings.bind_address.clone());
            let addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("Invalid bind address: {}", bind))?;

            if !storage.is_initialized() {
                tracing::warn!("no settings file found; run 'bizdesk init' to write the defaults");
            }

            let state = Arc::new(AppState::new(storage, settings));
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start the async runtime")?;
            runtime.block_on(api::serve(state, addr))?;
        }
        Some(Commands::Init) => {
            if needs_initialization(&paths) {
                println!("Initializing Bizdesk at: {}", paths.base_dir().display());
            } else {
                println!("Bizdesk already initialized at: {}", paths.base_dir().display());
                println!("Creating any missing data files.");
            }
            initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'bizdesk seed' to load the starter categories and brands.");
            println!("Run 'bizdesk serve' to start the HTTP API.");
        }
        Some(Commands::Config) => {
            println!("Bizdesk Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Bind address:        {}", settings.bind_address);
            println!("  Log level:           {}", settings.log_level);
            println!("  Empty export policy: {:?}", settings.export.empty_section);
            println!("  Export date format:  {}", settings.export.date_format);
        }
        Some(Commands::Seed) => {
            handle_seed_command(&storage)?;
        }
        Some(Commands::Business(cmd)) => {
            handle_business_command(&storage, cmd)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&storage, &settings, args)?;
        }
        Some(Commands::History { count }) => {
            handle_history_command(&storage, count)?;
        }
        None => {
            println!("Bizdesk - business inventory and bookkeeping");
            println!();
            println!("Run 'bizdesk --help' for usage information.");
            println!("Run 'bizdesk serve' to start the HTTP API.");
        }
    }

    Ok(())
}
