//! tickvault CLI - store Yahoo Finance data as SQLite tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "tickvault")]
#[command(about = "Store Yahoo Finance data as SQLite tables", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress and log output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Destination database (sqlite://<path>, sqlite::memory: or a path)
    #[arg(long, env = "TICKVAULT_DATABASE", global = true)]
    database: Option<String>,

    /// File receiving one line per failed write
    #[arg(long, env = "TICKVAULT_DIAGNOSTIC_LOG", global = true)]
    diagnostic_log: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one category for a ticker and store it
    Run {
        /// Ticker symbol (e.g., msft, aapl)
        ticker: String,

        /// Data category: 1-5 or info, financials, general, history, dividends
        #[arg(short, long)]
        category: String,
    },

    /// List the available data categories
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let Some(command) = cli.command else {
        let settings = Settings::resolve(cli.database.as_deref(), cli.diagnostic_log, cli.timeout)?;
        return commands::interactive::interactive(&settings, cli.quiet).await;
    };

    match command {
        Commands::Run { ticker, category } => {
            let settings = Settings::resolve(cli.database.as_deref(), cli.diagnostic_log, cli.timeout)?;
            commands::run::run(&ticker, &category, &settings, cli.quiet).await
        }
        Commands::Categories => {
            commands::categories::list_categories();
            Ok(())
        }
    }
}
