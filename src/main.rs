use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use reservoir::cli;
use reservoir::store::{StoreConfig, READY_ATTEMPTS, READY_INTERVAL};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "reservoir")]
#[command(about = "Load reservation spreadsheets into a document store and report on them")]
#[command(long_about = "Reservoir - spreadsheet to document store demo

COMMANDS:
  load    - Provision the store user and load a spreadsheet (clear-then-insert)
  verify  - Check connectivity, show a sample document and a limited projection
  view    - Print every stored document plus the full projection table

The loader keeps only the first 10 rows of the sheet and overwrites the
collection wholesale on every run. Column names are normalized (lowercase,
spaces and hyphens to underscores) and empty cells are stored as explicit
nulls.

EXAMPLES:
  reservoir load reservations.xlsx
  reservoir --db-path /tmp/demo.db load reservations.xlsx
  reservoir verify --limit 5
  reservoir view")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Store host (shown in the connection string)
    #[arg(long, env = "RESERVOIR_HOST", default_value = "localhost")]
    host: String,

    /// Store port (shown in the connection string)
    #[arg(long, env = "RESERVOIR_PORT", default_value_t = 7117)]
    port: u16,

    /// Database name; the embedded engine stores it as <database>.db
    #[arg(long, env = "RESERVOIR_DATABASE", default_value = "reservations")]
    database: String,

    /// Collection name
    #[arg(long, env = "RESERVOIR_COLLECTION", default_value = "reservations")]
    collection: String,

    /// Store username
    #[arg(long, env = "RESERVOIR_USERNAME", default_value = "reservations_admin")]
    username: String,

    /// Store password (plain demo configuration, not a managed secret)
    #[arg(long, env = "RESERVOIR_PASSWORD", default_value = "ReservationsDemo2025!")]
    password: String,

    /// Explicit database file path (overrides the <database>.db default)
    #[arg(long, env = "RESERVOIR_DB_PATH")]
    db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the store user and load a spreadsheet (clear-then-insert)
    Load {
        /// Path to the spreadsheet (.xlsx) with a header row
        file: PathBuf,

        /// Readiness poll attempts before giving up
        #[arg(long, default_value_t = READY_ATTEMPTS)]
        wait_attempts: u32,

        /// Seconds between readiness poll attempts
        #[arg(long, default_value_t = READY_INTERVAL.as_secs())]
        wait_interval: u64,
    },

    /// Check connectivity and show a sample plus a limited projection
    Verify {
        /// Maximum projected documents to display
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Print every stored document and the full projection table
    View,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reservoir=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = StoreConfig {
        host: cli.store.host,
        port: cli.store.port,
        database: cli.store.database,
        collection: cli.store.collection,
        username: cli.store.username,
        password: cli.store.password,
    };
    let db_path = cli.store.db_path;

    let result = match cli.command {
        Commands::Load {
            file,
            wait_attempts,
            wait_interval,
        } => cli::load(
            file,
            &config,
            db_path,
            wait_attempts,
            Duration::from_secs(wait_interval),
        ),

        Commands::Verify { limit } => cli::verify(&config, db_path, limit),

        Commands::View => cli::view(&config, db_path),
    };

    if let Err(err) = result {
        eprintln!("{} {err}", "❌".red());
        process::exit(1);
    }
}
