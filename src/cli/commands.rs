//! Command implementations: load, verify, view.
//!
//! Presentation lives here - fixed-width tables and status lines for a
//! human reviewer, not a machine-readable contract. The core's contract
//! ends at producing the sequence of projected views.

use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ReservoirError, ReservoirResult};
use crate::loader::Loader;
use crate::report::{ProjectedView, Projection};
use crate::sheet::SheetReader;
use crate::store::{wait_for_store, DocumentStore, SqliteStore, StoreConfig};
use crate::types::Document;

/// Execute the load command: provision the store user, read the sheet,
/// clear the collection, insert the capped batch, and show the projection.
pub fn load(
    file: PathBuf,
    config: &StoreConfig,
    db_path: Option<PathBuf>,
    wait_attempts: u32,
    wait_interval: Duration,
) -> ReservoirResult<()> {
    banner("RESERVATION STORE - LOAD");

    println!("{}", "🔄 Waiting for the document store...".cyan());
    let store = wait_for_store(
        || SqliteStore::open(config, db_path.as_deref()),
        wait_attempts,
        wait_interval,
    )?;
    println!("{}", "✅ Store is ready".green());

    // A duplicate user is success, not failure
    match store.provision_user(&config.username, &config.password) {
        Ok(()) => println!("✅ Created store user: {}", config.username.cyan()),
        Err(ReservoirError::UserAlreadyExists(name)) => {
            println!("✅ Store user {} already exists", name.cyan())
        }
        Err(err) => return Err(err),
    }

    println!("\n📖 Reading {}", file.display());
    let table = SheetReader::new(&file).read()?;
    println!(
        "   Loaded {} rows with columns: {}",
        table.row_count(),
        table.columns.join(", ")
    );

    let outcome = Loader::new().run(&store, &table)?;
    println!("🧹 Cleared {} existing documents", outcome.cleared);
    println!(
        "{}",
        format!("✅ Inserted {} documents", outcome.inserted).green()
    );

    let projection = Projection::reservation_summary();
    let views = store.project(&projection, None)?;
    println!("\n📊 Projection Results ({} documents):", views.len());
    print_projection_table(&views);

    // Re-open and re-count: the post-load connection check from a fresh
    // connection, as a reviewer would see it.
    drop(store);
    let store = SqliteStore::open(config, db_path.as_deref())?;
    store.ping()?;
    let count = store.count()?;
    println!(
        "\n✅ Connection check passed: {} documents in '{}'",
        count, config.collection
    );

    print_connection_summary(config, db_path.as_deref());
    Ok(())
}

/// Execute the verify command: connectivity check, document count, sample
/// document structure, and a head-limited projection.
pub fn verify(
    config: &StoreConfig,
    db_path: Option<PathBuf>,
    limit: usize,
) -> ReservoirResult<()> {
    banner("STORE CONNECTION VERIFICATION");
    println!("Connecting to: {}", config.connection_string());

    let store = SqliteStore::open(config, db_path.as_deref())?;
    store.ping()?;
    println!("{}", "✅ Connection successful!".green());

    let count = store.count()?;
    println!(
        "✅ Found {} documents in collection '{}'",
        count, config.collection
    );

    if let Some(sample) = store.find_one()? {
        println!("\n📄 Sample document structure:");
        for (name, value) in sample.fields() {
            println!("   {}: {}", name.cyan(), value.type_name());
        }
    }

    println!("\n🔍 Running projection query...");
    let views = store.project(&Projection::reservation_summary(), Some(limit))?;
    println!("\n📊 Projection Results (first {} documents):", views.len());
    print_projection_table(&views);

    println!("\n{}", "✅ All verification checks passed".bold().green());
    Ok(())
}

/// Execute the view command: print every stored document in a readable
/// block format, then the full projection table.
pub fn view(config: &StoreConfig, db_path: Option<PathBuf>) -> ReservoirResult<()> {
    banner("RESERVATION STORE - CONTENTS");

    let store = SqliteStore::open(config, db_path.as_deref())?;
    store.ping()?;

    let documents = store.find_all()?;
    println!("Total Documents: {}\n", documents.len());

    for (position, document) in documents.iter().enumerate() {
        print_document(position + 1, document);
    }

    println!("🔍 Projection: building city and confirmation codes");
    let views = store.project(&Projection::reservation_summary(), None)?;
    print_projection_table(&views);

    Ok(())
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{}", title.bold());
    println!("{}", "=".repeat(60));
}

fn print_document(position: usize, document: &Document) {
    println!("{}", format!("📋 RESERVATION #{position}").bold().blue());
    println!("{}", "-".repeat(50));
    for (name, value) in document.fields() {
        println!("{}: {}", name.cyan(), value.display());
    }
    println!();
}

fn print_projection_table(views: &[ProjectedView]) {
    println!("{}", "-".repeat(74));
    println!(
        "{:<3} {:<15} {:<18} {:<12} {:<12} {:<10}",
        "#", "Building/City", "Confirmation Code", "Check-in", "Check-out", "Platform"
    );
    println!("{}", "-".repeat(74));

    for (position, view) in views.iter().enumerate() {
        println!(
            "{:<3} {:<15} {:<18} {:<12} {:<12} {:<10}",
            position + 1,
            view.display("building_city"),
            view.display("confirmation_code"),
            view.display("checkin_date"),
            view.display("checkout_date"),
            view.display("booking_platform"),
        );
    }
}

fn print_connection_summary(config: &StoreConfig, db_path: Option<&Path>) {
    println!();
    banner("STORE CONNECTION DETAILS");
    println!("Host: {}", config.host);
    println!("Port: {}", config.port);
    println!("Database: {}", config.database);
    println!("Collection: {}", config.collection);
    println!("Username: {}", config.username);
    println!("Password: {}", config.password);
    println!("Connection String: {}", config.connection_string());
    if let Some(path) = db_path {
        println!("Database File: {}", path.display());
    }
    println!("{}", "=".repeat(60));
}
