//! Reservoir - load reservation spreadsheets into a document store and
//! report on them.
//!
//! Two components, executed sequentially:
//!
//! - Loader: reads an .xlsx sheet into an in-memory table, normalizes
//!   column names, turns each row into a key-value document with a
//!   creation timestamp and 1-based sequential id, caps the batch at 10,
//!   and writes it to the store (clear-then-insert).
//! - Reporter: reads documents back and reshapes each into a fixed
//!   six-key projected view with renamed keys for tabular display.
//!
//! # Example
//!
//! ```no_run
//! use reservoir::loader::Loader;
//! use reservoir::report::Projection;
//! use reservoir::sheet::SheetReader;
//! use reservoir::store::{DocumentStore, SqliteStore, StoreConfig};
//!
//! let config = StoreConfig::default();
//! let store = SqliteStore::open(&config, None)?;
//!
//! let table = SheetReader::new("reservations.xlsx").read()?;
//! let outcome = Loader::new().run(&store, &table)?;
//! println!("Inserted {} documents", outcome.inserted);
//!
//! for view in store.project(&Projection::reservation_summary(), None)? {
//!     println!("{}", view.display("confirmation_code"));
//! }
//! # Ok::<(), reservoir::error::ReservoirError>(())
//! ```

pub mod cli;
pub mod error;
pub mod loader;
pub mod report;
pub mod sheet;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{ReservoirError, ReservoirResult};
pub use loader::{LoadOutcome, Loader, BATCH_CAP};
pub use report::{ProjectedView, Projection};
pub use store::{DocumentStore, SqliteStore, StoreConfig};
pub use types::{Document, FieldValue};
