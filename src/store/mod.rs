//! Document store collaborator
//!
//! The loader and reporter only ever talk to the store through the
//! [`DocumentStore`] trait; connection, persistence, and query evaluation
//! are the store's responsibility. The embedded SQLite-backed
//! implementation lives in [`sqlite`].

mod sqlite;

pub use sqlite::SqliteStore;

use std::time::Duration;

use crate::error::{ReservoirError, ReservoirResult};
use crate::report::{ProjectedView, Projection};
use crate::types::Document;

/// Readiness poll defaults: 30 attempts, 2 seconds apart.
pub const READY_ATTEMPTS: u32 = 30;
pub const READY_INTERVAL: Duration = Duration::from_secs(2);

/// Connection settings for the document store.
///
/// Plain configuration, not managed secrets. The embedded engine derives
/// its file path from `database` and its table from `collection`;
/// host/port identify the deployment in the printed connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub collection: String,
    pub username: String,
    pub password: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7117,
            database: "reservations".to_string(),
            collection: "reservations".to_string(),
            username: "reservations_admin".to_string(),
            password: "ReservationsDemo2025!".to_string(),
        }
    }
}

impl StoreConfig {
    /// Connection string shown in command output.
    pub fn connection_string(&self) -> String {
        format!(
            "docstore://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// The store operations the loader and reporter consume.
pub trait DocumentStore {
    /// Connectivity check.
    fn ping(&self) -> ReservoirResult<()>;

    /// Number of documents in the collection.
    fn count(&self) -> ReservoirResult<u64>;

    /// Remove every document. Returns the number removed.
    fn clear(&self) -> ReservoirResult<u64>;

    /// Insert documents in order. Partial inserts are possible on failure
    /// and are not rolled back (no transaction boundary).
    fn insert_many(&self, documents: &[Document]) -> ReservoirResult<usize>;

    /// All documents, in insertion order.
    fn find_all(&self) -> ReservoirResult<Vec<Document>>;

    /// The first document by insertion order, if any.
    fn find_one(&self) -> ReservoirResult<Option<Document>>;

    /// Evaluate a projection over the collection, in insertion order,
    /// with an optional head limit.
    fn project(
        &self,
        projection: &Projection,
        limit: Option<usize>,
    ) -> ReservoirResult<Vec<ProjectedView>>;

    /// Create the store credential. Surfaces `UserAlreadyExists` for a
    /// duplicate; callers decide whether that counts as success.
    fn provision_user(&self, username: &str, password: &str) -> ReservoirResult<()>;
}

/// Bounded wait for store readiness: try to connect and ping, a fixed
/// number of fixed-length intervals apart, then give up with
/// `StoreUnavailable`. The only retry loop anywhere in the tool.
pub fn wait_for_store<S, F>(
    mut connect: F,
    attempts: u32,
    interval: Duration,
) -> ReservoirResult<S>
where
    S: DocumentStore,
    F: FnMut() -> ReservoirResult<S>,
{
    let attempts = attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match connect().and_then(|store| {
            store.ping()?;
            Ok(store)
        }) {
            Ok(store) => return Ok(store),
            Err(err) => {
                tracing::debug!(attempt, attempts, error = %err, "store not ready yet");
                last_error = err.to_string();
                if attempt < attempts {
                    std::thread::sleep(interval);
                }
            }
        }
    }

    Err(ReservoirError::StoreUnavailable(format!(
        "no response after {attempts} attempts: {last_error}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_for_store_succeeds_after_transient_failures() {
        let mut failures_left = 2;
        let store = wait_for_store(
            || {
                if failures_left > 0 {
                    failures_left -= 1;
                    Err(ReservoirError::StoreUnavailable("warming up".to_string()))
                } else {
                    SqliteStore::open_in_memory("reservations")
                }
            },
            5,
            Duration::ZERO,
        );
        assert!(store.is_ok());
    }

    #[test]
    fn test_wait_for_store_gives_up_after_attempts() {
        let result = wait_for_store(
            || -> ReservoirResult<SqliteStore> {
                Err(ReservoirError::StoreUnavailable("down".to_string()))
            },
            3,
            Duration::ZERO,
        );
        match result {
            Err(ReservoirError::StoreUnavailable(message)) => {
                assert!(message.contains("3 attempts"));
            }
            other => panic!("expected StoreUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_connection_string_format() {
        let config = StoreConfig::default();
        let conn = config.connection_string();
        assert!(conn.starts_with("docstore://"));
        assert!(conn.contains(&config.database));
        assert!(conn.contains(&config.username));
    }
}
