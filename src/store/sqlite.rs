//! Embedded SQLite-backed document store.
//!
//! Documents are stored as JSON bodies in an append-ordered table; the
//! integer primary key preserves insertion order, which is the
//! collection's natural order. Credentials live in a `_users` table so
//! `provision_user` can behave like a real store's user creation.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::error::{ReservoirError, ReservoirResult};
use crate::report::{ProjectedView, Projection};
use crate::store::{DocumentStore, StoreConfig};
use crate::types::Document;

/// Embedded document store over a single SQLite file (or memory).
///
/// The connection is a scoped resource: it closes on drop, on every exit
/// path, including failure.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    collection: String,
}

impl SqliteStore {
    /// Open (or create) the database file for this config and make sure
    /// the collection and credential tables exist.
    ///
    /// The file path defaults to `<database>.db` in the working directory
    /// unless an explicit path is given.
    pub fn open(config: &StoreConfig, path: Option<&Path>) -> ReservoirResult<Self> {
        let path: PathBuf = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(format!("{}.db", config.database)),
        };
        let conn = Connection::open(&path)
            .map_err(|e| ReservoirError::StoreUnavailable(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "opened store");
        Self::with_connection(conn, &config.collection)
    }

    /// In-memory store; used by tests and throwaway runs.
    pub fn open_in_memory(collection: &str) -> ReservoirResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ReservoirError::StoreUnavailable(e.to_string()))?;
        Self::with_connection(conn, collection)
    }

    fn with_connection(conn: Connection, collection: &str) -> ReservoirResult<Self> {
        validate_collection_name(collection)?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{collection}\" (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 body TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS _users (
                 username TEXT PRIMARY KEY,
                 password TEXT NOT NULL
             );"
        ))?;
        Ok(Self {
            conn,
            collection: collection.to_string(),
        })
    }

    /// Documents in insertion order, optionally limited.
    fn find_limited(&self, limit: Option<usize>) -> ReservoirResult<Vec<Document>> {
        let sql = match limit {
            Some(n) => format!(
                "SELECT body FROM \"{}\" ORDER BY id LIMIT {n}",
                self.collection
            ),
            None => format!("SELECT body FROM \"{}\" ORDER BY id", self.collection),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let bodies = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut documents = Vec::new();
        for body in bodies {
            let body = body?;
            let value: serde_json::Value = serde_json::from_str(&body)?;
            documents.push(Document::from_json(&value)?);
        }
        Ok(documents)
    }
}

impl DocumentStore for SqliteStore {
    fn ping(&self) -> ReservoirResult<()> {
        self.conn
            .query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| ReservoirError::StoreUnavailable(e.to_string()))
    }

    fn count(&self) -> ReservoirResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", self.collection);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn clear(&self) -> ReservoirResult<u64> {
        let sql = format!("DELETE FROM \"{}\"", self.collection);
        let removed = self.conn.execute(&sql, [])?;
        tracing::debug!(removed, collection = %self.collection, "cleared collection");
        Ok(removed as u64)
    }

    fn insert_many(&self, documents: &[Document]) -> ReservoirResult<usize> {
        let sql = format!("INSERT INTO \"{}\" (body) VALUES (?1)", self.collection);
        let mut inserted = 0usize;

        // One insert per document, no transaction: a mid-batch failure
        // leaves the documents inserted so far in place.
        for document in documents {
            let body = serde_json::to_string(document)?;
            if let Err(err) = self.conn.execute(&sql, params![body]) {
                return Err(ReservoirError::Insert {
                    inserted,
                    message: err.to_string(),
                });
            }
            inserted += 1;
        }

        tracing::debug!(inserted, collection = %self.collection, "inserted batch");
        Ok(inserted)
    }

    fn find_all(&self) -> ReservoirResult<Vec<Document>> {
        self.find_limited(None)
    }

    fn find_one(&self) -> ReservoirResult<Option<Document>> {
        let sql = format!(
            "SELECT body FROM \"{}\" ORDER BY id LIMIT 1",
            self.collection
        );
        let body: Option<String> = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .optional()?;

        match body {
            Some(body) => {
                let value: serde_json::Value = serde_json::from_str(&body)?;
                Ok(Some(Document::from_json(&value)?))
            }
            None => Ok(None),
        }
    }

    fn project(
        &self,
        projection: &Projection,
        limit: Option<usize>,
    ) -> ReservoirResult<Vec<ProjectedView>> {
        let documents = self.find_limited(limit)?;
        Ok(documents.iter().map(|doc| projection.apply(doc)).collect())
    }

    fn provision_user(&self, username: &str, password: &str) -> ReservoirResult<()> {
        let result = self.conn.execute(
            "INSERT INTO _users (username, password) VALUES (?1, ?2)",
            params![username, password],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(ReservoirError::UserAlreadyExists(username.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Collection names are inlined into SQL, so only identifier characters
/// are allowed.
fn validate_collection_name(name: &str) -> ReservoirResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ReservoirError::Config(format!(
            "invalid collection name '{name}': use letters, digits, and underscores"
        )))
    }
}
