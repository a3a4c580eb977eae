use thiserror::Error;

pub type ReservoirResult<T> = Result<T, ReservoirError>;

#[derive(Error, Debug)]
pub enum ReservoirError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("failed to load spreadsheet: {0}")]
    Load(String),

    #[error("store user '{0}' already exists")]
    UserAlreadyExists(String),

    #[error("insert aborted after {inserted} documents: {message}")]
    Insert { inserted: usize, message: String },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("document serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed stored document: {0}")]
    Malformed(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
