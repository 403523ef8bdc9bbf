use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    InvalidData(String),
    NotFound(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "SQLite error: {e}"),
            StoreError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            StoreError::NotFound(id) => write!(f, "no entry with id {id}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

impl From<dm_core::SnapshotError> for StoreError {
    fn from(e: dm_core::SnapshotError) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
