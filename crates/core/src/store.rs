//! Error type shared by the SQLite-backed ledger stores.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the lookup.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A uniqueness constraint would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The record itself is unacceptable (e.g. negative balance).
    #[error("Invalid record: {0}")]
    Invalid(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref err, ref msg)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Parse an RFC 3339 timestamp column, surfacing corrupt rows as conversion errors.
pub(crate) fn parse_timestamp(
    column: usize,
    value: &str,
) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
