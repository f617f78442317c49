/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// A unique index rejected the write
    #[error("Unique constraint violated: {field}")]
    UniqueViolation { field: String },

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation {
                    field: violated_column(db_err.message()),
                };
            }
        }
        Self::Database(err)
    }
}

/// Extract the column from SQLite's `UNIQUE constraint failed: users.email`
fn violated_column(message: &str) -> String {
    message
        .rsplit(':')
        .next()
        .and_then(|columns| columns.split(',').next())
        .map(|column| column.trim())
        .map(|column| column.rsplit('.').next().unwrap_or(column))
        .unwrap_or_default()
        .to_string()
}

impl From<StorageError> for starter_core::CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { field } => starter_core::CoreError::duplicate(field),
            StorageError::Migration(e) => starter_core::CoreError::storage(e.to_string()),
            StorageError::Database(e) => starter_core::CoreError::Database(e.to_string()),
        }
    }
}
