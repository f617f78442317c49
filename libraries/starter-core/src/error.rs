/// Core error types for the Starter Kit
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type raised by repository implementations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Backend failure with a human-readable cause
    #[error("Storage error: {0}")]
    Storage(String),

    /// A unique constraint rejected the write
    #[error("Duplicate entry: {field}")]
    Duplicate {
        /// Column whose uniqueness was violated (e.g. `email`)
        field: String,
    },

    /// Raw driver error passed through from sqlx
    #[error("Database error: {0}")]
    Database(String),
}

impl CoreError {
    /// Wrap any message as a storage failure
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a duplicate entry error
    pub fn duplicate(field: impl Into<String>) -> Self {
        Self::Duplicate {
            field: field.into(),
        }
    }
}
