/// Database handle shared by the application
use crate::error::Result;
use crate::PoolSettings;
use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};

/// Pooled `SQLite` database
///
/// Cloning is cheap; all clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and bring the schema up to date
    ///
    /// # Errors
    /// Returns an error if the connection fails or migrations fail
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        let pool = crate::create_pool(database_url, settings).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Create database from an existing pool (for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a unit of work
    ///
    /// Opens with `BEGIN IMMEDIATE`: the write lock is held from the first
    /// statement, so concurrent units of work queue on the busy timeout and
    /// reads inside one unit see every earlier commit.
    ///
    /// The transaction rolls back when dropped without `commit`, so a request
    /// that fails part way leaves no partial writes behind.
    ///
    /// # Errors
    /// Returns an error if no connection can be acquired or the write lock
    /// is not granted within the busy timeout
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
