//! Starter Kit Storage
//!
//! `SQLite` persistence layer for the Starter Kit.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each table owns its own queries (`users`)
//! - **Caller-owned sessions**: query functions take a borrowed connection, so
//!   the same code runs on a pooled connection or inside a transaction
//! - **Repository**: [`SqliteUserRepository`] adapts the `users` slice to the
//!   `starter_core` repository traits
//!
//! # Example
//!
//! ```rust,no_run
//! use starter_storage::{Database, PoolSettings, SqliteUserRepository};
//! use starter_core::Repository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite://starter.db", &PoolSettings::default()).await?;
//!
//! let mut tx = db.begin().await?;
//! let total = SqliteUserRepository::new(&mut tx).count().await?;
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;
mod repository;

// Vertical slices
pub mod users;

pub use database::Database;
pub use error::StorageError;
pub use repository::SqliteUserRepository;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection pool sizing and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Steady-state pool size
    pub pool_size: u32,
    /// Extra connections allowed under load
    pub max_overflow: u32,
    /// Log every SQL statement
    pub echo: bool,
}

impl PoolSettings {
    /// Upper bound on open connections
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow).max(1)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size: 5,
            max_overflow: 0,
            echo: false,
        }
    }
}

/// Apply the embedded schema migrations that have not run yet
///
/// # Errors
///
/// Returns an error if a migration fails or was modified after being applied
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://starter.db>`)
/// * `settings` - pool sizing and statement logging
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use sqlx::ConnectOptions;
    use std::str::FromStr;

    tracing::debug!(max_connections = settings.max_connections(), "Creating SQLite pool");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    if !settings.echo {
        options = options.disable_statement_logging();
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections())
        .connect_with(options)
        .await?;

    Ok(pool)
}
