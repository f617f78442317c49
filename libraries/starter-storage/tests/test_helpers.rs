//! Shared setup for the users repository tests
//!
//! Each test gets its own SQLite file in a temp directory so the embedded
//! migrations and the unique email/username indexes behave as in production.

use starter_core::types::CreateUser;
use starter_storage::{Database, PoolSettings};
use tempfile::TempDir;

/// Migrated SQLite file; the temp directory is removed when this drops
pub struct TestDb {
    pub db: Database,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Open a fresh file-backed pool and run every migration
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = Database::connect(&db_url, &PoolSettings::default())
            .await
            .expect("Failed to connect test database");

        Self {
            db,
            _temp_dir: temp_dir,
        }
    }
}

/// Test fixture: insert payload for a user with derived email
pub fn new_user(username: &str) -> CreateUser {
    CreateUser {
        email: format!("{username}@example.com"),
        username: username.to_string(),
        hashed_password: format!("hash-of-{username}"),
        full_name: None,
    }
}
