/// Shared application state
use crate::config::Settings;
use crate::services::AuthService;
use starter_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth_service: Arc<AuthService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: Database, auth_service: Arc<AuthService>, settings: Arc<Settings>) -> Self {
        Self {
            db,
            auth_service,
            settings,
        }
    }

    /// Build the state from loaded settings and an open database
    pub fn from_settings(settings: Settings, db: Database) -> Self {
        let auth_service = Arc::new(AuthService::from_settings(&settings));
        Self::new(db, auth_service, Arc::new(settings))
    }
}
