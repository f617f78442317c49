/// Health check and root banner
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub app_name: String,
    pub version: String,
    pub environment: String,
}

/// GET {prefix}/health - Liveness probe, no dependency checks
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let settings = &app_state.settings;
    Json(HealthResponse {
        status: "healthy".to_string(),
        app_name: settings.app_name.clone(),
        version: settings.app_version.clone(),
        environment: settings.environment.as_str().to_string(),
    })
}

/// GET / - Banner with links to the API
pub async fn root(State(app_state): State<AppState>) -> Json<Value> {
    let settings = &app_state.settings;
    let prefix = settings.api_v1_prefix.trim_end_matches('/');
    Json(json!({
        "message": format!("Welcome to {}", settings.app_name),
        "version": settings.app_version,
        "health": format!("{prefix}/health"),
        "users": format!("{prefix}/users"),
    }))
}
