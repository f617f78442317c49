//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use starter_server::{config::Settings, create_router, state::AppState, AuthService};
use starter_storage::Database;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Settings for tests: required fields set, minimum bcrypt cost
pub fn test_settings(database_url: &str) -> Settings {
    let config = config::Config::builder()
        .set_override("database_url", database_url)
        .unwrap()
        .set_override("secret_key", fixtures::SECRET_KEY)
        .unwrap()
        .set_override("bcrypt_cost", 4_i64)
        .unwrap()
        .build()
        .unwrap();

    Settings::from_config(config).unwrap()
}

/// Database backed by a real `SQLite` file in a temporary directory
pub struct TestDb {
    pub db: Database,
    pub settings: Settings,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let database_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let settings = test_settings(&database_url);
        let db = Database::connect(&settings.database_url, &settings.pool_settings())
            .await
            .unwrap();

        Self {
            db,
            settings,
            _temp_dir: temp_dir,
        }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::from_settings(&self.settings)
    }
}

/// Full router over a fresh database
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _test_db: TestDb,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(|_| {}).await
    }

    /// Build the app after adjusting the default test settings
    pub async fn with_settings(configure: impl FnOnce(&mut Settings)) -> Self {
        let mut test_db = TestDb::new().await;
        configure(&mut test_db.settings);

        let state = AppState::from_settings(test_db.settings.clone(), test_db.db.clone());
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _test_db: test_db,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.send(json_request(Method::POST, uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> Response {
        self.send(json_request(Method::PUT, uri, body)).await
    }

    /// Create a user through the API and return the response body
    pub async fn create_user(&self, username: &str) -> Value {
        let response = self
            .post_json("/api/v1/users", &fixtures::create_body(username))
            .await;
        assert_eq!(response.status(), 201, "creating {username}");
        json_body(response).await
    }
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn json_body(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Test data
pub mod fixtures {
    use serde_json::{json, Value};

    pub const SECRET_KEY: &str = "test-secret-key";
    pub const PASSWORD: &str = "password123";

    pub fn email(username: &str) -> String {
        format!("{username}@example.com")
    }

    pub fn create_body(username: &str) -> Value {
        json!({
            "email": email(username),
            "username": username,
            "password": PASSWORD,
            "full_name": format!("{username} tester"),
        })
    }
}
