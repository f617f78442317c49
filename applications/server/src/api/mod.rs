/// API route modules and router assembly
pub mod extract;
pub mod health;
pub mod users;

use crate::{
    config::Settings,
    error::ServerError,
    middleware::{logging_middleware, request_id_middleware, PROCESS_TIME_HEADER, REQUEST_ID_HEADER},
    state::AppState,
};
use axum::{
    http::HeaderValue,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
};

/// Build the application router
///
/// Layers, outermost first: correlation id, request logging, CORS, panic
/// recovery. A panicking handler still gets an `INTERNAL_ERROR` envelope
/// with the request id and timing headers.
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let prefix = app_state.settings.api_v1_prefix.trim_end_matches('/');
    let router = Router::new().route("/", get(health::root));
    let router = if prefix.is_empty() {
        router.merge(api_routes)
    } else {
        router.nest(prefix, api_routes)
    };

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&app_state.settings))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(app_state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%origin, %error, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([REQUEST_ID_HEADER, PROCESS_TIME_HEADER])
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    };

    ServerError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
