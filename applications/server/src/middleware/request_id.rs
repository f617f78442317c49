//! Correlation-id middleware
//!
//! Each request is handled with a `RequestContext` in task-local storage and
//! inside a `request` tracing span carrying `request_id`, so every log line
//! emitted while handling it can be correlated with the `X-Request-ID`
//! response header.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`RequestContext::scope`] when moving request work onto another task.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use tokio::task_local;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Per-request correlation data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub method: String,
    pub path: String,
}

impl RequestContext {
    /// Returns the context of the request being handled, if any
    pub fn current() -> Option<Self> {
        REQUEST_CONTEXT.try_with(Clone::clone).ok()
    }

    /// Execute the provided future with `context` in scope
    pub async fn scope<Fut>(context: RequestContext, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_CONTEXT.scope(context, fut).await
    }
}

/// Request extension holding the correlation id
///
/// Handlers can take it with `Extension<RequestId>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Reuse a caller-supplied id, or mint a UUID v4
fn resolve_request_id(request: &Request) -> String {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Middleware that assigns the correlation id and echoes it on the response
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(&request);
    let context = RequestContext {
        request_id: request_id.clone(),
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
    };

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %context.method,
        path = %context.path,
    );

    let mut response = RequestContext::scope(context, next.run(request).instrument(span)).await;

    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(error) => {
            tracing::error!(%error, %request_id, "Failed to encode request id header");
        }
    }

    response
}
