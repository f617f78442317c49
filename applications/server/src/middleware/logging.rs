//! Request/response logging middleware
//!
//! Logs a start and a completion event for every request and stamps the
//! elapsed time (seconds, millisecond precision) on `X-Process-Time`.

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, time::Instant};

pub const PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time");

/// Render elapsed seconds the way the header carries them
fn format_process_time(seconds: f64) -> String {
    format!("{seconds:.3}")
}

pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_host = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    tracing::info!(
        %method,
        %path,
        client_host = client_host.as_deref(),
        "Request started"
    );

    let mut response = next.run(request).await;

    let process_time = format_process_time(start.elapsed().as_secs_f64());

    tracing::info!(
        %method,
        %path,
        status_code = response.status().as_u16(),
        process_time = %format!("{process_time}s"),
        "Request completed"
    );

    match HeaderValue::from_str(&process_time) {
        Ok(value) => {
            response.headers_mut().insert(PROCESS_TIME_HEADER, value);
        }
        Err(error) => {
            tracing::error!(%error, "Failed to encode process time header");
        }
    }

    response
}
