//! Per-request context: correlation ID, cancellation and access logging.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Header carrying the correlation ID in both directions.
pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

tokio::task_local! {
    static CORRELATION_ID: String;
}

/// Correlation ID of the request being served on this task, if any.
#[must_use]
pub fn current_correlation_id() -> Option<String> {
    CORRELATION_ID.try_with(Clone::clone).ok()
}

/// Context attached to every request's extensions.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    /// Cancelled when the request completes or is abandoned.
    pub cancel: CancellationToken,
}

fn correlation_id_of(request: &Request<Body>) -> String {
    request
        .headers()
        .get(&CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string)
}

/// Assigns or propagates `X-Correlation-Id`, opens a span carrying it and
/// logs method, path, status and latency of every request.
///
/// The request's cancellation token fires when this future is dropped, so
/// a disconnected client or a timeout cancels in-flight handler work.
pub async fn request_context_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = correlation_id_of(&request);
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    request.extensions_mut().insert(RequestContext {
        correlation_id: correlation_id.clone(),
        cancel,
    });

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("request", correlation_id = %correlation_id, %method, %path);
    let start = Instant::now();

    let mut response = CORRELATION_ID
        .scope(correlation_id.clone(), next.run(request))
        .instrument(span.clone())
        .await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_ID_HEADER.clone(), value);
    }

    span.in_scope(|| {
        info!(
            target: "http",
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_millis(),
            "HTTP request completed"
        );
    });

    response
}
