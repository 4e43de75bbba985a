//! Request logging middleware for the API routes.
//!
//! Generates a UUID v4 for each incoming request and creates a tracing span
//! that wraps the request lifecycle. One log line is emitted per request with
//! the method, the raw request URI and the time spent in the downstream
//! handler.

use std::time::Instant;

use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Extension type for accessing request ID in handlers if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that assigns a request ID and logs method, URI and elapsed time.
///
/// The clock starts on entry and is read after the handler has produced its
/// response, so `duration_ms` covers the handler's work.
pub async fn request_log_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    // Nested routers see the prefix-stripped URI; log the one the client sent
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let response = next.run(request).await;
        let elapsed = start.elapsed();
        let duration_ms = elapsed.as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "[{}] {} {:?}",
            method,
            uri,
            elapsed
        );

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;
    use tracing_test::traced_test;

    async fn echo_request_id(Extension(request_id): Extension<RequestId>) -> String {
        request_id.0.to_string()
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_millis(25)).await;
        "done"
    }

    /// Mirrors the production layout: logged routes nested under `/api`.
    fn app() -> Router {
        let api = Router::new()
            .route("/echo", get(echo_request_id))
            .route("/users", get(|| async { "[]" }))
            .route("/slow", get(slow))
            .route_layer(middleware::from_fn(request_log_layer));
        Router::new().nest("/api", api)
    }

    async fn send(uri: &str) -> Response {
        app()
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Every `duration_ms=<n>` value found in `line`.
    fn durations(line: &str) -> Vec<u64> {
        line.match_indices("duration_ms=")
            .filter_map(|(idx, key)| {
                let digits: String = line[idx + key.len()..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_request_id_is_available_to_handlers() {
        let response = send("/api/echo?x=1").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(Uuid::parse_str(&text).is_ok());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_logs_one_line_with_method_and_raw_uri() {
        let response = send("/api/users?x=1").await;
        assert_eq!(response.status(), StatusCode::OK);

        logs_assert(|lines: &[&str]| {
            let matching: Vec<&&str> = lines
                .iter()
                .filter(|line| line.contains("[GET] /api/users?x=1"))
                .collect();
            match matching.as_slice() {
                [line] if line.contains("duration_ms=") && line.contains("status=200") => Ok(()),
                other => Err(format!("expected one request line, got {other:?}")),
            }
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn test_duration_covers_handler_time() {
        send("/api/slow").await;

        logs_assert(|lines: &[&str]| {
            let line = lines
                .iter()
                .find(|line| line.contains("[GET] /api/slow"))
                .ok_or_else(|| "no request line".to_string())?;
            let recorded = durations(line);
            if recorded.iter().any(|ms| *ms >= 20) {
                Ok(())
            } else {
                Err(format!("durations {recorded:?} in {line}"))
            }
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unmatched_paths_are_not_logged() {
        let response = send("/api/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!logs_contain("/api/missing"));
    }
}
