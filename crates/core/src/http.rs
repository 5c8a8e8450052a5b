//! Request correlation shared by the admin panel and the website.
//!
//! Enabled with the `http` feature. An upstream `x-request-id` is reused when
//! it looks like an identifier; anything else is replaced by a fresh UUID v4.
//! The ID lands on the request span, the Sentry scope and the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID that is passed through.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The ID to use for a request carrying `upstream`.
#[must_use]
pub fn correlation_id(upstream: Option<&HeaderValue>) -> String {
    upstream
        .and_then(|value| value.to_str().ok())
        .filter(|id| is_plain_id(id))
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned)
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = correlation_id(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, routing::get};
    use rstest::rstest;
    use tower::ServiceExt;

    use super::*;

    #[rstest]
    #[case("edge-123")]
    #[case("cf:7f2a.01_b")]
    fn test_plain_upstream_id_is_kept(#[case] id: &'static str) {
        assert_eq!(correlation_id(Some(&HeaderValue::from_static(id))), id);
    }

    #[rstest]
    #[case("")]
    #[case("has space")]
    #[case("<script>")]
    fn test_odd_upstream_id_is_replaced(#[case] id: &str) {
        let minted = correlation_id(Some(&HeaderValue::from_str(id).unwrap()));
        assert!(Uuid::parse_str(&minted).is_ok());
    }

    #[test]
    fn test_overlong_upstream_id_is_replaced() {
        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        let minted = correlation_id(Some(&HeaderValue::from_str(&long).unwrap()));
        assert!(Uuid::parse_str(&minted).is_ok());
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_upstream_id_is_echoed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "edge-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-123");
    }

    #[tokio::test]
    async fn test_missing_id_is_generated() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
