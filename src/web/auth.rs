//! Shared-secret guard for the web API

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

/// Header carrying the dashboard secret
pub const SECRET_HEADER: &str = "x-dashboard-secret";

/// Query parameters for secret authentication
#[derive(Debug, Deserialize)]
pub struct SecretQuery {
    pub secret: Option<String>,
}

/// Shared state for authentication
pub struct AuthState {
    /// `None` disables the guard (local-only use)
    pub secret: Option<String>,
}

/// Extract the secret from the `x-dashboard-secret` header
fn extract_header_secret(request: &Request<Body>) -> Option<&str> {
    request.headers().get(SECRET_HEADER)?.to_str().ok()
}

/// Authentication middleware
///
/// When a secret is configured, the request must carry it either in the
/// `x-dashboard-secret` header or as `?secret=<secret>`. A query string that
/// does not deserialize (e.g. a repeated `secret`) counts as no query secret.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthState>>,
    query: Result<Query<SecretQuery>, QueryRejection>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(secret) = auth.secret.as_deref() else {
        return next.run(request).await;
    };

    let header_ok = extract_header_secret(&request) == Some(secret);
    let query_secret = query.ok().and_then(|Query(q)| q.secret);
    let query_ok = query_secret.as_deref() == Some(secret);
    if header_ok || query_ok {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Unauthorized"})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn guarded_router(secret: Option<&str>) -> Router {
        let auth_state = Arc::new(AuthState {
            secret: secret.map(str::to_string),
        });
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
    }

    async fn status_of(router: Router, request: Request<Body>) -> StatusCode {
        router.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_no_secret_allows_everything() {
        let request = Request::get("/ping").body(Body::empty()).unwrap();
        assert_eq!(status_of(guarded_router(None), request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_secret_rejected() {
        let router = guarded_router(Some("s3cret"));
        let resp = router
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Unauthorized"}));
    }

    #[tokio::test]
    async fn test_header_secret_accepted() {
        let request = Request::get("/ping")
            .header(SECRET_HEADER, "s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(guarded_router(Some("s3cret")), request).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_query_secret_accepted() {
        let request = Request::get("/ping?secret=s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(guarded_router(Some("s3cret")), request).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let router = guarded_router(Some("s3cret"));
        let request = Request::get("/ping?secret=nope")
            .header(SECRET_HEADER, "also-nope")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(router, request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_repeated_query_secret_is_unauthorized_json() {
        let router = guarded_router(Some("s3cret"));
        let resp = router
            .oneshot(
                Request::get("/ping?secret=a&secret=b")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Unauthorized"}));
    }

    #[tokio::test]
    async fn test_repeated_query_secret_with_header_accepted() {
        let request = Request::get("/ping?secret=a&secret=b")
            .header(SECRET_HEADER, "s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(guarded_router(Some("s3cret")), request).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_wrong_header_but_right_query_accepted() {
        let request = Request::get("/ping?secret=s3cret")
            .header(SECRET_HEADER, "stale")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            status_of(guarded_router(Some("s3cret")), request).await,
            StatusCode::OK
        );
    }
}
