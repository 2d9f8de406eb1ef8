//! Web server implementation using axum

use anyhow::{Context, Result};
use axum::http::{HeaderName, Method};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use seat_meter_core::api::SeatMeter;

use super::api::{self, ApiState};
use super::auth::{self, AuthState, SECRET_HEADER};
use super::static_files;

/// Build the full application router (API, auth guard, static dashboard)
pub fn router(meter: SeatMeter) -> Router {
    let auth_state = Arc::new(AuthState {
        secret: meter.settings().web.secret.clone(),
    });
    let api_state = Arc::new(ApiState { meter });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static(SECRET_HEADER),
        ]);

    // API routes (guarded by the shared secret when one is configured)
    let api_routes = Router::new()
        .route("/seats", get(api::get_seats))
        .route("/seats/{id}/status", get(api::get_seat_status))
        .with_state(api_state)
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            auth::auth_middleware,
        ));

    // Static file routes (the page itself is public, it forwards ?secret= to the API)
    let static_routes = Router::new()
        .route("/", get(static_files::index))
        .route("/{*path}", get(static_files::asset));

    Router::new()
        .nest("/api", api_routes)
        .merge(static_routes)
        .layer(cors)
}

/// Web server hosting the dashboard
pub struct WebServer {
    meter: SeatMeter,
}

impl WebServer {
    /// Create a new web server
    pub fn new(meter: SeatMeter) -> Self {
        Self { meter }
    }

    /// Run the web server until it fails
    pub async fn run(self) -> Result<()> {
        let web = &self.meter.settings().web;
        let addr = format!("{}:{}", web.bind, web.port);
        if web.secret.is_none() {
            tracing::warn!(
                "No dashboard secret configured, API is open to anyone who can reach {}",
                addr
            );
        }

        let app = router(self.meter.clone());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Web server starting on http://{}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
