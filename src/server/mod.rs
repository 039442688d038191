//! Read-only HTTP surface and embedded frontend.
//!
//! Handlers are stateless: every request re-reads and re-aggregates the
//! relevant files. There is no caching layer and no shared mutable state —
//! requests cannot race, they can only repeat work.

pub mod routes;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::discovery::DataDirectory;
use crate::error::{PulseError, Result};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3912;

/// Frontend embedded at compile time for single-binary distribution.
const INDEX_HTML: &str = include_str!("assets/index.html");
const APP_JS: &str = include_str!("assets/app.js");

/// Shared, immutable request context.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// The data directory every handler scans.
    pub data: DataDirectory,
}

/// Build the router (exposed for testing).
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    // Local dashboard: restrict to localhost origins, read-only methods.
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost"),
            HeaderValue::from_static("http://127.0.0.1"),
        ])
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(serve_index))
        .route("/app.js", get(serve_app_js))
        .route("/api/stats", get(routes::stats))
        .route("/api/projects", get(routes::projects))
        .route("/api/history", get(routes::history))
        .route("/api/session/{project}/{id}", get(routes::session_detail))
        .route("/api/timeline", get(routes::timeline))
        .route("/api/dashboard", get(routes::dashboard))
        .layer(cors)
        .with_state(ctx)
}

/// Start the HTTP server on localhost and serve until shutdown.
pub async fn serve(data: DataDirectory, port: u16) -> Result<()> {
    let ctx = Arc::new(AppContext { data });
    let app = build_router(ctx);

    let bind_addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| PulseError::server(format!("Failed to bind {bind_addr}: {e}")))?;

    info!(addr = %bind_addr, "Dashboard listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| PulseError::server(format!("Server terminated: {e}")))
}

async fn serve_index() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        INDEX_HTML,
    )
        .into_response()
}

async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}
