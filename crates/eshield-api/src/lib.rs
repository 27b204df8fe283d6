//! # eshield-api: Axum API for ExportShield
//!
//! HTTP front for the license-exception evaluator. Every response is
//! informational; nothing here constitutes a legal determination.
//!
//! ## API Surface
//!
//! | Route                            | Module                   |
//! |----------------------------------|--------------------------|
//! | `POST /v1/evaluate`              | [`routes::evaluate`]     |
//! | `GET /v1/classifications`        | [`routes::reference`]    |
//! | `GET /v1/classifications/{code}` | [`routes::reference`]    |
//! | `GET /v1/destinations/embargoed` | [`routes::reference`]    |
//! | `GET /openapi.json`              | [`openapi`]              |
//! | `GET /health/liveness`           | this module              |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsLayer → DefaultBodyLimit → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;

    let api = Router::new()
        .merge(routes::evaluate::router())
        .merge(routes::reference::router())
        .merge(openapi::router())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new().route("/health/liveness", axum::routing::get(liveness));

    Router::new().merge(health).merge(api)
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
