//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`             - Landing page with recent links
//! - `POST /shorten`      - Create a short link from a form
//! - `GET  /s/{token}`    - Short link redirect
//! - `GET  /health`       - Health check: database, visit queue
//!
//! Any other path answers 404. Trailing slashes are trimmed by the server
//! (see [`crate::server`]) before routing.

use crate::api::handlers::{health_handler, missing_token_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::{index_handler, shorten_handler};
use axum::Router;
use axum::routing::{get, post};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/shorten", post(shorten_handler))
        .route("/s", get(missing_token_handler))
        .route("/s/{token}", get(redirect_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer())
}

async fn not_found_handler() -> AppError {
    AppError::not_found("Not found", serde_json::Value::Null)
}
