//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::Response,
};
use std::net::SocketAddr;

use crate::application::services::Visitor;
use crate::state::AppState;

/// Redirects a short token to its original URL.
///
/// # Endpoint
///
/// `GET /s/{token}`
///
/// # Request Flow
///
/// 1. Look up the token in the repository
/// 2. Queue a visit event for the background workers (never waits)
/// 3. Return 307 Temporary Redirect with caching disabled
///
/// The visit is stored after the response is sent, so `visit_count` lags
/// behind briefly. If the queue is full the visit is dropped and counted.
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: token found
/// - **404 Not Found**: unknown token
/// - **500 Internal Server Error**: storage failure
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let address = addr.to_string();
    let visitor = Visitor {
        address: &address,
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    };

    state.dispatcher.dispatch(Some(&token), visitor).await
}

/// Answers `GET /s` without a token.
pub async fn missing_token_handler(State(state): State<AppState>) -> Response {
    state.dispatcher.dispatch(None, Visitor::default()).await
}
