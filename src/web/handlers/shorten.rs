//! Form submission handler creating a short link.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Fields posted by the landing page form.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    pub url: Option<String>,
}

/// Template showing the created short link.
#[derive(Template, WebTemplate)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub short_url: String,
    pub long_url: String,
}

/// Creates a short link from a submitted form.
///
/// # Endpoint
///
/// `POST /shorten` with `application/x-www-form-urlencoded` field `url`
///
/// # Response Codes
///
/// - **201 Created**: result page with the short link
/// - **400 Bad Request**: form could not be parsed, `url` missing or invalid
/// - **405 Method Not Allowed**: any method other than `POST`
/// - **500 Internal Server Error**: token generation or storage failed
pub async fn shorten_handler(
    State(state): State<AppState>,
    form: Result<Form<ShortenForm>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(form) = form.map_err(|rejection| {
        AppError::bad_request(
            "Invalid form submission",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let url = form
        .url
        .ok_or_else(|| AppError::bad_request("Missing form field: url", json!({ "field": "url" })))?;

    let link = state.link_service.shorten(&url).await?;

    tracing::info!(token = %link.token, id = link.id, "short link created");

    Ok((
        StatusCode::CREATED,
        ResultTemplate {
            short_url: link.short_url,
            long_url: link.long_url,
        },
    ))
}
