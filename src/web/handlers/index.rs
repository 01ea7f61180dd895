//! Landing page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::error::AppError;
use crate::state::AppState;

/// One row of the recent links table.
pub struct RecentLink {
    pub short_url: String,
    pub long_url: String,
    pub visit_count: i64,
    pub created_at: String,
}

/// Template for the landing page: the shorten form plus recent links.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub links: Vec<RecentLink>,
}

/// Renders the landing page.
///
/// # Endpoint
///
/// `GET /`
///
/// # Errors
///
/// Returns 500 if the recent mappings cannot be loaded.
pub async fn index_handler(State(state): State<AppState>) -> Result<IndexTemplate, AppError> {
    let mappings = state.link_service.list_recent(state.index_limit).await?;

    let links = mappings
        .into_iter()
        .map(|m| RecentLink {
            short_url: state.link_service.short_url(&m.token),
            long_url: m.long_url,
            visit_count: m.visit_count,
            created_at: m.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        })
        .collect();

    Ok(IndexTemplate { links })
}
