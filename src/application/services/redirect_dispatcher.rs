//! Short token resolution and redirect emission.

use std::sync::Arc;

use axum::{
    http::{
        HeaderValue, StatusCode,
        header::{self, InvalidHeaderValue},
    },
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::{AppError, RepositoryError};

use super::visit_recorder::VisitRecorder;

/// `Cache-Control` sent with every redirect. Cached redirects would bypass
/// visit tracking.
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Terminal state of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Redirecting(UrlMapping),
    NotFound,
    Failed,
}

/// Request metadata recorded with a visit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Visitor<'a> {
    /// Peer address, with or without a port.
    pub address: &'a str,
    pub user_agent: Option<&'a str>,
}

/// Resolves tokens and answers with a redirect or an error response.
///
/// The visit is handed to the [`VisitRecorder`] only after a successful
/// lookup, and the recorder never waits, so the redirect is returned before
/// the visit is stored.
#[derive(Clone)]
pub struct RedirectDispatcher {
    repository: Arc<dyn MappingRepository>,
    recorder: VisitRecorder,
}

impl RedirectDispatcher {
    pub fn new(repository: Arc<dyn MappingRepository>, recorder: VisitRecorder) -> Self {
        Self {
            repository,
            recorder,
        }
    }

    /// Looks up a token taken from the request path.
    ///
    /// A missing or empty token is [`DispatchOutcome::NotFound`] without
    /// touching the repository. Backend failures are logged here and reported
    /// as [`DispatchOutcome::Failed`].
    pub async fn resolve(&self, token: Option<&str>) -> DispatchOutcome {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return DispatchOutcome::NotFound;
        };

        match self.repository.lookup(token).await {
            Ok(mapping) => DispatchOutcome::Redirecting(mapping),
            Err(RepositoryError::NotFound(_)) => {
                debug!(%token, "unknown token");
                DispatchOutcome::NotFound
            }
            Err(e) => {
                error!(%token, error = ?e, "token lookup failed");
                DispatchOutcome::Failed
            }
        }
    }

    /// Resolves `token` and builds the full HTTP response.
    ///
    /// On success the visit is queued and a no-cache temporary redirect is
    /// returned. Unknown tokens get a generic 404; every other failure a
    /// generic 500.
    pub async fn dispatch(&self, token: Option<&str>, visitor: Visitor<'_>) -> Response {
        let mapping = match self.resolve(token).await {
            DispatchOutcome::Redirecting(mapping) => mapping,
            DispatchOutcome::NotFound => return AppError::link_not_found().into_response(),
            DispatchOutcome::Failed => return AppError::internal_error().into_response(),
        };

        match redirect_response(&mapping.long_url) {
            Ok(response) => {
                self.recorder
                    .record(&mapping, visitor.address, visitor.user_agent);
                response
            }
            Err(e) => {
                error!(token = %mapping.token, error = %e, "stored URL is not a valid Location header");
                AppError::internal_error().into_response()
            }
        }
    }
}

/// Builds a `307 Temporary Redirect` to `location` that forbids caching by
/// clients and intermediaries.
///
/// The target is passed through byte for byte.
///
/// # Errors
///
/// Returns [`InvalidHeaderValue`] if `location` contains bytes not allowed
/// in a header value.
pub fn redirect_response(location: &str) -> Result<Response, InvalidHeaderValue> {
    let location = HeaderValue::from_bytes(location.as_bytes())?;

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE)),
            (header::PRAGMA, HeaderValue::from_static("no-cache")),
            (header::EXPIRES, HeaderValue::from_static("0")),
        ],
    )
        .into_response())
}
