//! Short link creation and listing service.

use std::sync::Arc;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::{AppError, RepositoryError, invalid_url_details};
use crate::utils::token_generator::TokenGenerator;
use crate::utils::url_validator::is_valid_url;

/// Attempts at creating a mapping: the first token plus one regenerated token
/// after a collision.
const MAX_CREATE_ATTEMPTS: usize = 2;

/// A freshly created short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub token: String,
    pub long_url: String,
    pub short_url: String,
}

/// Service for creating and listing short links.
pub struct LinkService {
    repository: Arc<dyn MappingRepository>,
    generator: Arc<dyn TokenGenerator>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service. Short links are built as `<base_url>/s/<token>`.
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        generator: Arc<dyn TokenGenerator>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            generator,
            base_url: base_url.into(),
        }
    }

    /// Validates `raw_url`, generates a token and stores the mapping.
    ///
    /// The URL is stored exactly as submitted.
    ///
    /// # Collisions
    ///
    /// A [`RepositoryError::DuplicateToken`] is retried once with a newly
    /// generated token; a second collision fails as an internal error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is rejected.
    /// Returns [`AppError::Internal`] on generation or storage failure.
    pub async fn shorten(&self, raw_url: &str) -> Result<ShortLink, AppError> {
        if !is_valid_url(raw_url) {
            return Err(AppError::bad_request(
                "Invalid URL: expected an absolute http or https URL",
                invalid_url_details(raw_url),
            ));
        }

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let token = self.generator.new_token()?;

            match self.repository.create(&token, raw_url).await {
                Ok(id) => {
                    return Ok(ShortLink {
                        id,
                        short_url: self.short_url(&token),
                        token,
                        long_url: raw_url.to_string(),
                    });
                }
                Err(RepositoryError::DuplicateToken(token)) => {
                    tracing::warn!(attempt, %token, "token collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::error!(
            attempts = MAX_CREATE_ATTEMPTS,
            "token collision persisted after regeneration"
        );
        Err(AppError::internal_error())
    }

    /// Lists the most recently created mappings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failure.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<UrlMapping>, AppError> {
        Ok(self.repository.list_recent(limit).await?)
    }

    /// Constructs the public short URL for a token.
    pub fn short_url(&self, token: &str) -> String {
        format!("{}/s/{}", self.base_url.trim_end_matches('/'), token)
    }
}
