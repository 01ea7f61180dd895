//! Repository trait for mappings and their visits.

use crate::domain::entities::{NewVisit, UrlMapping};
use crate::error::RepositoryError;
use async_trait::async_trait;

/// Persistence contract for short link mappings.
///
/// Every operation fails with [`RepositoryError::NotInitialized`] until the
/// backend connection is established, and again after [`Self::close`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds the mapping for `token`.
    ///
    /// Safe to call concurrently with [`Self::create`] and [`Self::record_visit`];
    /// a token whose creation has not committed yet is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no mapping has that token.
    /// Returns [`RepositoryError::Backend`] on storage errors.
    async fn lookup(&self, token: &str) -> Result<UrlMapping, RepositoryError>;

    /// Atomically creates a mapping and returns its internal id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateToken`] if the token already exists;
    /// the existing mapping is left untouched.
    /// Returns [`RepositoryError::Backend`] on storage errors.
    async fn create(&self, token: &str, long_url: &str) -> Result<i64, RepositoryError>;

    /// Lists at most `limit` mappings, most recently created first.
    ///
    /// A negative `limit` returns every mapping, which is not recommended
    /// on large tables. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Backend`] on storage errors.
    async fn list_recent(&self, limit: i64) -> Result<Vec<UrlMapping>, RepositoryError>;

    /// Appends a visit and increments the owning mapping's `visit_count`.
    ///
    /// Both effects become visible together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if `visit.mapping_id` does not exist.
    /// Returns [`RepositoryError::Backend`] on storage errors.
    async fn record_visit(&self, visit: NewVisit) -> Result<(), RepositoryError>;

    /// Returns true if the backend answers a trivial request.
    async fn health_check(&self) -> bool;

    /// Releases all held connections. Calling it more than once is a no-op.
    async fn close(&self);
}
