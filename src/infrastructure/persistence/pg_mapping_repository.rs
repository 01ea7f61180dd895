//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::{PoisonError, RwLock};

use crate::domain::entities::{NewVisit, UrlMapping, Visit};
use crate::domain::repositories::MappingRepository;
use crate::error::RepositoryError;
use crate::utils::db_error::{is_foreign_key_violation, is_unique_violation_on_token};

#[derive(sqlx::FromRow)]
struct MappingRow {
    id: i64,
    token: String,
    long_url: String,
    visit_count: i64,
    created_at: DateTime<Utc>,
}

impl From<MappingRow> for UrlMapping {
    fn from(r: MappingRow) -> Self {
        UrlMapping::new(r.id, r.token, r.long_url, r.visit_count, r.created_at)
    }
}

#[derive(sqlx::FromRow)]
struct VisitRow {
    id: i64,
    url_id: i64,
    ip: String,
    location: Option<String>,
    device_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<VisitRow> for Visit {
    fn from(r: VisitRow) -> Self {
        Visit {
            id: r.id,
            mapping_id: r.url_id,
            source_address: r.ip,
            location: r.location,
            device_type: r.device_type,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for mappings and visits.
///
/// Created without a connection; [`Self::connect`] establishes the pool and
/// [`MappingRepository::close`] releases it. Operations outside that window
/// fail with [`RepositoryError::NotInitialized`].
///
/// The pool is shared by every request task. When all connections are busy,
/// callers wait up to the pool's acquire timeout.
pub struct PgMappingRepository {
    pool: RwLock<Option<PgPool>>,
}

impl Default for PgMappingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PgMappingRepository {
    /// Creates a repository with no connection yet.
    pub fn new() -> Self {
        Self {
            pool: RwLock::new(None),
        }
    }

    /// Creates a repository over an already connected pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            pool: RwLock::new(Some(pool)),
        }
    }

    /// Opens the connection pool.
    ///
    /// At least one connection is established before returning, so an
    /// unreachable database is reported here rather than on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Backend`] if the database cannot be reached.
    pub async fn connect(
        &self,
        database_url: &str,
        options: PgPoolOptions,
    ) -> Result<(), RepositoryError> {
        let pool = options
            .connect(database_url)
            .await
            .map_err(|e| RepositoryError::backend("connect", e))?;

        let previous = self
            .pool
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(pool);

        if let Some(previous) = previous {
            previous.close().await;
        }

        Ok(())
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotInitialized`] before [`Self::connect`].
    /// Returns [`RepositoryError::Backend`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        let pool = self.pool()?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RepositoryError::backend("migrate", e))
    }

    /// Lists the most recent visits of a mapping, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Backend`] on database errors.
    pub async fn recent_visits(
        &self,
        mapping_id: i64,
        limit: i64,
    ) -> Result<Vec<Visit>, RepositoryError> {
        let pool = self.pool()?;

        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, url_id, ip, location, device_type, created_at
            FROM url_visits
            WHERE url_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(mapping_id)
        .bind(limit)
        .fetch_all(&pool)
        .await
        .map_err(|e| RepositoryError::backend("recent_visits", e))?;

        Ok(rows.into_iter().map(Visit::from).collect())
    }

    fn pool(&self) -> Result<PgPool, RepositoryError> {
        self.pool
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(RepositoryError::NotInitialized)
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn lookup(&self, token: &str) -> Result<UrlMapping, RepositoryError> {
        let pool = self.pool()?;

        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, token, long_url, visit_count, created_at
            FROM url_maps
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&pool)
        .await
        .map_err(|e| RepositoryError::backend("lookup", e))?;

        row.map(UrlMapping::from)
            .ok_or_else(|| RepositoryError::NotFound(token.to_string()))
    }

    async fn create(&self, token: &str, long_url: &str) -> Result<i64, RepositoryError> {
        let pool = self.pool()?;

        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO url_maps (token, long_url)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(token)
        .bind(long_url)
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation_on_token(&e) {
                RepositoryError::DuplicateToken(token.to_string())
            } else {
                RepositoryError::backend("create", e)
            }
        })
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<UrlMapping>, RepositoryError> {
        let pool = self.pool()?;

        // LIMIT NULL returns every row.
        let limit = (limit >= 0).then_some(limit);

        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, token, long_url, visit_count, created_at
            FROM url_maps
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&pool)
        .await
        .map_err(|e| RepositoryError::backend("list_recent", e))?;

        Ok(rows.into_iter().map(UrlMapping::from).collect())
    }

    async fn record_visit(&self, visit: NewVisit) -> Result<(), RepositoryError> {
        let pool = self.pool()?;

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RepositoryError::backend("record_visit", e))?;

        let updated = sqlx::query("UPDATE url_maps SET visit_count = visit_count + 1 WHERE id = $1")
            .bind(visit.mapping_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::backend("record_visit", e))?
            .rows_affected();

        if updated == 0 {
            return Err(RepositoryError::NotFound(visit.mapping_id.to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO url_visits (url_id, ip, location, device_type)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(visit.mapping_id)
        .bind(&visit.source_address)
        .bind(&visit.location)
        .bind(&visit.device_type)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepositoryError::NotFound(visit.mapping_id.to_string())
            } else {
                RepositoryError::backend("record_visit", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::backend("record_visit", e))
    }

    async fn health_check(&self) -> bool {
        let Ok(pool) = self.pool() else {
            return false;
        };

        sqlx::query("SELECT 1").execute(&pool).await.is_ok()
    }

    async fn close(&self) {
        let pool = self
            .pool
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!("Database connections closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operations_before_connect_are_rejected() {
        let repo = PgMappingRepository::new();

        assert!(matches!(
            repo.lookup("abc").await,
            Err(RepositoryError::NotInitialized)
        ));
        assert!(matches!(
            repo.create("abc", "https://example.com").await,
            Err(RepositoryError::NotInitialized)
        ));
        assert!(matches!(
            repo.list_recent(10).await,
            Err(RepositoryError::NotInitialized)
        ));
        assert!(matches!(
            repo.record_visit(NewVisit::new(1, "127.0.0.1")).await,
            Err(RepositoryError::NotInitialized)
        ));
        assert!(matches!(
            repo.migrate().await,
            Err(RepositoryError::NotInitialized)
        ));
        assert!(!repo.health_check().await);
    }

    #[tokio::test]
    async fn test_close_without_connection_is_noop() {
        let repo = PgMappingRepository::new();
        repo.close().await;
        repo.close().await;

        assert!(matches!(
            repo.lookup("abc").await,
            Err(RepositoryError::NotInitialized)
        ));
    }
}
