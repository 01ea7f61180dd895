//! In-process implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewVisit, UrlMapping, Visit};
use crate::domain::repositories::MappingRepository;
use crate::error::RepositoryError;

#[derive(Default)]
struct Store {
    /// Mappings in creation order; `id` is the position plus one.
    mappings: Vec<UrlMapping>,
    by_token: HashMap<String, usize>,
    visits: Vec<Visit>,
}

impl Store {
    fn mapping_mut(&mut self, id: i64) -> Option<&mut UrlMapping> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.mappings.get_mut(index)
    }
}

/// Repository keeping all data in memory behind a single lock.
///
/// Every operation takes the lock once, so creation and visit recording are
/// atomic. After [`MappingRepository::close`] the data is released and all
/// operations fail with [`RepositoryError::NotInitialized`].
pub struct InMemoryMappingRepository {
    store: RwLock<Option<Store>>,
}

impl Default for InMemoryMappingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMappingRepository {
    /// Creates an empty, ready-to-use repository.
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Some(Store::default())),
        }
    }

    /// Returns every visit recorded for a mapping, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotInitialized`] after close.
    pub async fn visits(&self, mapping_id: i64) -> Result<Vec<Visit>, RepositoryError> {
        let guard = self.store.read().await;
        let store = guard.as_ref().ok_or(RepositoryError::NotInitialized)?;

        Ok(store
            .visits
            .iter()
            .filter(|v| v.mapping_id == mapping_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn lookup(&self, token: &str) -> Result<UrlMapping, RepositoryError> {
        let guard = self.store.read().await;
        let store = guard.as_ref().ok_or(RepositoryError::NotInitialized)?;

        store
            .by_token
            .get(token)
            .and_then(|&index| store.mappings.get(index))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(token.to_string()))
    }

    async fn create(&self, token: &str, long_url: &str) -> Result<i64, RepositoryError> {
        let mut guard = self.store.write().await;
        let store = guard.as_mut().ok_or(RepositoryError::NotInitialized)?;

        if store.by_token.contains_key(token) {
            return Err(RepositoryError::DuplicateToken(token.to_string()));
        }

        let index = store.mappings.len();
        let id = i64::try_from(index + 1)
            .map_err(|e| RepositoryError::backend("create", e))?;

        store.mappings.push(UrlMapping::new(
            id,
            token.to_string(),
            long_url.to_string(),
            0,
            Utc::now(),
        ));
        store.by_token.insert(token.to_string(), index);

        Ok(id)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<UrlMapping>, RepositoryError> {
        let guard = self.store.read().await;
        let store = guard.as_ref().ok_or(RepositoryError::NotInitialized)?;

        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(store.mappings.iter().rev().take(take).cloned().collect())
    }

    async fn record_visit(&self, visit: NewVisit) -> Result<(), RepositoryError> {
        let mut guard = self.store.write().await;
        let store = guard.as_mut().ok_or(RepositoryError::NotInitialized)?;

        let mapping = store
            .mapping_mut(visit.mapping_id)
            .ok_or_else(|| RepositoryError::NotFound(visit.mapping_id.to_string()))?;
        mapping.visit_count += 1;

        let id = store.visits.len() as i64 + 1;
        store.visits.push(Visit {
            id,
            mapping_id: visit.mapping_id,
            source_address: visit.source_address,
            location: visit.location,
            device_type: visit.device_type,
            created_at: Utc::now(),
        });

        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.store.read().await.is_some()
    }

    async fn close(&self) {
        self.store.write().await.take();
    }
}
