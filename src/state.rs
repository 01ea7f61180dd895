//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectDispatcher, VisitRecorder};
use crate::domain::repositories::MappingRepository;
use crate::domain::visit_stats::VisitStats;
use crate::utils::token_generator::TokenGenerator;

/// Dependencies shared by all request handlers.
///
/// Built once at startup around a single repository handle and cloned
/// cheaply into each request.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn MappingRepository>,
    pub link_service: Arc<LinkService>,
    pub dispatcher: RedirectDispatcher,
    pub visit_recorder: VisitRecorder,
    pub visit_stats: Arc<VisitStats>,
    /// Number of recent mappings shown on the index page.
    pub index_limit: i64,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        generator: Arc<dyn TokenGenerator>,
        visit_recorder: VisitRecorder,
        base_url: impl Into<String>,
        index_limit: i64,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(repository.clone(), generator, base_url));
        let dispatcher = RedirectDispatcher::new(repository.clone(), visit_recorder.clone());
        let visit_stats = visit_recorder.stats().clone();

        Self {
            repository,
            link_service,
            dispatcher,
            visit_recorder,
            visit_stats,
            index_limit,
        }
    }
}
