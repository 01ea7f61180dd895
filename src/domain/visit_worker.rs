//! Fixed pool of background workers persisting queued visits.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

use crate::domain::repositories::MappingRepository;
use crate::domain::visit_event::VisitEvent;
use crate::domain::visit_stats::VisitStats;

/// Workers draining the visit queue into the repository.
///
/// All workers share one receiver. They stop once every
/// [`crate::application::services::VisitRecorder`] handle has been dropped
/// and the queue is empty, so [`Self::drain`] completes a graceful shutdown.
pub struct VisitWorkerPool {
    workers: JoinSet<()>,
}

impl VisitWorkerPool {
    /// Spawns `size` workers on the current runtime. `size` is clamped to at least one.
    pub fn spawn(
        rx: mpsc::Receiver<VisitEvent>,
        repository: Arc<dyn MappingRepository>,
        stats: Arc<VisitStats>,
        size: usize,
    ) -> Self {
        let rx = Arc::new(Mutex::new(rx));
        let mut workers = JoinSet::new();

        for worker_id in 0..size.max(1) {
            workers.spawn(run_visit_worker(
                worker_id,
                rx.clone(),
                repository.clone(),
                stats.clone(),
            ));
        }

        Self { workers }
    }

    /// Number of workers still running.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Waits for every worker to finish processing the remaining queue.
    pub async fn drain(mut self) {
        while let Some(result) = self.workers.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "visit worker panicked");
            }
        }
        tracing::info!("Visit workers stopped");
    }
}

async fn run_visit_worker(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<VisitEvent>>>,
    repository: Arc<dyn MappingRepository>,
    stats: Arc<VisitStats>,
) {
    loop {
        let event = { rx.lock().await.recv().await };
        let Some(event) = event else {
            break;
        };
        persist_visit(repository.as_ref(), &stats, event).await;
    }
    tracing::debug!(worker_id, "visit worker exiting");
}

/// Persists a single visit exactly once.
///
/// Failures are logged and counted, never retried.
pub async fn persist_visit(repository: &dyn MappingRepository, stats: &VisitStats, event: VisitEvent) {
    let mapping_id = event.mapping_id;
    let enqueued_at = event.enqueued_at;

    match repository.record_visit(event.into_new_visit()).await {
        Ok(()) => {
            stats.record_success();
            metrics::histogram!("visit_record_delay_seconds")
                .record(enqueued_at.elapsed().as_secs_f64());
        }
        Err(e) => {
            stats.record_failure();
            tracing::warn!(mapping_id, error = ?e, "failed to record visit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMappingRepository;
    use crate::error::RepositoryError;

    fn event(mapping_id: i64) -> VisitEvent {
        VisitEvent::new(mapping_id, "203.0.113.5".to_string(), None)
    }

    #[tokio::test]
    async fn test_pool_records_all_events_then_drains() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_record_visit()
            .withf(|visit| visit.mapping_id == 1 && visit.source_address == "203.0.113.5")
            .times(5)
            .returning(|_| Ok(()));

        let stats = Arc::new(VisitStats::default());
        let (tx, rx) = mpsc::channel(16);
        let pool = VisitWorkerPool::spawn(rx, Arc::new(mock_repo), stats.clone(), 3);
        assert_eq!(pool.len(), 3);

        for _ in 0..5 {
            tx.send(event(1)).await.unwrap();
        }
        drop(tx);
        pool.drain().await;

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.recorded, 5);
        assert_eq!(snapshot.failed, 0);
    }

    #[tokio::test]
    async fn test_failed_visit_is_counted_and_not_retried() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_record_visit()
            .times(1)
            .returning(|visit| Err(RepositoryError::NotFound(visit.mapping_id.to_string())));

        let stats = VisitStats::default();
        persist_visit(&mock_repo, &stats, event(99)).await;

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.recorded, 0);
        assert_eq!(snapshot.failed, 1);
    }

    #[tokio::test]
    async fn test_backend_failure_does_not_stop_worker() {
        let mut mock_repo = MockMappingRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_record_visit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(RepositoryError::backend(
                    "record_visit",
                    std::io::Error::other("connection reset"),
                ))
            });
        mock_repo
            .expect_record_visit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let stats = Arc::new(VisitStats::default());
        let (tx, rx) = mpsc::channel(4);
        let pool = VisitWorkerPool::spawn(rx, Arc::new(mock_repo), stats.clone(), 1);

        tx.send(event(1)).await.unwrap();
        tx.send(event(1)).await.unwrap();
        drop(tx);
        pool.drain().await;

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.recorded, 1);
    }

    #[tokio::test]
    async fn test_zero_size_pool_still_spawns_one_worker() {
        let mock_repo = MockMappingRepository::new();
        let (_tx, rx) = mpsc::channel(1);
        let pool = VisitWorkerPool::spawn(rx, Arc::new(mock_repo), Arc::new(VisitStats::default()), 0);
        assert_eq!(pool.len(), 1);
    }
}
