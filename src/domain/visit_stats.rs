//! Aggregate counters for the visit pipeline.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-wide visit counters, mirrored to the `metrics` facade.
///
/// - `recorded` - visits persisted successfully
/// - `failed` - visits the repository rejected
/// - `dropped` - visits never queued because the queue was full or closed
#[derive(Debug, Default)]
pub struct VisitStats {
    recorded: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`VisitStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisitStatsSnapshot {
    pub recorded: u64,
    pub failed: u64,
    pub dropped: u64,
}

impl VisitStats {
    pub fn record_success(&self) {
        self.recorded.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("visits_recorded_total").increment(1);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("visits_failed_total").increment(1);
    }

    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("visits_dropped_total").increment(1);
    }

    pub fn snapshot(&self) -> VisitStatsSnapshot {
        VisitStatsSnapshot {
            recorded: self.recorded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let stats = VisitStats::default();
        assert_eq!(
            stats.snapshot(),
            VisitStatsSnapshot {
                recorded: 0,
                failed: 0,
                dropped: 0
            }
        );
    }

    #[test]
    fn test_counters_increment_independently() {
        let stats = VisitStats::default();
        stats.record_success();
        stats.record_success();
        stats.record_failure();
        stats.record_drop();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.recorded, 2);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.dropped, 1);
    }
}
