//! Non-blocking handle for queueing visits.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::entities::UrlMapping;
use crate::domain::visit_event::VisitEvent;
use crate::domain::visit_stats::VisitStats;
use crate::utils::address::strip_port;
use crate::utils::device_type::classify_device;

/// Producer side of the visit queue.
///
/// Cloned into every request; [`Self::record`] never waits. When the queue is
/// full or the workers are gone, the visit is dropped and counted.
#[derive(Clone)]
pub struct VisitRecorder {
    sender: mpsc::Sender<VisitEvent>,
    stats: Arc<VisitStats>,
}

impl VisitRecorder {
    /// Creates a bounded visit queue and returns its producer and consumer ends.
    pub fn channel(
        capacity: usize,
        stats: Arc<VisitStats>,
    ) -> (Self, mpsc::Receiver<VisitEvent>) {
        let (sender, rx) = mpsc::channel(capacity.max(1));
        (Self { sender, stats }, rx)
    }

    /// Queues a visit of `mapping` without blocking the caller.
    ///
    /// The port is stripped from `source_address` and the device type is
    /// derived from `user_agent` before queueing.
    pub fn record(&self, mapping: &UrlMapping, source_address: &str, user_agent: Option<&str>) {
        let event = VisitEvent::new(
            mapping.id,
            strip_port(source_address).to_string(),
            classify_device(user_agent),
        );

        if let Err(e) = self.sender.try_send(event) {
            self.stats.record_drop();
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "queue full",
                mpsc::error::TrySendError::Closed(_) => "queue closed",
            };
            warn!(mapping_id = mapping.id, token = %mapping.token, reason, "visit dropped");
        }
    }

    /// Returns `true` once the workers' receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Remaining free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    /// Total size of the queue.
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    pub fn stats(&self) -> &Arc<VisitStats> {
        &self.stats
    }
}
