//! Visit event model for asynchronous visit recording.

use std::time::Instant;

use crate::domain::entities::NewVisit;

/// An in-memory visit queued between the redirect handler and the workers.
///
/// Carries everything the worker needs so that no lookup is repeated off
/// the request path. `enqueued_at` measures how long recording lagged behind
/// the redirect.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub mapping_id: i64,
    pub source_address: String,
    pub location: Option<String>,
    pub device_type: Option<String>,
    pub enqueued_at: Instant,
}

impl VisitEvent {
    /// Creates a new visit event stamped with the current instant.
    ///
    /// `source_address` is expected to be normalized already (port stripped).
    pub fn new(mapping_id: i64, source_address: String, device_type: Option<&str>) -> Self {
        Self {
            mapping_id,
            source_address,
            location: None,
            device_type: device_type.map(str::to_string),
            enqueued_at: Instant::now(),
        }
    }

    /// Converts the event into the repository input.
    pub fn into_new_visit(self) -> NewVisit {
        NewVisit::new(self.mapping_id, self.source_address)
            .with_location(self.location)
            .with_device_type(self.device_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_event_creation() {
        let event = VisitEvent::new(3, "198.51.100.7".to_string(), Some("desktop"));

        assert_eq!(event.mapping_id, 3);
        assert_eq!(event.source_address, "198.51.100.7");
        assert_eq!(event.device_type.as_deref(), Some("desktop"));
        assert!(event.location.is_none());
    }

    #[test]
    fn test_into_new_visit() {
        let visit = VisitEvent::new(3, "198.51.100.7".to_string(), None).into_new_visit();

        assert_eq!(visit, NewVisit::new(3, "198.51.100.7"));
    }
}
