//! Visit entity representing a single recorded redirect.

use chrono::{DateTime, Utc};

/// A persisted visit on a short link.
///
/// Append-only: created once per redirect and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub id: i64,
    pub mapping_id: i64,
    pub source_address: String,
    pub location: Option<String>,
    pub device_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a visit.
///
/// `mapping_id` must reference an existing mapping; the timestamp is
/// assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub mapping_id: i64,
    pub source_address: String,
    pub location: Option<String>,
    pub device_type: Option<String>,
}

impl NewVisit {
    /// Creates a visit with no enrichment fields.
    pub fn new(mapping_id: i64, source_address: impl Into<String>) -> Self {
        Self {
            mapping_id,
            source_address: source_address.into(),
            location: None,
            device_type: None,
        }
    }

    pub fn with_device_type(mut self, device_type: Option<String>) -> Self {
        self.device_type = device_type;
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_visit_minimal() {
        let visit = NewVisit::new(7, "203.0.113.5");

        assert_eq!(visit.mapping_id, 7);
        assert_eq!(visit.source_address, "203.0.113.5");
        assert!(visit.location.is_none());
        assert!(visit.device_type.is_none());
    }

    #[test]
    fn test_new_visit_with_enrichment() {
        let visit = NewVisit::new(7, "2001:db8::1")
            .with_device_type(Some("mobile".to_string()))
            .with_location(Some("NL".to_string()));

        assert_eq!(visit.device_type.as_deref(), Some("mobile"));
        assert_eq!(visit.location.as_deref(), Some("NL"));
    }
}
