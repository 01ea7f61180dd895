//! Mapping entity associating a token with its target URL.

use chrono::{DateTime, Utc};

/// A durable token → URL mapping.
///
/// `token` and `long_url` never change after creation; `visit_count` only
/// grows, and only through [`crate::domain::repositories::MappingRepository::record_visit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub id: i64,
    pub token: String,
    pub long_url: String,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        id: i64,
        token: String,
        long_url: String,
        visit_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            token,
            long_url,
            visit_count,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let now = Utc::now();
        let mapping = UrlMapping::new(
            1,
            "0f1e2d3c4b5a69788796a5b4c3d2e1f0".to_string(),
            "https://example.com/page".to_string(),
            0,
            now,
        );

        assert_eq!(mapping.id, 1);
        assert_eq!(mapping.token, "0f1e2d3c4b5a69788796a5b4c3d2e1f0");
        assert_eq!(mapping.long_url, "https://example.com/page");
        assert_eq!(mapping.visit_count, 0);
        assert_eq!(mapping.created_at, now);
    }
}
