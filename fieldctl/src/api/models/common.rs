//! Shared response envelope and list query parameters.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Envelope for successful responses: `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Standard pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Number of records to skip
    pub skip: Option<i64>,
    /// Maximum records to return (clamped per endpoint)
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Resolve skip/limit against an endpoint's cap. Limits are clamped, not
    /// rejected: an oversized request silently gets the cap.
    pub fn resolve(&self, default_limit: i64, max_limit: i64) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit);
        (skip, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.resolve(100, 100), (0, 100));
    }

    #[test]
    fn test_list_query_clamps_oversized_limit() {
        let query = ListQuery {
            skip: Some(10),
            limit: Some(10_000),
        };
        assert_eq!(query.resolve(100, 200), (10, 200));
    }

    #[test]
    fn test_list_query_rejects_negative_values() {
        let query = ListQuery {
            skip: Some(-5),
            limit: Some(0),
        };
        assert_eq!(query.resolve(100, 200), (0, 1));
    }

    #[test]
    fn test_data_envelope_shape() {
        let body = serde_json::to_value(Data::new(vec![1, 2, 3])).unwrap();
        assert_eq!(body, serde_json::json!({ "data": [1, 2, 3] }));
    }
}
