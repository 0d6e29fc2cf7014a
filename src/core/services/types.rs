use std::collections::BTreeMap;

use crate::error::ApiError;

/// Service layer error types
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },
}

/// User-selected query constraints, serialized into a query string.
///
/// Entries live in a `BTreeMap` so serialization is deterministic no
/// matter the insertion order; empty values are dropped when building
/// query strings and cache keys rather than sent as empty parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    entries: BTreeMap<String, String>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary filter entry. The typed builders below cover
    /// the options the backend recognizes.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.entries.insert(name.into(), value.to_string());
        self
    }

    pub fn domain(self, domain: &str) -> Self {
        self.with("domain", domain)
    }

    pub fn reviewer(self, id: i64) -> Self {
        self.with("reviewer", id)
    }

    pub fn trainer(self, id: i64) -> Self {
        self.with("trainer", id)
    }

    pub fn quality_dimension(self, name: &str) -> Self {
        self.with("quality_dimension", name)
    }

    pub fn min_score(self, score: f64) -> Self {
        self.with("min_score", score)
    }

    pub fn max_score(self, score: f64) -> Self {
        self.with("max_score", score)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Non-empty entries in deterministic (lexicographic) order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// `?a=1&b=2` over the non-empty entries, or `""` when none remain.
    pub fn query_string(&self) -> String {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let joined = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{}", joined)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }
}

/// Cache key for one (endpoint, filters) pair. Logically identical
/// pairs always map to the same key.
pub fn response_cache_key(endpoint: &str, filters: &FilterParams) -> String {
    format!("{}{}", endpoint, filters.query_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_orders_entries_deterministically() {
        let a_first = FilterParams::new().with("a", 1).with("b", 2);
        let b_first = FilterParams::new().with("b", 2).with("a", 1);
        assert_eq!(a_first.query_string(), "?a=1&b=2");
        assert_eq!(a_first.query_string(), b_first.query_string());
    }

    #[test]
    fn test_empty_values_are_dropped() {
        let filters = FilterParams::new().domain("Electronics").with("reviewer", "");
        assert_eq!(filters.query_string(), "?domain=Electronics");
        assert_eq!(filters.get("reviewer"), None);
    }

    #[test]
    fn test_no_filters_means_no_query_string() {
        assert_eq!(FilterParams::new().query_string(), "");
        assert!(FilterParams::new().with("domain", "").is_empty());
    }

    #[test]
    fn test_typed_builders_use_backend_names() {
        let filters = FilterParams::new()
            .domain("Electronics")
            .reviewer(12)
            .trainer(3)
            .quality_dimension("Clarity")
            .min_score(2.5)
            .max_score(5.0);
        assert_eq!(
            filters.query_string(),
            "?domain=Electronics&max_score=5&min_score=2.5&quality_dimension=Clarity&reviewer=12&trainer=3"
        );
    }

    #[test]
    fn test_cache_key_is_order_insensitive() {
        let a = FilterParams::new().with("a", 1).with("b", 2);
        let b = FilterParams::new().with("b", 2).with("a", 1);
        assert_eq!(
            response_cache_key("/overall", &a),
            response_cache_key("/overall", &b)
        );
    }

    #[test]
    fn test_cache_key_excludes_empty_values() {
        let sparse = FilterParams::new().domain("Books").with("reviewer", "");
        let dense = FilterParams::new().domain("Books");
        assert_eq!(
            response_cache_key("/by-domain", &sparse),
            response_cache_key("/by-domain", &dense)
        );
        assert_eq!(
            response_cache_key("/by-domain", &dense),
            "/by-domain?domain=Books"
        );
    }

    #[test]
    fn test_bare_endpoint_key_without_filters() {
        assert_eq!(
            response_cache_key("/overall", &FilterParams::new()),
            "/overall"
        );
    }

    #[test]
    fn test_service_error_display_passes_api_detail_through() {
        let err = ServiceError::Api(ApiError::Http {
            status: 502,
            endpoint: "/overall".to_string(),
            detail: "upstream unavailable".to_string(),
        });
        assert_eq!(format!("{}", err), "upstream unavailable");
    }
}
