use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::client::StatsClient;
use crate::api::models::{
    DomainAggregation, DomainStats, OverallAggregation, OverviewStats, ReviewerAggregation,
    ReviewerStats, TaskLevelInfo, TrainerLevelAggregation, TrainerStats,
};
use crate::api::transform::keys_to_camel_case;
use crate::core::cache::ResponseCache;
use crate::core::fetch::CancelToken;
use crate::core::services::traits::StatsApi;
use crate::core::services::types::{FilterParams, ServiceError, response_cache_key};
use crate::error::ApiError;
use crate::storage::config::Config;

/// Endpoints of the statistics backend, relative to the API base URL.
pub mod endpoints {
    pub const PRE_DELIVERY_OVERVIEW: &str = "/pre-delivery/overview";
    pub const PRE_DELIVERY_BY_REVIEWER: &str = "/pre-delivery/by-reviewer";
    pub const PRE_DELIVERY_BY_TRAINER: &str = "/pre-delivery/by-trainer";
    pub const PRE_DELIVERY_BY_DOMAIN: &str = "/pre-delivery/by-domain";
    pub const OVERALL: &str = "/overall";
    pub const BY_DOMAIN: &str = "/by-domain";
    pub const BY_REVIEWER: &str = "/by-reviewer";
    pub const BY_TRAINER_LEVEL: &str = "/by-trainer-level";
    pub const TASK_LEVEL: &str = "/task-level";
}

/// HTTP-backed service layer.
///
/// Each operation resolves through the same pipeline: validate filters,
/// consult the response cache, otherwise GET the endpoint, rewrite the
/// payload to camelCase, store it, and deserialize into the typed
/// model. The cache holds the transformed payloads, so repeated queries
/// within the TTL never reach the network.
pub struct StatsService {
    client: StatsClient,
    cache: ResponseCache,
}

impl StatsService {
    pub fn new(client: StatsClient, cache: ResponseCache) -> Self {
        Self { client, cache }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = StatsClient::new(
            config.api_base_url.clone(),
            Duration::from_millis(config.api_timeout_ms),
        )?;
        Ok(Self::new(client, ResponseCache::with_default_ttl()))
    }

    /// Shared response cache, exposed for manual invalidation.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn validate_filters(filters: &FilterParams) -> Result<(), ServiceError> {
        let min = filters.get("min_score").and_then(|v| v.parse::<f64>().ok());
        let max = filters.get("max_score").and_then(|v| v.parse::<f64>().ok());
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ServiceError::Validation {
                    field: "min_score".to_string(),
                    message: format!("must not exceed max_score ({} > {})", min, max),
                });
            }
        }
        Ok(())
    }

    async fn fetch_transformed(
        &self,
        endpoint: &str,
        filters: &FilterParams,
        token: &CancelToken,
    ) -> Result<Value, ApiError> {
        let key = response_cache_key(endpoint, filters);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let body = self.client.get_json(endpoint, &filters.pairs(), token).await?;
        let transformed = keys_to_camel_case(body);
        self.cache.insert(key, transformed.clone());
        Ok(transformed)
    }

    async fn query<T>(
        &self,
        endpoint: &str,
        filters: &FilterParams,
        token: &CancelToken,
    ) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        Self::validate_filters(filters)?;
        let payload = self.fetch_transformed(endpoint, filters, token).await?;
        serde_json::from_value(payload).map_err(|e| {
            ServiceError::Api(ApiError::Decode {
                message: format!("{} payload did not match the expected shape: {}", endpoint, e),
            })
        })
    }
}

#[async_trait]
impl StatsApi for StatsService {
    async fn overview(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<OverviewStats, ServiceError> {
        self.query(endpoints::PRE_DELIVERY_OVERVIEW, filters, &token)
            .await
    }

    async fn pre_delivery_by_reviewer(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<ReviewerStats>, ServiceError> {
        self.query(endpoints::PRE_DELIVERY_BY_REVIEWER, filters, &token)
            .await
    }

    async fn pre_delivery_by_trainer(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TrainerStats>, ServiceError> {
        self.query(endpoints::PRE_DELIVERY_BY_TRAINER, filters, &token)
            .await
    }

    async fn pre_delivery_by_domain(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<DomainStats>, ServiceError> {
        self.query(endpoints::PRE_DELIVERY_BY_DOMAIN, filters, &token)
            .await
    }

    async fn overall(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<OverallAggregation, ServiceError> {
        self.query(endpoints::OVERALL, filters, &token).await
    }

    async fn by_domain(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<DomainAggregation>, ServiceError> {
        self.query(endpoints::BY_DOMAIN, filters, &token).await
    }

    async fn by_reviewer(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<ReviewerAggregation>, ServiceError> {
        self.query(endpoints::BY_REVIEWER, filters, &token).await
    }

    async fn by_trainer_level(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TrainerLevelAggregation>, ServiceError> {
        self.query(endpoints::BY_TRAINER_LEVEL, filters, &token).await
    }

    async fn task_level(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TaskLevelInfo>, ServiceError> {
        self.query(endpoints::TASK_LEVEL, filters, &token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_range_validation() {
        let inverted = FilterParams::new().min_score(4.0).max_score(2.0);
        let result = StatsService::validate_filters(&inverted);
        assert!(matches!(
            result,
            Err(ServiceError::Validation { ref field, .. }) if field == "min_score"
        ));

        let ordered = FilterParams::new().min_score(2.0).max_score(4.0);
        assert!(StatsService::validate_filters(&ordered).is_ok());

        // A lone bound is always acceptable.
        let single = FilterParams::new().min_score(3.0);
        assert!(StatsService::validate_filters(&single).is_ok());
    }

    #[test]
    fn test_service_construction_from_config() {
        let config = Config::default();
        let service = StatsService::from_config(&config);
        assert!(service.is_ok());
    }
}
