use async_trait::async_trait;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::api::models::{
    DomainAggregation, DomainStats, OverallAggregation, OverviewStats, ReviewerAggregation,
    ReviewerStats, TaskLevelInfo, TrainerLevelAggregation, TrainerStats,
};
use crate::api::transform::keys_to_camel_case;
use crate::core::fetch::CancelToken;
use crate::core::services::traits::StatsApi;
use crate::core::services::types::{FilterParams, ServiceError};
use crate::error::ApiError;

/// Artificial latency window, mimicking a realistic backend round trip.
const DELAY_RANGE_MS: RangeInclusive<u64> = 300..=800;

/// Fixtures are stored exactly as the wire would carry them
/// (snake_case) and run through the same transform + deserialize path
/// as real responses, so mock and real parity holds end to end.
mod fixtures {
    pub const PRE_DELIVERY_OVERVIEW: &str = include_str!("fixtures/pre_delivery_overview.json");
    pub const PRE_DELIVERY_BY_REVIEWER: &str =
        include_str!("fixtures/pre_delivery_by_reviewer.json");
    pub const PRE_DELIVERY_BY_TRAINER: &str =
        include_str!("fixtures/pre_delivery_by_trainer.json");
    pub const PRE_DELIVERY_BY_DOMAIN: &str = include_str!("fixtures/pre_delivery_by_domain.json");
    pub const OVERALL: &str = include_str!("fixtures/overall.json");
    pub const BY_DOMAIN: &str = include_str!("fixtures/by_domain.json");
    pub const BY_REVIEWER: &str = include_str!("fixtures/by_reviewer.json");
    pub const BY_TRAINER_LEVEL: &str = include_str!("fixtures/by_trainer_level.json");
    pub const TASK_LEVEL: &str = include_str!("fixtures/task_level.json");
}

/// Fixture-backed service layer for offline development.
///
/// Implements the same signatures and the same cancellation contract as
/// [`super::stats_service::StatsService`]: a token fired during the
/// artificial delay pre-empts resolution and the call fails with the
/// cancellation error. Filters are accepted but not applied; fixtures
/// are static.
#[derive(Debug, Default)]
pub struct MockStatsService;

impl MockStatsService {
    pub fn new() -> Self {
        Self
    }

    async fn serve<T>(&self, fixture: &str, token: &CancelToken) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        let delay = Duration::from_millis(rand::thread_rng().gen_range(DELAY_RANGE_MS));
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = token.cancelled() => return Err(ServiceError::Api(ApiError::Cancelled)),
        }

        let raw: Value = serde_json::from_str(fixture).map_err(|e| {
            ServiceError::Api(ApiError::Decode {
                message: format!("Mock fixture is not valid JSON: {}", e),
            })
        })?;
        serde_json::from_value(keys_to_camel_case(raw)).map_err(|e| {
            ServiceError::Api(ApiError::Decode {
                message: format!("Mock fixture did not match the expected shape: {}", e),
            })
        })
    }
}

#[async_trait]
impl StatsApi for MockStatsService {
    async fn overview(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<OverviewStats, ServiceError> {
        self.serve(fixtures::PRE_DELIVERY_OVERVIEW, &token).await
    }

    async fn pre_delivery_by_reviewer(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<ReviewerStats>, ServiceError> {
        self.serve(fixtures::PRE_DELIVERY_BY_REVIEWER, &token).await
    }

    async fn pre_delivery_by_trainer(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TrainerStats>, ServiceError> {
        self.serve(fixtures::PRE_DELIVERY_BY_TRAINER, &token).await
    }

    async fn pre_delivery_by_domain(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<DomainStats>, ServiceError> {
        self.serve(fixtures::PRE_DELIVERY_BY_DOMAIN, &token).await
    }

    async fn overall(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<OverallAggregation, ServiceError> {
        self.serve(fixtures::OVERALL, &token).await
    }

    async fn by_domain(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<DomainAggregation>, ServiceError> {
        self.serve(fixtures::BY_DOMAIN, &token).await
    }

    async fn by_reviewer(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<ReviewerAggregation>, ServiceError> {
        self.serve(fixtures::BY_REVIEWER, &token).await
    }

    async fn by_trainer_level(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TrainerLevelAggregation>, ServiceError> {
        self.serve(fixtures::BY_TRAINER_LEVEL, &token).await
    }

    async fn task_level(
        &self,
        _filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TaskLevelInfo>, ServiceError> {
        self.serve(fixtures::TASK_LEVEL, &token).await
    }
}
