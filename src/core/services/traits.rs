use async_trait::async_trait;

use crate::api::models::{
    DomainAggregation, DomainStats, OverallAggregation, OverviewStats, ReviewerAggregation,
    ReviewerStats, TaskLevelInfo, TrainerLevelAggregation, TrainerStats,
};
use crate::core::fetch::CancelToken;
use crate::core::services::types::{FilterParams, ServiceError};

/// Query surface of the statistics backend.
///
/// Implemented by the real HTTP service layer and the fixture-backed
/// mock; both honor the same cancellation contract, so consumers never
/// know which one they hold. Every operation takes an optional filter
/// mapping (an empty one adds no query string) and a cancellation
/// token.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Pre-delivery overview aggregate.
    async fn overview(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<OverviewStats, ServiceError>;

    async fn pre_delivery_by_reviewer(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<ReviewerStats>, ServiceError>;

    async fn pre_delivery_by_trainer(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TrainerStats>, ServiceError>;

    async fn pre_delivery_by_domain(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<DomainStats>, ServiceError>;

    /// Overall aggregate across all dimensions.
    async fn overall(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<OverallAggregation, ServiceError>;

    async fn by_domain(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<DomainAggregation>, ServiceError>;

    async fn by_reviewer(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<ReviewerAggregation>, ServiceError>;

    async fn by_trainer_level(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TrainerLevelAggregation>, ServiceError>;

    async fn task_level(
        &self,
        filters: &FilterParams,
        token: CancelToken,
    ) -> Result<Vec<TaskLevelInfo>, ServiceError>;
}
