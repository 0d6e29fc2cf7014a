pub mod mock_service;
pub mod stats_service;
pub mod traits;
pub mod types;

use std::sync::Arc;

use crate::error::ApiError;
use crate::storage::config::Config;
use mock_service::MockStatsService;
use stats_service::StatsService;
use traits::StatsApi;

/// Pick the service layer once at startup. The choice is static for the
/// lifetime of the process; callers hold the trait object and never
/// re-decide per call.
pub fn build_stats_api(config: &Config) -> Result<Arc<dyn StatsApi>, ApiError> {
    if config.use_mock_api {
        Ok(Arc::new(MockStatsService::new()))
    } else {
        Ok(Arc::new(StatsService::from_config(config)?))
    }
}
