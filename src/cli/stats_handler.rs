use std::future::Future;
use std::sync::Arc;

use futures::future::join4;
use serde::Serialize;
use serde_json::json;

use crate::cli::main_types::FilterArgs;
use crate::core::fetch::{CancelToken, GENERIC_FAILURE_DETAIL, QueryController, RequestState};
use crate::core::services::traits::StatsApi;
use crate::core::services::types::{FilterParams, ServiceError};
use crate::display::{OperationStatus, ProgressSpinner, TableDisplay, display_status};
use crate::error::{AppError, CliError};
use crate::utils::validation::validate_score_bounds;

/// Translate CLI filter flags into request filters. Unset flags never
/// reach the query string.
pub fn filter_params(args: &FilterArgs) -> Result<FilterParams, AppError> {
    validate_score_bounds(args.min_score, args.max_score)?;

    let mut filters = FilterParams::new();
    if let Some(domain) = &args.domain {
        filters = filters.domain(domain);
    }
    if let Some(reviewer) = args.reviewer {
        filters = filters.reviewer(reviewer);
    }
    if let Some(trainer) = args.trainer {
        filters = filters.trainer(trainer);
    }
    if let Some(dimension) = &args.dimension {
        filters = filters.quality_dimension(dimension);
    }
    if let Some(min_score) = args.min_score {
        filters = filters.min_score(min_score);
    }
    if let Some(max_score) = args.max_score {
        filters = filters.max_score(max_score);
    }
    Ok(filters)
}

/// Runs statistics queries and renders the settled request state.
///
/// Every fetch goes through a [`QueryController`] activation, so the
/// handler sees exactly the data/error/loading triple a dashboard view
/// would, with cancellations already filtered out.
pub struct StatsHandler {
    api: Arc<dyn StatsApi>,
    verbose: bool,
}

impl StatsHandler {
    pub fn new(api: Arc<dyn StatsApi>, verbose: bool) -> Self {
        Self { api, verbose }
    }

    fn log_verbose(&self, msg: &str) {
        if self.verbose {
            println!("Verbose: {}", msg);
        }
    }

    fn api(&self) -> Arc<dyn StatsApi> {
        Arc::clone(&self.api)
    }

    async fn fetch<T, F, Fut>(&self, what: &str, producer: F) -> Result<T, AppError>
    where
        T: Clone + Send + 'static,
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<T, ServiceError>> + Send + 'static,
    {
        self.log_verbose(&format!("Fetching {}", what));

        let controller = QueryController::new();
        let mut spinner = ProgressSpinner::new(format!("Fetching {}...", what));
        spinner.start();
        let state = controller.run(producer).await;
        spinner.stop(None);

        unwrap_state(state, what)
    }

    fn emit<T, R>(&self, data: &T, format: &str, render: R) -> Result<(), AppError>
    where
        T: Serialize,
        R: FnOnce(&TableDisplay, &T) -> String,
    {
        match format {
            "json" => {
                let json = serde_json::to_string_pretty(data).map_err(|e| {
                    CliError::InvalidArguments(format!("JSON serialization error: {}", e))
                })?;
                println!("{}", json);
            }
            _ => {
                let display = TableDisplay::new();
                println!("{}", render(&display, data));
            }
        }
        Ok(())
    }

    pub async fn overall(&self, filters: FilterParams, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("overall statistics", move |token| async move {
                api.overall(&filters, token).await
            })
            .await?;
        self.emit(&data, format, |display, data| display.render_overall(data))
    }

    pub async fn by_domain(&self, filters: FilterParams, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("statistics by domain", move |token| async move {
                api.by_domain(&filters, token).await
            })
            .await?;
        self.emit(&data, format, |display, data| {
            display.render_domain_aggregations(data)
        })
    }

    pub async fn by_reviewer(&self, filters: FilterParams, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("statistics by reviewer", move |token| async move {
                api.by_reviewer(&filters, token).await
            })
            .await?;
        self.emit(&data, format, |display, data| {
            display.render_reviewer_aggregations(data)
        })
    }

    pub async fn by_trainer_level(
        &self,
        filters: FilterParams,
        format: &str,
    ) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("statistics by trainer level", move |token| async move {
                api.by_trainer_level(&filters, token).await
            })
            .await?;
        self.emit(&data, format, |display, data| {
            display.render_trainer_level_aggregations(data)
        })
    }

    pub async fn tasks(&self, filters: FilterParams, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("task-level information", move |token| async move {
                api.task_level(&filters, token).await
            })
            .await?;
        self.emit(&data, format, |display, data| display.render_task_level(data))
    }

    /// Fetch the overall aggregate plus every grouped aggregation
    /// concurrently, each through its own controller, and render them
    /// as one report.
    pub async fn summary(&self, filters: FilterParams, format: &str) -> Result<(), AppError> {
        self.log_verbose("Fetching summary (4 concurrent requests)");

        let mut spinner = ProgressSpinner::new("Fetching summary...".to_string());
        spinner.start();

        let overall_ctl = QueryController::new();
        let domains_ctl = QueryController::new();
        let reviewers_ctl = QueryController::new();
        let trainers_ctl = QueryController::new();

        let (api1, f1) = (self.api(), filters.clone());
        let (api2, f2) = (self.api(), filters.clone());
        let (api3, f3) = (self.api(), filters.clone());
        let (api4, f4) = (self.api(), filters);

        let (overall, domains, reviewers, trainers) = join4(
            overall_ctl.run(move |token| async move { api1.overall(&f1, token).await }),
            domains_ctl.run(move |token| async move { api2.by_domain(&f2, token).await }),
            reviewers_ctl.run(move |token| async move { api3.by_reviewer(&f3, token).await }),
            trainers_ctl.run(move |token| async move { api4.by_trainer_level(&f4, token).await }),
        )
        .await;
        spinner.stop(None);

        let overall = unwrap_state(overall, "overall statistics")?;
        let domains = unwrap_state(domains, "statistics by domain")?;
        let reviewers = unwrap_state(reviewers, "statistics by reviewer")?;
        let trainers = unwrap_state(trainers, "statistics by trainer level")?;

        match format {
            "json" => {
                let combined = json!({
                    "overall": overall,
                    "byDomain": domains,
                    "byReviewer": reviewers,
                    "byTrainerLevel": trainers,
                });
                let json = serde_json::to_string_pretty(&combined).map_err(|e| {
                    CliError::InvalidArguments(format!("JSON serialization error: {}", e))
                })?;
                println!("{}", json);
            }
            _ => {
                let display = TableDisplay::new();
                println!("== Overall ==\n{}", display.render_overall(&overall));
                println!(
                    "\n== By Domain ==\n{}",
                    display.render_domain_aggregations(&domains)
                );
                println!(
                    "\n== By Reviewer ==\n{}",
                    display.render_reviewer_aggregations(&reviewers)
                );
                println!(
                    "\n== By Trainer Level ==\n{}",
                    display.render_trainer_level_aggregations(&trainers)
                );
            }
        }
        Ok(())
    }

    pub async fn overview(&self, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("pre-delivery overview", move |token| async move {
                api.overview(&FilterParams::new(), token).await
            })
            .await?;
        self.emit(&data, format, |display, data| display.render_overview(data))
    }

    pub async fn pre_delivery_by_reviewer(&self, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("pre-delivery statistics by reviewer", move |token| async move {
                api.pre_delivery_by_reviewer(&FilterParams::new(), token).await
            })
            .await?;
        self.emit(&data, format, |display, data| {
            display.render_pre_delivery_reviewers(data)
        })
    }

    pub async fn pre_delivery_by_trainer(&self, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("pre-delivery statistics by trainer", move |token| async move {
                api.pre_delivery_by_trainer(&FilterParams::new(), token).await
            })
            .await?;
        self.emit(&data, format, |display, data| {
            display.render_pre_delivery_trainers(data)
        })
    }

    pub async fn pre_delivery_by_domain(&self, format: &str) -> Result<(), AppError> {
        let api = self.api();
        let data = self
            .fetch("pre-delivery statistics by domain", move |token| async move {
                api.pre_delivery_by_domain(&FilterParams::new(), token).await
            })
            .await?;
        self.emit(&data, format, |display, data| {
            display.render_pre_delivery_domains(data)
        })
    }
}

/// Map a settled request state to the fetched payload, surfacing the
/// error detail verbatim on failure.
fn unwrap_state<T>(state: RequestState<T>, what: &str) -> Result<T, AppError> {
    if let Some(error) = state.error {
        display_status(&format!("Failed to fetch {}", what), OperationStatus::Error);
        return Err(CliError::RequestFailed {
            detail: error.detail,
        }
        .into());
    }
    state.data.ok_or_else(|| {
        AppError::Cli(CliError::RequestFailed {
            detail: GENERIC_FAILURE_DETAIL.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::ErrorDetail;

    #[test]
    fn test_filter_params_from_args() {
        let args = FilterArgs {
            domain: Some("Electronics".to_string()),
            reviewer: Some(12),
            trainer: None,
            dimension: None,
            min_score: Some(2.5),
            max_score: None,
        };
        let filters = filter_params(&args).expect("args should convert");
        assert_eq!(
            filters.query_string(),
            "?domain=Electronics&min_score=2.5&reviewer=12"
        );
    }

    #[test]
    fn test_filter_params_rejects_inverted_bounds() {
        let args = FilterArgs {
            min_score: Some(4.0),
            max_score: Some(1.0),
            ..FilterArgs::default()
        };
        assert!(filter_params(&args).is_err());
    }

    #[test]
    fn test_empty_args_make_empty_filters() {
        let filters = filter_params(&FilterArgs::default()).expect("args should convert");
        assert!(filters.is_empty());
    }

    #[test]
    fn test_unwrap_state_surfaces_error_detail() {
        let state = RequestState::<u32> {
            data: Some(7),
            error: Some(ErrorDetail::new("backend exploded")),
            is_loading: false,
        };
        let err = unwrap_state(state, "overall statistics").unwrap_err();
        assert!(format!("{}", err).contains("backend exploded"));
    }

    #[test]
    fn test_unwrap_state_returns_data() {
        let state = RequestState::<u32> {
            data: Some(7),
            error: None,
            is_loading: false,
        };
        assert_eq!(unwrap_state(state, "overall statistics").unwrap(), 7);
    }
}
