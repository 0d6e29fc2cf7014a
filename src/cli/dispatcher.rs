use std::path::PathBuf;

use crate::cli::main_types::{Commands, ConfigCommands, PreDeliveryCommands, StatsCommands};
use crate::cli::stats_handler::{StatsHandler, filter_params};
use crate::core::services::build_stats_api;
use crate::display::{OperationStatus, display_status};
use crate::error::{AppError, CliError};
use crate::storage::config::Config;

/// Routes parsed commands to their handlers. Holds the startup
/// configuration (with CLI/env overrides already applied) for the
/// lifetime of the invocation.
pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    verbose: bool,
}

impl Dispatcher {
    pub fn new(config: Config, config_path: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            config,
            config_path,
            verbose,
        }
    }

    fn log_verbose(&self, msg: &str) {
        if self.verbose {
            println!("Verbose: {}", msg);
        }
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Stats { command } => self.handle_stats_command(command).await,
            Commands::Predelivery { command } => self.handle_pre_delivery_command(command).await,
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn build_handler(&self) -> Result<StatsHandler, AppError> {
        if self.config.use_mock_api {
            self.log_verbose("Using the mock service layer (fixture data)");
        } else {
            self.log_verbose(&format!("Using API at {}", self.config.api_base_url));
        }
        let api = build_stats_api(&self.config)?;
        Ok(StatsHandler::new(api, self.verbose))
    }

    async fn handle_stats_command(&self, command: StatsCommands) -> Result<(), AppError> {
        let handler = self.build_handler()?;
        match command {
            StatsCommands::Overall { filters, format } => {
                handler.overall(filter_params(&filters)?, &format).await
            }
            StatsCommands::ByDomain { filters, format } => {
                handler.by_domain(filter_params(&filters)?, &format).await
            }
            StatsCommands::ByReviewer { filters, format } => {
                handler.by_reviewer(filter_params(&filters)?, &format).await
            }
            StatsCommands::ByTrainer { filters, format } => {
                handler
                    .by_trainer_level(filter_params(&filters)?, &format)
                    .await
            }
            StatsCommands::Tasks { filters, format } => {
                handler.tasks(filter_params(&filters)?, &format).await
            }
            StatsCommands::Summary { filters, format } => {
                handler.summary(filter_params(&filters)?, &format).await
            }
        }
    }

    async fn handle_pre_delivery_command(
        &self,
        command: PreDeliveryCommands,
    ) -> Result<(), AppError> {
        let handler = self.build_handler()?;
        match command {
            PreDeliveryCommands::Overview { format } => handler.overview(&format).await,
            PreDeliveryCommands::ByReviewer { format } => {
                handler.pre_delivery_by_reviewer(&format).await
            }
            PreDeliveryCommands::ByTrainer { format } => {
                handler.pre_delivery_by_trainer(&format).await
            }
            PreDeliveryCommands::ByDomain { format } => {
                handler.pre_delivery_by_domain(&format).await
            }
        }
    }

    fn handle_config_command(&self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let rendered = toml::to_string_pretty(&self.config).map_err(|e| {
                    CliError::InvalidArguments(format!("Config serialization error: {}", e))
                })?;
                print!("{}", rendered);
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                self.log_verbose(&format!("Setting config {} = {}", key, value));
                // Reload from disk so transient CLI overrides are not
                // persisted alongside the assignment.
                let mut config = Config::load(self.config_path.clone())?;
                config.set_value(&key, &value)?;
                config.save(self.config_path.clone())?;
                display_status(&format!("Set {} = {}", key, value), OperationStatus::Success);
                Ok(())
            }
        }
    }
}
