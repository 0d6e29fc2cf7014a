use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qdash-cli")]
#[command(about = "Command line dashboard for review quality statistics")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Override the configured API base URL
    #[arg(long, global = true, env = "QDASH_API_URL")]
    pub base_url: Option<String>,

    /// Override the configured request timeout
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Serve fixture data instead of calling the backend
    #[arg(long, global = true, env = "QDASH_USE_MOCK")]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filterable aggregated statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },
    /// Pre-delivery quality dashboard
    Predelivery {
        #[command(subcommand)]
        command: PreDeliveryCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Filter options shared by the aggregation commands. Unset options are
/// omitted from the request entirely.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Restrict to one domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Restrict to one reviewer ID
    #[arg(long)]
    pub reviewer: Option<i64>,

    /// Restrict to one trainer ID
    #[arg(long)]
    pub trainer: Option<i64>,

    /// Restrict to one quality dimension
    #[arg(long)]
    pub dimension: Option<String>,

    /// Keep scores at or above this value
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Keep scores at or below this value
    #[arg(long)]
    pub max_score: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// Overall statistics across all dimensions
    Overall {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Statistics grouped by domain
    ByDomain {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Statistics grouped by reviewer
    ByReviewer {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Statistics grouped by trainer level
    ByTrainer {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Task-level scores with annotator details
    Tasks {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Overall plus every grouped aggregation in one view
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PreDeliveryCommands {
    /// Pre-delivery overview aggregate
    Overview {
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Pre-delivery statistics grouped by reviewer
    ByReviewer {
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Pre-delivery statistics grouped by trainer
    ByTrainer {
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Pre-delivery statistics grouped by domain
    ByDomain {
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stats_overall_with_filters() {
        let cli = Cli::parse_from([
            "qdash-cli",
            "stats",
            "overall",
            "--domain",
            "Electronics",
            "--min-score",
            "2.5",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Stats {
                command: StatsCommands::Overall { filters, format },
            } => {
                assert_eq!(filters.domain.as_deref(), Some("Electronics"));
                assert_eq!(filters.min_score, Some(2.5));
                assert_eq!(filters.reviewer, None);
                assert_eq!(format, "json");
            }
            _ => panic!("Expected stats overall"),
        }
    }

    #[test]
    fn test_parse_predelivery_overview_defaults() {
        let cli = Cli::parse_from(["qdash-cli", "predelivery", "overview"]);
        match cli.command {
            Commands::Predelivery {
                command: PreDeliveryCommands::Overview { format },
            } => assert_eq!(format, "table"),
            _ => panic!("Expected predelivery overview"),
        }
    }

    #[test]
    fn test_parse_global_mock_flag() {
        let cli = Cli::parse_from(["qdash-cli", "--mock", "stats", "overall"]);
        assert!(cli.mock);
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::parse_from(["qdash-cli", "config", "set", "use_mock_api", "true"]);
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Set { key, value },
            } => {
                assert_eq!(key, "use_mock_api");
                assert_eq!(value, "true");
            }
            _ => panic!("Expected config set"),
        }
    }
}
