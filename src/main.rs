use clap::Parser;
use qdash_cli::cli::dispatcher::Dispatcher;
use qdash_cli::cli::main_types::Cli;
use qdash_cli::storage::config::Config;
use qdash_cli::utils::validation::validate_url;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let mut config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    // Apply CLI/env overrides; config is immutable from here on.
    if let Some(base_url) = cli.base_url {
        if let Err(err) = validate_url(&base_url) {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
        config.api_base_url = base_url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.api_timeout_ms = timeout_ms;
    }
    if cli.mock {
        config.use_mock_api = true;
    }

    if cli.verbose {
        println!("Verbose mode is enabled");
        println!("API base URL: {}", config.api_base_url);
        if let Some(config_dir) = &cli.config_dir {
            println!("Using config directory: {}", config_dir);
        }
        if config.use_mock_api {
            println!("Mock service layer selected");
        }
    }

    // Create dispatcher and execute the command
    let dispatcher = Dispatcher::new(config, config_path, cli.verbose);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
