use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("ServiceError: {0}")]
    Service(#[from] crate::core::services::types::ServiceError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{detail}")]
    RequestFailed { detail: String },
}

/// Failures raised by the HTTP layer, already normalized to the single
/// detail string that views render.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Transport { message: String },
    #[error("{detail}")]
    Http {
        status: u16,
        endpoint: String,
        detail: String,
    },
    #[error("Failed to decode response: {message}")]
    Decode { message: String },
    /// The request was superseded or its consumer was torn down. Never
    /// surfaced to views; the fetch controller swallows it.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Configuration serialization failed: {message}")]
    Serialize { message: String },
    #[error("Configuration directory not found")]
    DirNotFound,
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}
