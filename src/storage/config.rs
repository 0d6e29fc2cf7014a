use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_APP_NAME: &str = "Review Quality Dashboard";

/// Startup configuration. Read once when the process starts and
/// immutable for the rest of the session; CLI flags and environment
/// variables override file values before the dispatcher is built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub app_name: String,
    pub api_base_url: String,
    pub api_timeout_ms: u64,
    pub use_mock_api: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_ms: DEFAULT_API_TIMEOUT_MS,
            use_mock_api: false,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`. A
    /// missing file yields the defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_string_lossy().to_string(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<(), ConfigError> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| ConfigError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })
    }

    fn config_file_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::DirNotFound)?;
        Ok(config_dir.join("qdash-cli").join("config.toml"))
    }

    /// Apply one `config set <key> <value>` assignment.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "app_name" => self.app_name = value.to_string(),
            "api_base_url" => self.api_base_url = value.to_string(),
            "api_timeout_ms" => {
                self.api_timeout_ms =
                    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                        field: key.to_string(),
                        value: value.to_string(),
                        reason: "expected a duration in milliseconds".to_string(),
                    })?;
            }
            "use_mock_api" => {
                self.use_mock_api =
                    value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                        field: key.to_string(),
                        value: value.to_string(),
                        reason: "expected true or false".to_string(),
                    })?;
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}
