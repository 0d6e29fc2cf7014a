pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Request orchestration, caching and service layers
pub mod storage; // Configuration persistence

/// Support modules (used across layers)
pub mod api; // Statistics API client, models and response transform
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
