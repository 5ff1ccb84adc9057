//! Dog Breeds Common Library
//!
//! Shared code for the pipeline binaries including:
//! - Database entity and repository
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{BreedStats, NewBreed, Repository};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the API root endpoint
pub const SERVICE_NAME: &str = "Dog Breeds API";

/// Job definition id the scheduled fetcher runs under
pub const DEFAULT_DAG_ID: &str = "dog_breed_fetcher";

/// Task id of the fetch step within a run
pub const DEFAULT_TASK_ID: &str = "fetch_dog_breed";
