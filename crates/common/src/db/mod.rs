//! Database layer for the Dog Breeds pipeline
//!
//! Provides:
//! - The `dog_breeds` SeaORM entity
//! - Repository pattern for data access
//! - Connection setup from configuration

pub mod models;
mod repository;

pub use repository::{BreedStats, NewBreed, Repository};
pub use sea_orm::DatabaseConnection;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, Database};
use tracing::info;

/// Connect to the database described by `config`
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "Connecting to database..."
    );

    let mut opts = ConnectOptions::new(config.url());
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout())
        .idle_timeout(config.idle_timeout())
        .sqlx_logging(true);

    let db = Database::connect(opts)
        .await
        .map_err(|e| AppError::DatabaseConnection {
            message: format!("Failed to connect to {}: {}", config.host, e),
        })?;

    info!("Database connection established");

    Ok(db)
}
