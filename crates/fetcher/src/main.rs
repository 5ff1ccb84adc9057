//! Dog Breeds Fetcher
//!
//! One-shot ingestion job:
//! 1. Fetches the breed list from the public dog API
//! 2. Picks one breed at random
//! 3. Normalizes its fields
//! 4. Upserts the row for this run (best effort)
//!
//! An external scheduler owns the cadence and the retry policy. Fetch
//! failures exit non-zero so the scheduler can retry; a missing or
//! failing database does not.

mod errors;
mod extract;
mod source;
mod task;

use crate::source::BreedApiClient;
use crate::task::{log_breed_summary, BreedStore, FetchTask, RunContext};
use dog_breeds_common::{
    config::{AppConfig, ObservabilityConfig},
    db::{self, Repository},
    metrics, VERSION,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!("Starting Dog Breeds Fetcher v{}", VERSION);

    metrics::register_metrics();

    // Best-effort store: an unreachable database must not stop the fetch
    let store: Option<Arc<dyn BreedStore>> = match db::connect(&config.database).await {
        Ok(conn) => Some(Arc::new(Repository::new(conn))),
        Err(e) => {
            warn!(error = %e, "Database unavailable, running without persistence");
            None
        }
    };

    let source = Arc::new(BreedApiClient::new(&config.source)?);
    let task = FetchTask::new(source, store);
    let run = RunContext::from_config(&config.job);

    info!(
        dag_id = %run.dag_id,
        dag_run_id = %run.dag_run_id,
        execution_date = %run.execution_date,
        "Run context resolved"
    );

    match task.run(&run).await {
        Ok(outcome) => {
            log_breed_summary(&outcome);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Fetch run failed");
            Err(e.into())
        }
    }
}

/// Initialize the tracing subscriber from observability settings
fn init_tracing(obs: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&obs.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if obs.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}
