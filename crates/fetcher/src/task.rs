//! Fetch task orchestration
//!
//! One invocation: fetch the breed list, pick one record at random,
//! normalize it, and upsert the row for this run. Storage is best
//! effort; a write failure never fails the invocation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::errors::FetchError;
use crate::extract::{decode_record, BreedSummary};
use crate::source::BreedSource;
use dog_breeds_common::{
    config::JobConfig,
    db::{models::Breed, NewBreed, Repository},
    errors::Result as DbResult,
    metrics,
};

/// Storage seam for fetched breeds
#[async_trait]
pub trait BreedStore: Send + Sync {
    async fn upsert_breed(&self, record: NewBreed) -> DbResult<Breed>;
}

#[async_trait]
impl BreedStore for Repository {
    async fn upsert_breed(&self, record: NewBreed) -> DbResult<Breed> {
        Repository::upsert_breed(self, record).await
    }
}

/// Identity of one task invocation
#[derive(Debug, Clone)]
pub struct RunContext {
    pub dag_id: String,
    pub dag_run_id: String,
    pub task_id: String,
    pub execution_date: DateTime<Utc>,
}

impl RunContext {
    /// Build from job settings, minting a manual run id when none is given
    pub fn from_config(job: &JobConfig) -> Self {
        let execution_date = job.execution_date.unwrap_or_else(Utc::now);
        let dag_run_id = job
            .dag_run_id
            .clone()
            .unwrap_or_else(|| format!("manual__{}", execution_date.to_rfc3339()));

        Self {
            dag_id: job.dag_id.clone(),
            dag_run_id,
            task_id: job.task_id.clone(),
            execution_date,
        }
    }
}

/// Result of one invocation
#[derive(Debug)]
pub enum FetchOutcome {
    /// A breed was selected; `stored` reports whether the write landed
    Selected { summary: BreedSummary, stored: bool },
    /// The source answered with an empty collection
    NoData,
}

/// Fetch task
pub struct FetchTask {
    source: Arc<dyn BreedSource>,
    store: Option<Arc<dyn BreedStore>>,
}

impl FetchTask {
    pub fn new(source: Arc<dyn BreedSource>, store: Option<Arc<dyn BreedStore>>) -> Self {
        Self { source, store }
    }

    /// Run one fetch-select-store cycle
    #[instrument(skip(self, run), fields(dag_run_id = %run.dag_run_id))]
    pub async fn run(&self, run: &RunContext) -> Result<FetchOutcome, FetchError> {
        let result = self.execute(run).await;

        match &result {
            Ok(FetchOutcome::Selected { .. }) => metrics::record_fetch_run("success"),
            Ok(FetchOutcome::NoData) => metrics::record_fetch_run("no_data"),
            Err(_) => metrics::record_fetch_run("failure"),
        }

        result
    }

    async fn execute(&self, run: &RunContext) -> Result<FetchOutcome, FetchError> {
        let records = self.source.fetch_breeds().await?;

        let picked = match records.choose(&mut rand::thread_rng()) {
            Some(record) => record,
            None => {
                warn!("No breeds found in API response");
                return Ok(FetchOutcome::NoData);
            }
        };

        let summary = decode_record(picked)?.into_summary();

        info!(breed = %summary.breed_name, "Random dog breed selected");
        if summary.life_expectancy != "N/A" {
            info!(life_expectancy = %summary.life_expectancy, "Breed life expectancy");
        }

        let stored = self.store_selected(run, &summary, picked).await;

        Ok(FetchOutcome::Selected { summary, stored })
    }

    /// Best-effort write of the selected breed
    async fn store_selected(&self, run: &RunContext, summary: &BreedSummary, raw: &Value) -> bool {
        let Some(ref store) = self.store else {
            error!("No breed store configured, selection not persisted");
            metrics::record_store_failure();
            return false;
        };

        let record = NewBreed {
            breed_name: summary.breed_name.clone(),
            description: Some(summary.description.clone()),
            life_expectancy: Some(summary.life_expectancy.clone()),
            life_min: summary.life_min,
            life_max: summary.life_max,
            dag_id: run.dag_id.clone(),
            dag_run_id: run.dag_run_id.clone(),
            task_id: run.task_id.clone(),
            execution_date: run.execution_date,
            full_data: raw.clone(),
        };

        match store.upsert_breed(record).await {
            Ok(row) => {
                info!(id = %row.id, breed = %row.breed_name, "Breed stored");
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    breed = %summary.breed_name,
                    "Failed to store breed, continuing"
                );
                metrics::record_store_failure();
                false
            }
        }
    }
}

/// Log the human-readable summary for a completed run
pub fn log_breed_summary(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Selected { summary, stored } => {
            info!("======================================================================");
            info!("BREED SUMMARY - RANDOM DOG BREED");
            info!("======================================================================");
            info!("Breed Name: {}", summary.breed_name);
            info!("Life Span: {}", summary.life_expectancy);
            info!("Description: {}", summary.description);
            info!("Stored: {}", stored);
            info!("======================================================================");
            info!("Successfully retrieved random dog breed information!");
        }
        FetchOutcome::NoData => {
            warn!("No breed data available from fetch");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dog_breeds_common::errors::AppError;
    use serde_json::json;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct StaticSource(Vec<Value>);

    #[async_trait]
    impl BreedSource for StaticSource {
        async fn fetch_breeds(&self) -> Result<Vec<Value>, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl BreedStore for FailingStore {
        async fn upsert_breed(&self, _record: NewBreed) -> DbResult<Breed> {
            Err(AppError::DatabaseConnection {
                message: "connection refused".to_string(),
            })
        }
    }

    struct CapturingStore {
        rows: Mutex<Vec<NewBreed>>,
    }

    impl CapturingStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                rows: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl BreedStore for CapturingStore {
        async fn upsert_breed(&self, record: NewBreed) -> DbResult<Breed> {
            let row = Breed {
                id: Uuid::new_v4(),
                breed_name: record.breed_name.clone(),
                description: record.description.clone(),
                life_expectancy: record.life_expectancy.clone(),
                life_min: record.life_min,
                life_max: record.life_max,
                dag_id: record.dag_id.clone(),
                dag_run_id: record.dag_run_id.clone(),
                task_id: record.task_id.clone(),
                execution_date: record.execution_date.fixed_offset(),
                full_data: record.full_data.clone(),
                created_at: record.execution_date.fixed_offset(),
                updated_at: record.execution_date.fixed_offset(),
            };
            self.rows.lock().unwrap().push(record);
            Ok(row)
        }
    }

    fn sample_run() -> RunContext {
        RunContext {
            dag_id: "dog_breed_fetcher".to_string(),
            dag_run_id: "scheduled__2024-06-01T12:00:00+00:00".to_string(),
            task_id: "fetch_dog_breed".to_string(),
            execution_date: Utc::now(),
        }
    }

    #[test]
    fn test_run_context_keeps_orchestrator_run_id() {
        let job = JobConfig {
            dag_run_id: Some("scheduled__2024-06-01T12:00:00+00:00".to_string()),
            ..JobConfig::default()
        };

        let run = RunContext::from_config(&job);
        assert_eq!(run.dag_run_id, "scheduled__2024-06-01T12:00:00+00:00");
        assert_eq!(run.dag_id, "dog_breed_fetcher");
        assert_eq!(run.task_id, "fetch_dog_breed");
    }

    #[test]
    fn test_run_context_mints_manual_run_id() {
        let run = RunContext::from_config(&JobConfig::default());
        assert!(run.dag_run_id.starts_with("manual__"));
    }

    #[tokio::test]
    async fn test_empty_list_is_no_data() {
        let store = CapturingStore::new();
        let task = FetchTask::new(Arc::new(StaticSource(Vec::new())), Some(store.clone()));

        let outcome = task.run(&sample_run()).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::NoData));
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_selects_and_stores() {
        let records = vec![json!({
            "attributes": {
                "name": "Akita",
                "description": "Loyal and dignified.",
                "life": {"min": 10, "max": 14}
            }
        })];
        let store = CapturingStore::new();
        let run = sample_run();
        let task = FetchTask::new(Arc::new(StaticSource(records.clone())), Some(store.clone()));

        let outcome = task.run(&run).await.unwrap();
        match outcome {
            FetchOutcome::Selected { summary, stored } => {
                assert!(stored);
                assert_eq!(summary.breed_name, "Akita");
                assert_eq!(summary.life_expectancy, "10-14 years");
            }
            FetchOutcome::NoData => panic!("expected a selection"),
        }

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].breed_name, "Akita");
        assert_eq!(rows[0].life_expectancy.as_deref(), Some("10-14 years"));
        assert_eq!(rows[0].dag_run_id, run.dag_run_id);
        assert_eq!(rows[0].full_data, records[0]);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_selection() {
        let records = vec![json!({"name": "Beagle"})];
        let task = FetchTask::new(Arc::new(StaticSource(records)), Some(Arc::new(FailingStore)));

        let outcome = task.run(&sample_run()).await.unwrap();
        match outcome {
            FetchOutcome::Selected { summary, stored } => {
                assert!(!stored);
                assert_eq!(summary.breed_name, "Beagle");
            }
            FetchOutcome::NoData => panic!("expected a selection"),
        }
    }

    #[tokio::test]
    async fn test_missing_store_skips_write() {
        let records = vec![json!({"name": "Beagle"})];
        let task = FetchTask::new(Arc::new(StaticSource(records)), None);

        let outcome = task.run(&sample_run()).await.unwrap();
        assert!(matches!(
            outcome,
            FetchOutcome::Selected { stored: false, .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_record_fails_run() {
        let task = FetchTask::new(Arc::new(StaticSource(vec![json!(42)])), None);

        let result = task.run(&sample_run()).await;
        assert!(matches!(result, Err(FetchError::Payload(_))));
    }
}
