//! Breed query handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use dog_breeds_common::{
    db::{models::Breed, BreedStats, Repository},
    errors::{AppError, Result},
    metrics, DEFAULT_DAG_ID,
};

/// Query parameters for the paginated list endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct ListParams {
    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub dag_id: Option<String>,
}

/// Query parameters for the recent endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct RecentParams {
    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<u64>,
    pub dag_id: Option<String>,
}

/// Query parameters for the stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub dag_id: Option<String>,
}

/// Query parameters for the name search endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<u64>,
}

/// Breed record as exposed over HTTP
///
/// Carries the legacy alias fields (`life_span`, `run_id`, `start_date`)
/// so older dashboards keep working against the same rows.
#[derive(Debug, Serialize)]
pub struct BreedResponse {
    pub id: Uuid,
    pub breed_name: String,
    pub description: Option<String>,
    pub life_expectancy: Option<String>,
    /// Alias of `life_expectancy`
    pub life_span: Option<String>,
    pub dag_id: String,
    pub dag_run_id: String,
    /// Alias of `dag_run_id`
    pub run_id: String,
    pub task_id: String,
    pub execution_date: String,
    /// Alias of `execution_date`
    pub start_date: String,
    pub created_at: String,
    /// Fixed literal; stored rows only exist for successful runs
    pub state: &'static str,
}

impl From<Breed> for BreedResponse {
    fn from(row: Breed) -> Self {
        let execution_date = row.execution_date.to_rfc3339();
        Self {
            id: row.id,
            breed_name: row.breed_name,
            description: row.description,
            life_expectancy: row.life_expectancy.clone(),
            life_span: row.life_expectancy,
            dag_id: row.dag_id,
            dag_run_id: row.dag_run_id.clone(),
            run_id: row.dag_run_id,
            task_id: row.task_id,
            execution_date: execution_date.clone(),
            start_date: execution_date,
            created_at: row.created_at.to_rfc3339(),
            state: "success",
        }
    }
}

/// List breeds with pagination, newest runs first
#[instrument(skip(state), fields(limit = params.limit, offset = params.offset))]
pub async fn list_breeds(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BreedResponse>>> {
    validate_query(&params)?;

    let limit = params.limit.unwrap_or(10);
    let offset = params.offset.unwrap_or(0);

    let start = Instant::now();
    let repo = Repository::new(state.db.clone());
    let rows = repo
        .list_breeds(limit, offset, params.dag_id.as_deref())
        .await?;
    metrics::record_query("/api/breeds", start.elapsed().as_secs_f64(), rows.len());

    tracing::info!(count = rows.len(), limit, offset, "Breeds listed");

    Ok(Json(rows.into_iter().map(BreedResponse::from).collect()))
}

/// Most recent breeds for one job definition
#[instrument(skip(state), fields(limit = params.limit))]
pub async fn recent_breeds(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<BreedResponse>>> {
    validate_query(&params)?;

    let limit = params.limit.unwrap_or(20);
    let dag_id = params
        .dag_id
        .unwrap_or_else(|| DEFAULT_DAG_ID.to_string());

    let start = Instant::now();
    let repo = Repository::new(state.db.clone());
    let rows = repo.list_breeds(limit, 0, Some(&dag_id)).await?;
    metrics::record_query(
        "/api/breeds/recent",
        start.elapsed().as_secs_f64(),
        rows.len(),
    );

    if rows.is_empty() {
        tracing::info!(dag_id = %dag_id, "No breeds found for dag id");
    }

    Ok(Json(rows.into_iter().map(BreedResponse::from).collect()))
}

/// Aggregate counts over the stored rows
#[instrument(skip(state))]
pub async fn breed_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<BreedStats>> {
    let start = Instant::now();
    let repo = Repository::new(state.db.clone());
    let stats = repo.breed_stats(params.dag_id.as_deref()).await?;
    metrics::record_query("/api/breeds/stats", start.elapsed().as_secs_f64(), 1);

    tracing::info!(
        total = stats.total_breeds,
        unique = stats.unique_breeds,
        "Breed stats computed"
    );

    Ok(Json(stats))
}

/// Fetch a single breed row by id
#[instrument(skip(state), fields(breed_id = %breed_id))]
pub async fn get_breed(
    State(state): State<AppState>,
    Path(breed_id): Path<Uuid>,
) -> Result<Json<BreedResponse>> {
    let start = Instant::now();
    let repo = Repository::new(state.db.clone());
    let row = repo.find_breed_by_id(breed_id).await?;
    metrics::record_query(
        "/api/breeds/{breed_id}",
        start.elapsed().as_secs_f64(),
        usize::from(row.is_some()),
    );

    let row = row.ok_or_else(|| AppError::BreedNotFound {
        id: breed_id.to_string(),
    })?;

    Ok(Json(row.into()))
}

/// Case-insensitive substring search on breed name
#[instrument(skip(state), fields(breed_name = %breed_name))]
pub async fn search_breeds(
    State(state): State<AppState>,
    Path(breed_name): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BreedResponse>>> {
    validate_query(&params)?;

    let limit = params.limit.unwrap_or(10);

    let start = Instant::now();
    let repo = Repository::new(state.db.clone());
    let rows = repo.search_breeds(&breed_name, limit).await?;
    metrics::record_query(
        "/api/breeds/search",
        start.elapsed().as_secs_f64(),
        rows.len(),
    );

    tracing::info!(count = rows.len(), "Breed search completed");

    Ok(Json(rows.into_iter().map(BreedResponse::from).collect()))
}

/// Run validator checks and fold failures into one message
fn validate_query<T: Validate>(params: &T) -> Result<()> {
    params.validate().map_err(|e| {
        let messages: Vec<String> = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| {
                    format!(
                        "{}: {}",
                        field,
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_default()
                    )
                })
            })
            .collect();

        AppError::Validation {
            message: messages.join("; "),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use serde_json::json;

    fn sample_row() -> Breed {
        let when: DateTime<FixedOffset> = "2024-06-01T12:00:00+00:00".parse().unwrap();
        Breed {
            id: Uuid::new_v4(),
            breed_name: "Beagle".to_string(),
            description: Some("Friendly and curious".to_string()),
            life_expectancy: Some("12-15 years".to_string()),
            life_min: Some(12),
            life_max: Some(15),
            dag_id: "dog_breed_fetcher".to_string(),
            dag_run_id: "scheduled__2024-06-01T12:00:00+00:00".to_string(),
            task_id: "fetch_dog_breed".to_string(),
            execution_date: when,
            full_data: json!({"name": "Beagle"}),
            created_at: when,
            updated_at: when,
        }
    }

    #[test]
    fn test_response_carries_aliases() {
        let response = BreedResponse::from(sample_row());

        assert_eq!(response.life_span, response.life_expectancy);
        assert_eq!(response.run_id, response.dag_run_id);
        assert_eq!(response.start_date, response.execution_date);
        assert_eq!(response.state, "success");
    }

    #[test]
    fn test_response_keeps_null_description() {
        let mut row = sample_row();
        row.description = None;
        row.life_expectancy = None;

        let json = serde_json::to_value(BreedResponse::from(row)).unwrap();
        assert!(json["description"].is_null());
        assert!(json["life_expectancy"].is_null());
        assert!(json["life_span"].is_null());
    }

    #[test]
    fn test_response_hides_storage_fields() {
        let json = serde_json::to_value(BreedResponse::from(sample_row())).unwrap();

        assert!(json.get("full_data").is_none());
        assert!(json.get("life_min").is_none());
        assert!(json.get("life_max").is_none());
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn test_limit_bounds() {
        let valid = ListParams {
            limit: Some(100),
            offset: Some(0),
            dag_id: None,
        };
        assert!(validate_query(&valid).is_ok());

        let too_small = ListParams {
            limit: Some(0),
            offset: None,
            dag_id: None,
        };
        assert!(validate_query(&too_small).is_err());

        let too_large = ListParams {
            limit: Some(101),
            offset: None,
            dag_id: None,
        };
        let err = validate_query(&too_large).unwrap_err();
        assert!(err.to_string().contains("Limit must be 1-100"));
    }

    #[test]
    fn test_missing_limit_is_valid() {
        let params = SearchParams { limit: None };
        assert!(validate_query(&params).is_ok());
    }
}
