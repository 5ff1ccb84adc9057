//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling.

use crate::db::models::*;
use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Statement,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Row content produced by one fetch invocation
#[derive(Debug, Clone)]
pub struct NewBreed {
    pub breed_name: String,
    pub description: Option<String>,
    pub life_expectancy: Option<String>,
    pub life_min: Option<i32>,
    pub life_max: Option<i32>,
    pub dag_id: String,
    pub dag_run_id: String,
    pub task_id: String,
    pub execution_date: DateTime<Utc>,
    pub full_data: serde_json::Value,
}

/// Aggregate summary over the breeds table
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct BreedStats {
    pub total_breeds: i64,
    pub unique_breeds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_execution: Option<sea_orm::prelude::DateTimeWithTimeZone>,
}

/// Repository for data access operations
///
/// The connection is held behind an `Arc` so the repository stays `Clone`
/// even when sea-orm's `mock` feature removes `Clone` from
/// `DatabaseConnection`.
#[derive(Clone)]
pub struct Repository {
    db: Arc<DatabaseConnection>,
}

impl Repository {
    /// Create a new repository over the given connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }

    // ========================================================================
    // Breed Reads
    // ========================================================================

    /// Find a breed row by ID
    pub async fn find_breed_by_id(&self, id: Uuid) -> Result<Option<Breed>> {
        BreedEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(Into::into)
    }

    /// List breed rows, newest execution first, optionally filtered by dag id
    pub async fn list_breeds(
        &self,
        limit: u64,
        offset: u64,
        dag_id: Option<&str>,
    ) -> Result<Vec<Breed>> {
        let mut query = BreedEntity::find();

        if let Some(dag_id) = dag_id {
            query = query.filter(BreedColumn::DagId.eq(dag_id));
        }

        query
            .order_by_desc(BreedColumn::ExecutionDate)
            .order_by_desc(BreedColumn::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(Into::into)
    }

    /// Case-insensitive substring search on breed name
    pub async fn search_breeds(&self, breed_name: &str, limit: u64) -> Result<Vec<Breed>> {
        let pattern = format!("%{}%", breed_name);

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT *
            FROM dog_breeds
            WHERE breed_name ILIKE $1
            ORDER BY execution_date DESC, created_at DESC
            LIMIT $2
            "#,
            vec![pattern.into(), (limit as i64).into()],
        );

        BreedEntity::find()
            .from_raw_sql(stmt)
            .all(self.db.as_ref())
            .await
            .map_err(Into::into)
    }

    /// Aggregate counts and the latest execution timestamp
    pub async fn breed_stats(&self, dag_id: Option<&str>) -> Result<BreedStats> {
        let stmt = match dag_id {
            Some(dag_id) => Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                SELECT
                    COUNT(*) as total_breeds,
                    COUNT(DISTINCT breed_name) as unique_breeds,
                    MAX(execution_date) as latest_execution
                FROM dog_breeds
                WHERE dag_id = $1
                "#,
                vec![dag_id.into()],
            ),
            None => Statement::from_string(
                DbBackend::Postgres,
                r#"
                SELECT
                    COUNT(*) as total_breeds,
                    COUNT(DISTINCT breed_name) as unique_breeds,
                    MAX(execution_date) as latest_execution
                FROM dog_breeds
                "#,
            ),
        };

        BreedStats::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::Internal {
                message: "Stats query returned no row".to_string(),
            })
    }

    // ========================================================================
    // Breed Writes
    // ========================================================================

    /// Insert a breed row, or update the mutable fields when the
    /// (dag_run_id, breed_name) pair already exists
    pub async fn upsert_breed(&self, record: NewBreed) -> Result<Breed> {
        let now = Utc::now();

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO dog_breeds (
                id, breed_name, description, life_expectancy, life_min, life_max,
                dag_id, dag_run_id, task_id, execution_date, full_data,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (dag_run_id, breed_name) DO UPDATE SET
                description = EXCLUDED.description,
                life_expectancy = EXCLUDED.life_expectancy,
                life_min = EXCLUDED.life_min,
                life_max = EXCLUDED.life_max,
                full_data = EXCLUDED.full_data,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
            vec![
                Uuid::new_v4().into(),
                record.breed_name.into(),
                record.description.into(),
                record.life_expectancy.into(),
                record.life_min.into(),
                record.life_max.into(),
                record.dag_id.into(),
                record.dag_run_id.into(),
                record.task_id.into(),
                record.execution_date.into(),
                record.full_data.into(),
                now.into(),
                now.into(),
            ],
        );

        BreedEntity::find()
            .from_raw_sql(stmt)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::Internal {
                message: "Upsert returned no row".to_string(),
            })
    }
}
