//! Dog breed entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dog_breeds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub breed_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Display string derived from the bounds, e.g. "10-14 years"
    #[sea_orm(column_type = "Text", nullable)]
    pub life_expectancy: Option<String>,

    pub life_min: Option<i32>,

    pub life_max: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub dag_id: String,

    #[sea_orm(column_type = "Text")]
    pub dag_run_id: String,

    #[sea_orm(column_type = "Text")]
    pub task_id: String,

    /// Logical invocation timestamp, not wall-clock insert time
    pub execution_date: DateTimeWithTimeZone,

    /// Raw source record stored verbatim for audit/debug
    #[sea_orm(column_type = "JsonBinary")]
    pub full_data: serde_json::Value,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
