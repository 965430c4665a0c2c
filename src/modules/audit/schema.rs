use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LogEntity {
    pub id: Uuid,
    pub method: String,
    pub username: String,
    pub table_name: String,
    pub action: String,
    pub time: chrono::DateTime<chrono::Utc>,
}
