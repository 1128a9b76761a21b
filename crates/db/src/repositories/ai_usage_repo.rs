//! Repository for the `ai_usage` audit table.

use adcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::ai_usage::{AiUsage, CreateAiUsage};

const COLUMNS: &str = "id, user_id, feature, provider, model, design_id, metadata, created_at";

pub struct AiUsageRepo;

impl AiUsageRepo {
    pub async fn create(pool: &PgPool, input: &CreateAiUsage) -> Result<AiUsage, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_usage (user_id, feature, provider, model, design_id, metadata)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiUsage>(&query)
            .bind(input.user_id)
            .bind(&input.feature)
            .bind(&input.provider)
            .bind(&input.model)
            .bind(input.design_id)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<AiUsage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_usage WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, AiUsage>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
