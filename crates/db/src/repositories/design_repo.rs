//! Repository for the `designs` table.

use adcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::design::{CreateDesign, Design};
use crate::models::status::DesignStatus;

const COLUMNS: &str = "id, user_id, prompt, category, size, style, status_id, image_url, \
                       metadata, created_at, updated_at";

/// Provides design lifecycle operations.
pub struct DesignRepo;

impl DesignRepo {
    /// Insert a new design in the `Generating` state.
    pub async fn create(pool: &PgPool, input: &CreateDesign) -> Result<Design, sqlx::Error> {
        let query = format!(
            "INSERT INTO designs (user_id, prompt, category, size, style, status_id, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(input.user_id)
            .bind(&input.prompt)
            .bind(&input.category)
            .bind(&input.size)
            .bind(&input.style)
            .bind(DesignStatus::Generating.id())
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find a design by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Design>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE id = $1");
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a design only if it belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Design>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM designs WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Move a `Generating` design to `Completed`, attaching its image and
    /// merging `metadata` into the stored metadata.
    ///
    /// Returns `None` if the design does not exist or is not `Generating`.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
        metadata: &serde_json::Value,
    ) -> Result<Option<Design>, sqlx::Error> {
        let query = format!(
            "UPDATE designs SET
                status_id = $2,
                image_url = $3,
                metadata = metadata || $4
             WHERE id = $1 AND status_id = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(id)
            .bind(DesignStatus::Completed.id())
            .bind(image_url)
            .bind(metadata)
            .bind(DesignStatus::Generating.id())
            .fetch_optional(pool)
            .await
    }

    /// Most recent designs of a user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Design>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM designs WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2"
        );
        sqlx::query_as::<_, Design>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
