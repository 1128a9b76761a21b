//! Repository for the `media_files` table.

use adcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::media_file::{CreateMediaFile, MediaFile};

const COLUMNS: &str = "id, user_id, design_id, url, file_name, mime_type, width, height, \
                       size_bytes, checksum_sha256, source, created_at";

pub struct MediaFileRepo;

impl MediaFileRepo {
    pub async fn create(pool: &PgPool, input: &CreateMediaFile) -> Result<MediaFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_files
                (user_id, design_id, url, file_name, mime_type, width, height,
                 size_bytes, checksum_sha256, source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaFile>(&query)
            .bind(input.user_id)
            .bind(input.design_id)
            .bind(&input.url)
            .bind(&input.file_name)
            .bind(&input.mime_type)
            .bind(input.width)
            .bind(input.height)
            .bind(input.size_bytes)
            .bind(&input.checksum_sha256)
            .bind(&input.source)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_design(
        pool: &PgPool,
        design_id: DbId,
    ) -> Result<Vec<MediaFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_files WHERE design_id = $1 ORDER BY id");
        sqlx::query_as::<_, MediaFile>(&query)
            .bind(design_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<MediaFile>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM media_files WHERE user_id = $1 ORDER BY id DESC");
        sqlx::query_as::<_, MediaFile>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
