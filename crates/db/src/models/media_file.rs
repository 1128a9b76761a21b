//! Media-library asset model and DTOs.

use adcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Media source tag for pipeline output.
pub const SOURCE_AI_VISUAL: &str = "ai_visual";

/// A row from the `media_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: DbId,
    pub user_id: DbId,
    pub design_id: Option<DbId>,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub size_bytes: i64,
    pub checksum_sha256: String,
    pub source: String,
    pub created_at: Timestamp,
}

/// DTO for registering a stored file.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaFile {
    pub user_id: DbId,
    pub design_id: Option<DbId>,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub size_bytes: i64,
    pub checksum_sha256: String,
    pub source: String,
}
