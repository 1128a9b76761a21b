//! AI usage audit model and DTOs.

use adcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Feature tag for visual generation.
pub const FEATURE_AI_VISUAL: &str = "ai_visual";
/// Feature tag for the logo brand-name vision check.
pub const FEATURE_LOGO_VISION: &str = "logo_vision_check";

/// A row from the append-only `ai_usage` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AiUsage {
    pub id: DbId,
    pub user_id: DbId,
    pub feature: String,
    pub provider: String,
    pub model: String,
    pub design_id: Option<DbId>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for recording one AI call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAiUsage {
    pub user_id: DbId,
    pub feature: String,
    pub provider: String,
    pub model: String,
    pub design_id: Option<DbId>,
    pub metadata: serde_json::Value,
}
