//! Design entity model and DTOs.

use adcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::{DesignStatus, StatusId};

/// A row from the `designs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub category: String,
    pub size: String,
    pub style: Option<String>,
    pub status_id: StatusId,
    pub image_url: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Design {
    pub fn status(&self) -> Option<DesignStatus> {
        DesignStatus::from_id(self.status_id)
    }
}

/// DTO for creating a design in the `Generating` state.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDesign {
    pub user_id: DbId,
    pub prompt: String,
    pub category: String,
    pub size: String,
    pub style: Option<String>,
    pub metadata: serde_json::Value,
}
