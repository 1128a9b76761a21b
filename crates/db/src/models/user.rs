//! User entity model and DTOs.

use adcraft_core::plan::Plan;
use adcraft_core::types::{Credits, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account row from the `users` table (pipeline-relevant columns only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub plan: String,
    pub credit_balance: Credits,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn plan(&self) -> Plan {
        Plan::from_db(&self.plan)
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub plan: String,
    pub credit_balance: Credits,
}
