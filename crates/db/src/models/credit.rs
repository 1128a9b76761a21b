//! Credit ledger model.

use adcraft_core::types::{Credits, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `credit_transactions` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditTransaction {
    pub id: DbId,
    pub user_id: DbId,
    pub design_id: Option<DbId>,
    /// Negative for debits.
    pub amount: Credits,
    pub balance_after: Credits,
    pub reason: String,
    pub created_at: Timestamp,
}
