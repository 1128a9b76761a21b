//! Repository for credit balances and the `credit_transactions` ledger.

use adcraft_core::types::{Credits, DbId};
use sqlx::PgPool;

use crate::models::credit::CreditTransaction;

const COLUMNS: &str = "id, user_id, design_id, amount, balance_after, reason, created_at";

/// Provides the atomic debit and ledger queries.
pub struct CreditRepo;

impl CreditRepo {
    /// Debit `cost` credits from `user_id` and append the ledger row, in one
    /// transaction.
    ///
    /// The balance update is conditional (`credit_balance >= cost`), so
    /// concurrent debits serialise on the user row and the balance can never
    /// go negative. Returns `None` when the balance no longer covers `cost`;
    /// nothing is written in that case.
    ///
    /// `cost` must be positive: the ledger rejects zero-amount rows, so callers
    /// skip the debit for free operations.
    pub async fn debit(
        pool: &PgPool,
        user_id: DbId,
        design_id: Option<DbId>,
        cost: Credits,
        reason: &str,
    ) -> Result<Option<CreditTransaction>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let balance_after: Option<Credits> = sqlx::query_scalar(
            "UPDATE users SET credit_balance = credit_balance - $2
             WHERE id = $1 AND credit_balance >= $2
             RETURNING credit_balance",
        )
        .bind(user_id)
        .bind(cost)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(balance_after) = balance_after else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO credit_transactions (user_id, design_id, amount, balance_after, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(user_id)
            .bind(design_id)
            .bind(-cost)
            .bind(balance_after)
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(entry))
    }

    /// Ledger rows for a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_transactions WHERE user_id = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
