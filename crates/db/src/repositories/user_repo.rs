//! Repository for the `users` table.

use adcraft_core::types::{Credits, DbId};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, plan, credit_balance, created_at, updated_at";

/// Provides account lookups and balance top-ups.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, plan, credit_balance)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.plan)
            .bind(input.credit_balance)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Current balance, or `None` if the user does not exist.
    pub async fn balance(pool: &PgPool, id: DbId) -> Result<Option<Credits>, sqlx::Error> {
        sqlx::query_scalar("SELECT credit_balance FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
