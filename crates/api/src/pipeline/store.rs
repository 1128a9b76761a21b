//! Persistence seam for the visual pipeline.
//!
//! The orchestrator never touches the pool directly; it goes through
//! [`GenerationStore`], so tests can run the full flow against an
//! in-memory implementation.

use adcraft_core::types::{Credits, DbId};
use adcraft_db::models::ai_usage::{AiUsage, CreateAiUsage};
use adcraft_db::models::credit::CreditTransaction;
use adcraft_db::models::design::{CreateDesign, Design};
use adcraft_db::models::media_file::{CreateMediaFile, MediaFile};
use adcraft_db::models::user::User;
use adcraft_db::repositories::{AiUsageRepo, CreditRepo, DesignRepo, MediaFileRepo, UserRepo};
use adcraft_db::DbPool;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationStore: Send + Sync {
    async fn find_account(&self, user_id: DbId) -> Result<Option<User>, sqlx::Error>;

    async fn current_balance(&self, user_id: DbId) -> Result<Option<Credits>, sqlx::Error>;

    /// Insert a design in `Generating` status.
    async fn create_design(&self, input: &CreateDesign) -> Result<Design, sqlx::Error>;

    /// Move a `Generating` design to `Completed`. `None` if it was not generating.
    async fn complete_design(
        &self,
        design_id: DbId,
        image_url: &str,
        metadata: &serde_json::Value,
    ) -> Result<Option<Design>, sqlx::Error>;

    /// Atomic balance decrement plus ledger row. `None` when the balance
    /// no longer covers `cost`.
    async fn debit_credits(
        &self,
        user_id: DbId,
        design_id: DbId,
        cost: Credits,
        reason: &str,
    ) -> Result<Option<CreditTransaction>, sqlx::Error>;

    async fn record_media(&self, input: &CreateMediaFile) -> Result<MediaFile, sqlx::Error>;

    async fn record_usage(&self, input: &CreateAiUsage) -> Result<AiUsage, sqlx::Error>;
}

/// [`GenerationStore`] backed by the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PgGenerationStore {
    pool: DbPool,
}

impl PgGenerationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationStore for PgGenerationStore {
    async fn find_account(&self, user_id: DbId) -> Result<Option<User>, sqlx::Error> {
        UserRepo::find_by_id(&self.pool, user_id).await
    }

    async fn current_balance(&self, user_id: DbId) -> Result<Option<Credits>, sqlx::Error> {
        UserRepo::balance(&self.pool, user_id).await
    }

    async fn create_design(&self, input: &CreateDesign) -> Result<Design, sqlx::Error> {
        DesignRepo::create(&self.pool, input).await
    }

    async fn complete_design(
        &self,
        design_id: DbId,
        image_url: &str,
        metadata: &serde_json::Value,
    ) -> Result<Option<Design>, sqlx::Error> {
        DesignRepo::mark_completed(&self.pool, design_id, image_url, metadata).await
    }

    async fn debit_credits(
        &self,
        user_id: DbId,
        design_id: DbId,
        cost: Credits,
        reason: &str,
    ) -> Result<Option<CreditTransaction>, sqlx::Error> {
        CreditRepo::debit(&self.pool, user_id, Some(design_id), cost, reason).await
    }

    async fn record_media(&self, input: &CreateMediaFile) -> Result<MediaFile, sqlx::Error> {
        MediaFileRepo::create(&self.pool, input).await
    }

    async fn record_usage(&self, input: &CreateAiUsage) -> Result<AiUsage, sqlx::Error> {
        AiUsageRepo::create(&self.pool, input).await
    }
}
