//! Handler for `POST /api/ai/visual`.

use adcraft_core::brief::VisualBriefInput;
use adcraft_core::types::Credits;
use adcraft_db::models::media_file::MediaFile;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::DesignView;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualResponse {
    pub design: DesignView,
    pub credits_used: Credits,
    pub credits_remaining: Credits,
    pub media_file: MediaFile,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// POST /api/ai/visual
///
/// Generates one visual from a design brief and returns the completed design.
pub async fn create_visual(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<VisualBriefInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<VisualResponse>>> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let outcome = state.pipeline.generate(auth.user_id, input).await?;

    Ok(Json(DataResponse::new(VisualResponse {
        design: outcome.design.into(),
        credits_used: outcome.credits_used,
        credits_remaining: outcome.credits_remaining,
        media_file: outcome.media_file,
        warnings: outcome.warnings,
    })))
}
