//! Handlers for the `/designs` resource.

use adcraft_core::error::CoreError;
use adcraft_core::types::DbId;
use adcraft_db::repositories::DesignRepo;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::handlers::DesignView;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/designs/{id}
///
/// Designs of other users are reported as not found.
pub async fn get_design(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DesignView>>> {
    let design = DesignRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Design",
            id,
        }))?;
    Ok(Json(DataResponse::new(design.into())))
}
