pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ai/visual                   POST  generate a visual from a brief
/// /designs/{id}                GET   fetch one of the caller's designs
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/visual", post(handlers::visual::create_visual))
        .route("/designs/{id}", get(handlers::designs::get_design))
}
