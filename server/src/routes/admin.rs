//! Reset endpoint for demo and test deployments.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use super::MessageResponse;
use crate::error::Result;
use crate::handlers::handle_reset;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/sync", get(reset_handler))
}

/// GET /sync - Remove every ship and crew member.
async fn reset_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    handle_reset(state.ships.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::CREATED)))
}
