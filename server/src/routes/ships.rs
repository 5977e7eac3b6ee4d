//! Ship endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use fleet_engine::{NewShip, Page, Ship, ShipId, ShipPatch, ShipQuery};

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{JsonBody, PathParams};
use crate::handlers::{
    handle_create_ship, handle_delete_ship, handle_get_ship, handle_list_ships,
    handle_update_ship,
};
use crate::AppState;

/// Create ship routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ships", get(list_handler).post(create_handler))
        .route("/ship/{ship_id}", get(get_handler))
        .route("/ships/{ship_id}", put(update_handler).delete(delete_handler))
}

/// GET /ships - Filtered, sorted, paged ship list with the total count.
async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Page<Ship>>> {
    let query = ShipQuery::from_params(params, &state.config.query_limits())?;
    let page = handle_list_ships(state.ships.as_ref(), &query).await?;
    Ok(Json(page))
}

/// GET /ship/{id}
async fn get_handler(
    State(state): State<AppState>,
    PathParams(ship_id): PathParams<ShipId>,
) -> Result<Json<Ship>> {
    let ship = handle_get_ship(state.ships.as_ref(), ship_id).await?;
    Ok(Json(ship))
}

/// POST /ships
async fn create_handler(
    State(state): State<AppState>,
    JsonBody(new): JsonBody<NewShip>,
) -> Result<(StatusCode, Json<Ship>)> {
    let ship = handle_create_ship(state.ships.as_ref(), new).await?;
    Ok((StatusCode::CREATED, Json(ship)))
}

/// PUT /ships/{id}
async fn update_handler(
    State(state): State<AppState>,
    PathParams(ship_id): PathParams<ShipId>,
    JsonBody(patch): JsonBody<ShipPatch>,
) -> Result<(StatusCode, Json<Ship>)> {
    let ship = handle_update_ship(state.ships.as_ref(), ship_id, patch).await?;
    Ok((StatusCode::ACCEPTED, Json(ship)))
}

/// DELETE /ships/{id} - Also removes the ship's crew.
async fn delete_handler(
    State(state): State<AppState>,
    PathParams(ship_id): PathParams<ShipId>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    handle_delete_ship(state.ships.as_ref(), ship_id).await?;
    Ok((StatusCode::ACCEPTED, Json(MessageResponse::ACCEPTED)))
}
