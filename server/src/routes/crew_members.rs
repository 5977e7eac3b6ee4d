//! Crew member endpoints, nested under their ship.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use fleet_engine::{CrewMember, CrewMemberId, CrewMemberPatch, NewCrewMember, ShipId};

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{JsonBody, PathParams};
use crate::handlers::{
    handle_create_crew_member, handle_delete_crew_member, handle_get_crew_member,
    handle_list_crew, handle_update_crew_member,
};
use crate::AppState;

/// Create crew member routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ships/{ship_id}/crewmembers",
            get(list_handler).post(create_handler),
        )
        .route(
            "/ships/{ship_id}/crewmembers/{crew_member_id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
}

/// GET /ships/{sid}/crewmembers
async fn list_handler(
    State(state): State<AppState>,
    PathParams(ship_id): PathParams<ShipId>,
) -> Result<Json<Vec<CrewMember>>> {
    let crew = handle_list_crew(state.ships.as_ref(), state.crew.as_ref(), ship_id).await?;
    Ok(Json(crew))
}

/// GET /ships/{sid}/crewmembers/{cid}
async fn get_handler(
    State(state): State<AppState>,
    PathParams((ship_id, crew_member_id)): PathParams<(ShipId, CrewMemberId)>,
) -> Result<Json<CrewMember>> {
    let member = handle_get_crew_member(
        state.ships.as_ref(),
        state.crew.as_ref(),
        ship_id,
        crew_member_id,
    )
    .await?;
    Ok(Json(member))
}

/// POST /ships/{sid}/crewmembers
async fn create_handler(
    State(state): State<AppState>,
    PathParams(ship_id): PathParams<ShipId>,
    JsonBody(new): JsonBody<NewCrewMember>,
) -> Result<(StatusCode, Json<CrewMember>)> {
    let member =
        handle_create_crew_member(state.ships.as_ref(), state.crew.as_ref(), ship_id, new)
            .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT /ships/{sid}/crewmembers/{cid}
async fn update_handler(
    State(state): State<AppState>,
    PathParams((ship_id, crew_member_id)): PathParams<(ShipId, CrewMemberId)>,
    JsonBody(patch): JsonBody<CrewMemberPatch>,
) -> Result<(StatusCode, Json<CrewMember>)> {
    let member = handle_update_crew_member(
        state.ships.as_ref(),
        state.crew.as_ref(),
        ship_id,
        crew_member_id,
        patch,
    )
    .await?;
    Ok((StatusCode::ACCEPTED, Json(member)))
}

/// DELETE /ships/{sid}/crewmembers/{cid}
async fn delete_handler(
    State(state): State<AppState>,
    PathParams((ship_id, crew_member_id)): PathParams<(ShipId, CrewMemberId)>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    handle_delete_crew_member(
        state.ships.as_ref(),
        state.crew.as_ref(),
        ship_id,
        crew_member_id,
    )
    .await?;
    Ok((StatusCode::ACCEPTED, Json(MessageResponse::ACCEPTED)))
}
